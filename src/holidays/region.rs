use core::fmt;

use crate::holidays::{
    CombinedRules, GermanStateHolidays, HolidayError, HolidayRules, NationalHolidays,
    NewYorkStockExchange, UsStateHolidays,
};

/// Whose holidays are shown in the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Region {
    Country {
        code: String,
        subdiv: Option<String>,
    },
    /// A financial market calendar, like `NYSE`.
    Financial(String),
}

impl Region {
    /// A financial market takes precedence over the country.
    pub fn new(
        country: Option<&str>,
        subdiv: Option<&str>,
        financial: Option<&str>,
    ) -> Result<Self, HolidayError> {
        let normalize = |value: &str| value.trim().to_ascii_uppercase();

        if let Some(market) = financial.filter(|value| !value.trim().is_empty()) {
            return Ok(Self::Financial(normalize(market)));
        }

        let code = country
            .filter(|value| !value.trim().is_empty())
            .ok_or(HolidayError::MissingRegion)?;

        Ok(Self::Country {
            code: normalize(code),
            subdiv: subdiv
                .filter(|value| !value.trim().is_empty())
                .map(normalize),
        })
    }

    #[must_use]
    pub fn country(code: &str) -> Self {
        Self::Country {
            code: code.to_ascii_uppercase(),
            subdiv: None,
        }
    }

    /// Looks up the holiday rules for this region.
    pub fn rules(&self) -> Result<Box<dyn HolidayRules>, HolidayError> {
        match self {
            Self::Country { code, subdiv } => {
                let national = NationalHolidays::new(code)?;

                let Some(subdiv) = subdiv.as_deref() else {
                    return Ok(Box::new(national));
                };

                let regional: Box<dyn HolidayRules> = match code.as_str() {
                    "US" => Box::new(UsStateHolidays::new(subdiv)?),
                    "DE" => Box::new(GermanStateHolidays::new(subdiv)?),
                    _ => {
                        return Err(HolidayError::UnsupportedSubdivision {
                            country: code.clone(),
                            subdiv: subdiv.to_string(),
                            supported: "none".to_string(),
                        })
                    }
                };

                Ok(Box::new(CombinedRules::new(vec![Box::new(national), regional])))
            }
            Self::Financial(market) => match market.as_str() {
                "NYSE" | "XNYS" => Ok(Box::new(NewYorkStockExchange)),
                _ => Err(HolidayError::UnsupportedMarket(market.clone())),
            },
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Country {
                code,
                subdiv: Some(subdiv),
            } => write!(f, "{}-{}", code, subdiv),
            Self::Country { code, subdiv: None } => write!(f, "{}", code),
            Self::Financial(market) => write!(f, "{}", market),
        }
    }
}

/// Fails if `subdiv` is not one of the `supported` subdivisions.
pub(super) fn check_subdivision(
    country: &str,
    subdiv: &str,
    supported: &[&str],
) -> Result<(), HolidayError> {
    if supported.contains(&subdiv) {
        return Ok(());
    }

    Err(HolidayError::UnsupportedSubdivision {
        country: country.to_string(),
        subdiv: subdiv.to_string(),
        supported: supported.join(", "),
    })
}
