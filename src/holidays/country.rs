use chrono::{Datelike, NaiveDate};
use holidays::Country;

use crate::holidays::{Holiday, HolidayError, HolidayRules};

/// Maps an ISO 3166 alpha-2 code onto the countries of the holiday database.
fn country_of(code: &str) -> Option<Country> {
    let country = match code {
        "AT" => Country::AT,
        "AU" => Country::AU,
        "BE" => Country::BE,
        "BR" => Country::BR,
        "CA" => Country::CA,
        "CH" => Country::CH,
        "DE" => Country::DE,
        "DK" => Country::DK,
        "ES" => Country::ES,
        "FI" => Country::FI,
        "FR" => Country::FR,
        "GB" | "UK" => Country::GB,
        "IE" => Country::IE,
        "IT" => Country::IT,
        "JP" => Country::JP,
        "KR" => Country::KR,
        "MX" => Country::MX,
        "NL" => Country::NL,
        "NO" => Country::NO,
        "NZ" => Country::NZ,
        "PL" => Country::PL,
        "PT" => Country::PT,
        "SE" => Country::SE,
        "US" => Country::US,
        _ => return None,
    };

    Some(country)
}

/// The national holidays of a country, as published by the `holidays` database.
#[derive(Debug, Clone)]
pub struct NationalHolidays {
    code: String,
}

impl NationalHolidays {
    pub fn new(code: &str) -> Result<Self, HolidayError> {
        country_of(code).ok_or_else(|| HolidayError::UnsupportedCountry(code.to_string()))?;

        Ok(Self {
            code: code.to_string(),
        })
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    fn name_on(&self, date: NaiveDate) -> Option<String> {
        let country = country_of(&self.code)?;
        if !holidays::is_holiday(country, date) {
            return None;
        }

        let country = country_of(&self.code)?;
        holidays::get_holidays(country, date)
            .next()
            .map(|holiday| holiday.name.to_string())
    }
}

impl HolidayRules for NationalHolidays {
    fn holidays(&self, year: i32) -> Vec<Holiday> {
        let Some(first_day) = NaiveDate::from_ymd_opt(year, 1, 1) else {
            return Vec::new();
        };

        first_day
            .iter_days()
            .take_while(|date| date.year() == year)
            .filter_map(|date| self.name_on(date).map(|name| Holiday::new(date, name)))
            .collect()
    }
}

/// The holidays of several databases, like the national and the regional ones.
#[derive(Debug)]
pub struct CombinedRules(Vec<Box<dyn HolidayRules>>);

impl CombinedRules {
    #[must_use]
    pub fn new(rules: Vec<Box<dyn HolidayRules>>) -> Self {
        Self(rules)
    }
}

impl HolidayRules for CombinedRules {
    fn holidays(&self, year: i32) -> Vec<Holiday> {
        self.0.iter().flat_map(|rules| rules.holidays(year)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    use crate::date;

    #[derive(Debug)]
    struct Fixed(&'static str);

    impl HolidayRules for Fixed {
        fn holidays(&self, year: i32) -> Vec<Holiday> {
            NaiveDate::from_ymd_opt(year, 5, 1)
                .map(|date| Holiday::new(date, self.0))
                .into_iter()
                .collect()
        }
    }

    #[test]
    fn test_unsupported_country() {
        assert_eq!(
            NationalHolidays::new("XX").unwrap_err(),
            HolidayError::UnsupportedCountry("XX".to_string())
        );
        assert_eq!(NationalHolidays::new("UK").unwrap().code(), "UK");
    }

    #[test]
    fn test_martin_luther_king_day() {
        let holidays = NationalHolidays::new("US").unwrap().holidays(2023);

        assert!(holidays.contains(&Holiday::new(
            date!(2023:01:16),
            "Martin Luther King Jr. Day"
        )));
        assert!(holidays.iter().all(|holiday| holiday.date().year() == 2023));
    }

    #[test]
    fn test_combined() {
        let rules = CombinedRules::new(vec![Box::new(Fixed("a")), Box::new(Fixed("b"))]);

        assert_eq!(
            rules.holidays(2023),
            vec![
                Holiday::new(date!(2023:05:01), "a"),
                Holiday::new(date!(2023:05:01), "b"),
            ]
        );
    }
}
