use core::fmt;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use chrono::NaiveDate;
use log::{debug, info};

use crate::verifier::{HolidaySource, SourceError};

/// Compares the holidays of several sources date by date.
///
/// Only disagreements are reported, nothing is merged or resolved.
#[derive(Debug)]
pub struct Verifier {
    sources: Vec<Box<dyn HolidaySource>>,
    normalize: bool,
    report_missing: bool,
}

impl Verifier {
    #[must_use]
    pub fn new(sources: Vec<Box<dyn HolidaySource>>) -> Self {
        Self {
            sources,
            normalize: false,
            report_missing: false,
        }
    }

    /// Compare the canonical names instead of the names as given by the sources.
    pub fn normalize(&mut self, normalize: bool) -> &mut Self {
        self.normalize = normalize;
        self
    }

    /// Report dates that are a holiday in some sources, but not in all of them.
    pub fn report_missing(&mut self, report_missing: bool) -> &mut Self {
        self.report_missing = report_missing;
        self
    }

    pub fn verify(&mut self, years: RangeInclusive<i32>) -> Result<Report, SourceError> {
        let count = self.sources.len();
        // the raw and the compared name of every source on a date
        let mut by_date: BTreeMap<NaiveDate, Vec<Option<(String, String)>>> = BTreeMap::new();

        for (index, source) in self.sources.iter_mut().enumerate() {
            info!("collecting holidays from {}", source.name());

            for year in years.clone() {
                for holiday in source.holidays(year)? {
                    let compared = if self.normalize {
                        source.names().normalize(holiday.name()).to_string()
                    } else {
                        holiday.name().to_string()
                    };

                    let names = by_date
                        .entry(holiday.date())
                        .or_insert_with(|| vec![None; count]);

                    match names[index].as_mut() {
                        Some((raw, joined)) => {
                            raw.push_str(", ");
                            raw.push_str(holiday.name());
                            joined.push_str(", ");
                            joined.push_str(&compared);
                        }
                        None => names[index] = Some((holiday.name().to_string(), compared)),
                    }
                }
            }
        }

        let mut rows = Vec::new();

        for (date, names) in by_date {
            let present = names
                .iter()
                .flatten()
                .map(|(_, compared)| compared.as_str())
                .collect::<BTreeSet<_>>();
            let is_missing = names.iter().any(Option::is_none);

            if present.len() > 1 || (self.report_missing && is_missing) {
                debug!("{}: {:?}", date, present);
                rows.push(Disagreement {
                    date,
                    names: names.into_iter().map(|name| name.map(|(raw, _)| raw)).collect(),
                });
            }
        }

        Ok(Report {
            sources: self
                .sources
                .iter()
                .map(|source| source.name().to_string())
                .collect(),
            rows,
        })
    }
}

/// The names of all sources on a date they disagree on, `None` if the date is
/// not a holiday in that source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disagreement {
    date: NaiveDate,
    names: Vec<Option<String>>,
}

impl Disagreement {
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn names(&self) -> &[Option<String>] {
        &self.names
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    sources: Vec<String>,
    rows: Vec<Disagreement>,
}

impl Report {
    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    #[must_use]
    pub fn rows(&self) -> &[Disagreement] {
        &self.rows
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "| Date |")?;
        for source in &self.sources {
            write!(f, " {} |", source)?;
        }
        writeln!(f)?;

        for row in &self.rows {
            write!(f, "| {} |", row.date.format("%Y/%m/%d"))?;
            for name in &row.names {
                write!(f, " {} |", name.as_deref().unwrap_or("-"))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
