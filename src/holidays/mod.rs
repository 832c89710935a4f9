//! Holiday lookup for countries, their subdivisions and financial markets.
//!
//! National holidays come from the `holidays` database. It knows nothing about
//! subdivisions or stock exchanges, those are kept as rule tables here.

use core::fmt;

use chrono::NaiveDate;
use thiserror::Error;

mod adapter;
mod country;
mod de;
mod nyse;
mod region;
mod rules;
mod us;

pub use adapter::*;
pub use country::*;
pub use de::GermanStateHolidays;
pub use nyse::NewYorkStockExchange;
pub use region::*;
pub use rules::*;
pub use us::UsStateHolidays;

/// A named holiday.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Holiday {
    date: NaiveDate,
    name: String,
}

impl Holiday {
    #[must_use]
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
        }
    }

    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Holiday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date.format("%Y/%m/%d"), self.name)
    }
}

impl From<(NaiveDate, String)> for Holiday {
    fn from((date, name): (NaiveDate, String)) -> Self {
        Self::new(date, name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HolidayError {
    #[error("holidays for country `{0}` are not supported")]
    UnsupportedCountry(String),
    #[error("country `{country}` has no subdivision `{subdiv}` (supported: {supported})")]
    UnsupportedSubdivision {
        country: String,
        subdiv: String,
        supported: String,
    },
    #[error("holidays for the financial market `{0}` are not supported")]
    UnsupportedMarket(String),
    #[error("neither a country nor a financial market has been specified")]
    MissingRegion,
}

/// A database of holiday rules.
pub trait HolidayRules: fmt::Debug {
    /// Computes all holidays in the `year`, in no particular order.
    fn holidays(&self, year: i32) -> Vec<Holiday>;
}

/// Answers which holiday (if any) falls on a date.
pub trait HolidayLookup {
    fn holiday_name(&mut self, date: NaiveDate) -> Option<&str>;

    /// Returns all holidays from `first` to `last` (inclusive) in chronological order.
    fn holidays_between(&mut self, first: NaiveDate, last: NaiveDate) -> Vec<Holiday> {
        first
            .iter_days()
            .take_while(|date| *date <= last)
            .filter_map(|date| {
                self.holiday_name(date)
                    .map(|name| Holiday::new(date, name))
            })
            .collect()
    }
}

/// No holidays at all.
impl HolidayLookup for () {
    fn holiday_name(&mut self, _date: NaiveDate) -> Option<&str> {
        None
    }
}

impl HolidayLookup for std::collections::BTreeMap<NaiveDate, String> {
    fn holiday_name(&mut self, date: NaiveDate) -> Option<&str> {
        self.get(&date).map(String::as_str)
    }
}

impl<L: HolidayLookup + ?Sized> HolidayLookup for &mut L {
    fn holiday_name(&mut self, date: NaiveDate) -> Option<&str> {
        (**self).holiday_name(date)
    }

    fn holidays_between(&mut self, first: NaiveDate, last: NaiveDate) -> Vec<Holiday> {
        (**self).holidays_between(first, last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    use crate::{date, map};

    #[test]
    fn test_display() {
        assert_eq!(
            Holiday::new(date!(2023:01:01), "New Year's Day").to_string(),
            "2023/01/01 New Year's Day"
        );
    }

    #[test]
    fn test_default_holidays_between() {
        let mut lookup = map! {
            date!(2022:12:31) => "before".to_string(),
            date!(2023:01:01) => "first".to_string(),
            date!(2023:01:09) => "second".to_string(),
            date!(2023:01:10) => "after".to_string(),
        };

        assert_eq!(
            lookup.holidays_between(date!(2023:01:01), date!(2023:01:09)),
            vec![
                Holiday::new(date!(2023:01:01), "first"),
                Holiday::new(date!(2023:01:09), "second"),
            ]
        );
        assert_eq!(().holidays_between(date!(2023:01:01), date!(2023:12:31)), vec![]);
    }
}
