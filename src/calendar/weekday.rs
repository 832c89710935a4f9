use core::fmt;
use core::str::FromStr;

use chrono::Weekday;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` is not a weekday, expected one of mon, tue, wed, thu, fri, sat, sun or 0..6")]
pub struct ParseWeekdayError(String);

/// The weekday a week row of the calendar starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstWeekday(Weekday);

impl FirstWeekday {
    #[must_use]
    pub const fn new(weekday: Weekday) -> Self {
        Self(weekday)
    }

    #[must_use]
    pub const fn weekday(&self) -> Weekday {
        self.0
    }

    /// The weekdays of a row in display order.
    #[must_use]
    pub fn week(&self) -> [Weekday; 7] {
        let mut result = [self.0; 7];
        for index in 1..7 {
            result[index] = result[index - 1].succ();
        }

        result
    }

    /// The column of the `weekday` in a week row.
    #[must_use]
    pub fn column_of(&self, weekday: Weekday) -> usize {
        let column =
            (7 + weekday.num_days_from_monday() - self.0.num_days_from_monday()) % 7;
        column as usize
    }
}

impl Default for FirstWeekday {
    fn default() -> Self {
        Self(Weekday::Sun)
    }
}

impl fmt::Display for FirstWeekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(css_class(self.0))
    }
}

impl FromStr for FirstWeekday {
    type Err = ParseWeekdayError;

    /// Accepts `mon`..`sun`, full english names and the numbers `0` (monday)
    /// to `6` (sunday).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if let Ok(number) = value.parse::<u8>() {
            return Weekday::try_from(number)
                .map(Self)
                .map_err(|_| ParseWeekdayError(value.to_string()));
        }

        value
            .parse::<Weekday>()
            .map(Self)
            .map_err(|_| ParseWeekdayError(value.to_string()))
    }
}

/// The lowercase three letter name used as css class.
#[must_use]
pub const fn css_class(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}
