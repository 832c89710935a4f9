use chrono::{Datelike, NaiveDate, Weekday};

use crate::calendar::FirstWeekday;
use crate::holidays::HolidayLookup;

/// Every month is rendered with the same number of week rows.
pub const WEEKS_PER_MONTH: usize = 6;
pub const DAYS_PER_WEEK: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    date: NaiveDate,
    holiday: Option<String>,
    is_today: bool,
}

impl Day {
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn day(&self) -> u32 {
        self.date.day()
    }

    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    #[must_use]
    pub fn holiday(&self) -> Option<&str> {
        self.holiday.as_deref()
    }

    #[must_use]
    pub const fn is_today(&self) -> bool {
        self.is_today
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cell {
    /// A cell before the first or after the last day of the month.
    #[default]
    Blank,
    Day(Day),
}

impl Cell {
    #[must_use]
    pub const fn as_day(&self) -> Option<&Day> {
        match self {
            Self::Day(day) => Some(day),
            Self::Blank => None,
        }
    }
}

/// A month laid out as 6 weeks with 7 days each.
///
/// Weeks the month does not reach are filled with [`Cell::Blank`], so months
/// placed side by side have the same height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    first_day: NaiveDate,
    first_weekday: FirstWeekday,
    weeks: [[Cell; DAYS_PER_WEEK]; WEEKS_PER_MONTH],
}

impl MonthGrid {
    /// Lays out the month that contains `date`.
    ///
    /// Only the days of the month are looked up in the `lookup`.
    pub fn new<L>(
        date: NaiveDate,
        first_weekday: FirstWeekday,
        lookup: &mut L,
        today: Option<NaiveDate>,
    ) -> Self
    where
        L: HolidayLookup + ?Sized,
    {
        let first_day = date.with_day(1).unwrap_or(date);
        let offset = first_weekday.column_of(first_day.weekday());

        let mut weeks: [[Cell; DAYS_PER_WEEK]; WEEKS_PER_MONTH] = Default::default();

        for (index, date) in first_day
            .iter_days()
            .take_while(|date| date.month() == first_day.month())
            .enumerate()
        {
            let position = offset + index;
            weeks[position / DAYS_PER_WEEK][position % DAYS_PER_WEEK] = Cell::Day(Day {
                date,
                holiday: lookup.holiday_name(date).map(str::to_string),
                is_today: today == Some(date),
            });
        }

        Self {
            first_day,
            first_weekday,
            weeks,
        }
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    #[must_use]
    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    #[must_use]
    pub const fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// The weekdays of the columns.
    #[must_use]
    pub fn weekdays(&self) -> [Weekday; DAYS_PER_WEEK] {
        self.first_weekday.week()
    }

    #[must_use]
    pub const fn weeks(&self) -> &[[Cell; DAYS_PER_WEEK]; WEEKS_PER_MONTH] {
        &self.weeks
    }

    /// All days of the month in chronological order.
    pub fn days(&self) -> impl Iterator<Item = &Day> + '_ {
        self.weeks.iter().flatten().filter_map(Cell::as_day)
    }
}
