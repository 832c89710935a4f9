use chrono::NaiveDate;
use thiserror::Error;

use crate::holidays::last_day_of_month;

pub const MONTHS_PER_YEAR: u32 = 12;
pub const DEFAULT_WIDTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("{0} is not a month, expected 1..12")]
    InvalidMonth(u32),
    #[error("can not show {0} months, expected 1..12")]
    InvalidMonthCount(u32),
    #[error("can not create a calendar for the year {0}")]
    InvalidYear(i32),
}

/// Which months are shown and how they are arranged in rows.
///
/// The months start at `start_month` of `year` and continue into the next year
/// once december is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearLayout {
    year: i32,
    start_month: u32,
    months: u32,
    width: usize,
}

impl YearLayout {
    /// The `width` is clamped to `1..=12`.
    pub fn new(year: i32, start_month: u32, months: u32, width: usize) -> Result<Self, LayoutError> {
        if !(1..=MONTHS_PER_YEAR).contains(&start_month) {
            return Err(LayoutError::InvalidMonth(start_month));
        }

        if !(1..=MONTHS_PER_YEAR).contains(&months) {
            return Err(LayoutError::InvalidMonthCount(months));
        }

        let result = Self {
            year,
            start_month,
            months,
            width: width.clamp(1, MONTHS_PER_YEAR as usize),
        };

        // every slot has to be representable
        result.last_date().ok_or(LayoutError::InvalidYear(year))?;
        NaiveDate::from_ymd_opt(year, start_month, 1).ok_or(LayoutError::InvalidYear(year))?;

        Ok(result)
    }

    /// Twelve months starting at `start_month`.
    pub fn annual(year: i32, start_month: u32, width: usize) -> Result<Self, LayoutError> {
        Self::new(year, start_month, MONTHS_PER_YEAR, width)
    }

    /// Only the `month` of the `year`.
    pub fn single(year: i32, month: u32) -> Result<Self, LayoutError> {
        Self::new(year, month, 1, 1)
    }

    /// The year the layout starts in.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn start_month(&self) -> u32 {
        self.start_month
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn months(&self) -> u32 {
        self.months
    }

    /// The year and month of the `index`th slot.
    #[must_use]
    pub const fn slot(&self, index: u32) -> (i32, u32) {
        let month = (self.start_month + index - 1) % MONTHS_PER_YEAR + 1;
        let year = if month < self.start_month {
            self.year + 1
        } else {
            self.year
        };

        (year, month)
    }

    /// The first day of every shown month.
    pub fn slots(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.months).filter_map(|index| {
            let (year, month) = self.slot(index);
            NaiveDate::from_ymd_opt(year, month, 1)
        })
    }

    /// The slots grouped into rows of `width` months, the last row may be shorter.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<NaiveDate>> {
        self.slots()
            .collect::<Vec<_>>()
            .chunks(self.width)
            .map(<[NaiveDate]>::to_vec)
            .collect()
    }

    #[must_use]
    pub fn first_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.start_month, 1)
    }

    #[must_use]
    pub fn last_date(&self) -> Option<NaiveDate> {
        let (year, month) = self.slot(self.months - 1);
        last_day_of_month(year, month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Datelike;
    use pretty_assertions::assert_eq;

    use crate::date;

    fn year_months(layout: &YearLayout) -> Vec<Vec<(i32, u32)>> {
        layout
            .rows()
            .into_iter()
            .map(|row| row.into_iter().map(|date| (date.year(), date.month())).collect())
            .collect()
    }

    #[test]
    fn test_default_year() {
        let layout = YearLayout::annual(2023, 1, DEFAULT_WIDTH).unwrap();

        assert_eq!(layout.rows().len(), 4);
        assert!(layout.rows().iter().all(|row| row.len() == 3));
        assert_eq!(layout.first_date(), Some(date!(2023:01:01)));
        assert_eq!(layout.last_date(), Some(date!(2023:12:31)));
    }

    #[test]
    fn test_wraps_into_next_year() {
        let layout = YearLayout::annual(2023, 4, 6).unwrap();

        assert_eq!(
            year_months(&layout),
            vec![
                vec![
                    (2023, 4),
                    (2023, 5),
                    (2023, 6),
                    (2023, 7),
                    (2023, 8),
                    (2023, 9)
                ],
                vec![
                    (2023, 10),
                    (2023, 11),
                    (2023, 12),
                    (2024, 1),
                    (2024, 2),
                    (2024, 3)
                ],
            ]
        );
        assert_eq!(layout.last_date(), Some(date!(2024:03:31)));
    }

    #[test]
    fn test_uneven_width() {
        let layout = YearLayout::annual(2023, 1, 5).unwrap();

        assert_eq!(
            layout.rows().iter().map(Vec::len).collect::<Vec<_>>(),
            vec![5, 5, 2]
        );
        assert_eq!(layout.slots().count(), 12);
    }

    #[test]
    fn test_width_is_clamped() {
        assert_eq!(YearLayout::annual(2023, 1, 0).unwrap().width(), 1);
        assert_eq!(YearLayout::annual(2023, 1, 20).unwrap().width(), 12);
    }

    #[test]
    fn test_single_month() {
        let layout = YearLayout::single(2023, 12).unwrap();

        assert_eq!(year_months(&layout), vec![vec![(2023, 12)]]);
        assert_eq!(layout.last_date(), Some(date!(2023:12:31)));
    }

    #[test]
    fn test_invalid() {
        assert_eq!(
            YearLayout::annual(2023, 13, 3),
            Err(LayoutError::InvalidMonth(13))
        );
        assert_eq!(
            YearLayout::new(2023, 1, 0, 3),
            Err(LayoutError::InvalidMonthCount(0))
        );
    }
}
