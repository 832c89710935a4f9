use chrono::NaiveDate;

use crate::calendar::{FirstWeekday, MonthGrid, YearLayout};
use crate::holidays::{Holiday, HolidayLookup};

/// Everything that is shown on a calendar page, independent of the output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarPage {
    year: i32,
    width: usize,
    rows: Vec<Vec<MonthGrid>>,
    holidays: Vec<Holiday>,
}

impl CalendarPage {
    /// Lays out all months of the `layout` and collects the holidays that fall
    /// into them.
    pub fn build<L>(
        layout: &YearLayout,
        first_weekday: FirstWeekday,
        lookup: &mut L,
        today: Option<NaiveDate>,
    ) -> Self
    where
        L: HolidayLookup + ?Sized,
    {
        let rows = layout
            .rows()
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|first_day| MonthGrid::new(first_day, first_weekday, lookup, today))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let holidays = match (layout.first_date(), layout.last_date()) {
            (Some(first), Some(last)) => lookup.holidays_between(first, last),
            _ => Vec::new(),
        };

        Self {
            year: layout.year(),
            width: layout.width(),
            rows,
            holidays,
        }
    }

    /// The year the page starts with, used in the header and the title.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// The maximum number of months in a row.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<MonthGrid>] {
        &self.rows
    }

    pub fn months(&self) -> impl Iterator<Item = &MonthGrid> + '_ {
        self.rows.iter().flatten()
    }

    /// All holidays of the shown months in chronological order.
    #[must_use]
    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;

    use crate::holidays::{HolidayCalendar, Region};
    use crate::{date, map};

    fn lookup() -> BTreeMap<NaiveDate, String> {
        map! {
            date!(2022:12:31) => "before".to_string(),
            date!(2023:01:01) => "new year".to_string(),
            date!(2023:05:03) => "constitution".to_string(),
            date!(2023:12:31) => "last".to_string(),
            date!(2024:02:19) => "next year".to_string(),
        }
    }

    #[test]
    fn test_build_year() {
        let layout = YearLayout::annual(2023, 1, 3).unwrap();

        let page = CalendarPage::build(&layout, FirstWeekday::default(), &mut lookup(), None);

        assert_eq!(page.year(), 2023);
        assert_eq!(page.rows().len(), 4);
        assert_eq!(page.months().count(), 12);
        assert_eq!(
            page.holidays(),
            [
                Holiday::new(date!(2023:01:01), "new year"),
                Holiday::new(date!(2023:05:03), "constitution"),
                Holiday::new(date!(2023:12:31), "last"),
            ]
        );
    }

    #[test]
    fn test_holidays_follow_the_shown_months() {
        let layout = YearLayout::annual(2023, 4, 3).unwrap();

        let page = CalendarPage::build(&layout, FirstWeekday::default(), &mut lookup(), None);

        let dates = page
            .holidays()
            .iter()
            .map(Holiday::date)
            .collect::<Vec<_>>();

        assert_eq!(
            dates,
            vec![date!(2023:05:03), date!(2023:12:31), date!(2024:02:19)]
        );
    }

    #[test]
    fn test_single_month() {
        let layout = YearLayout::single(2023, 1).unwrap();
        let mut calendar = HolidayCalendar::for_region(&Region::country("US")).unwrap();

        let page = CalendarPage::build(
            &layout,
            FirstWeekday::default(),
            &mut calendar,
            Some(date!(2023:01:16)),
        );

        assert_eq!(page.months().count(), 1);
        assert!(page
            .holidays()
            .contains(&Holiday::new(date!(2023:01:16), "Martin Luther King Jr. Day")));
        assert!(page
            .holidays()
            .iter()
            .all(|holiday| holiday.date() >= date!(2023:01:01)
                && holiday.date() <= date!(2023:01:31)));
    }
}
