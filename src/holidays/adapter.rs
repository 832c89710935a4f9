use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use log::trace;

use crate::holidays::{Holiday, HolidayError, HolidayLookup, HolidayRules, Region};

/// Serves holiday lookups from a [`HolidayRules`] database.
///
/// The database is asked once per year, all following lookups in that year are
/// answered from the cache.
#[derive(Debug)]
pub struct HolidayCalendar {
    rules: Box<dyn HolidayRules>,
    years: HashMap<i32, BTreeMap<NaiveDate, String>>,
}

impl HolidayCalendar {
    #[must_use]
    pub fn new(rules: Box<dyn HolidayRules>) -> Self {
        Self {
            rules,
            years: HashMap::new(),
        }
    }

    pub fn for_region(region: &Region) -> Result<Self, HolidayError> {
        Ok(Self::new(region.rules()?))
    }

    fn collect(holidays: Vec<Holiday>) -> BTreeMap<NaiveDate, String> {
        let mut result = BTreeMap::new();

        for holiday in holidays {
            let Holiday { date, name } = holiday;

            match result.entry(date) {
                std::collections::btree_map::Entry::Vacant(entry) => {
                    entry.insert(name);
                }
                std::collections::btree_map::Entry::Occupied(mut entry) => {
                    let existing: &mut String = entry.get_mut();
                    if !existing.split(", ").any(|part| part == name) {
                        existing.push_str(", ");
                        existing.push_str(&name);
                    }
                }
            }
        }

        result
    }

    fn year(&mut self, year: i32) -> &BTreeMap<NaiveDate, String> {
        match self.years.entry(year) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                trace!("computing holidays for {}", year);
                entry.insert(Self::collect(self.rules.holidays(year)))
            }
        }
    }

    /// Returns all holidays of the `year` in chronological order.
    pub fn holidays_in_year(&mut self, year: i32) -> Vec<Holiday> {
        self.year(year)
            .iter()
            .map(|(date, name)| Holiday::new(*date, name.as_str()))
            .collect()
    }

    /// The number of years that have been computed so far.
    #[must_use]
    pub fn cached_years(&self) -> usize {
        self.years.len()
    }
}

impl HolidayLookup for HolidayCalendar {
    fn holiday_name(&mut self, date: NaiveDate) -> Option<&str> {
        self.year(date.year()).get(&date).map(String::as_str)
    }

    fn holidays_between(&mut self, first: NaiveDate, last: NaiveDate) -> Vec<Holiday> {
        if first > last {
            return Vec::new();
        }

        (first.year()..=last.year())
            .flat_map(|year| {
                self.year(year)
                    .range(first..=last)
                    .map(|(date, name)| Holiday::new(*date, name.as_str()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use crate::date;

    #[derive(Debug)]
    struct CountingRules {
        calls: Rc<Cell<usize>>,
    }

    impl HolidayRules for CountingRules {
        fn holidays(&self, year: i32) -> Vec<Holiday> {
            self.calls.set(self.calls.get() + 1);

            let mut result = vec![
                Holiday::new(NaiveDate::from_ymd_opt(year, 1, 1).unwrap(), "New Year"),
                Holiday::new(NaiveDate::from_ymd_opt(year, 5, 1).unwrap(), "Labour Day"),
                Holiday::new(NaiveDate::from_ymd_opt(year, 5, 1).unwrap(), "Ascension"),
            ];
            result.reverse();
            result
        }
    }

    fn counting_calendar() -> (HolidayCalendar, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let calendar = HolidayCalendar::new(Box::new(CountingRules {
            calls: Rc::clone(&calls),
        }));

        (calendar, calls)
    }

    #[test]
    fn test_caches_per_year() {
        let (mut calendar, calls) = counting_calendar();

        for date in date!(2023:01:01).iter_days().take(365) {
            calendar.holiday_name(date);
        }

        assert_eq!(calls.get(), 1);
        assert_eq!(calendar.cached_years(), 1);

        assert_eq!(calendar.holiday_name(date!(2024:01:01)), Some("New Year"));
        assert_eq!(calls.get(), 2);
        assert_eq!(calendar.cached_years(), 2);
    }

    #[test]
    fn test_holiday_name() {
        let (mut calendar, _) = counting_calendar();

        assert_eq!(calendar.holiday_name(date!(2023:01:01)), Some("New Year"));
        assert_eq!(calendar.holiday_name(date!(2023:01:02)), None);
        // two holidays on the same day are joined
        assert_eq!(
            calendar.holiday_name(date!(2023:05:01)),
            Some("Ascension, Labour Day")
        );
    }

    #[test]
    fn test_holidays_between_crosses_years() {
        let (mut calendar, _) = counting_calendar();

        assert_eq!(
            calendar
                .holidays_between(date!(2023:04:01), date!(2024:03:31))
                .into_iter()
                .map(|holiday| holiday.date())
                .collect::<Vec<_>>(),
            vec![date!(2023:05:01), date!(2024:01:01)]
        );
        assert_eq!(
            calendar.holidays_between(date!(2024:03:31), date!(2023:04:01)),
            vec![]
        );
    }

    #[test]
    fn test_holidays_in_year_is_sorted() {
        let (mut calendar, _) = counting_calendar();

        let dates = calendar
            .holidays_in_year(2023)
            .into_iter()
            .map(|holiday| holiday.date())
            .collect::<Vec<_>>();

        assert_eq!(dates, vec![date!(2023:01:01), date!(2023:05:01)]);
    }
}
