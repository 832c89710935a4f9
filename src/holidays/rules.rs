use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::holidays::Holiday;

/// Specifies the nth week of a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nth {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

/// The years in which a rule applies, both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Years {
    first: Option<i32>,
    last: Option<i32>,
}

impl Years {
    pub const ALWAYS: Self = Self {
        first: None,
        last: None,
    };

    #[must_use]
    pub const fn since(first: i32) -> Self {
        Self {
            first: Some(first),
            last: None,
        }
    }

    #[must_use]
    pub const fn until(last: i32) -> Self {
        Self {
            first: None,
            last: Some(last),
        }
    }

    #[must_use]
    pub const fn between(first: i32, last: i32) -> Self {
        Self {
            first: Some(first),
            last: Some(last),
        }
    }

    #[must_use]
    pub const fn contains(&self, year: i32) -> bool {
        let after_first = match self.first {
            Some(first) => year >= first,
            None => true,
        };

        let before_last = match self.last {
            Some(last) => year <= last,
            None => true,
        };

        after_first && before_last
    }
}

/// A single entry of a holiday table.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// The same day every year, e.g. the 4th of July.
    Fixed {
        month: u32,
        day: u32,
        name: &'static str,
        years: Years,
    },
    /// A holiday that falls on the nth (or last) weekday of a specific month,
    /// e.g. the first Monday in May.
    NthWeekday {
        month: u32,
        weekday: Weekday,
        nth: Nth,
        name: &'static str,
        years: Years,
    },
    /// A holiday that is defined in relative days (e.g. -2 for Good Friday) to
    /// Easter (Sunday).
    EasterOffset {
        offset: i64,
        name: &'static str,
        years: Years,
    },
    /// A single holiday which is valid only once in time.
    Singular {
        year: i32,
        month: u32,
        day: u32,
        name: &'static str,
    },
    /// A holiday that needs a custom calculation.
    Computed {
        date: fn(i32) -> Option<NaiveDate>,
        name: &'static str,
        years: Years,
    },
}

impl Rule {
    #[must_use]
    pub const fn fixed(month: u32, day: u32, name: &'static str, years: Years) -> Self {
        Self::Fixed {
            month,
            day,
            name,
            years,
        }
    }

    #[must_use]
    pub const fn nth_weekday(
        month: u32,
        weekday: Weekday,
        nth: Nth,
        name: &'static str,
        years: Years,
    ) -> Self {
        Self::NthWeekday {
            month,
            weekday,
            nth,
            name,
            years,
        }
    }

    #[must_use]
    pub const fn easter(offset: i64, name: &'static str, years: Years) -> Self {
        Self::EasterOffset {
            offset,
            name,
            years,
        }
    }

    #[must_use]
    pub const fn singular(year: i32, month: u32, day: u32, name: &'static str) -> Self {
        Self::Singular {
            year,
            month,
            day,
            name,
        }
    }

    #[must_use]
    pub const fn computed(
        date: fn(i32) -> Option<NaiveDate>,
        name: &'static str,
        years: Years,
    ) -> Self {
        Self::Computed { date, name, years }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Fixed { name, .. }
            | Self::NthWeekday { name, .. }
            | Self::EasterOffset { name, .. }
            | Self::Singular { name, .. }
            | Self::Computed { name, .. } => name,
        }
    }

    /// Returns `true` for holidays that are bound to a day of the month and
    /// can therefore fall on a weekend.
    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed { .. })
    }

    /// Returns the date of the holiday in the `year`, if it is observed in that year.
    #[must_use]
    pub fn date_in(&self, year: i32) -> Option<NaiveDate> {
        match *self {
            Self::Fixed {
                month, day, years, ..
            } => years
                .contains(year)
                .then(|| NaiveDate::from_ymd_opt(year, month, day))
                .flatten(),
            Self::NthWeekday {
                month,
                weekday,
                nth,
                years,
                ..
            } => years
                .contains(year)
                .then(|| nth_weekday(year, month, weekday, nth))
                .flatten(),
            Self::EasterOffset { offset, years, .. } => years
                .contains(year)
                .then(|| easter_sunday(year))
                .flatten()
                .and_then(|easter| add_days(easter, offset)),
            Self::Singular {
                year: rule_year,
                month,
                day,
                ..
            } => (rule_year == year)
                .then(|| NaiveDate::from_ymd_opt(year, month, day))
                .flatten(),
            Self::Computed { date, years, .. } => years.contains(year).then(|| date(year)).flatten(),
        }
    }
}

/// Computes all holidays of the table in the `year`.
#[must_use]
pub fn apply(rules: &[Rule], year: i32) -> Vec<Holiday> {
    rules
        .iter()
        .filter_map(|rule| {
            rule.date_in(year)
                .map(|date| Holiday::new(date, rule.name()))
        })
        .collect()
}

/// Saturday holidays are observed on the friday before, sunday holidays on the
/// monday after.
#[must_use]
pub fn observed_date(date: NaiveDate) -> Option<NaiveDate> {
    match date.weekday() {
        Weekday::Sat => date.pred_opt(),
        Weekday::Sun => date.succ_opt(),
        _ => None,
    }
}

/// Computes the observed days of the fixed holidays in `rules` that fall on
/// a weekend of the `year`.
///
/// A saturday new year's day would be observed in the previous year, those
/// days are dropped.
#[must_use]
pub fn apply_observed(rules: &[Rule], year: i32) -> Vec<Holiday> {
    rules
        .iter()
        .filter(|rule| rule.is_fixed())
        .filter_map(|rule| {
            let observed = observed_date(rule.date_in(year)?)?;
            Some(Holiday::new(
                observed,
                format!("{} (Observed)", rule.name()),
            ))
        })
        .filter(|holiday| holiday.date().year() == year)
        .collect()
}

/// Returns the date of easter sunday (gregorian calendar).
#[must_use]
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let easter = computus::gregorian(year).ok()?;
    NaiveDate::from_ymd_opt(easter.year, easter.month, easter.day)
}

#[must_use]
pub fn add_days(date: NaiveDate, offset: i64) -> Option<NaiveDate> {
    let days = Days::new(offset.unsigned_abs());
    if offset < 0 {
        date.checked_sub_days(days)
    } else {
        date.checked_add_days(days)
    }
}

#[must_use]
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Returns the nth (or last) `weekday` in the month.
#[must_use]
pub fn nth_weekday(year: i32, month: u32, weekday: Weekday, nth: Nth) -> Option<NaiveDate> {
    let n = match nth {
        Nth::First => 1,
        Nth::Second => 2,
        Nth::Third => 3,
        Nth::Fourth => 4,
        Nth::Last => {
            let last = last_day_of_month(year, month)?;
            let distance = (7 + last.weekday().num_days_from_monday()
                - weekday.num_days_from_monday())
                % 7;
            return last.checked_sub_days(Days::new(u64::from(distance)));
        }
    };

    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

/// Returns the last `weekday` strictly before the `date`.
#[must_use]
pub fn weekday_before(date: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let distance = (7 + date.weekday().num_days_from_monday() - weekday.num_days_from_monday()) % 7;
    let distance = if distance == 0 { 7 } else { distance };
    date.checked_sub_days(Days::new(u64::from(distance)))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    use crate::date;

    #[test]
    fn test_nth_weekday() {
        assert_eq!(
            nth_weekday(2023, 1, Weekday::Mon, Nth::Third),
            Some(date!(2023:01:16))
        );
        assert_eq!(
            nth_weekday(2023, 5, Weekday::Mon, Nth::Last),
            Some(date!(2023:05:29))
        );
        assert_eq!(
            nth_weekday(2024, 11, Weekday::Thu, Nth::Fourth),
            Some(date!(2024:11:28))
        );
        // the last day of the month is the requested weekday
        assert_eq!(
            nth_weekday(2023, 12, Weekday::Sun, Nth::Last),
            Some(date!(2023:12:31))
        );
    }

    #[test]
    fn test_is_easter_sunday() {
        for date in [
            date!(2017:04:16),
            date!(2018:04:01),
            date!(2019:04:21),
            date!(2020:04:12),
            date!(2021:04:04),
            date!(2022:04:17),
            date!(2023:04:09),
            date!(2024:03:31),
            date!(2025:04:20),
            date!(2026:04:05),
            date!(2027:03:28),
            date!(2028:04:16),
            date!(2029:04:01),
            date!(2030:04:21),
            date!(2031:04:13),
            date!(2032:03:28),
            date!(2033:04:17),
            date!(2034:04:09),
            date!(2035:03:25),
            date!(2036:04:13),
            date!(2037:04:05),
        ] {
            assert_eq!(
                easter_sunday(date.year()),
                Some(date),
                "date {} should be easter sunday",
                date
            );
        }
    }

    #[test]
    fn test_years() {
        assert!(Years::ALWAYS.contains(1));
        assert!(Years::since(2000).contains(2000));
        assert!(!Years::since(2000).contains(1999));
        assert!(Years::until(2000).contains(2000));
        assert!(!Years::until(2000).contains(2001));
        assert!(Years::between(1990, 1995).contains(1993));
        assert!(!Years::between(1990, 1995).contains(1996));
    }

    #[test]
    fn test_observed_date() {
        // saturday
        assert_eq!(observed_date(date!(2020:07:04)), Some(date!(2020:07:03)));
        // sunday
        assert_eq!(observed_date(date!(2021:07:04)), Some(date!(2021:07:05)));
        // monday
        assert_eq!(observed_date(date!(2022:07:04)), None);
    }

    #[test]
    fn test_apply_observed() {
        let rules = [
            Rule::fixed(1, 1, "New Year's Day", Years::ALWAYS),
            Rule::fixed(7, 4, "Independence Day", Years::ALWAYS),
        ];

        // 2022-01-01 is a saturday, 2021-07-04 a sunday
        assert_eq!(apply_observed(&rules, 2022), vec![]);
        assert_eq!(
            apply_observed(&rules, 2021),
            vec![Holiday::new(date!(2021:07:05), "Independence Day (Observed)")]
        );
    }

    #[test]
    fn test_weekday_before() {
        assert_eq!(
            weekday_before(date!(2023:11:22), Weekday::Wed),
            Some(date!(2023:11:15))
        );
        assert_eq!(
            weekday_before(date!(2022:11:23), Weekday::Wed),
            Some(date!(2022:11:16))
        );
    }
}
