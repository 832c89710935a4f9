use calendar_sheet::calendar::{FirstWeekday, MonthGrid};
use calendar_sheet::date;
use calendar_sheet::holidays::{HolidayCalendar, HolidayLookup, Region};
use chrono::{Datelike, Weekday};

use pretty_assertions::assert_eq;

fn calendar(
    country: Option<&str>,
    subdiv: Option<&str>,
    financial: Option<&str>,
) -> HolidayCalendar {
    HolidayCalendar::for_region(&Region::new(country, subdiv, financial).unwrap()).unwrap()
}

#[test]
fn test_martin_luther_king_day() {
    let mut us = calendar(Some("US"), None, None);

    assert_eq!(
        us.holiday_name(date!(2023:01:16)),
        Some("Martin Luther King Jr. Day")
    );
    assert_eq!(us.holiday_name(date!(2023:01:17)), None);
}

#[test]
fn test_subdivision_adds_holidays() {
    let mut germany = calendar(Some("DE"), None, None);
    let mut bavaria = calendar(Some("DE"), Some("BY"), None);

    assert_eq!(germany.holiday_name(date!(2023:01:06)), None);
    assert_eq!(
        bavaria.holiday_name(date!(2023:01:06)),
        Some("Heilige Drei Könige")
    );
    assert!(bavaria.holiday_name(date!(2023:10:03)).is_some());
}

#[test]
fn test_stock_exchange() {
    let mut nyse = calendar(None, None, Some("NYSE"));

    assert_eq!(nyse.holiday_name(date!(2023:04:07)), Some("Good Friday"));
    assert_eq!(
        nyse.holiday_name(date!(2012:10:29)),
        Some("Closed for Hurricane Sandy")
    );
}

#[test]
fn test_unknown_region() {
    assert!(Region::new(Some("XX"), None, None)
        .and_then(|region| region.rules())
        .is_err());
}

#[test]
fn test_every_month_fits_the_grid() {
    let mut japan = calendar(Some("JP"), None, None);

    for year in [1999, 2000, 2023, 2024] {
        for month in 1..=12 {
            for first_weekday in [Weekday::Sun, Weekday::Mon, Weekday::Sat] {
                let first_day = chrono::NaiveDate::from_ymd_opt(year, month, 1).unwrap();
                let grid = MonthGrid::new(
                    first_day,
                    FirstWeekday::new(first_weekday),
                    &mut japan,
                    None,
                );

                let days = grid.days().collect::<Vec<_>>();
                let expected = first_day
                    .iter_days()
                    .take_while(|date| date.month() == month)
                    .count();

                assert_eq!(grid.weeks().len(), 6);
                assert_eq!(days.len(), expected);
                assert_eq!(
                    grid.weeks()[0][0].as_day().is_some(),
                    first_day.weekday() == first_weekday
                );

                for day in days {
                    assert_eq!(day.holiday(), japan.holiday_name(day.date()));
                }
            }
        }
    }
}
