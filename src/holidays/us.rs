use chrono::{Days, NaiveDate, Weekday};

use crate::holidays::region::check_subdivision;
use crate::holidays::rules::{self, Nth, Rule, Years};
use crate::holidays::{Holiday, HolidayError, HolidayRules};

fn day_after_thanksgiving(year: i32) -> Option<NaiveDate> {
    rules::nth_weekday(year, 11, Weekday::Thu, Nth::Fourth)?.checked_add_days(Days::new(1))
}

/// The tuesday after the first monday in november.
fn election_day(year: i32) -> Option<NaiveDate> {
    rules::nth_weekday(year, 11, Weekday::Mon, Nth::First)?.checked_add_days(Days::new(1))
}

const CALIFORNIA: &[Rule] = &[
    Rule::fixed(2, 12, "Lincoln's Birthday", Years::between(1971, 2009)),
    Rule::fixed(3, 31, "Cesar Chavez Day", Years::since(1995)),
    Rule::computed(
        day_after_thanksgiving,
        "Day After Thanksgiving",
        Years::since(1975),
    ),
];

const NEW_YORK: &[Rule] = &[
    Rule::fixed(2, 12, "Lincoln's Birthday", Years::since(1971)),
    Rule::fixed(2, 15, "Susan B. Anthony Day", Years::since(2004)),
    Rule::computed(election_day, "Election Day", Years::since(2015)),
];

const TEXAS: &[Rule] = &[
    Rule::fixed(1, 19, "Confederate Memorial Day", Years::since(1931)),
    Rule::fixed(3, 2, "Texas Independence Day", Years::since(1874)),
    Rule::fixed(3, 31, "Cesar Chavez Day", Years::since(2000)),
    Rule::easter(-2, "Good Friday", Years::ALWAYS),
    Rule::fixed(4, 21, "San Jacinto Day", Years::since(1875)),
    Rule::fixed(6, 19, "Emancipation Day In Texas", Years::since(1980)),
    Rule::fixed(8, 27, "Lyndon Baines Johnson Day", Years::since(1973)),
    Rule::computed(
        day_after_thanksgiving,
        "Friday After Thanksgiving",
        Years::since(1975),
    ),
    Rule::fixed(12, 24, "Christmas Eve", Years::since(1981)),
    Rule::fixed(12, 26, "Day After Christmas", Years::since(1981)),
];

const SUBDIVISIONS: &[(&str, &[Rule])] = &[("CA", CALIFORNIA), ("NY", NEW_YORK), ("TX", TEXAS)];

/// The holidays a state of the united states adds to the federal ones.
#[derive(Debug, Clone, Copy)]
pub struct UsStateHolidays {
    state: &'static [Rule],
}

impl UsStateHolidays {
    pub fn new(subdiv: &str) -> Result<Self, HolidayError> {
        let supported = SUBDIVISIONS.iter().map(|(code, _)| *code).collect::<Vec<_>>();
        check_subdivision("US", subdiv, &supported)?;

        let state: &'static [Rule] = SUBDIVISIONS
            .iter()
            .find(|(code, _)| *code == subdiv)
            .map_or(&[], |(_, table)| *table);

        Ok(Self { state })
    }
}

impl HolidayRules for UsStateHolidays {
    fn holidays(&self, year: i32) -> Vec<Holiday> {
        rules::apply(self.state, year)
    }
}
