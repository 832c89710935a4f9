use chrono::Weekday;

use crate::holidays::rules::{self, Nth, Rule, Years};
use crate::holidays::{Holiday, HolidayRules};

const REGULAR: &[Rule] = &[
    Rule::fixed(1, 1, "New Year's Day", Years::ALWAYS),
    Rule::nth_weekday(
        1,
        Weekday::Mon,
        Nth::Third,
        "Martin Luther King Jr. Day",
        Years::since(1998),
    ),
    Rule::fixed(2, 22, "Washington's Birthday", Years::until(1970)),
    Rule::nth_weekday(
        2,
        Weekday::Mon,
        Nth::Third,
        "Washington's Birthday",
        Years::since(1971),
    ),
    Rule::easter(-2, "Good Friday", Years::ALWAYS),
    Rule::fixed(5, 30, "Memorial Day", Years::until(1970)),
    Rule::nth_weekday(5, Weekday::Mon, Nth::Last, "Memorial Day", Years::since(1971)),
    Rule::fixed(
        6,
        19,
        "Juneteenth National Independence Day",
        Years::since(2022),
    ),
    Rule::fixed(7, 4, "Independence Day", Years::ALWAYS),
    Rule::nth_weekday(9, Weekday::Mon, Nth::First, "Labor Day", Years::since(1887)),
    Rule::nth_weekday(
        11,
        Weekday::Thu,
        Nth::Fourth,
        "Thanksgiving Day",
        Years::since(1942),
    ),
    Rule::fixed(12, 25, "Christmas Day", Years::ALWAYS),
];

/// Unscheduled closures of the exchange.
const CLOSURES: &[Rule] = &[
    Rule::singular(2001, 9, 11, "Closed for Sept 11, 2001 Attacks"),
    Rule::singular(2001, 9, 12, "Closed for Sept 11, 2001 Attacks"),
    Rule::singular(2001, 9, 13, "Closed for Sept 11, 2001 Attacks"),
    Rule::singular(2001, 9, 14, "Closed for Sept 11, 2001 Attacks"),
    Rule::singular(2004, 6, 11, "Day of Mourning for President Ronald W. Reagan"),
    Rule::singular(2007, 1, 2, "Day of Mourning for President Gerald R. Ford"),
    Rule::singular(2012, 10, 29, "Closed for Hurricane Sandy"),
    Rule::singular(2012, 10, 30, "Closed for Hurricane Sandy"),
    Rule::singular(2018, 12, 5, "Day of Mourning for President George H.W. Bush"),
    Rule::singular(2025, 1, 9, "Day of Mourning for President Jimmy Carter"),
];

/// Days on which the New York Stock Exchange is closed.
///
/// Holidays on a saturday close the exchange on the friday before, except for
/// new year's day, which would fall into the previous year.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewYorkStockExchange;

impl HolidayRules for NewYorkStockExchange {
    fn holidays(&self, year: i32) -> Vec<Holiday> {
        let mut result = rules::apply(REGULAR, year);
        result.extend(rules::apply_observed(REGULAR, year));
        result.extend(rules::apply(CLOSURES, year));
        result
    }
}
