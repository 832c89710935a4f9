use chrono::{NaiveDate, Weekday};

use crate::holidays::region::check_subdivision;
use crate::holidays::rules::{self, Rule, Years};
use crate::holidays::{Holiday, HolidayError, HolidayRules};

/// The last wednesday before the 23rd of november.
fn repentance_day(year: i32) -> Option<NaiveDate> {
    rules::weekday_before(NaiveDate::from_ymd_opt(year, 11, 23)?, Weekday::Wed)
}

const STATES: &[&str] = &[
    "BB", "BE", "BW", "BY", "HB", "HE", "HH", "MV", "NI", "NW", "RP", "SH", "SL", "SN", "ST", "TH",
];

/// Holidays that only apply in some of the states.
const REGIONAL: &[(&[&str], Rule)] = &[
    (
        &["BW", "BY", "ST"],
        Rule::fixed(1, 6, "Heilige Drei Könige", Years::ALWAYS),
    ),
    (
        &["BE"],
        Rule::fixed(3, 8, "Internationaler Frauentag", Years::since(2019)),
    ),
    (
        &["MV"],
        Rule::fixed(3, 8, "Internationaler Frauentag", Years::since(2023)),
    ),
    (&["BB"], Rule::easter(0, "Ostersonntag", Years::ALWAYS)),
    (&["BB"], Rule::easter(49, "Pfingstsonntag", Years::ALWAYS)),
    (
        &["BW", "BY", "HE", "NW", "RP", "SL"],
        Rule::easter(60, "Fronleichnam", Years::ALWAYS),
    ),
    (
        &["BY", "SL"],
        Rule::fixed(8, 15, "Mariä Himmelfahrt", Years::ALWAYS),
    ),
    (
        &["TH"],
        Rule::fixed(9, 20, "Weltkindertag", Years::since(2019)),
    ),
    (
        &["BB", "MV", "SN", "ST", "TH"],
        Rule::fixed(10, 31, "Reformationstag", Years::since(1990)),
    ),
    (
        &["HB", "HH", "NI", "SH"],
        Rule::fixed(10, 31, "Reformationstag", Years::since(2018)),
    ),
    (
        &["BW", "BY", "NW", "RP", "SL"],
        Rule::fixed(11, 1, "Allerheiligen", Years::ALWAYS),
    ),
    (
        &["SN"],
        Rule::computed(repentance_day, "Buß- und Bettag", Years::ALWAYS),
    ),
];

/// The holidays a german state adds to the national ones.
#[derive(Debug, Clone, Copy)]
pub struct GermanStateHolidays {
    state: &'static str,
}

impl GermanStateHolidays {
    pub fn new(subdiv: &str) -> Result<Self, HolidayError> {
        check_subdivision("DE", subdiv, STATES)?;

        let state = STATES
            .iter()
            .copied()
            .find(|state| *state == subdiv)
            .unwrap_or_default();

        Ok(Self { state })
    }
}

impl HolidayRules for GermanStateHolidays {
    fn holidays(&self, year: i32) -> Vec<Holiday> {
        REGIONAL
            .iter()
            .filter(|(states, _)| states.contains(&self.state))
            .filter_map(|(_, rule)| {
                rule.date_in(year)
                    .map(|date| Holiday::new(date, rule.name()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Datelike;
    use pretty_assertions::assert_eq;

    use crate::date;

    fn dates(rules: &GermanStateHolidays, year: i32) -> Vec<NaiveDate> {
        let mut result = rules
            .holidays(year)
            .into_iter()
            .map(|holiday| holiday.date())
            .collect::<Vec<_>>();
        result.sort();
        result
    }

    fn name_on(rules: &GermanStateHolidays, date: NaiveDate) -> Option<String> {
        rules
            .holidays(date.year())
            .into_iter()
            .find(|holiday| holiday.date() == date)
            .map(|holiday| holiday.name().to_string())
    }

    #[test]
    fn test_baden_wuerttemberg_2023() {
        let rules = GermanStateHolidays::new("BW").unwrap();

        assert_eq!(
            dates(&rules, 2023),
            vec![date!(2023:01:06), date!(2023:06:08), date!(2023:11:01)]
        );
    }

    #[test]
    fn test_state_specific() {
        let saxony = GermanStateHolidays::new("SN").unwrap();
        assert_eq!(
            name_on(&saxony, date!(2023:11:22)),
            Some("Buß- und Bettag".to_string())
        );
        assert_eq!(
            name_on(&saxony, date!(2023:10:31)),
            Some("Reformationstag".to_string())
        );

        let hamburg = GermanStateHolidays::new("HH").unwrap();
        assert_eq!(name_on(&hamburg, date!(2016:10:31)), None);
        assert_eq!(
            name_on(&hamburg, date!(2018:10:31)),
            Some("Reformationstag".to_string())
        );

        let berlin = GermanStateHolidays::new("BE").unwrap();
        assert_eq!(
            name_on(&berlin, date!(2023:03:08)),
            Some("Internationaler Frauentag".to_string())
        );
        assert_eq!(name_on(&berlin, date!(2023:01:06)), None);
    }

    #[test]
    fn test_unknown_state() {
        assert!(matches!(
            GermanStateHolidays::new("XX"),
            Err(HolidayError::UnsupportedSubdivision { .. })
        ));
    }
}
