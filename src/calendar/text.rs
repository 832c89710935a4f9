use chrono::Datelike;
use unicode_width::UnicodeWidthStr;

use crate::calendar::{CalendarNames, CalendarPage, Cell, MonthGrid};

const CELL_WIDTH: usize = 4;
const MONTH_WIDTH: usize = CELL_WIDTH * 7;
const MONTH_GAP: &str = "  ";

/// Lays out a [`CalendarPage`] as plain text, used when no html renderer is
/// installed.
///
/// Holidays are marked with `*` and today with `>`.
#[derive(Debug, Clone)]
pub struct PlainTextCalendar {
    names: CalendarNames,
    holiday_list: bool,
    calendar: bool,
}

impl PlainTextCalendar {
    #[must_use]
    pub fn new(names: CalendarNames) -> Self {
        Self {
            names,
            holiday_list: false,
            calendar: true,
        }
    }

    pub fn holiday_list(&mut self, holiday_list: bool) -> &mut Self {
        self.holiday_list = holiday_list;
        self
    }

    pub fn calendar(&mut self, calendar: bool) -> &mut Self {
        self.calendar = calendar;
        self
    }

    #[must_use]
    pub fn render(&self, page: &CalendarPage) -> String {
        let mut lines = Vec::new();

        if self.calendar {
            let width = page.width() * MONTH_WIDTH + (page.width() - 1) * MONTH_GAP.len();
            let header = format!("{:^width$}", page.year(), width = width);
            lines.push(header.trim_end().to_string());

            for row in page.rows() {
                lines.push(String::new());

                let blocks = row
                    .iter()
                    .map(|month| self.month_lines(month))
                    .collect::<Vec<_>>();

                for index in 0..blocks.first().map_or(0, Vec::len) {
                    let line = blocks
                        .iter()
                        .map(|block| block[index].as_str())
                        .collect::<Vec<_>>()
                        .join(MONTH_GAP);
                    lines.push(line.trim_end().to_string());
                }
            }
        }

        if self.holiday_list {
            if !lines.is_empty() {
                lines.push(String::new());
            }

            lines.extend(page.holidays().iter().map(ToString::to_string));
        }

        let mut result = lines.join("\n");
        result.push('\n');
        result
    }

    fn month_lines(&self, month: &MonthGrid) -> Vec<String> {
        let mut result = Vec::with_capacity(month.weeks().len() + 2);

        result.push(center(self.names.month(month.month()), MONTH_WIDTH));
        result.push(
            month
                .weekdays()
                .iter()
                .map(|weekday| {
                    format!("{} ", pad_left(self.names.weekday(*weekday), CELL_WIDTH - 1))
                })
                .collect(),
        );

        for week in month.weeks() {
            result.push(week.iter().map(cell_text).collect());
        }

        result
    }
}

// `format!` pads by chars, wide (CJK) names take two columns each
fn pad_left(text: &str, width: usize) -> String {
    format!("{}{}", " ".repeat(width.saturating_sub(text.width())), text)
}

fn center(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(text.width());
    format!(
        "{}{}{}",
        " ".repeat(padding / 2),
        text,
        " ".repeat(padding - padding / 2)
    )
}

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Blank => " ".repeat(CELL_WIDTH),
        Cell::Day(day) => format!(
            "{}{:>2}{}",
            if day.is_today() { '>' } else { ' ' },
            day.date().day(),
            if day.holiday().is_some() { '*' } else { ' ' }
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    use crate::calendar::{FirstWeekday, YearLayout};
    use crate::{date, map};

    fn january() -> CalendarPage {
        let mut lookup = map! {
            date!(2023:01:01) => "New Year's Day".to_string(),
            date!(2023:01:16) => "Martin Luther King Jr. Day".to_string(),
        };

        CalendarPage::build(
            &YearLayout::single(2023, 1).unwrap(),
            FirstWeekday::default(),
            &mut lookup,
            Some(date!(2023:01:10)),
        )
    }

    #[test]
    fn test_single_month() {
        let text = PlainTextCalendar::new(CalendarNames::ENGLISH).render(&january());

        assert_eq!(
            text,
            [
                "            2023",
                "",
                "          January",
                "Sun Mon Tue Wed Thu Fri Sat",
                "  1*  2   3   4   5   6   7",
                "  8   9 >10  11  12  13  14",
                " 15  16* 17  18  19  20  21",
                " 22  23  24  25  26  27  28",
                " 29  30  31",
                "",
                "",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_wide_names_are_aligned() {
        let text = PlainTextCalendar::new(CalendarNames::JAPANESE).render(&january());
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines[2], "            1月");
        assert_eq!(lines[3], " 日  月  火  水  木  金  土");
        assert_eq!(lines[4], "  1*  2   3   4   5   6   7");
        assert_eq!(lines[3].width(), lines[4].width());
    }

    #[test]
    fn test_holiday_list() {
        let text = PlainTextCalendar::new(CalendarNames::ENGLISH)
            .calendar(false)
            .holiday_list(true)
            .render(&january());

        assert_eq!(
            text,
            "2023/01/01 New Year's Day\n2023/01/16 Martin Luther King Jr. Day\n"
        );
    }

    #[test]
    fn test_months_side_by_side() {
        let page = CalendarPage::build(
            &YearLayout::annual(2023, 1, 3).unwrap(),
            FirstWeekday::default(),
            &mut (),
            None,
        );

        let text = PlainTextCalendar::new(CalendarNames::ENGLISH).render(&page);
        let lines = text.lines().collect::<Vec<_>>();

        // header, then 4 rows of a blank line, month names, weekdays and 6 weeks
        assert_eq!(lines.len(), 1 + 4 * 9);
        assert!(lines[2].contains("January"));
        assert!(lines[2].contains("February"));
        assert!(lines[2].contains("March"));
        assert!(!lines[2].contains("April"));
    }
}
