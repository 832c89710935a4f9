use core::fmt;

use chrono::Weekday;
use encoding_rs::{Encoding, UTF_8};

use crate::calendar::{css_class, CalendarNames, CalendarPage, Cell, Day, MonthGrid};
use crate::calendar::{DAYS_PER_WEEK, WEEKS_PER_MONTH};
use crate::html_string::HtmlString;

/// How the stylesheet is referenced by the page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageStyle {
    /// The page has no styling at all.
    #[default]
    None,
    /// A `<link>` to an external stylesheet.
    Link(String),
    /// The css is embedded in a `<style>` element.
    Inline(String),
}

/// Renders a [`CalendarPage`] as a complete XHTML document.
///
/// Every month is a table with a header and exactly six week rows. The gaps
/// between months are tables with the same number of rows and columns, so the
/// page can be pasted into a spreadsheet without merging cells.
#[derive(Debug, Clone)]
pub struct HtmlCalendar {
    names: CalendarNames,
    encoding: &'static Encoding,
    style: PageStyle,
    holiday_list: bool,
    calendar: bool,
    visible_holiday: bool,
    visible_today: bool,
    inline_style: bool,
}

impl HtmlCalendar {
    #[must_use]
    pub fn new(names: CalendarNames) -> Self {
        Self {
            names,
            encoding: UTF_8,
            style: PageStyle::None,
            holiday_list: false,
            calendar: true,
            visible_holiday: false,
            visible_today: false,
            inline_style: false,
        }
    }

    pub fn encoding(&mut self, encoding: &'static Encoding) -> &mut Self {
        self.encoding = encoding;
        self
    }

    pub fn style(&mut self, style: PageStyle) -> &mut Self {
        self.style = style;
        self
    }

    /// Appends a list of all holidays below the calendar.
    pub fn holiday_list(&mut self, holiday_list: bool) -> &mut Self {
        self.holiday_list = holiday_list;
        self
    }

    /// With `false` only the holiday list is rendered.
    pub fn calendar(&mut self, calendar: bool) -> &mut Self {
        self.calendar = calendar;
        self
    }

    /// Marks holidays with `*` and today with `>` in the cell text, for output
    /// formats without colors.
    pub fn visible_markers(&mut self, holiday: bool, today: bool) -> &mut Self {
        self.visible_holiday = holiday;
        self.visible_today = today;
        self
    }

    /// Adds colors as `style` attributes to the cells, for renderers that do
    /// not understand stylesheets.
    pub fn inline_style(&mut self, inline_style: bool) -> &mut Self {
        self.inline_style = inline_style;
        self
    }

    #[must_use]
    pub fn render(&self, page: &CalendarPage) -> String {
        Document {
            calendar: self,
            page,
        }
        .to_string()
    }

    /// Renders the page and encodes it with the configured encoding.
    #[must_use]
    pub fn render_bytes(&self, page: &CalendarPage) -> Vec<u8> {
        encode_document(&self.render(page), self.encoding)
    }

    fn write_year(&self, f: &mut fmt::Formatter<'_>, page: &CalendarPage) -> fmt::Result {
        let width = page.width();

        write!(f, "<table class=\"year\">\n\n")?;
        write!(
            f,
            "<tr><th colspan=\"{}\" class=\"year\">{}</th></tr>",
            width * 2 - 1,
            page.year()
        )?;

        for (index, row) in page.rows().iter().enumerate() {
            if index > 0 {
                write_vpad_row(f, width)?;
            }

            write!(f, "\n<tr class=\"months-row\">")?;
            for (column, month) in row.iter().enumerate() {
                if column > 0 {
                    write_hpad_cell(f)?;
                }

                write!(f, "\n\n<td class=\"month\">")?;
                self.write_month(f, month)?;
                write!(f, "</td>")?;
            }
            write!(f, "</tr>")?;
        }

        writeln!(f, "\n</table>")
    }

    fn write_month(&self, f: &mut fmt::Formatter<'_>, month: &MonthGrid) -> fmt::Result {
        writeln!(f, "<table class=\"month\">")?;
        writeln!(
            f,
            "<tr><th colspan=\"{}\" class=\"month\">{}</th></tr>",
            DAYS_PER_WEEK,
            self.names.month(month.month())
        )?;

        write!(f, "<tr>")?;
        for weekday in month.weekdays() {
            write!(
                f,
                "<th class=\"wd {}\">{}</th>",
                css_class(weekday),
                self.names.weekday(weekday)
            )?;
        }
        writeln!(f, "</tr>")?;

        let weekdays = month.weekdays();
        for week in month.weeks() {
            write!(f, "<tr class=\"days\">")?;
            for (cell, weekday) in week.iter().zip(weekdays) {
                match cell {
                    Cell::Blank => write!(f, "<td class=\"day noday\">&nbsp;</td>")?,
                    Cell::Day(day) => self.write_day(f, day, weekday)?,
                }
            }
            writeln!(f, "</tr>")?;
        }

        writeln!(f, "</table>")
    }

    fn write_day(&self, f: &mut fmt::Formatter<'_>, day: &Day, weekday: Weekday) -> fmt::Result {
        let mut classes = format!("day {}", css_class(weekday));
        if day.holiday().is_some() {
            classes.push_str(" holiday");
        }
        if day.is_today() {
            classes.push_str(" today");
        }

        let text = format!(
            "{}{}{}",
            if self.visible_today && day.is_today() {
                "&gt;"
            } else {
                ""
            },
            day.day(),
            if self.visible_holiday && day.holiday().is_some() {
                "*"
            } else {
                ""
            },
        );

        write!(f, "<td class=\"{}\"", classes)?;
        if let Some(name) = day.holiday() {
            write!(f, " title=\"{}\"", HtmlString::escape(name))?;
        }
        if self.inline_style {
            let style = inline_style_of(day, weekday);
            if !style.is_empty() {
                write!(f, " style=\"{}\"", style)?;
            }
        }

        if day.holiday().is_some() {
            write!(f, "><div>{}</div></td>", text)
        } else {
            write!(f, ">{}</td>", text)
        }
    }

    fn write_holiday_list(&self, f: &mut fmt::Formatter<'_>, page: &CalendarPage) -> fmt::Result {
        writeln!(f, "<table class=\"holidays\">")?;
        for holiday in page.holidays() {
            writeln!(
                f,
                "<tr><td class=\"date\">{}</td><td class=\"name\">{}</td></tr>",
                holiday.date().format("%Y/%m/%d"),
                HtmlString::escape(holiday.name())
            )?;
        }
        writeln!(f, "</table>")
    }
}

/// Fills the gap between two months of a row.
fn write_hpad_cell(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    // one row for the month name, one for the weekdays
    write!(f, "<td class=\"hpad\"><table>")?;
    for _ in 0..WEEKS_PER_MONTH + 2 {
        write!(f, "<tr><td class=\"vfill\"></td></tr>")?;
    }
    write!(f, "</table></td>")
}

/// Fills the gap between two rows of months.
fn write_vpad_row(f: &mut fmt::Formatter<'_>, width: usize) -> fmt::Result {
    write!(f, "\n<tr class=\"vpad\">")?;
    for column in 0..width {
        if column > 0 {
            write!(
                f,
                "<td class=\"vpad\"><table><tr><td class=\"vfill hfill\"></td></tr></table></td>"
            )?;
        }

        write!(f, "<td><table><tr>")?;
        for _ in 0..DAYS_PER_WEEK {
            write!(f, "<td class=\"hfill\"></td>")?;
        }
        write!(f, "</tr></table></td>")?;
    }
    writeln!(f, "</tr>")
}

fn inline_style_of(day: &Day, weekday: Weekday) -> String {
    let mut styles = Vec::new();

    if day.holiday().is_some() || weekday == Weekday::Sun {
        styles.push("color: red");
    } else if weekday == Weekday::Sat {
        styles.push("color: blue");
    }

    if day.is_today() {
        styles.push("font-weight: bold");
    }

    styles.join("; ")
}

struct Document<'a> {
    calendar: &'a HtmlCalendar,
    page: &'a CalendarPage,
}

impl fmt::Display for Document<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoding = self.calendar.encoding.output_encoding().name();

        writeln!(f, "<?xml version=\"1.0\" encoding=\"{}\"?>", encoding)?;
        writeln!(
            f,
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \
             \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">"
        )?;
        writeln!(f, "<html>")?;
        writeln!(f, "<head>")?;
        writeln!(
            f,
            "<meta http-equiv=\"Content-Type\" content=\"text/html; charset={}\" />",
            encoding
        )?;

        match &self.calendar.style {
            PageStyle::None => {}
            PageStyle::Link(href) => writeln!(
                f,
                "<link rel=\"stylesheet\" type=\"text/css\" href=\"{}\" />",
                HtmlString::escape_url(href)
            )?,
            PageStyle::Inline(css) => {
                writeln!(f, "<style type=\"text/css\">")?;
                writeln!(f, "{}", css.trim_end())?;
                writeln!(f, "</style>")?;
            }
        }

        writeln!(f, "<title>Calendar for {}</title>", self.page.year())?;
        writeln!(f, "</head>")?;
        writeln!(f, "<body>")?;

        if self.calendar.calendar {
            self.calendar.write_year(f, self.page)?;
        }

        if self.calendar.holiday_list {
            self.calendar.write_holiday_list(f, self.page)?;
        }

        writeln!(f, "</body>")?;
        writeln!(f, "</html>")
    }
}

/// Encodes the document, characters the `encoding` can not represent are
/// replaced with numeric character references.
#[must_use]
pub fn encode_document(document: &str, encoding: &'static Encoding) -> Vec<u8> {
    let (bytes, _, _) = encoding.encode(document);
    bytes.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use encoding_rs::{EUC_JP, SHIFT_JIS};
    use pretty_assertions::assert_eq;

    use crate::calendar::{FirstWeekday, YearLayout};
    use crate::{date, map};

    fn page(layout: YearLayout, today: Option<NaiveDate>) -> CalendarPage {
        let mut lookup = map! {
            date!(2023:01:16) => "Martin Luther King Jr. Day".to_string(),
            date!(2023:02:22) => "Washington's <Birthday>".to_string(),
            date!(2024:01:01) => "元日".to_string(),
        };

        CalendarPage::build(&layout, FirstWeekday::default(), &mut lookup, today)
    }

    fn year_page() -> CalendarPage {
        page(YearLayout::annual(2023, 1, 3).unwrap(), None)
    }

    #[test]
    fn test_document_structure() {
        let html = HtmlCalendar::new(CalendarNames::ENGLISH).render(&year_page());

        assert!(html.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(html.contains("<title>Calendar for 2023</title>"));
        assert!(html.contains("<th colspan=\"5\" class=\"year\">2023</th>"));
        assert!(html.ends_with("</body>\n</html>\n"));
        assert_eq!(html.matches("<table class=\"month\">").count(), 12);
        assert_eq!(html.matches("<tr class=\"months-row\">").count(), 4);
        assert_eq!(html.matches("<tr class=\"days\">").count(), 12 * 6);
        assert!(!html.contains("<link"));
        assert!(!html.contains("<style"));
    }

    #[test]
    fn test_padding_matches_month_shape() {
        let html = HtmlCalendar::new(CalendarNames::ENGLISH).render(&year_page());

        // two gaps in each of the four rows
        assert_eq!(html.matches("<td class=\"hpad\">").count(), 8);
        // three gaps between the four rows
        assert_eq!(html.matches("<tr class=\"vpad\">").count(), 3);

        let hpad = html
            .split("<td class=\"hpad\">")
            .nth(1)
            .and_then(|rest| rest.split("</table></td>").next())
            .unwrap();
        assert_eq!(hpad.matches("<td class=\"vfill\"></td>").count(), 8);

        let vpad = html
            .split("<tr class=\"vpad\">")
            .nth(1)
            .and_then(|rest| rest.split("</tr>\n").next())
            .unwrap();
        assert_eq!(vpad.matches("<td class=\"hfill\"></td>").count(), 3 * 7);
        assert_eq!(vpad.matches("<td class=\"vpad\">").count(), 2);
    }

    #[test]
    fn test_day_cells() {
        let html = HtmlCalendar::new(CalendarNames::ENGLISH).render(&year_page());

        assert!(html.contains(
            "<td class=\"day mon holiday\" title=\"Martin Luther King Jr. Day\"><div>16</div></td>"
        ));
        assert!(html.contains(
            "<td class=\"day wed holiday\" title=\"Washington&#x27;s &lt;Birthday&gt;\"><div>22</div></td>"
        ));
        assert!(html.contains("<td class=\"day tue\">17</td>"));
        assert!(html.contains("<td class=\"day noday\">&nbsp;</td>"));
        assert!(html.contains("<th class=\"wd sun\">Sun</th>"));
        assert!(html.contains("<th colspan=\"7\" class=\"month\">January</th>"));
    }

    #[test]
    fn test_visible_markers() {
        let page = page(YearLayout::single(2023, 1).unwrap(), Some(date!(2023:01:16)));

        let html = HtmlCalendar::new(CalendarNames::ENGLISH)
            .visible_markers(true, true)
            .render(&page);

        assert!(html.contains(
            "<td class=\"day mon holiday today\" title=\"Martin Luther King Jr. Day\"><div>&gt;16*</div></td>"
        ));
        assert!(html.contains("<td class=\"day tue\">17</td>"));
        assert!(html.contains("<th colspan=\"1\" class=\"year\">2023</th>"));
        assert!(!html.contains("hpad"));
        assert!(!html.contains("vpad"));
    }

    #[test]
    fn test_inline_style() {
        let page = page(YearLayout::single(2023, 1).unwrap(), None);

        let html = HtmlCalendar::new(CalendarNames::ENGLISH)
            .inline_style(true)
            .render(&page);

        assert!(html.contains("<td class=\"day sun\" style=\"color: red\">1</td>"));
        assert!(html.contains("<td class=\"day sat\" style=\"color: blue\">7</td>"));
    }

    #[test]
    fn test_stylesheet() {
        let page = year_page();

        let linked = HtmlCalendar::new(CalendarNames::ENGLISH)
            .style(PageStyle::Link("./test-calendar.css".to_string()))
            .render(&page);
        assert!(linked.contains(
            "<link rel=\"stylesheet\" type=\"text/css\" href=\"./test-calendar.css\" />"
        ));

        let inline = HtmlCalendar::new(CalendarNames::ENGLISH)
            .style(PageStyle::Inline("td.holiday { color: red; }\n".to_string()))
            .render(&page);
        assert!(inline.contains("<style type=\"text/css\">\ntd.holiday { color: red; }\n</style>"));
    }

    #[test]
    fn test_holiday_list_only() {
        let page = page(YearLayout::annual(2023, 4, 3).unwrap(), None);

        let html = HtmlCalendar::new(CalendarNames::ENGLISH)
            .holiday_list(true)
            .calendar(false)
            .render(&page);

        assert!(!html.contains("<table class=\"year\">"));
        assert!(html.contains(
            "<table class=\"holidays\">\n<tr><td class=\"date\">2024/01/01</td><td class=\"name\">元日</td></tr>\n</table>"
        ));
    }

    #[test]
    fn test_localized_names() {
        let html = HtmlCalendar::new(CalendarNames::JAPANESE).render(&year_page());

        assert!(html.contains("<th colspan=\"7\" class=\"month\">1月</th>"));
        assert!(html.contains("<th class=\"wd sun\">日</th>"));
    }

    #[test]
    fn test_encoding() {
        let page = page(YearLayout::single(2024, 1).unwrap(), None);

        let mut calendar = HtmlCalendar::new(CalendarNames::JAPANESE);
        calendar.encoding(SHIFT_JIS);

        let bytes = calendar.render_bytes(&page);
        let (decoded, _, had_errors) = SHIFT_JIS.decode(&bytes);

        assert!(!had_errors);
        assert!(decoded.starts_with("<?xml version=\"1.0\" encoding=\"Shift_JIS\"?>"));
        assert!(decoded.contains("charset=Shift_JIS"));
        assert!(decoded.contains("title=\"元日\""));
    }

    #[test]
    fn test_unmappable_characters_become_references() {
        assert_eq!(encode_document("a\u{1F600}b", EUC_JP), b"a&#128512;b".to_vec());
        assert_eq!(encode_document("日", UTF_8), "日".as_bytes().to_vec());
    }
}
