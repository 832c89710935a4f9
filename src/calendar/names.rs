use chrono::Weekday;

/// Localized month and weekday names for the table headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarNames {
    months: [&'static str; 12],
    /// Abbreviated weekday names, starting with monday.
    weekdays: [&'static str; 7],
}

impl CalendarNames {
    pub const ENGLISH: Self = Self {
        months: [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ],
        weekdays: ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
    };

    pub const JAPANESE: Self = Self {
        months: [
            "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月",
        ],
        weekdays: ["月", "火", "水", "木", "金", "土", "日"],
    };

    pub const GERMAN: Self = Self {
        months: [
            "Januar",
            "Februar",
            "März",
            "April",
            "Mai",
            "Juni",
            "Juli",
            "August",
            "September",
            "Oktober",
            "November",
            "Dezember",
        ],
        weekdays: ["Mo", "Di", "Mi", "Do", "Fr", "Sa", "So"],
    };

    /// Picks the names for an ISO 639 language code, unknown languages get
    /// the english names.
    #[must_use]
    pub fn for_language(language: &str) -> Self {
        match language.to_ascii_lowercase().as_str() {
            "ja" => Self::JAPANESE,
            "de" => Self::GERMAN,
            _ => Self::ENGLISH,
        }
    }

    /// Returns the name of the `month` (1..=12).
    #[must_use]
    pub fn month(&self, month: u32) -> &'static str {
        month
            .checked_sub(1)
            .and_then(|index| self.months.get(index as usize))
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn weekday(&self, weekday: Weekday) -> &'static str {
        self.weekdays[weekday.num_days_from_monday() as usize]
    }
}

impl Default for CalendarNames {
    fn default() -> Self {
        Self::ENGLISH
    }
}
