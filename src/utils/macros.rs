/// Builds a [`chrono::NaiveDate`] from a `year:month:day` literal.
///
/// The month and the day are checked at compile time, the day of the month
/// is checked when the macro is evaluated.
#[macro_export]
macro_rules! date {
    ($year:literal : $month:literal : $day:literal) => {{
        static_assertions::const_assert!($month >= 1 && $month <= 12);
        static_assertions::const_assert!($day >= 1 && $day <= 31);

        match ::chrono::NaiveDate::from_ymd_opt($year, $month, $day) {
            Some(date) => date,
            None => ::core::panic!(concat!(
                "invalid date ",
                stringify!($year),
                "-",
                stringify!($month),
                "-",
                stringify!($day)
            )),
        }
    }};
}

/// Builds a [`std::collections::BTreeMap`] from `key => value` pairs.
#[macro_export]
macro_rules! map {
    ( $( $key:expr => $value:expr ),+ $(,)? ) => {
        {
            let mut _map = ::std::collections::BTreeMap::new();

            $(
                _map.insert($key, $value);
            )+

            _map
        }
    };
}
