use core::fmt;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{Datelike, Local, NaiveDate};
use encoding_rs::Encoding;
use log::{debug, info, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::calendar::{CalendarNames, FirstWeekday, YearLayout, DEFAULT_WIDTH, MONTHS_PER_YEAR};
use crate::holidays::Region;
use crate::locale::{Locale, LocaleCandidates};
use crate::stylesheet::{Style, Stylesheet};
use crate::text_render::TextRender;
use crate::utils::{self, PathExt};

pub const FIRST_YEAR: i32 = 1900;
pub const LAST_YEAR: i32 = 3000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("expected at most two arguments `[YEAR] [MONTH]`, found {0}")]
    TooManyArguments(usize),
    #[error("`{0}` is not a valid integer")]
    NotAnInteger(String),
    #[error("{0} is not a valid year or month")]
    OutOfRange(i64),
    #[error("{0} is not a valid month")]
    InvalidMonth(i64),
    #[error("{0} is not a valid year, expected 1900..3000")]
    InvalidYear(i64),
}

fn parse_argument(value: &str) -> Result<i64, ArgumentError> {
    let value = value.trim();
    let number = if value == "." {
        0
    } else {
        value
            .parse::<i64>()
            .map_err(|_| ArgumentError::NotAnInteger(value.to_string()))?
    };

    let is_month = (0..=i64::from(MONTHS_PER_YEAR)).contains(&number);
    let is_year = (i64::from(FIRST_YEAR)..=i64::from(LAST_YEAR)).contains(&number);
    if !is_month && !is_year {
        return Err(ArgumentError::OutOfRange(number));
    }

    Ok(number)
}

/// The year and month selected by the positional arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSelection {
    pub year: i32,
    /// The whole year is shown if absent.
    pub month: Option<u32>,
}

impl DateSelection {
    /// Accepts `[YEAR] [MONTH]` or `[MONTH] [YEAR]`, `0` and `.` stand for the
    /// current year or month.
    ///
    /// The first argument is a month if it is in `1..=12`. Without arguments
    /// the current month is selected, or the current year if `annual` is set.
    pub fn from_args<S: AsRef<str>>(
        args: &[S],
        today: NaiveDate,
        annual: bool,
    ) -> Result<Self, ArgumentError> {
        if args.len() > 2 {
            return Err(ArgumentError::TooManyArguments(args.len()));
        }

        let values = args
            .iter()
            .map(|arg| parse_argument(arg.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let (year, month) = match values.as_slice() {
            [] if annual => (Some(0), None),
            [] => (Some(0), Some(0)),
            [first, rest @ ..] if (1..=i64::from(MONTHS_PER_YEAR)).contains(first) => {
                (rest.first().copied(), Some(*first))
            }
            [first, rest @ ..] => (Some(*first), rest.first().copied()),
        };

        let year = match year {
            None | Some(0) => today.year(),
            Some(year) if (i64::from(FIRST_YEAR)..=i64::from(LAST_YEAR)).contains(&year) => {
                year as i32
            }
            Some(year) => return Err(ArgumentError::InvalidYear(year)),
        };

        let month = match month {
            None => None,
            Some(0) => Some(today.month()),
            Some(month) if (1..=i64::from(MONTHS_PER_YEAR)).contains(&month) => {
                Some(month as u32)
            }
            Some(month) => return Err(ArgumentError::InvalidMonth(month)),
        };

        Ok(Self { year, month })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Html,
    /// Html converted to text.
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Stdout,
    File(PathBuf),
}

impl Output {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Stdout => None,
            Self::File(path) => Some(path),
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("-"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Values of the configuration file, flags on the command line take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    width: Option<usize>,
    start_month: Option<u32>,
    first_weekday: Option<String>,
    style: Option<String>,
    encoding: Option<String>,
    locale: Option<String>,
    country: Option<String>,
    subdiv: Option<String>,
    financial: Option<String>,
    use_external_css: Option<bool>,
    css_href: Option<String>,
}

impl Defaults {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open `{}`", path.display()))?;

        utils::toml_from_reader(file).with_context(|| format!("failed to parse `{}`", path.display()))
    }

    /// `$XDG_CONFIG_HOME/calendar-sheet/config.toml`
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        utils::config_dir().map(|dir| dir.join(env!("CARGO_PKG_NAME")).join("config.toml"))
    }

    /// Reads the `explicit` file, or the file at the default location if there is one.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => {
                debug!("reading defaults from {}", path.display());
                Self::from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// The raw values of the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub text: bool,
    pub html: bool,
    pub width: Option<usize>,
    pub start_month: Option<u32>,
    pub first_weekday: Option<String>,
    pub output: Option<String>,
    pub holidays: bool,
    pub list_holidays: bool,
    pub css: Option<String>,
    pub use_external_css: bool,
    pub css_href: Option<String>,
    pub style: Option<String>,
    pub encoding: Option<String>,
    pub locale: Option<String>,
    pub country: Option<String>,
    pub subdiv: Option<String>,
    pub financial: Option<String>,
    pub force: bool,
    pub no_browser: bool,
    pub color: Option<bool>,
    pub args: Vec<String>,
}

impl Options {
    /// Fills the values that are not set on the command line.
    #[must_use]
    pub fn with_defaults(mut self, defaults: Defaults) -> Self {
        self.width = self.width.or(defaults.width);
        self.start_month = self.start_month.or(defaults.start_month);
        self.first_weekday = self.first_weekday.or(defaults.first_weekday);
        self.style = self.style.or(defaults.style);
        self.encoding = self.encoding.or(defaults.encoding);
        self.locale = self.locale.or(defaults.locale);
        self.use_external_css |= defaults.use_external_css.unwrap_or(false);
        self.css_href = self.css_href.or(defaults.css_href);

        // a country on the command line replaces the whole region of the file
        if self.country.is_none() && self.financial.is_none() {
            self.country = defaults.country;
            self.subdiv = self.subdiv.or(defaults.subdiv);
            self.financial = defaults.financial;
        }

        self
    }
}

/// Everything that is not passed on the command line.
#[derive(Debug, Clone)]
pub struct Environment {
    pub today: NaiveDate,
    pub stdout_is_terminal: bool,
    pub locale: LocaleCandidates,
    pub cache_dir: Option<PathBuf>,
    pub text_render: Option<TextRender>,
}

impl Environment {
    #[must_use]
    pub fn detect(locale: Option<&str>) -> Self {
        Self {
            today: Local::now().date_naive(),
            stdout_is_terminal: io::stdout().is_terminal(),
            locale: LocaleCandidates::from_env(locale),
            cache_dir: utils::cache_dir(),
            text_render: TextRender::detect(),
        }
    }
}

/// The fully resolved options for generating a calendar.
#[derive(Debug, Clone)]
pub struct Config {
    mode: Mode,
    layout: YearLayout,
    first_weekday: FirstWeekday,
    output: Output,
    holiday_list: bool,
    calendar: bool,
    stylesheet: Stylesheet,
    style: Style,
    force: bool,
    locale: Locale,
    encoding: &'static Encoding,
    region: Region,
    open_browser: bool,
    color: bool,
    today: NaiveDate,
    text_render: Option<TextRender>,
}

pub struct ConfigBuilder {
    options: Options,
    environment: Option<Environment>,
}

impl ConfigBuilder {
    fn new(options: Options) -> Self {
        Self {
            options,
            environment: None,
        }
    }

    /// Replaces the detected environment.
    pub fn environment(&mut self, environment: Environment) -> &mut Self {
        self.environment = Some(environment);
        self
    }

    pub fn build(self) -> anyhow::Result<Config> {
        let options = self.options;
        let environment = self
            .environment
            .unwrap_or_else(|| Environment::detect(options.locale.as_deref()));

        let annual = options.width.is_some() || options.start_month.is_some();
        let selection = DateSelection::from_args(&options.args, environment.today, annual)?;

        let layout = match selection.month {
            Some(month) => YearLayout::single(selection.year, month)?,
            None => YearLayout::annual(
                selection.year,
                options.start_month.unwrap_or(1),
                options.width.unwrap_or(DEFAULT_WIDTH),
            )?,
        };

        let first_weekday = options
            .first_weekday
            .as_deref()
            .map(str::parse::<FirstWeekday>)
            .transpose()?
            .unwrap_or_default();

        let mut external = options.use_external_css || options.css_href.is_some();

        let mode = {
            if options.text {
                Mode::Text
            } else if options.html
                || options.css.is_some()
                || external
                || options.output.as_deref().map_or(false, |output| {
                    Path::new(output).has_any_extension(&["html", "htm", "xml"])
                })
            {
                Mode::Html
            } else {
                Mode::Text
            }
        };

        let mut open_browser = !options.no_browser && mode == Mode::Html;

        let output = match (mode, options.output.as_deref()) {
            (_, Some("-")) => {
                if external {
                    warn!("Can not use --use-external-css when the output is not a file.");
                    external = false;
                }

                Output::Stdout
            }
            (_, Some(path)) => {
                open_browser = false;
                Output::File(PathBuf::from(path))
            }
            (Mode::Text, None) => Output::Stdout,
            (Mode::Html, None) if environment.stdout_is_terminal && open_browser => {
                let cache_dir = environment
                    .cache_dir
                    .as_ref()
                    .context("can not find a cache directory, please use --output")?;

                if external {
                    warn!("Can not use --use-external-css without --output.");
                    external = false;
                }

                Output::File(cache_dir.join(env!("CARGO_PKG_NAME")).join("calendar.html"))
            }
            (Mode::Html, None) => {
                if external {
                    warn!("Can not use --use-external-css when the output is not a file.");
                    external = false;
                }

                Output::Stdout
            }
        };

        if output == Output::Stdout {
            open_browser = false;
        }

        let css_href = match options.css_href.as_deref() {
            Some(_) if !external => {
                warn!("--css-href ignored.");
                None
            }
            css_href => css_href,
        };

        let stylesheet = Stylesheet::resolve(
            options.css.as_deref(),
            css_href,
            external,
            mode == Mode::Text,
            output.path().unwrap_or_else(|| Path::new("-")),
        )?;

        let style = options
            .style
            .as_deref()
            .map(str::parse::<Style>)
            .transpose()?
            .unwrap_or_default();

        let candidates = &environment.locale;
        let locale = candidates.locale().with_context(|| {
            format!(
                "Bad locale {}, please check the available locales on your system",
                candidates.candidates().first().map_or("", String::as_str)
            )
        })?;
        let encoding = candidates.encoding(options.encoding.as_deref())?;

        let region = {
            if options.country.is_none() && options.financial.is_none() {
                let country = locale.country().with_context(|| {
                    format!(
                        "Can not detect the country from the locale {}, please use --country",
                        locale
                    )
                })?;
                info!("Holiday region is {}.", country);

                Region::new(Some(country), options.subdiv.as_deref(), None)?
            } else {
                Region::new(
                    options.country.as_deref(),
                    options.subdiv.as_deref(),
                    options.financial.as_deref(),
                )?
            }
        };

        let config = Config {
            mode,
            layout,
            first_weekday,
            output,
            holiday_list: options.holidays || options.list_holidays,
            calendar: !options.list_holidays,
            stylesheet,
            style,
            force: options.force,
            locale,
            encoding,
            region,
            open_browser,
            color: options.color.unwrap_or(environment.stdout_is_terminal),
            today: environment.today,
            text_render: environment.text_render,
        };

        config.log_options();

        Ok(config)
    }
}

impl Config {
    #[must_use]
    pub fn builder(options: Options) -> ConfigBuilder {
        ConfigBuilder::new(options)
    }

    fn log_options(&self) {
        debug!("mode: {:?}", self.mode);
        debug!("year: {}", self.layout.year());
        debug!("start_month: {}", self.layout.start_month());
        debug!("months: {}", self.layout.months());
        debug!("width: {}", self.layout.width());
        debug!("first_weekday: {}", self.first_weekday);
        debug!("locale: {}", self.locale);
        debug!("holiday region: {}", self.region);
        debug!("output: {}", self.output);
        debug!("style: {}", self.style);
        debug!("stylesheet: {:?}", self.stylesheet);
        debug!("encoding: {}", self.encoding.name());
        debug!("color: {}", self.color);
        debug!("open_browser: {}", self.open_browser);
        debug!("text_render: {:?}", self.text_render);
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub const fn layout(&self) -> &YearLayout {
        &self.layout
    }

    #[must_use]
    pub const fn first_weekday(&self) -> FirstWeekday {
        self.first_weekday
    }

    #[must_use]
    pub const fn output(&self) -> &Output {
        &self.output
    }

    /// Whether the chronological list of holidays is appended.
    #[must_use]
    pub const fn holiday_list(&self) -> bool {
        self.holiday_list
    }

    /// Whether the month tables are shown.
    #[must_use]
    pub const fn calendar(&self) -> bool {
        self.calendar
    }

    #[must_use]
    pub const fn stylesheet(&self) -> &Stylesheet {
        &self.stylesheet
    }

    #[must_use]
    pub const fn style(&self) -> Style {
        self.style
    }

    /// Overwrite an existing css file.
    #[must_use]
    pub const fn force(&self) -> bool {
        self.force
    }

    #[must_use]
    pub const fn locale(&self) -> &Locale {
        &self.locale
    }

    #[must_use]
    pub fn names(&self) -> CalendarNames {
        CalendarNames::for_language(self.locale.language())
    }

    #[must_use]
    pub const fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    #[must_use]
    pub const fn region(&self) -> &Region {
        &self.region
    }

    #[must_use]
    pub const fn open_browser(&self) -> bool {
        self.open_browser
    }

    #[must_use]
    pub const fn color(&self) -> bool {
        self.color
    }

    #[must_use]
    pub const fn today(&self) -> NaiveDate {
        self.today
    }

    #[must_use]
    pub const fn text_render(&self) -> Option<&TextRender> {
        self.text_render.as_ref()
    }
}
