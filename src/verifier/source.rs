use core::fmt;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use encoding_rs::{SHIFT_JIS, UTF_8};
use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::holidays::{Holiday, HolidayCalendar, HolidayError, Region};
use crate::utils;
use crate::verifier::{preset, NameTable, BUILTIN_JP, CABINET_OFFICE};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },
    #[error("failed to parse `{}`", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown name preset `{0}`")]
    UnknownPreset(String),
    #[error(transparent)]
    Holiday(#[from] HolidayError),
}

/// A provider of holidays that takes part in the comparison.
pub trait HolidaySource: fmt::Debug {
    /// The label of the source in the report.
    fn name(&self) -> &str;

    /// All holidays in the `year`, in chronological order.
    fn holidays(&mut self, year: i32) -> Result<Vec<Holiday>, SourceError>;

    /// How the names of this source are normalized.
    fn names(&self) -> &NameTable;
}

/// The holiday rules compiled into the binary.
#[derive(Debug)]
pub struct BuiltinSource {
    label: String,
    calendar: HolidayCalendar,
    names: NameTable,
}

impl BuiltinSource {
    pub fn new(region: &Region) -> Result<Self, SourceError> {
        let names = match region {
            Region::Country { code, .. } if code == "JP" => NameTable::from(&BUILTIN_JP),
            _ => NameTable::new(),
        };

        Ok(Self {
            label: format!("builtin({})", region),
            calendar: HolidayCalendar::for_region(region)?,
            names,
        })
    }
}

impl HolidaySource for BuiltinSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn holidays(&mut self, year: i32) -> Result<Vec<Holiday>, SourceError> {
        Ok(self.calendar.holidays_in_year(year))
    }

    fn names(&self) -> &NameTable {
        &self.names
    }
}

/// Holidays loaded once from a file and served per year.
#[derive(Debug)]
struct FileHolidays {
    by_year: BTreeMap<i32, Vec<Holiday>>,
}

impl FileHolidays {
    fn new(mut holidays: Vec<Holiday>) -> Self {
        holidays.sort();

        let mut by_year: BTreeMap<i32, Vec<Holiday>> = BTreeMap::new();
        for holiday in holidays {
            by_year
                .entry(holiday.date().year())
                .or_default()
                .push(holiday);
        }

        Self { by_year }
    }

    fn year(&self, year: i32) -> Vec<Holiday> {
        self.by_year.get(&year).cloned().unwrap_or_default()
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, SourceError> {
    utils::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// The `syukujitsu.csv` published by the cabinet office of japan.
///
/// The file has a header line followed by `date,name` lines, dates are written
/// as `1955/1/1`. It is usually encoded in Shift_JIS, utf-8 is accepted as well.
#[derive(Debug)]
pub struct CsvSource {
    label: String,
    holidays: FileHolidays,
    names: NameTable,
}

impl CsvSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let text = decode_csv(&read_file(path)?);

        Ok(Self {
            label: "syukujitsu.csv".to_string(),
            holidays: FileHolidays::new(parse_csv(path, &text)?),
            names: NameTable::from(&CABINET_OFFICE),
        })
    }
}

fn decode_csv(bytes: &[u8]) -> String {
    match UTF_8.decode_without_bom_handling_and_without_replacement(
        bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes),
    ) {
        Some(text) => text.into_owned(),
        None => {
            debug!("csv is not utf-8, decoding as {}", SHIFT_JIS.name());
            SHIFT_JIS.decode(bytes).0.into_owned()
        }
    }
}

fn parse_csv(path: &Path, text: &str) -> Result<Vec<Holiday>, SourceError> {
    let error = |line: u64, message: String| SourceError::Parse {
        path: path.to_path_buf(),
        line,
        message,
    };
    let csv_error = |e: csv::Error| {
        let line = e.position().map_or(0, csv::Position::line);
        error(line, e.to_string())
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut result = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let line = record.position().map_or(0, csv::Position::line);
        let (date, name): (String, String) = record.deserialize(None).map_err(csv_error)?;

        let date = NaiveDate::parse_from_str(&date, "%Y/%m/%d")
            .map_err(|e| error(line, format!("invalid date `{}`: {}", date, e)))?;

        result.push(Holiday::new(date, name));
    }

    Ok(result)
}

impl HolidaySource for CsvSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn holidays(&mut self, year: i32) -> Result<Vec<Holiday>, SourceError> {
        Ok(self.holidays.year(year))
    }

    fn names(&self) -> &NameTable {
        &self.names
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct HolidayEntry {
    #[serde(deserialize_with = "utils::serde_toml_local_date::deserialize")]
    date: NaiveDate,
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct HolidayFile {
    name: Option<String>,
    preset: Option<String>,
    #[serde(default)]
    normalize: BTreeMap<String, String>,
    #[serde(default)]
    suffixes: BTreeMap<String, String>,
    #[serde(default, rename = "holiday")]
    holidays: Vec<HolidayEntry>,
}

/// Holidays listed in a toml file, for example exported from another library.
///
/// ```toml
/// name = "jpholiday"
/// preset = "jpholiday"
///
/// [normalize]
/// "体育の日" = "スポーツの日"
///
/// [suffixes]
/// "振替休日" = "休日"
///
/// [[holiday]]
/// date = 2023-01-01
/// name = "元日"
/// ```
#[derive(Debug)]
pub struct TomlSource {
    label: String,
    holidays: FileHolidays,
    names: NameTable,
}

impl TomlSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let text = String::from_utf8_lossy(&read_file(path)?).into_owned();

        let label = path
            .file_stem()
            .map_or_else(|| "toml".to_string(), |stem| stem.to_string_lossy().into_owned());

        Self::parse(&text, label).map_err(|e| match e {
            SourceError::Toml { source, .. } => SourceError::Toml {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parses the content of a toml file, `label` is used if the file has no `name`.
    pub fn parse(text: &str, label: impl Into<String>) -> Result<Self, SourceError> {
        let file: HolidayFile = toml::from_str(text).map_err(|source| SourceError::Toml {
            path: PathBuf::new(),
            source,
        })?;

        let mut names = NameTable::new();
        if let Some(name) = &file.preset {
            names.extend_from_preset(
                preset(name).ok_or_else(|| SourceError::UnknownPreset(name.clone()))?,
            );
        }

        for (name, canonical) in file.normalize {
            names.replace(name, canonical);
        }

        for (suffix, canonical) in file.suffixes {
            names.suffix(suffix, canonical);
        }

        Ok(Self {
            label: file.name.unwrap_or_else(|| label.into()),
            holidays: FileHolidays::new(
                file.holidays
                    .into_iter()
                    .map(|entry| Holiday::new(entry.date, entry.name))
                    .collect(),
            ),
            names,
        })
    }
}

impl HolidaySource for TomlSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn holidays(&mut self, year: i32) -> Result<Vec<Holiday>, SourceError> {
        Ok(self.holidays.year(year))
    }

    fn names(&self) -> &NameTable {
        &self.names
    }
}
