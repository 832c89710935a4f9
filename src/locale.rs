//! Locale detection, used for the holiday region, the header names and the
//! output encoding.

use core::fmt;
use std::env;
use std::str::FromStr;

use encoding_rs::{Encoding, UTF_8};
use log::trace;
use thiserror::Error;

use crate::utils;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    #[error("bad locale `{0}`, please check the available locales on your system")]
    Invalid(String),
    #[error("can not detect the country from locale `{0}`, please use --country")]
    NoCountry(String),
    #[error("unknown character encoding `{0}`")]
    UnknownEncoding(String),
}

/// A POSIX style locale like `ja_JP.UTF-8` or `de_DE@euro`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    language: String,
    territory: Option<String>,
    codeset: Option<String>,
    modifier: Option<String>,
}

impl Locale {
    /// The locale every system has.
    pub const POSIX: &'static str = "C";

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn territory(&self) -> Option<&str> {
        self.territory.as_deref()
    }

    #[must_use]
    pub fn codeset(&self) -> Option<&str> {
        self.codeset.as_deref()
    }

    /// The country the locale belongs to, e.g. `JP` for `ja_JP.UTF-8`.
    pub fn country(&self) -> Result<&str, LocaleError> {
        self.territory()
            .ok_or_else(|| LocaleError::NoCountry(self.to_string()))
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || LocaleError::Invalid(value.to_string());
        let normalized = normalize_windows_name(value.trim()).unwrap_or_else(|| value.trim().to_string());

        let (rest, modifier) = match normalized.split_once('@') {
            Some((rest, modifier)) => (rest, Some(modifier.to_string())),
            None => (normalized.as_str(), None),
        };

        let (name, codeset) = match rest.split_once('.') {
            Some((name, codeset)) if !codeset.is_empty() => (name, Some(codeset.to_string())),
            Some(_) => return Err(invalid()),
            None => (rest, None),
        };

        if name == Self::POSIX || name == "POSIX" {
            return Ok(Self {
                language: Self::POSIX.to_string(),
                territory: None,
                codeset,
                modifier,
            });
        }

        let (language, territory) = match name.split_once(['_', '-']) {
            Some((language, territory)) => (language, Some(territory)),
            None => (name, None),
        };

        let is_language = (2..=3).contains(&language.len())
            && language.chars().all(|c| c.is_ascii_alphabetic());
        let is_territory = territory.map_or(true, |territory| {
            (territory.len() == 2 && territory.chars().all(|c| c.is_ascii_alphabetic()))
                || (territory.len() == 3 && territory.chars().all(|c| c.is_ascii_digit()))
        });

        if !is_language || !is_territory {
            return Err(invalid());
        }

        Ok(Self {
            language: language.to_ascii_lowercase(),
            territory: territory.map(str::to_ascii_uppercase),
            codeset,
            modifier,
        })
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.language)?;
        if let Some(territory) = &self.territory {
            write!(f, "_{}", territory)?;
        }
        if let Some(codeset) = &self.codeset {
            write!(f, ".{}", codeset)?;
        }
        if let Some(modifier) = &self.modifier {
            write!(f, "@{}", modifier)?;
        }
        Ok(())
    }
}

/// Windows reports locales like `Japanese_Japan.932`.
const WINDOWS_NAMES: &[(&str, &str)] = &[
    ("Chinese (Simplified)_China", "zh_CN"),
    ("Chinese (Traditional)_Taiwan", "zh_TW"),
    ("English_Australia", "en_AU"),
    ("English_Canada", "en_CA"),
    ("English_United Kingdom", "en_GB"),
    ("English_United States", "en_US"),
    ("French_France", "fr_FR"),
    ("German_Austria", "de_AT"),
    ("German_Germany", "de_DE"),
    ("German_Switzerland", "de_CH"),
    ("Italian_Italy", "it_IT"),
    ("Japanese_Japan", "ja_JP"),
    ("Korean_Korea", "ko_KR"),
    ("Spanish_Spain", "es_ES"),
];

/// Converts a windows locale name to the POSIX form, `None` if it is not a
/// known windows name.
#[must_use]
pub fn normalize_windows_name(value: &str) -> Option<String> {
    let (name, codepage) = match value.split_once('.') {
        Some((name, codepage)) => (name, Some(codepage)),
        None => (value, None),
    };

    let (_, posix) = WINDOWS_NAMES
        .iter()
        .find(|(windows, _)| windows.eq_ignore_ascii_case(name))?;

    let codeset = codepage.map(|codepage| match codepage {
        "65001" => "UTF-8".to_string(),
        digits if digits.chars().all(|c| c.is_ascii_digit()) => format!("cp{}", digits),
        other => other.to_string(),
    });

    Some(match codeset {
        Some(codeset) => format!("{}.{}", posix, codeset),
        None => (*posix).to_string(),
    })
}

/// Looks up an encoding by name, also accepting the codeset names used by
/// glibc and windows.
pub fn lookup_encoding(label: &str) -> Result<&'static Encoding, LocaleError> {
    let lowercase = label.trim().to_ascii_lowercase();
    let alias = match lowercase.as_str() {
        "cp932" | "ms-932" | "sjis-win" => "ms932",
        "eucjp" | "ujis" => "euc-jp",
        "cp65001" => "utf-8",
        "ascii" | "us-ascii" => "windows-1252",
        other => other,
    };

    Encoding::for_label(alias.as_bytes())
        .ok_or_else(|| LocaleError::UnknownEncoding(label.to_string()))
}

/// The locales to try, most specific first.
///
/// The list always ends with [`Locale::POSIX`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleCandidates(Vec<String>);

impl LocaleCandidates {
    /// The environment variables that are consulted, in order.
    pub const VARIABLES: [&'static str; 3] = ["LC_ALL", "LC_TIME", "LANG"];

    pub fn new<F>(flag: Option<&str>, env: F, platform_default: Option<String>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut candidates = Vec::new();
        candidates.extend(flag.map(str::to_string));
        candidates.extend(Self::VARIABLES.iter().filter_map(|name| env(name)));
        candidates.extend(platform_default);
        candidates.retain(|candidate| !candidate.trim().is_empty());
        candidates.push(Locale::POSIX.to_string());

        trace!("locale candidates: {:?}", candidates);

        Self(candidates)
    }

    /// Reads the candidates from the process environment.
    #[must_use]
    pub fn from_env(flag: Option<&str>) -> Self {
        Self::new(flag, |name| env::var(name).ok(), platform_default())
    }

    #[must_use]
    pub fn candidates(&self) -> &[String] {
        &self.0
    }

    /// The locale that is used, the first candidate.
    pub fn locale(&self) -> Result<Locale, LocaleError> {
        self.0
            .first()
            .map_or(Locale::POSIX, String::as_str)
            .parse()
    }

    /// The encoding for the output.
    ///
    /// An `explicit` encoding is used as is, otherwise the codeset of the chosen
    /// locale, then the codeset of any other candidate and finally `UTF-8`.
    pub fn encoding(&self, explicit: Option<&str>) -> Result<&'static Encoding, LocaleError> {
        if let Some(label) = explicit {
            return lookup_encoding(label);
        }

        let codeset = self
            .0
            .iter()
            .filter_map(|candidate| candidate.parse::<Locale>().ok())
            .find_map(|locale| locale.codeset().map(str::to_string));

        match codeset {
            Some(codeset) => lookup_encoding(&codeset),
            None => Ok(UTF_8),
        }
    }
}

/// Reads `LANG=` from the system wide locale configuration.
#[must_use]
pub fn platform_default() -> Option<String> {
    ["/etc/locale.conf", "/etc/default/locale"]
        .iter()
        .filter_map(|path| utils::read_to_string(path).ok())
        .find_map(|contents| parse_lang_assignment(&contents))
}

fn parse_lang_assignment(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let value = line.trim().strip_prefix("LANG=")?;
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
        (!value.is_empty()).then(|| value.to_string())
    })
}
