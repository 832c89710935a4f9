//! Selection of the css preset and the rules where an external stylesheet is
//! written to and how the page refers to it.

use core::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{info, warn};
use thiserror::Error;

use crate::calendar::PageStyle;
use crate::utils::{self, Resources};

#[derive(Debug, Error)]
pub enum StylesheetError {
    #[error("no such style `{0}`, expected `default` or `simple`")]
    UnknownStyle(String),
    #[error("the embedded stylesheet `{0}` is missing")]
    MissingPreset(&'static str),
    #[error("can not use both --css-href and --text")]
    HrefInTextMode,
    #[error("can not use an absolute path for --css-href: `{0}`")]
    AbsoluteHref(String),
    #[error("no such css file: `{}`", .0.display())]
    MissingFile(PathBuf),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// The css templates that ship with the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Default,
    Simple,
}

impl Style {
    #[must_use]
    pub const fn resource_name(&self) -> &'static str {
        match self {
            Self::Default => "calendar.css",
            Self::Simple => "calendar-simple.css",
        }
    }

    pub fn content(&self) -> Result<String, StylesheetError> {
        let file = Resources::get(self.resource_name())
            .ok_or(StylesheetError::MissingPreset(self.resource_name()))?;

        Ok(String::from_utf8_lossy(&file.data).into_owned())
    }
}

impl FromStr for Style {
    type Err = StylesheetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "simple" => Ok(Self::Simple),
            _ => Err(StylesheetError::UnknownStyle(value.to_string())),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Simple => f.write_str("simple"),
        }
    }
}

/// Where the css of a page comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stylesheet {
    /// The css is embedded into the page.
    Inline(InlineSource),
    /// The page links to a stylesheet.
    External {
        /// The preset is written to this file.
        file: Option<PathBuf>,
        /// The value of the `href` attribute, no link if absent.
        href: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineSource {
    Preset,
    File(PathBuf),
    /// The page is not styled.
    Nothing,
}

impl Stylesheet {
    /// Applies the placement rules to the raw option values.
    ///
    /// | `css`       | `css_href`  | result                                          |
    /// |-------------|-------------|-------------------------------------------------|
    /// | absent      | absent      | write `<output>.css`, link to it                |
    /// | absent      | `./my.css`  | write nothing, link to `./my.css`               |
    /// | `""`        | absent      | write nothing, no link                          |
    /// | `""`        | `./my.css`  | write nothing, link to `./my.css`               |
    /// | `style.css` | absent      | write `style.css` next to the output, link to it |
    /// | `style.css` | `./foo.css` | write `style.css` next to the output, link to `./foo.css` |
    ///
    /// Without `external` the css is inlined: the preset if `css` is absent,
    /// nothing if it is empty and the file otherwise.
    pub fn resolve(
        css: Option<&str>,
        css_href: Option<&str>,
        external: bool,
        text_mode: bool,
        output: &Path,
    ) -> Result<Self, StylesheetError> {
        if let Some(href) = css_href {
            if text_mode {
                return Err(StylesheetError::HrefInTextMode);
            }

            if !utils::is_url(href) && Path::new(href).is_absolute() {
                return Err(StylesheetError::AbsoluteHref(href.to_string()));
            }
        }

        let output_dir = utils::parent_dir(output);

        if text_mode || !external {
            let source = match css {
                None => InlineSource::Preset,
                Some(css) if css.trim().is_empty() => InlineSource::Nothing,
                Some(css) => InlineSource::File(absolute_or_in(css, output_dir)),
            };

            return Ok(Self::Inline(source));
        }

        let (file, href) = match css {
            None if css_href.is_none() => (Some(output.with_extension("css")), None),
            None => (None, css_href),
            Some(css) if css.trim().is_empty() => (None, css_href.or(Some(""))),
            Some(css) => (Some(absolute_or_in(css, output_dir)), css_href),
        };

        let href = match href {
            Some("") => None,
            Some(href) if utils::is_url(href) => Some(href.to_string()),
            Some(href) => Some(utils::dot_path(href)),
            None => match &file {
                Some(file) => Some(utils::dot_path(utils::relative_path(file, output_dir)?)),
                None => None,
            },
        };

        Ok(Self::External { file, href })
    }

    /// Writes the css file if needed and returns how the page refers to it.
    ///
    /// An existing css file is only replaced with `force`.
    pub fn prepare(&self, style: Style, force: bool) -> Result<PageStyle, StylesheetError> {
        match self {
            Self::Inline(InlineSource::Preset) => Ok(PageStyle::Inline(style.content()?)),
            Self::Inline(InlineSource::File(path)) => match utils::read_to_string(path) {
                Ok(css) => Ok(PageStyle::Inline(css)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    Err(StylesheetError::MissingFile(path.clone()))
                }
                Err(e) => Err(e.into()),
            },
            Self::Inline(InlineSource::Nothing) => Ok(PageStyle::None),
            Self::External { file, href } => {
                if let Some(file) = file {
                    if force || !file.exists() {
                        utils::write_atomic(file, style.content()?)?;
                        info!("Wrote {}", file.display());
                    } else {
                        warn!(
                            "{} exists. add --force to overwrite the css.",
                            file.display()
                        );
                    }
                }

                Ok(href.clone().map_or(PageStyle::None, PageStyle::Link))
            }
        }
    }
}

fn absolute_or_in(path: &str, dir: &Path) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        dir.join(path)
    }
}
