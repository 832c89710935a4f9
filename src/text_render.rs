use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;
use tempfile::TempDir;
use thiserror::Error;

use crate::utils;

#[derive(Debug, Error)]
pub enum RenderingError {
    #[error(transparent)]
    WriteInputFile(io::Error),
    #[error(transparent)]
    RunError(io::Error),
    #[error("{program} failed with status: {status:?}, stderr: {stderr}")]
    Failed {
        program: String,
        status: Option<i32>,
        stderr: String,
    },
}

/// An installed html to text converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextRender {
    /// Supports colors through ansi escape codes.
    Elinks(PathBuf),
    W3m(PathBuf),
}

impl TextRender {
    /// Searches the `PATH` for `elinks` and then for `w3m`.
    #[must_use]
    pub fn detect() -> Option<Self> {
        utils::find_executable("elinks")
            .map(Self::Elinks)
            .or_else(|| utils::find_executable("w3m").map(Self::W3m))
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Elinks(_) => "elinks",
            Self::W3m(_) => "w3m",
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Elinks(path) | Self::W3m(path) => path,
        }
    }

    #[must_use]
    pub const fn supports_color(&self) -> bool {
        matches!(self, Self::Elinks(_))
    }

    fn command(&self, input_file: &Path, color: bool) -> Command {
        let mut cmd = Command::new(self.path());

        match self {
            Self::Elinks(_) => {
                cmd.args(["-dump", "-dump-color-mode", if color { "1" } else { "0" }])
                    .args(["-dump-charset", "utf-8"]);
            }
            Self::W3m(_) => {
                cmd.args(["-T", "text/html", "-dump", "-O", "utf-8"]);
            }
        }

        cmd.arg(input_file);
        cmd
    }

    /// Converts the utf-8 encoded `html` document to text.
    ///
    /// Blank lines are removed from the output.
    pub fn render(&self, html: &str, color: bool) -> Result<String, RenderingError> {
        let working_dir = TempDir::new().map_err(RenderingError::WriteInputFile)?;
        let input_file = working_dir.path().join("calendar.html");
        utils::write(&input_file, html).map_err(RenderingError::WriteInputFile)?;

        let mut cmd = self.command(&input_file, color);
        debug!("running {:?}", cmd);

        let output = cmd.output().map_err(RenderingError::RunError)?;

        if !output.status.success() {
            return Err(RenderingError::Failed {
                program: self.name().to_string(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(strip_blank_lines(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Removes all lines without visible content, the result ends with a newline.
#[must_use]
pub fn strip_blank_lines(text: &str) -> String {
    let mut result = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    result.push('\n');
    result
}
