use std::env;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::io::{BufReader, Read, Write};
use std::path::{Component, Path, PathBuf};
use std::process::Command;

use log::{debug, trace};
use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

mod macros;

#[derive(RustEmbed)]
#[folder = "resources/"]
pub struct Resources;

pub fn toml_from_reader<R, T>(reader: R) -> anyhow::Result<T>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut reader = BufReader::new(reader);
    let mut data = String::with_capacity(64 * 1024);
    reader.read_to_string(&mut data)?;
    Ok(toml::from_str(&data)?)
}

pub mod serde_toml_local_date {
    use chrono::NaiveDate;
    use serde::de::{self, Deserialize};
    use toml::value::Datetime;

    // NOTE: `toml::value::Datetime` is used, because
    // `toml::value::Date` does not implement `Deserialize`

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let datetime = Datetime::deserialize(deserializer)?;
        let date = datetime
            .date
            .ok_or_else(|| de::Error::custom("expected a date"))?;

        NaiveDate::from_ymd_opt(
            i32::from(date.year),
            u32::from(date.month),
            u32::from(date.day),
        )
        .ok_or_else(|| de::Error::custom(format!("invalid date `{}`", datetime)))
    }
}

pub fn read(path: impl AsRef<Path>) -> io::Result<Vec<u8>> {
    trace!("reading from: {}", path.as_ref().display());
    fs::read(path)
}

pub fn read_to_string(path: impl AsRef<Path>) -> io::Result<String> {
    trace!("reading from: {}", path.as_ref().display());
    fs::read_to_string(path)
}

pub fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> io::Result<()> {
    trace!("writing to: {}", path.as_ref().display());
    fs::write(path, contents)
}

pub fn create_dir_all(path: impl AsRef<Path>) -> io::Result<()> {
    trace!("creating directory: {}", path.as_ref().display());
    fs::create_dir_all(path)
}

/// Returns the directory a file at `path` lives in, `.` for bare file names.
#[must_use]
pub fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Writes the `contents` to a temporary file next to `path` and moves it into place
/// afterwards, so readers never see a half written file.
pub fn write_atomic(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> io::Result<()> {
    let path = path.as_ref();
    let folder = parent_dir(path);
    create_dir_all(folder)?;

    trace!("writing to: {}", path.display());
    let mut file = NamedTempFile::new_in(folder)?;
    file.write_all(contents.as_ref())?;
    file.persist(path).map_err(|e| e.error)?;

    Ok(())
}

pub trait PathExt {
    /// Whether the extension is one of `extensions`, ignoring the case.
    #[must_use]
    fn has_any_extension(&self, extensions: &[&str]) -> bool;
}

impl PathExt for Path {
    fn has_any_extension(&self, extensions: &[&str]) -> bool {
        self.extension()
            .and_then(OsStr::to_str)
            .map_or(false, |ext| {
                extensions
                    .iter()
                    .any(|candidate| ext.eq_ignore_ascii_case(candidate))
            })
    }
}

/// Returns `true` if the value starts with an url scheme like `https:`.
///
/// Single letter schemes are rejected, so windows drive letters are not mistaken
/// for urls.
#[must_use]
pub fn is_url(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once(':') else {
        return false;
    };

    scheme.len() > 1
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Returns the path as a string that starts with `.` if it is relative.
///
/// `calendar.css` becomes `./calendar.css`, absolute paths are returned unchanged.
#[must_use]
pub fn dot_path(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();

    if path.is_absolute() {
        return path.display().to_string();
    }

    let mut result = PathBuf::from(".");
    result.extend(
        path.components()
            .filter(|component| !matches!(component, Component::CurDir)),
    );

    result.display().to_string()
}

/// Resolves `.` and `..` without touching the filesystem.
#[must_use]
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                result.pop();
            }
            other => result.push(other),
        }
    }

    result
}

/// Returns `path` relative to the directory `base`.
///
/// Neither of the paths has to exist, relative paths are relative to the current
/// working directory.
pub fn relative_path(path: impl AsRef<Path>, base: impl AsRef<Path>) -> io::Result<PathBuf> {
    let current_dir = env::current_dir()?;
    let path = normalize_lexically(&current_dir.join(path));
    let base = normalize_lexically(&current_dir.join(base));

    let mut path_components = path.components().peekable();
    let mut base_components = base.components().peekable();

    while let (Some(left), Some(right)) = (path_components.peek(), base_components.peek()) {
        if left != right {
            break;
        }

        path_components.next();
        base_components.next();
    }

    let mut result = PathBuf::new();
    result.extend(base_components.map(|_| Component::ParentDir));
    result.extend(path_components);

    Ok(result)
}

/// Searches the `PATH` for an executable with the given name.
#[must_use]
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;

    env::split_paths(&paths)
        .flat_map(|dir| {
            let mut candidates = vec![dir.join(name)];
            if cfg!(windows) {
                candidates.push(dir.join(format!("{}.exe", name)));
            }
            candidates
        })
        .find(|candidate| candidate.is_file())
}

/// Opens the file in the default browser (or the one named in `$BROWSER`).
///
/// The browser is not waited for.
pub fn open_in_browser(path: impl AsRef<Path>) -> io::Result<()> {
    let path = dunce::canonicalize(path)?;

    let mut command = {
        if let Some(browser) = env::var_os("BROWSER").filter(|value| !value.is_empty()) {
            Command::new(browser)
        } else if cfg!(target_os = "macos") {
            Command::new("open")
        } else if cfg!(windows) {
            let mut command = Command::new("cmd");
            command.args(["/C", "start", ""]);
            command
        } else {
            Command::new("xdg-open")
        }
    };

    command.arg(&path);
    debug!("opening browser: {:?}", command);
    command.spawn()?;

    Ok(())
}

/// The directory for files that can be regenerated at any time.
#[must_use]
pub fn cache_dir() -> Option<PathBuf> {
    if let Some(dir) = env::var_os("XDG_CACHE_HOME").filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(dir));
    }

    home_dir().map(|home| home.join(".cache"))
}

/// The directory for user configuration files.
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    if let Some(dir) = env::var_os("XDG_CONFIG_HOME").filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(dir));
    }

    home_dir().map(|home| home.join(".config"))
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
