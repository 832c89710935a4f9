use std::path::Path;

use calendar_sheet::config::{Config, Environment, Options};
use calendar_sheet::date;
use calendar_sheet::locale::LocaleCandidates;
use chrono::NaiveDate;

#[must_use]
pub fn today() -> NaiveDate {
    date!(2023:01:10)
}

/// An environment that does not depend on the machine running the tests.
#[must_use]
pub fn environment(locale: &str, cache_dir: &Path) -> Environment {
    Environment {
        today: today(),
        stdout_is_terminal: false,
        locale: LocaleCandidates::new(None, |_| None, Some(locale.to_string())),
        cache_dir: Some(cache_dir.to_path_buf()),
        text_render: None,
    }
}

pub fn build_config(options: Options, environment: Environment) -> anyhow::Result<Config> {
    let mut builder = Config::builder(options);
    builder.environment(environment);
    builder.build()
}

#[must_use]
#[allow(dead_code)]
pub fn html_options(output: &Path, args: &[&str]) -> Options {
    Options {
        output: Some(output.display().to_string()),
        args: args.iter().map(ToString::to_string).collect(),
        ..Options::default()
    }
}
