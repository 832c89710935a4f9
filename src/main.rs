use std::env;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context as _;
use log::error;
use seahorse::{App, Command, Context, Flag, FlagType};

use calendar_sheet::config::{Config, Defaults, Options};
use calendar_sheet::holidays::Region;
use calendar_sheet::{generate_calendar, verify_holidays, VerifyOptions};

const LOG_ENV: &str = "CALENDAR_SHEET_LOG";

fn set_env_if_absent<K: AsRef<OsStr>, V: AsRef<OsStr>>(var: K, default: impl FnOnce() -> V) {
    if env::var(var.as_ref()).is_err() {
        env::set_var(var, default());
    }
}

fn log_level(args: &[String]) -> &'static str {
    let has_flag = |names: &[&str]| args.iter().any(|arg| names.contains(&arg.as_str()));

    if has_flag(&["--quiet", "-q"]) {
        "error"
    } else if has_flag(&["--verbose"]) {
        "debug"
    } else {
        "info"
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    set_env_if_absent(LOG_ENV, || log_level(&args));
    color_backtrace::install();
    pretty_env_logger::init_custom_env(LOG_ENV);

    app().run(args);
}

fn exit_on_error(result: anyhow::Result<()>) {
    if let Err(e) = result {
        error!("{:?}", e);
        ::std::process::exit(1);
    }
}

trait ContextExt {
    fn context(&self) -> &Context;

    fn optional_string_flag(&self, name: &str) -> Option<String> {
        self.context().string_flag(name).ok()
    }

    fn parsed_flag<T>(&self, name: &str) -> anyhow::Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.optional_string_flag(name)
            .map(|value| {
                value
                    .trim()
                    .parse::<T>()
                    .with_context(|| format!("invalid value `{}` for --{}", value, name))
            })
            .transpose()
    }

    fn path_flag(&self, name: &str) -> Option<PathBuf> {
        self.optional_string_flag(name).map(PathBuf::from)
    }
}

impl ContextExt for Context {
    fn context(&self) -> &Context {
        self
    }
}

fn calendar_options(context: &Context) -> anyhow::Result<Options> {
    let color = {
        if context.bool_flag("no-color") {
            Some(false)
        } else if context.bool_flag("color") {
            Some(true)
        } else {
            None
        }
    };

    Ok(Options {
        text: context.bool_flag("text"),
        html: context.bool_flag("html"),
        width: context.parsed_flag("width")?,
        start_month: context.parsed_flag("start-month")?,
        first_weekday: context.optional_string_flag("first-weekday"),
        output: context.optional_string_flag("output"),
        holidays: context.bool_flag("holidays"),
        list_holidays: context.bool_flag("list-holidays"),
        css: context.optional_string_flag("css"),
        use_external_css: context.bool_flag("use-external-css"),
        css_href: context.optional_string_flag("css-href"),
        style: context.optional_string_flag("style"),
        encoding: context.optional_string_flag("encoding"),
        locale: context.optional_string_flag("locale"),
        country: context.optional_string_flag("country"),
        subdiv: context.optional_string_flag("subdiv"),
        financial: context.optional_string_flag("financial"),
        force: context.bool_flag("force"),
        no_browser: context.bool_flag("no-browser"),
        color,
        args: context.args.clone(),
    })
}

fn run_calendar(context: &Context) -> anyhow::Result<()> {
    let defaults = Defaults::load(context.path_flag("config").as_deref())?;
    let options = calendar_options(context)?.with_defaults(defaults);

    let config = Config::builder(options).build()?;

    generate_calendar(&config)
}

fn run_verify(context: &Context) -> anyhow::Result<()> {
    let mut options = VerifyOptions::default();

    let first = context.parsed_flag("from")?.unwrap_or(*options.years.start());
    let last = context.parsed_flag("to")?.unwrap_or(*options.years.end());
    if first > last {
        anyhow::bail!("--from {} is after --to {}", first, last);
    }
    options.years = first..=last;

    if let Some(country) = context.optional_string_flag("country") {
        options.region = Region::new(
            Some(country.as_str()),
            context.optional_string_flag("subdiv").as_deref(),
            None,
        )?;
    }

    options.csv = context.path_flag("csv");
    options.toml = context.path_flag("toml");
    options.normalize = context.bool_flag("normalize");
    options.report_missing = context.bool_flag("missing");

    let report = verify_holidays(&options)?;
    print!("{}", report);

    Ok(())
}

fn calendar_action(context: &Context) {
    exit_on_error(run_calendar(context));
}

fn verify_action(context: &Context) {
    exit_on_error(run_verify(context));
}

fn verify_command() -> Command {
    Command::new("verify")
        .usage(format!("{} verify [args]", env!("CARGO_PKG_NAME")))
        .description("Compares the built-in holidays with other holiday sources.")
        .flag(Flag::new("from", FlagType::String).description("First year. Default: 1955"))
        .flag(Flag::new("to", FlagType::String).description("Last year. Default: 2023"))
        .flag(
            Flag::new("country", FlagType::String)
                .alias("C")
                .description("Country of the built-in holidays. Default: JP"),
        )
        .flag(Flag::new("subdiv", FlagType::String).description("Subdivision of the country."))
        .flag(
            Flag::new("csv", FlagType::String)
                .description("Path to the `syukujitsu.csv` of the cabinet office."),
        )
        .flag(
            Flag::new("toml", FlagType::String)
                .description("Path to a toml file with `[[holiday]]` entries."),
        )
        .flag(
            Flag::new("normalize", FlagType::Bool)
                .description("Compare the canonical holiday names."),
        )
        .flag(
            Flag::new("missing", FlagType::Bool)
                .description("Report holidays that are missing in a source."),
        )
        .action(verify_action)
}

fn app() -> App {
    App::new(env!("CARGO_PKG_NAME"))
        .description(env!("CARGO_PKG_DESCRIPTION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .usage(format!("{} [args] [YEAR] [MONTH]", env!("CARGO_PKG_NAME")))
        .action(calendar_action)
        .flag(Flag::new("text", FlagType::Bool).alias("t").description("Text mode."))
        .flag(Flag::new("html", FlagType::Bool).alias("H").description("HTML mode."))
        .flag(
            Flag::new("width", FlagType::String)
                .alias("w")
                .description("Number of months in a row (1..12). Default: 3"),
        )
        .flag(
            Flag::new("start-month", FlagType::String)
                .alias("m")
                .description("The month the year starts with (1..12). Default: 1"),
        )
        .flag(
            Flag::new("first-weekday", FlagType::String)
                .alias("d")
                .description("First weekday (mon..sun or 0..6). Default: sun"),
        )
        .flag(
            Flag::new("output", FlagType::String)
                .alias("o")
                .description("Output filename, `-` for stdout."),
        )
        .flag(Flag::new("holidays", FlagType::Bool).description("Include the holiday list."))
        .flag(
            Flag::new("list-holidays", FlagType::Bool)
                .alias("l")
                .description("Only list the holidays."),
        )
        .flag(
            Flag::new("css", FlagType::String)
                .alias("c")
                .description("CSS filename, relative to the output directory."),
        )
        .flag(
            Flag::new("use-external-css", FlagType::Bool)
                .alias("e")
                .description("Write the css to a file and link to it."),
        )
        .flag(Flag::new("css-href", FlagType::String).description("CSS location or URL."))
        .flag(
            Flag::new("style", FlagType::String)
                .alias("s")
                .description("CSS template (default, simple). Default: default"),
        )
        .flag(Flag::new("encoding", FlagType::String).description("Character encoding."))
        .flag(Flag::new("locale", FlagType::String).description("Locale, e.g. en_US.UTF-8."))
        .flag(
            Flag::new("country", FlagType::String)
                .alias("C")
                .description("Country code for holidays, e.g. US. Default: from the locale"),
        )
        .flag(Flag::new("subdiv", FlagType::String).description("Subdivision of the country."))
        .flag(
            Flag::new("financial", FlagType::String)
                .description("Financial market for holidays, e.g. NYSE."),
        )
        .flag(
            Flag::new("force", FlagType::Bool)
                .alias("f")
                .description("Overwrite an existing css file."),
        )
        .flag(Flag::new("quiet", FlagType::Bool).alias("q").description("Only log errors."))
        .flag(
            Flag::new("no-browser", FlagType::Bool)
                .alias("n")
                .description("Do not open the browser."),
        )
        .flag(Flag::new("color", FlagType::Bool).description("Colors in text mode."))
        .flag(Flag::new("no-color", FlagType::Bool).description("No colors in text mode."))
        .flag(Flag::new("verbose", FlagType::Bool).description("Log the resolved options."))
        .flag(
            Flag::new("config", FlagType::String).description(
                "Path to a toml file with defaults. Default: `~/.config/calendar-sheet/config.toml`",
            ),
        )
        .command(verify_command())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(&args(&["calendar-sheet", "-q", "2023"])), "error");
        assert_eq!(log_level(&args(&["calendar-sheet", "--verbose"])), "debug");
        assert_eq!(log_level(&args(&["calendar-sheet", "2023"])), "info");
    }
}
