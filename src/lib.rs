mod html_string;
mod utils;

pub mod calendar;
pub mod config;
pub mod holidays;
pub mod locale;
pub mod stylesheet;
pub mod text_render;
pub mod verifier;

use std::io::{self, Write};
use std::ops::RangeInclusive;
use std::path::PathBuf;

use anyhow::Context;
use encoding_rs::UTF_8;
use log::{info, warn};

use crate::calendar::{encode_document, CalendarPage, HtmlCalendar, PlainTextCalendar};
use crate::config::{Config, Mode, Output};
use crate::holidays::{HolidayCalendar, Region};
use crate::verifier::{BuiltinSource, CsvSource, HolidaySource, Report, TomlSource, Verifier};

pub use crate::utils::dot_path;

pub fn generate_calendar(config: &Config) -> anyhow::Result<()> {
    let mut holidays = HolidayCalendar::for_region(config.region())?;

    info!("generating calendar for {}", config.layout().year());

    let page = CalendarPage::build(
        config.layout(),
        config.first_weekday(),
        &mut holidays,
        Some(config.today()),
    );

    let content = match config.mode() {
        Mode::Html => render_html(config, &page)?,
        Mode::Text => render_text(config, &page)?,
    };

    match config.output() {
        Output::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&content)?;
            stdout.flush()?;
        }
        Output::File(path) => {
            utils::write_atomic(path, &content)
                .with_context(|| format!("failed to write `{}`", path.display()))?;

            if config.open_browser() {
                utils::open_in_browser(path)
                    .with_context(|| format!("failed to open `{}` in a browser", path.display()))?;
            } else {
                info!("Wrote {}", path.display());
            }
        }
    }

    Ok(())
}

fn render_html(config: &Config, page: &CalendarPage) -> anyhow::Result<Vec<u8>> {
    let style = config
        .stylesheet()
        .prepare(config.style(), config.force())?;

    let mut html = HtmlCalendar::new(config.names());
    html.encoding(config.encoding())
        .style(style)
        .holiday_list(config.holiday_list())
        .calendar(config.calendar());

    Ok(html.render_bytes(page))
}

fn render_text(config: &Config, page: &CalendarPage) -> anyhow::Result<Vec<u8>> {
    let Some(text_render) = config.text_render() else {
        warn!("elinks or w3m is not installed.");

        let mut text = PlainTextCalendar::new(config.names());
        text.holiday_list(config.holiday_list())
            .calendar(config.calendar());

        return Ok(encode_document(&text.render(page), config.encoding()));
    };

    if !text_render.supports_color() {
        warn!("elinks is not installed.");
    }

    // without colors the holidays have to be marked in the text
    let inline_style = config.color() && text_render.supports_color();

    let mut html = HtmlCalendar::new(config.names());
    html.encoding(UTF_8)
        .style(
            config
                .stylesheet()
                .prepare(config.style(), config.force())?,
        )
        .holiday_list(config.holiday_list())
        .calendar(config.calendar())
        .visible_markers(!inline_style, !inline_style)
        .inline_style(inline_style);

    let text = text_render
        .render(&html.render(page), config.color())
        .with_context(|| format!("failed to convert the calendar with {}", text_render.name()))?;

    Ok(encode_document(&text, config.encoding()))
}

/// Which sources are compared by [`verify_holidays`].
#[derive(Debug, Clone)]
pub struct VerifyOptions {
    pub years: RangeInclusive<i32>,
    pub region: Region,
    pub csv: Option<PathBuf>,
    pub toml: Option<PathBuf>,
    pub normalize: bool,
    pub report_missing: bool,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            years: 1955..=2023,
            region: Region::country("JP"),
            csv: None,
            toml: None,
            normalize: false,
            report_missing: false,
        }
    }
}

/// Compares the built-in holidays with the holiday files, files that do not
/// exist are skipped.
pub fn verify_holidays(options: &VerifyOptions) -> anyhow::Result<Report> {
    let mut sources: Vec<Box<dyn HolidaySource>> =
        vec![Box::new(BuiltinSource::new(&options.region)?)];

    if let Some(path) = &options.csv {
        if path.is_file() {
            sources.push(Box::new(CsvSource::open(path)?));
        } else {
            warn!("{} does not exist, skipping the csv source", path.display());
        }
    }

    if let Some(path) = &options.toml {
        if path.is_file() {
            sources.push(Box::new(TomlSource::open(path)?));
        } else {
            warn!("{} does not exist, skipping the toml source", path.display());
        }
    }

    if sources.len() < 2 {
        warn!("only one holiday source, there is nothing to compare");
    }

    let report = Verifier::new(sources)
        .normalize(options.normalize)
        .report_missing(options.report_missing)
        .verify(options.years.clone())?;

    info!(
        "{} disagreements between {}",
        report.rows().len(),
        report.sources().join(", ")
    );

    Ok(report)
}
