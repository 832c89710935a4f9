//! Writes complete calendar pages to disk and checks the result.

use calendar_sheet::config::Options;
use calendar_sheet::generate_calendar;
use calendar_sheet::stylesheet::Style;

use pretty_assertions::assert_eq;

mod common;

#[test]
fn test_page_with_external_css() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("calendar.html");

    let config = common::build_config(
        Options {
            css: Some("test-calendar.css".to_string()),
            use_external_css: true,
            country: Some("US".to_string()),
            ..common::html_options(&output, &["2023"])
        },
        common::environment("en_US.UTF-8", dir.path()),
    )
    .unwrap();

    generate_calendar(&config).unwrap();

    let html = std::fs::read_to_string(&output).unwrap();
    assert!(html.contains(">2023<"));
    assert!(html.contains("href=\"./test-calendar.css\""));
    assert!(html.contains("title=\"Martin Luther King Jr. Day\""));
    assert!(html.contains("<title>Calendar for 2023</title>"));

    let css = std::fs::read_to_string(dir.path().join("test-calendar.css")).unwrap();
    assert_eq!(css, Style::Default.content().unwrap());
}

#[test]
fn test_existing_css_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("calendar.html");
    let css_file = dir.path().join("calendar.css");
    std::fs::write(&css_file, "td { color: green; }").unwrap();

    let options = Options {
        use_external_css: true,
        country: Some("US".to_string()),
        style: Some("simple".to_string()),
        ..common::html_options(&output, &["2023", "1"])
    };

    let config =
        common::build_config(options.clone(), common::environment("en_US", dir.path())).unwrap();
    generate_calendar(&config).unwrap();

    assert_eq!(
        std::fs::read_to_string(&css_file).unwrap(),
        "td { color: green; }"
    );
    assert!(std::fs::read_to_string(&output)
        .unwrap()
        .contains("href=\"./calendar.css\""));

    let config = common::build_config(
        Options {
            force: true,
            ..options
        },
        common::environment("en_US", dir.path()),
    )
    .unwrap();
    generate_calendar(&config).unwrap();

    assert_eq!(
        std::fs::read_to_string(&css_file).unwrap(),
        Style::Simple.content().unwrap()
    );
}

#[test]
fn test_japanese_page_in_shift_jis() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("calendar.html");

    let config = common::build_config(
        Options {
            holidays: true,
            ..common::html_options(&output, &["2023"])
        },
        common::environment("ja_JP.SJIS", dir.path()),
    )
    .unwrap();

    generate_calendar(&config).unwrap();

    let bytes = std::fs::read(&output).unwrap();
    let (html, had_errors) = encoding_rs::SHIFT_JIS.decode_without_bom_handling(&bytes);
    assert!(!had_errors);
    assert!(html.contains("encoding=\"Shift_JIS\""));
    assert!(html.contains("<style type=\"text/css\">"));
    assert!(html.contains("<table class=\"holidays\">"));
    assert!(html.contains("<td class=\"date\">2023/01/01</td><td class=\"name\">"));
    assert!(html.contains("1月"));
}

#[test]
fn test_plain_text_without_renderer() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("calendar.txt");

    let config = common::build_config(
        Options {
            list_holidays: true,
            country: Some("US".to_string()),
            ..common::html_options(&output, &["1", "2023"])
        },
        common::environment("en_US.UTF-8", dir.path()),
    )
    .unwrap();

    generate_calendar(&config).unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("2023/01/16 Martin Luther King Jr. Day\n"), "{}", text);
    assert!(text.lines().all(|line| line.starts_with("2023/01/")), "{}", text);
}
