//! Integration tests against the shipped almanac.toml and theme files.

use almanac::config::CalendarOptions;
use almanac::ctrl::{CalendarController, Control};
use almanac::locale::Catalog;
use almanac::render::TextRenderer;
use almanac::style::StyleSource;
use almanac::theme::{themes_in, CalendarTheme};
use almanac::WeekStart;
use chrono::{NaiveDate, Weekday};
use std::path::PathBuf;

fn project_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_options() -> CalendarOptions {
    CalendarOptions::load(&project_root().join("almanac.toml"))
        .expect("Failed to load almanac.toml")
}

#[test]
fn test_load_sample_config() {
    let options = sample_options();
    assert_eq!(options.months, Some(3));
    assert_eq!(options.week_start.as_deref(), Some("Monday"));

    let config = options
        .validate(date(2025, 12, 10))
        .expect("Sample config should be valid");

    assert_eq!(config.week_start(), WeekStart::Monday);
    assert_eq!(config.months(), 3);
    assert_eq!(config.day_colors().len(), 2);
    assert!(config.day_colors().contains_key(&Weekday::Sun));
    assert_eq!(config.holidays().len(), 4);
    assert_eq!(
        config.holidays()[&date(2025, 12, 25)].label.as_deref(),
        Some("Christmas Day")
    );
}

#[test]
fn test_sample_config_drives_controller() {
    let options = CalendarOptions {
        year: Some(2025),
        month: Some(12),
        ..Default::default()
    };
    let options = sample_options().overlay(options);
    let config = options.validate(date(2025, 12, 10)).unwrap();
    let mut ctrl = CalendarController::new(config, Catalog::new()).unwrap();

    let years: Vec<_> = ctrl
        .view()
        .months()
        .iter()
        .map(|g| (g.year(), g.month().number()))
        .collect();
    assert_eq!(years, vec![(2025, 12), (2026, 1), (2026, 2)]);

    // Christmas 2025 is a plain Thursday
    let december = &ctrl.view().months()[0];
    let christmas = december.cell(date(2025, 12, 25)).unwrap();
    assert_eq!(christmas.style().unwrap().source(), StyleSource::Holiday);
    assert_eq!(christmas.holiday_label(), Some("Christmas Day"));

    // 2025-12-28 is a Sunday with a configured color
    let sunday = december.cell(date(2025, 12, 28)).unwrap();
    assert_eq!(sunday.style().unwrap().source(), StyleSource::DayOfWeek);

    assert!(december.cell(date(2025, 12, 10)).unwrap().is_today());

    let cmd = almanac::command::parse("2next").unwrap();
    ctrl.send_cmd(&cmd).unwrap();
    assert_eq!(ctrl.view().months()[0].month().number(), 2);

    let text = TextRenderer::new(false).render(ctrl.view());
    assert!(text.contains("2026 Feb"));
}

#[test]
fn test_shipped_theme_loads() {
    let dir = project_root().join("themes");
    let themes = themes_in(&dir);
    assert!(themes.contains_key("sepia"), "Expected the sepia theme");

    let theme = CalendarTheme::named("sepia", Some(&dir)).unwrap();
    assert_eq!(theme.name, "sepia");
    assert_eq!(theme.today.bg.as_str(), "#f0c674");
}

#[test]
fn test_theme_dir_from_options() {
    let options = CalendarOptions {
        theme: Some("sepia".to_owned()),
        theme_dir: Some(project_root().join("themes")),
        ..Default::default()
    };
    let config = options.validate(date(2025, 1, 1)).unwrap();
    assert_eq!(config.theme().name, "sepia");

    let mut ctrl = CalendarController::new(config, Catalog::new()).unwrap();
    ctrl.set_theme("dark").unwrap();
    ctrl.set_theme("sepia").unwrap();
    assert_eq!(ctrl.config().theme().name, "sepia");
}
