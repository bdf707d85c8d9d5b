use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};
use crate::grid::WeekStart;
use crate::locale::DEFAULT_LANGUAGE;
use crate::month::MonthIndex;
use crate::selection::{SelectMode, Selection};
use crate::theme::{CalendarTheme, ColorToken};

const CONFIG_PATH_ENV_VAR: &str = "ALMANAC_CONFIG_FILE";

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("almanac").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".almanac.toml"));
    }

    locations
}

/// Load options from `path` if given, otherwise from the first existing
/// default location. Falls back to empty options when nothing is found.
pub fn load_suitable_config(path: Option<&Path>) -> Result<CalendarOptions> {
    if let Some(path) = path {
        if !path.exists() {
            return Err(Error::new(
                ErrorKind::IOError(std::io::Error::from(std::io::ErrorKind::NotFound)),
                &format!("config file '{}' does not exist", path.display()),
            ));
        }
        return CalendarOptions::load(path);
    }

    for location in find_configfile_locations() {
        if location.exists() {
            log::info!("Using config file '{}'", location.display());
            return CalendarOptions::load(&location);
        }
    }

    log::info!("No config file found, using defaults");
    Ok(CalendarOptions::default())
}

/// Holiday entry as written in a config file: either just a color or a
/// table with a color and a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HolidaySpec {
    Color(String),
    Labeled {
        color: String,
        #[serde(default)]
        label: Option<String>,
    },
}

impl HolidaySpec {
    fn into_holiday(self) -> Holiday {
        match self {
            HolidaySpec::Color(color) => Holiday {
                color: color.into(),
                label: None,
            },
            HolidaySpec::Labeled { color, label } => Holiday {
                color: color.into(),
                label,
            },
        }
    }
}

impl From<&str> for HolidaySpec {
    fn from(color: &str) -> Self {
        HolidaySpec::Color(color.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holiday {
    pub color: ColorToken,
    pub label: Option<String>,
}

/// How today's cell is highlighted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TodayMarker {
    /// Use the theme's today colors.
    #[default]
    Theme,
    Color(ColorToken),
    Hidden,
}

impl FromStr for TodayMarker {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" => Err(Error::new(ErrorKind::InvalidConfig, "empty today color")),
            "none" => Ok(TodayMarker::Hidden),
            "theme" | "default" => Ok(TodayMarker::Theme),
            color => Ok(TodayMarker::Color(color.into())),
        }
    }
}

impl fmt::Display for TodayMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodayMarker::Theme => write!(f, "theme"),
            TodayMarker::Color(color) => write!(f, "{}", color),
            TodayMarker::Hidden => write!(f, "none"),
        }
    }
}

/// Every recognized calendar option, as read from a config file or the
/// command line. Nothing here is validated yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalendarOptions {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub months: Option<i64>,
    pub week_start: Option<String>,
    pub show_week_numbers: Option<bool>,
    pub day_colors: Option<HashMap<String, String>>,
    pub holidays: Option<HashMap<String, HolidaySpec>>,
    pub language: Option<String>,
    pub selected_date: Option<String>,
    pub selected_range: Option<[String; 2]>,
    pub select_mode: Option<String>,
    pub theme: Option<String>,
    pub theme_dir: Option<PathBuf>,
    pub today_color: Option<String>,
    pub date_format: Option<String>,
    pub grid_layout: Option<[usize; 2]>,
    pub show_month_headers: Option<bool>,
    pub show_navigation: Option<bool>,
}

impl FromStr for CalendarOptions {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

impl CalendarOptions {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        content
            .parse()
            .map_err(|e: Error| e.with_msg(&format!("in '{}'", path.display())))
    }

    /// Options from `other` win over the ones already set.
    pub fn overlay(self, other: CalendarOptions) -> Self {
        CalendarOptions {
            year: other.year.or(self.year),
            month: other.month.or(self.month),
            months: other.months.or(self.months),
            week_start: other.week_start.or(self.week_start),
            show_week_numbers: other.show_week_numbers.or(self.show_week_numbers),
            day_colors: other.day_colors.or(self.day_colors),
            holidays: other.holidays.or(self.holidays),
            language: other.language.or(self.language),
            selected_date: other.selected_date.or(self.selected_date),
            selected_range: other.selected_range.or(self.selected_range),
            select_mode: other.select_mode.or(self.select_mode),
            theme: other.theme.or(self.theme),
            theme_dir: other.theme_dir.or(self.theme_dir),
            today_color: other.today_color.or(self.today_color),
            date_format: other.date_format.or(self.date_format),
            grid_layout: other.grid_layout.or(self.grid_layout),
            show_month_headers: other.show_month_headers.or(self.show_month_headers),
            show_navigation: other.show_navigation.or(self.show_navigation),
        }
    }

    /// Validate everything and produce an immutable configuration. `today`
    /// fills in a missing year/month.
    pub fn validate(&self, today: NaiveDate) -> Result<CalendarConfiguration> {
        let today_idx = MonthIndex::from(today);
        let anchor = MonthIndex::from_ym(
            self.year.unwrap_or_else(|| today_idx.year()),
            self.month.unwrap_or_else(|| today_idx.number()),
        )?;

        let week_start = match &self.week_start {
            Some(s) => s.parse()?,
            None => WeekStart::default(),
        };

        let select_mode = match &self.select_mode {
            Some(s) => s.parse()?,
            None => SelectMode::default(),
        };

        let selection = match (&self.selected_date, &self.selected_range) {
            (Some(_), Some(_)) => {
                return Err(Error::new(
                    ErrorKind::InvalidConfig,
                    "only one of selected_date and selected_range may be set",
                ))
            }
            (Some(date), None) => Selection::Date(parse_iso_date(date)?),
            (None, Some([start, end])) => {
                Selection::range(parse_iso_date(start)?, parse_iso_date(end)?)
            }
            (None, None) => Selection::Nothing,
        };

        let theme = CalendarTheme::named(
            self.theme.as_deref().unwrap_or("light"),
            self.theme_dir.as_deref(),
        )?;

        let date_format = self
            .date_format
            .clone()
            .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_owned());
        validate_date_format(&date_format)?;

        let grid_layout = match self.grid_layout {
            Some([rows, cols]) if rows == 0 || cols == 0 => {
                return Err(Error::new(
                    ErrorKind::InvalidConfig,
                    "grid layout needs at least one row and one column",
                ))
            }
            Some([rows, cols]) => Some((rows, cols)),
            None => None,
        };

        Ok(CalendarConfiguration {
            anchor,
            months: validate_months(self.months.unwrap_or(1))?,
            week_start,
            show_week_numbers: self.show_week_numbers.unwrap_or(false),
            day_colors: parse_day_colors(self.day_colors.as_ref())?,
            holidays: parse_holidays(self.holidays.as_ref())?,
            language: self
                .language
                .clone()
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned()),
            selection,
            select_mode,
            today,
            theme,
            theme_dir: self.theme_dir.clone(),
            today_marker: match &self.today_color {
                Some(s) => s.parse()?,
                None => TodayMarker::Theme,
            },
            date_format,
            grid_layout,
            show_month_headers: self.show_month_headers.unwrap_or(true),
            show_navigation: self.show_navigation.unwrap_or(true),
        })
    }
}

/// Validated configuration. Owned by the controller and replaced as a whole
/// on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarConfiguration {
    pub(crate) anchor: MonthIndex,
    pub(crate) months: usize,
    pub(crate) week_start: WeekStart,
    pub(crate) show_week_numbers: bool,
    pub(crate) day_colors: HashMap<Weekday, ColorToken>,
    pub(crate) holidays: BTreeMap<NaiveDate, Holiday>,
    pub(crate) language: String,
    pub(crate) selection: Selection,
    pub(crate) select_mode: SelectMode,
    pub(crate) today: NaiveDate,
    pub(crate) theme: CalendarTheme,
    pub(crate) theme_dir: Option<PathBuf>,
    pub(crate) today_marker: TodayMarker,
    pub(crate) date_format: String,
    pub(crate) grid_layout: Option<(usize, usize)>,
    pub(crate) show_month_headers: bool,
    pub(crate) show_navigation: bool,
}

impl CalendarConfiguration {
    /// Defaults around `today`.
    pub fn new(today: NaiveDate) -> Self {
        CalendarConfiguration {
            anchor: MonthIndex::from(today),
            months: 1,
            week_start: WeekStart::default(),
            show_week_numbers: false,
            day_colors: HashMap::new(),
            holidays: BTreeMap::new(),
            language: DEFAULT_LANGUAGE.to_owned(),
            selection: Selection::Nothing,
            select_mode: SelectMode::default(),
            today,
            theme: CalendarTheme::default(),
            theme_dir: None,
            today_marker: TodayMarker::Theme,
            date_format: DEFAULT_DATE_FORMAT.to_owned(),
            grid_layout: None,
            show_month_headers: true,
            show_navigation: true,
        }
    }

    pub fn anchor(&self) -> MonthIndex {
        self.anchor
    }

    pub fn months(&self) -> usize {
        self.months
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn show_week_numbers(&self) -> bool {
        self.show_week_numbers
    }

    pub fn day_colors(&self) -> &HashMap<Weekday, ColorToken> {
        &self.day_colors
    }

    pub fn holidays(&self) -> &BTreeMap<NaiveDate, Holiday> {
        &self.holidays
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selection.date()
    }

    pub fn select_mode(&self) -> SelectMode {
        self.select_mode
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn theme(&self) -> &CalendarTheme {
        &self.theme
    }

    /// Extra directory searched for theme files.
    pub fn theme_dir(&self) -> Option<&Path> {
        self.theme_dir.as_deref()
    }

    pub fn today_marker(&self) -> &TodayMarker {
        &self.today_marker
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    pub fn grid_layout(&self) -> Option<(usize, usize)> {
        self.grid_layout
    }

    pub fn show_month_headers(&self) -> bool {
        self.show_month_headers
    }

    pub fn show_navigation(&self) -> bool {
        self.show_navigation
    }

    /// Whether the year is printed before the month name in headers,
    /// derived from the position of `%Y` in the date format.
    pub fn year_first(&self) -> bool {
        let year = match self.date_format.find("%Y") {
            Some(pos) => pos,
            None => return true,
        };

        let before = |item: &str| self.date_format.find(item).map_or(false, |pos| year < pos);
        before("%m") || before("%d")
    }

    /// Format a date with the configured date format.
    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }
}

pub fn validate_months(months: i64) -> Result<usize> {
    if months < 1 {
        Err(Error::new(
            ErrorKind::InvalidConfig,
            &format!("months must be at least 1, got {}", months),
        ))
    } else {
        Ok(months as usize)
    }
}

pub fn validate_date_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        Err(Error::new(
            ErrorKind::InvalidConfig,
            &format!("'{}' is not a valid date format", format),
        ))
    } else {
        Ok(())
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DEFAULT_DATE_FORMAT)
        .map_err(|e| Error::from(e).with_msg(&format!("'{}' is not a YYYY-MM-DD date", s)))
}

pub fn parse_day_colors(
    day_colors: Option<&HashMap<String, String>>,
) -> Result<HashMap<Weekday, ColorToken>> {
    day_colors
        .into_iter()
        .flatten()
        .map(|(name, color)| {
            let weekday = name.parse::<Weekday>().map_err(|_| {
                Error::new(
                    ErrorKind::InvalidConfig,
                    &format!("'{}' is not a weekday name", name),
                )
            })?;
            Ok((weekday, ColorToken::from(color.as_str())))
        })
        .collect()
}

pub fn parse_holidays(
    holidays: Option<&HashMap<String, HolidaySpec>>,
) -> Result<BTreeMap<NaiveDate, Holiday>> {
    holidays
        .into_iter()
        .flatten()
        .map(|(key, spec)| Ok((parse_iso_date(key)?, spec.clone().into_holiday())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn defaults_follow_today() {
        let config = CalendarOptions::default().validate(date(2024, 7, 9)).unwrap();
        assert_eq!(config.anchor(), MonthIndex::from_ym(2024, 7).unwrap());
        assert_eq!(config.months(), 1);
        assert_eq!(config.week_start(), WeekStart::Sunday);
        assert_eq!(config.language(), "en");
        assert_eq!(config.theme().name, "light");
        assert_eq!(config.selection(), Selection::Nothing);
        assert!(config.show_month_headers());
        assert_eq!(config, CalendarConfiguration::new(date(2024, 7, 9)));
    }

    #[test]
    fn parses_full_toml() {
        let options: CalendarOptions = r##"
            year = 2024
            month = 12
            months = 3
            week_start = "Monday"
            show_week_numbers = true
            language = "ja"
            selected_date = "2024-12-24"
            theme = "dark"
            today_color = "none"
            date_format = "%d.%m.%Y"

            [day_colors]
            Sunday = "red"
            saturday = "blue"

            [holidays]
            "2024-12-25" = "#ff0000"
            "2025-01-01" = { color = "#00ff00", label = "New Year" }
        "##
        .parse()
        .unwrap();

        let config = options.validate(date(2024, 1, 1)).unwrap();
        assert_eq!(config.anchor(), MonthIndex::from_ym(2024, 12).unwrap());
        assert_eq!(config.months(), 3);
        assert_eq!(config.week_start(), WeekStart::Monday);
        assert_eq!(config.day_colors()[&Weekday::Sun].as_str(), "red");
        assert_eq!(config.day_colors()[&Weekday::Sat].as_str(), "blue");
        assert_eq!(
            config.holidays()[&date(2025, 1, 1)].label.as_deref(),
            Some("New Year")
        );
        assert_eq!(config.holidays()[&date(2024, 12, 25)].label, None);
        assert_eq!(config.selected_date(), Some(date(2024, 12, 24)));
        assert_eq!(config.today_marker(), &TodayMarker::Hidden);
        assert!(!config.year_first());
        assert_eq!(config.format_date(date(2024, 3, 5)), "05.03.2024");
    }

    #[test]
    fn malformed_holiday_is_a_format_error() {
        let mut holidays = HashMap::new();
        holidays.insert("2024/12/25".to_owned(), HolidaySpec::from("red"));
        let options = CalendarOptions {
            holidays: Some(holidays),
            ..Default::default()
        };

        assert!(options
            .validate(date(2024, 1, 1))
            .unwrap_err()
            .is_invalid_date_format());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let today = date(2024, 1, 1);
        let check = |options: CalendarOptions| options.validate(today).unwrap_err();

        assert!(check(CalendarOptions {
            months: Some(0),
            ..Default::default()
        })
        .is_invalid_config());
        assert!(check(CalendarOptions {
            week_start: Some("Wednesday".to_owned()),
            ..Default::default()
        })
        .is_invalid_config());
        assert!(check(CalendarOptions {
            month: Some(13),
            ..Default::default()
        })
        .is_invalid_date());
        assert!(check(CalendarOptions {
            date_format: Some("%Q".to_owned()),
            ..Default::default()
        })
        .is_invalid_config());

        let mut day_colors = HashMap::new();
        day_colors.insert("Funday".to_owned(), "red".to_owned());
        assert!(check(CalendarOptions {
            day_colors: Some(day_colors),
            ..Default::default()
        })
        .is_invalid_config());
    }

    #[test]
    fn unknown_fields_fail_parsing() {
        let err = "weekstart = \"Monday\"".parse::<CalendarOptions>().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ConfigParse));
    }

    #[test]
    fn overlay_prefers_later_values() {
        let file = CalendarOptions {
            months: Some(2),
            language: Some("de".to_owned()),
            ..Default::default()
        };
        let cli = CalendarOptions {
            months: Some(4),
            ..Default::default()
        };

        let merged = file.overlay(cli);
        assert_eq!(merged.months, Some(4));
        assert_eq!(merged.language.as_deref(), Some("de"));
    }

    #[test]
    fn year_first_detection() {
        let mut config = CalendarConfiguration::new(date(2024, 1, 1));
        assert!(config.year_first());
        config.date_format = "%m/%d/%Y".to_owned();
        assert!(!config.year_first());
        config.date_format = "%d.%m".to_owned();
        assert!(config.year_first());
    }
}
