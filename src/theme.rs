use derive_more::{Display, From};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, ErrorKind, Result};

/// Opaque color value handed through to the renderer ("#ffffff", "red", ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
pub struct ColorToken(String);

impl ColorToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColorToken {
    fn from(s: &str) -> Self {
        ColorToken(s.to_owned())
    }
}

/// Background/foreground pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swatch {
    pub bg: ColorToken,
    pub fg: ColorToken,
}

impl Swatch {
    pub fn new<B: Into<ColorToken>, F: Into<ColorToken>>(bg: B, fg: F) -> Self {
        Swatch {
            bg: bg.into(),
            fg: fg.into(),
        }
    }
}

/// Named palette the style resolver picks colors from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalendarTheme {
    #[serde(default)]
    pub name: String,
    pub background: ColorToken,
    pub month_header: Swatch,
    pub day_header: Swatch,
    pub week_number: Swatch,
    pub navigation: Swatch,
    pub day: Swatch,
    pub selected: Swatch,
    pub range: Swatch,
    pub today: Swatch,
    pub weekend: Swatch,
    pub adjacent_day: Swatch,
}

static LIGHT: Lazy<CalendarTheme> = Lazy::new(|| CalendarTheme {
    name: "light".to_owned(),
    background: "#ffffff".into(),
    month_header: Swatch::new("#f0f0f0", "#333333"),
    day_header: Swatch::new("#e0e0e0", "#333333"),
    week_number: Swatch::new("#f0f0f0", "#666666"),
    navigation: Swatch::new("#f0f0f0", "#333333"),
    day: Swatch::new("#ffffff", "#333333"),
    selected: Swatch::new("#0078d4", "#ffffff"),
    range: Swatch::new("#cce4f7", "#333333"),
    today: Swatch::new("#fff4ce", "#333333"),
    weekend: Swatch::new("#f8f8f8", "#c42b1c"),
    adjacent_day: Swatch::new("#ffffff", "#aaaaaa"),
});

static DARK: Lazy<CalendarTheme> = Lazy::new(|| CalendarTheme {
    name: "dark".to_owned(),
    background: "#202020".into(),
    month_header: Swatch::new("#2b2b2b", "#ffffff"),
    day_header: Swatch::new("#333333", "#d0d0d0"),
    week_number: Swatch::new("#2b2b2b", "#999999"),
    navigation: Swatch::new("#2b2b2b", "#ffffff"),
    day: Swatch::new("#202020", "#ffffff"),
    selected: Swatch::new("#4cc2ff", "#000000"),
    range: Swatch::new("#1f3a52", "#ffffff"),
    today: Swatch::new("#5c4d1a", "#ffffff"),
    weekend: Swatch::new("#262626", "#ff99a4"),
    adjacent_day: Swatch::new("#202020", "#666666"),
});

impl Default for CalendarTheme {
    fn default() -> Self {
        LIGHT.clone()
    }
}

impl CalendarTheme {
    pub const BUILTIN: &'static [&'static str] = &["light", "dark"];

    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "light" => Some(LIGHT.clone()),
            "dark" => Some(DARK.clone()),
            _ => None,
        }
    }

    /// Look up a built-in theme, or one from `theme_dir` if given.
    pub fn named(name: &str, theme_dir: Option<&Path>) -> Result<Self> {
        if let Some(theme) = Self::builtin(name) {
            return Ok(theme);
        }

        if let Some(dir) = theme_dir {
            let path = dir.join(format!("{}.toml", name));
            if path.exists() {
                return Self::load(&path);
            }
        }

        let mut known: Vec<String> = Self::BUILTIN.iter().map(|s| s.to_string()).collect();
        if let Some(dir) = theme_dir {
            known.extend(themes_in(dir).into_keys());
        }

        Err(Error::new(
            ErrorKind::UnknownTheme,
            &format!("'{}' (available: {})", name, known.join(", ")),
        ))
    }

    /// Load a theme from a TOML file; the file stem names the theme unless
    /// the file sets `name` itself.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut theme: CalendarTheme = toml::from_str(&content).map_err(|e| {
            Error::new(ErrorKind::ConfigParse, &format!("{}: {}", path.display(), e))
        })?;

        if theme.name.is_empty() {
            theme.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }

        Ok(theme)
    }
}

/// All loadable themes in a directory, keyed by name. Malformed files are
/// skipped.
pub fn themes_in(dir: &Path) -> BTreeMap<String, CalendarTheme> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Unable to read theme directory '{}': {}", dir.display(), e);
            return BTreeMap::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map_or(false, |ext| ext == "toml"))
        .filter_map(|path| match CalendarTheme::load(&path) {
            Ok(theme) => Some((theme.name.clone(), theme)),
            Err(e) => {
                log::warn!("Skipping theme '{}': {}", path.display(), e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_themes_resolve() {
        assert_eq!(CalendarTheme::named("light", None).unwrap().name, "light");
        assert_eq!(CalendarTheme::named("dark", None).unwrap().name, "dark");
        assert_eq!(CalendarTheme::default(), CalendarTheme::builtin("light").unwrap());
    }

    #[test]
    fn unknown_theme_lists_alternatives() {
        let err = CalendarTheme::named("solarized", None).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnknownTheme));
        assert!(err.to_string().contains("light, dark"));
    }

    #[test]
    fn theme_from_toml() {
        let theme: CalendarTheme = toml::from_str(
            r##"
            name = "paper"
            background = "#fafafa"
            month_header = { bg = "#eeeeee", fg = "#111111" }
            day_header = { bg = "#eeeeee", fg = "#111111" }
            week_number = { bg = "#eeeeee", fg = "#777777" }
            navigation = { bg = "#eeeeee", fg = "#111111" }
            day = { bg = "#fafafa", fg = "#111111" }
            selected = { bg = "#222222", fg = "#fafafa" }
            range = { bg = "#dddddd", fg = "#111111" }
            today = { bg = "#ffe9a8", fg = "#111111" }
            weekend = { bg = "#fafafa", fg = "#aa0000" }
            adjacent_day = { bg = "#fafafa", fg = "#bbbbbb" }
            "##,
        )
        .unwrap();

        assert_eq!(theme.name, "paper");
        assert_eq!(theme.selected.bg.as_str(), "#222222");
    }
}
