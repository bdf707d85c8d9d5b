use chrono::{Month, Weekday};
use phf::phf_map;
use std::collections::HashMap;

use crate::grid::{WeekStart, DAYS_PER_WEEK};

pub const DEFAULT_LANGUAGE: &str = "en";

const SHORT_NAME_LEN: usize = 3;

const MONTH_KEYS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Translation lookup service. Keys are the English month and weekday names.
pub trait Translator {
    fn lookup(&self, language: &str, key: &str) -> Option<String>;
}

static EN: phf::Map<&'static str, &'static str> = phf_map! {
    "January" => "January", "February" => "February", "March" => "March",
    "April" => "April", "May" => "May", "June" => "June",
    "July" => "July", "August" => "August", "September" => "September",
    "October" => "October", "November" => "November", "December" => "December",
    "Monday" => "Monday", "Tuesday" => "Tuesday", "Wednesday" => "Wednesday",
    "Thursday" => "Thursday", "Friday" => "Friday", "Saturday" => "Saturday",
    "Sunday" => "Sunday",
};

static JA: phf::Map<&'static str, &'static str> = phf_map! {
    "January" => "1月", "February" => "2月", "March" => "3月",
    "April" => "4月", "May" => "5月", "June" => "6月",
    "July" => "7月", "August" => "8月", "September" => "9月",
    "October" => "10月", "November" => "11月", "December" => "12月",
    "Monday" => "月曜日", "Tuesday" => "火曜日", "Wednesday" => "水曜日",
    "Thursday" => "木曜日", "Friday" => "金曜日", "Saturday" => "土曜日",
    "Sunday" => "日曜日",
};

static DE: phf::Map<&'static str, &'static str> = phf_map! {
    "January" => "Januar", "February" => "Februar", "March" => "März",
    "April" => "April", "May" => "Mai", "June" => "Juni",
    "July" => "Juli", "August" => "August", "September" => "September",
    "October" => "Oktober", "November" => "November", "December" => "Dezember",
    "Monday" => "Montag", "Tuesday" => "Dienstag", "Wednesday" => "Mittwoch",
    "Thursday" => "Donnerstag", "Friday" => "Freitag", "Saturday" => "Samstag",
    "Sunday" => "Sonntag",
};

static FR: phf::Map<&'static str, &'static str> = phf_map! {
    "January" => "janvier", "February" => "février", "March" => "mars",
    "April" => "avril", "May" => "mai", "June" => "juin",
    "July" => "juillet", "August" => "août", "September" => "septembre",
    "October" => "octobre", "November" => "novembre", "December" => "décembre",
    "Monday" => "lundi", "Tuesday" => "mardi", "Wednesday" => "mercredi",
    "Thursday" => "jeudi", "Friday" => "vendredi", "Saturday" => "samedi",
    "Sunday" => "dimanche",
};

fn builtin(language: &str) -> Option<&'static phf::Map<&'static str, &'static str>> {
    match language {
        "en" => Some(&EN),
        "ja" => Some(&JA),
        "de" => Some(&DE),
        "fr" => Some(&FR),
        _ => None,
    }
}

/// "ja_JP.UTF-8" -> ["ja_JP.UTF-8", "ja"]
fn candidates(language: &str) -> Vec<&str> {
    let mut langs = vec![language];
    if let Some(short) = language.split(|c| c == '_' || c == '-' || c == '.').next() {
        if short != language && !short.is_empty() {
            langs.push(short);
        }
    }
    langs
}

/// Built-in month/weekday names plus user registered dictionaries, which
/// take precedence.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    user: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<K, V, I>(&mut self, language: &str, entries: I)
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.user
            .entry(language.to_owned())
            .or_default()
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    pub fn clear(&mut self, language: &str) {
        self.user.remove(language);
    }

    pub fn languages(&self) -> Vec<String> {
        let mut langs: Vec<String> = ["en", "ja", "de", "fr"]
            .iter()
            .map(|s| s.to_string())
            .chain(self.user.keys().cloned())
            .collect();
        langs.sort();
        langs.dedup();
        langs
    }
}

impl Translator for Catalog {
    fn lookup(&self, language: &str, key: &str) -> Option<String> {
        candidates(language).into_iter().find_map(|lang| {
            self.user
                .get(lang)
                .and_then(|dict| dict.get(key).cloned())
                .or_else(|| builtin(lang).and_then(|m| m.get(key)).map(|s| s.to_string()))
        })
    }
}

/// Localized names, weekdays already in display column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub month_names: [String; 12],
    pub weekday_names: [String; DAYS_PER_WEEK],
}

impl Labels {
    pub fn month_name(&self, month: Month) -> &str {
        &self.month_names[month.number_from_month() as usize - 1]
    }

    pub fn short_month_name(&self, month: Month) -> String {
        shorten(self.month_name(month))
    }

    pub fn short_weekday_names(&self) -> Vec<String> {
        self.weekday_names.iter().map(|n| shorten(n)).collect()
    }
}

/// First three characters of a translated name.
pub fn shorten(name: &str) -> String {
    name.chars().take(SHORT_NAME_LEN).collect()
}

fn weekday_key(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Resolve month and weekday names for `language`.
///
/// Missing entries fall back to the default language and finally to the
/// English key itself, so this never fails.
pub fn labels_for<T: Translator + ?Sized>(
    translator: &T,
    language: &str,
    week_start: WeekStart,
) -> Labels {
    let mut misses = 0;
    let mut translate = |key: &str| -> String {
        translator.lookup(language, key).unwrap_or_else(|| {
            misses += 1;
            translator
                .lookup(DEFAULT_LANGUAGE, key)
                .unwrap_or_else(|| key.to_owned())
        })
    };

    let month_names: [String; 12] = std::array::from_fn(|i| translate(MONTH_KEYS[i]));
    let weekdays = week_start.weekdays();
    let weekday_names: [String; DAYS_PER_WEEK] =
        std::array::from_fn(|i| translate(weekday_key(weekdays[i])));

    if misses > 0 {
        log::warn!(
            "{} labels missing for language '{}', using '{}'",
            misses,
            language,
            DEFAULT_LANGUAGE
        );
    }

    Labels {
        month_names,
        weekday_names,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_sunday_start() {
        let labels = labels_for(&Catalog::new(), "en", WeekStart::Sunday);
        assert_eq!(labels.weekday_names[0], "Sunday");
        assert_eq!(labels.weekday_names[6], "Saturday");
        assert_eq!(labels.month_name(Month::February), "February");
        assert_eq!(labels.short_weekday_names()[1], "Mon");
    }

    #[test]
    fn monday_start_reorders_weekdays() {
        let labels = labels_for(&Catalog::new(), "de", WeekStart::Monday);
        assert_eq!(labels.weekday_names[0], "Montag");
        assert_eq!(labels.weekday_names[6], "Sonntag");
        assert_eq!(labels.short_month_name(Month::March), "Mär");
    }

    #[test]
    fn unknown_language_falls_back() {
        let catalog = Catalog::new();
        let labels = labels_for(&catalog, "xx", WeekStart::Sunday);
        assert_eq!(labels, labels_for(&catalog, "en", WeekStart::Sunday));
    }

    #[test]
    fn region_codes_use_base_language() {
        let labels = labels_for(&Catalog::new(), "ja_JP", WeekStart::Monday);
        assert_eq!(labels.month_name(Month::January), "1月");
        assert_eq!(labels.weekday_names[0], "月曜日");
    }

    #[test]
    fn registered_entries_override_and_fill() {
        let mut catalog = Catalog::new();
        catalog.register("eo", vec![("January", "januaro"), ("Monday", "lundo")]);

        let labels = labels_for(&catalog, "eo", WeekStart::Monday);
        assert_eq!(labels.month_names[0], "januaro");
        assert_eq!(labels.weekday_names[0], "lundo");
        // everything else comes from the default language
        assert_eq!(labels.month_names[1], "February");
        assert!(catalog.languages().contains(&"eo".to_owned()));

        catalog.clear("eo");
        assert_eq!(catalog.lookup("eo", "January"), None);
    }

    #[test]
    fn shorten_counts_characters() {
        assert_eq!(shorten("février"), "fév");
        assert_eq!(shorten("1月"), "1月");
    }
}
