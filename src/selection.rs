use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectMode {
    #[default]
    Single,
    Range,
}

impl FromStr for SelectMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(SelectMode::Single),
            "range" => Ok(SelectMode::Range),
            _ => Err(Error::new(
                ErrorKind::InvalidConfig,
                &format!("select mode must be 'single' or 'range', got '{}'", s),
            )),
        }
    }
}

impl fmt::Display for SelectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectMode::Single => write!(f, "single"),
            SelectMode::Range => write!(f, "range"),
        }
    }
}

/// How a date takes part in the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// The selected date, or either end of a range.
    Edge,
    /// Strictly between the ends of a range.
    Interior,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Nothing,
    Date(NaiveDate),
    Range(NaiveDate, NaiveDate),
}

impl Selection {
    /// Range with ends in chronological order.
    pub fn range(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Selection::Range(a, b)
        } else {
            Selection::Range(b, a)
        }
    }

    /// Selection after the user clicked `date`.
    ///
    /// In range mode the first click opens a one-day range, later clicks
    /// extend it: a date before the start becomes the new start (and the old
    /// start the end), any other date becomes the end.
    pub fn click(&self, mode: SelectMode, date: NaiveDate) -> Self {
        match mode {
            SelectMode::Single => Selection::Date(date),
            SelectMode::Range => match *self {
                Selection::Range(start, _) if date < start => Selection::Range(date, start),
                Selection::Range(start, _) => Selection::Range(start, date),
                _ => Selection::Range(date, date),
            },
        }
    }

    pub fn mark(&self, date: NaiveDate) -> Option<Mark> {
        match *self {
            Selection::Nothing => None,
            Selection::Date(d) if d == date => Some(Mark::Edge),
            Selection::Date(_) => None,
            Selection::Range(start, end) if date == start || date == end => Some(Mark::Edge),
            Selection::Range(start, end) if start < date && date < end => Some(Mark::Interior),
            Selection::Range(..) => None,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match *self {
            Selection::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match *self {
            Selection::Range(start, end) => Some((start, end)),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::Nothing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn single_click_replaces() {
        let sel = Selection::Nothing
            .click(SelectMode::Single, date(2024, 1, 15))
            .click(SelectMode::Single, date(2024, 1, 20));
        assert_eq!(sel, Selection::Date(date(2024, 1, 20)));
        assert_eq!(sel.mark(date(2024, 1, 20)), Some(Mark::Edge));
        assert_eq!(sel.mark(date(2024, 1, 15)), None);
    }

    #[test]
    fn range_clicks_extend() {
        let sel = Selection::Nothing.click(SelectMode::Range, date(2024, 1, 16));
        assert_eq!(sel, Selection::Range(date(2024, 1, 16), date(2024, 1, 16)));

        let sel = sel.click(SelectMode::Range, date(2024, 1, 19));
        assert_eq!(sel.bounds(), Some((date(2024, 1, 16), date(2024, 1, 19))));
    }

    #[test]
    fn range_click_before_start() {
        let sel = Selection::Nothing
            .click(SelectMode::Range, date(2024, 1, 19))
            .click(SelectMode::Range, date(2024, 1, 16));
        assert_eq!(sel.bounds(), Some((date(2024, 1, 16), date(2024, 1, 19))));
    }

    #[test]
    fn range_marks() {
        let sel = Selection::range(date(2024, 1, 20), date(2024, 1, 10));
        assert_eq!(sel.mark(date(2024, 1, 10)), Some(Mark::Edge));
        assert_eq!(sel.mark(date(2024, 1, 15)), Some(Mark::Interior));
        assert_eq!(sel.mark(date(2024, 1, 20)), Some(Mark::Edge));
        assert_eq!(sel.mark(date(2024, 1, 21)), None);
    }

    #[test]
    fn select_mode_parsing() {
        assert_eq!("Range".parse::<SelectMode>().unwrap(), SelectMode::Range);
        assert!("multi".parse::<SelectMode>().unwrap_err().is_invalid_config());
    }
}
