use chrono::{Datelike, Month, NaiveDate};
use num_traits::FromPrimitive;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

use crate::error::{Error, ErrorKind, Result};

/// Smallest year the engine will lay out.
pub const MIN_YEAR: i32 = 1;
/// Largest year the engine will lay out.
pub const MAX_YEAR: i32 = 9999;

/// A (year, month) pair, the unit every grid and navigation step works in.
///
/// Arithmetic on `MonthIndex` never fails; whether the result is inside the
/// supported year range is checked by [`MonthIndex::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthIndex {
    index: Month,
    year: i32,
}

impl MonthIndex {
    pub fn new(index: Month, year: i32) -> Self {
        MonthIndex { index, year }
    }

    /// Build from a raw month number, failing for anything outside 1-12 or
    /// outside the supported year range.
    pub fn from_ym(year: i32, month: u32) -> Result<Self> {
        let index = Month::from_u32(month).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidDate,
                &format!("month {} is not within 1-12", month),
            )
        })?;

        let idx = MonthIndex { index, year };
        idx.validate()?;
        Ok(idx)
    }

    pub fn validate(&self) -> Result<()> {
        if (MIN_YEAR..=MAX_YEAR).contains(&self.year) {
            Ok(())
        } else {
            Err(Error::new(
                ErrorKind::InvalidDate,
                &format!(
                    "year {} is not within {}-{}",
                    self.year, MIN_YEAR, MAX_YEAR
                ),
            ))
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Month {
        self.index
    }

    /// Month number, 1-based.
    pub fn number(&self) -> u32 {
        self.index.number_from_month()
    }

    pub fn next(&self) -> Self {
        let next_month = self.index.succ();

        MonthIndex {
            index: next_month,
            year: if next_month == Month::January {
                self.year + 1
            } else {
                self.year
            },
        }
    }

    pub fn prev(&self) -> Self {
        let prev_month = self.index.pred();

        MonthIndex {
            index: prev_month,
            year: if prev_month == Month::December {
                self.year - 1
            } else {
                self.year
            },
        }
    }

    /// Move by `delta` months in either direction.
    pub fn shift(&self, delta: i32) -> Self {
        self.shift_wide(i64::from(delta))
    }

    fn shift_wide(&self, delta: i64) -> Self {
        Self::from_ordinal(self.ordinal().saturating_add(delta))
    }

    pub fn first_day(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.number(), 1).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidDate,
                &format!("{} cannot be represented", self),
            )
        })
    }

    pub fn last_day(&self) -> Result<NaiveDate> {
        let first = self.first_day()?;
        let days = self.days()?;
        Ok(first + chrono::Duration::days(days as i64 - 1))
    }

    pub fn days(&self) -> Result<u32> {
        let first = self.first_day()?;
        let next = self.next().first_day()?;
        Ok((next - first).num_days() as u32)
    }

    pub fn contains<T: Datelike>(&self, date: &T) -> bool {
        date.year() == self.year && date.month() == self.number()
    }

    fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + self.index.number_from_month() as i64 - 1
    }

    fn from_ordinal(ordinal: i64) -> Self {
        let year = ordinal
            .div_euclid(12)
            .clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        let month0 = ordinal.rem_euclid(12) as u32;

        MonthIndex {
            index: Month::from_u32(month0 + 1).unwrap_or(Month::January),
            year,
        }
    }
}

impl<T: Datelike> From<T> for MonthIndex {
    fn from(m: T) -> Self {
        MonthIndex {
            index: Month::from_u32(m.month()).unwrap_or(Month::January),
            year: m.year(),
        }
    }
}

impl Add<u32> for MonthIndex {
    type Output = MonthIndex;
    fn add(self, rhs: u32) -> Self::Output {
        self.shift_wide(i64::from(rhs))
    }
}

impl Sub<u32> for MonthIndex {
    type Output = MonthIndex;
    fn sub(self, rhs: u32) -> Self::Output {
        self.shift_wide(-i64::from(rhs))
    }
}

impl PartialOrd for MonthIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MonthIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl fmt::Display for MonthIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.number())
    }
}
