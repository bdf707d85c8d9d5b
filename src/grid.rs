use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};
use crate::month::MonthIndex;
use crate::style::CellStyle;

pub const DAYS_PER_WEEK: usize = 7;

/// Which weekday occupies the first column of every week row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn first_weekday(&self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }

    /// Column (0-based) a weekday is displayed in.
    pub fn column_of(&self, weekday: Weekday) -> usize {
        match self {
            WeekStart::Sunday => weekday.num_days_from_sunday() as usize,
            WeekStart::Monday => weekday.num_days_from_monday() as usize,
        }
    }

    /// Weekdays in display column order.
    pub fn weekdays(&self) -> [Weekday; DAYS_PER_WEEK] {
        let mut days = [Weekday::Mon; DAYS_PER_WEEK];
        let mut day = self.first_weekday();
        for slot in days.iter_mut() {
            *slot = day;
            day = day.succ();
        }
        days
    }
}

impl FromStr for WeekStart {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            "monday" | "mon" => Ok(WeekStart::Monday),
            _ => Err(Error::new(
                ErrorKind::InvalidConfig,
                &format!("week start must be 'Sunday' or 'Monday', got '{}'", s),
            )),
        }
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekStart::Sunday => write!(f, "Sunday"),
            WeekStart::Monday => write!(f, "Monday"),
        }
    }
}

/// One visible day square.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    date: NaiveDate,
    in_month: bool,
    column: usize,
    style: Option<CellStyle>,
    holiday: Option<String>,
}

impl DayCell {
    pub fn new(date: NaiveDate, in_month: bool, column: usize) -> Self {
        DayCell {
            date,
            in_month,
            column,
            style: None,
            holiday: None,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// `false` for overflow days borrowed from a neighbouring month.
    pub fn in_month(&self) -> bool {
        self.in_month
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    pub fn text(&self) -> String {
        self.date.day().to_string()
    }

    /// `None` until the cell went through the style resolver.
    pub fn style(&self) -> Option<&CellStyle> {
        self.style.as_ref()
    }

    pub fn is_today(&self) -> bool {
        self.style.as_ref().map_or(false, |s| s.is_today())
    }

    pub fn holiday_label(&self) -> Option<&str> {
        self.holiday.as_deref()
    }

    pub(crate) fn styled(mut self, style: CellStyle, holiday: Option<String>) -> Self {
        self.style = Some(style);
        self.holiday = holiday;
        self
    }
}

/// Exactly seven cells and the ISO week they show.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekRow {
    cells: Vec<DayCell>,
    week_number: Option<u32>,
}

impl WeekRow {
    fn new(cells: Vec<DayCell>) -> Self {
        debug_assert_eq!(cells.len(), DAYS_PER_WEEK);

        // ISO weeks run Monday to Sunday, so the row's Monday decides the
        // number no matter which column it is displayed in.
        let week_number = cells
            .iter()
            .find(|cell| cell.weekday() == Weekday::Mon)
            .map(|cell| cell.date.iso_week().week());

        WeekRow { cells, week_number }
    }

    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    pub fn week_number(&self) -> Option<u32> {
        self.week_number
    }

    pub fn first(&self) -> NaiveDate {
        self.cells[0].date
    }

    pub(crate) fn hide_week_number(&mut self) {
        self.week_number = None;
    }

    pub(crate) fn map_cells<F>(self, f: F) -> Self
    where
        F: FnMut(DayCell) -> DayCell,
    {
        WeekRow {
            cells: self.cells.into_iter().map(f).collect(),
            week_number: self.week_number,
        }
    }
}

/// Localized header texts of a month panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthHeader {
    pub month_name: String,
    pub short_month_name: String,
    pub weekday_names: Vec<String>,
    pub short_weekday_names: Vec<String>,
    pub year_first: bool,
}

impl MonthHeader {
    /// Title line, e.g. "Mar 2024" or "2024 Mar" depending on the date format.
    pub fn title(&self, year: i32) -> String {
        if self.year_first {
            format!("{} {}", year, self.short_month_name)
        } else {
            format!("{} {}", self.short_month_name, year)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    month: MonthIndex,
    week_start: WeekStart,
    header: Option<MonthHeader>,
    rows: Vec<WeekRow>,
}

impl MonthGrid {
    pub fn month(&self) -> MonthIndex {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.month.year()
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn header(&self) -> Option<&MonthHeader> {
        self.header.as_ref()
    }

    pub fn rows(&self) -> &[WeekRow] {
        &self.rows
    }

    pub fn cells(&self) -> impl Iterator<Item = &DayCell> {
        self.rows.iter().flat_map(|row| row.cells.iter())
    }

    /// Cells belonging to the displayed month, in date order.
    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.cells().filter(|cell| cell.in_month)
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell> {
        self.cells().find(|cell| cell.date == date)
    }

    pub(crate) fn with_header(mut self, header: MonthHeader) -> Self {
        self.header = Some(header);
        self
    }

    pub(crate) fn without_week_numbers(mut self) -> Self {
        self.rows.iter_mut().for_each(WeekRow::hide_week_number);
        self
    }

    pub(crate) fn map_cells<F>(self, mut f: F) -> Self
    where
        F: FnMut(DayCell) -> DayCell,
    {
        MonthGrid {
            rows: self
                .rows
                .into_iter()
                .map(|row| row.map_cells(&mut f))
                .collect(),
            ..self
        }
    }
}

/// Lay out one month as complete week rows.
///
/// Only structure is computed here: headers and styles are attached later.
pub fn generate(year: i32, month: u32, week_start: WeekStart) -> Result<MonthGrid> {
    let idx = MonthIndex::from_ym(year, month)?;
    generate_index(idx, week_start)
}

pub(crate) fn generate_index(idx: MonthIndex, week_start: WeekStart) -> Result<MonthGrid> {
    idx.validate()?;

    let first = idx.first_day()?;
    let days = idx.days()? as usize;
    let offset = week_start.column_of(first.weekday());
    let start = first - Duration::days(offset as i64);

    let num_cells = (offset + days + DAYS_PER_WEEK - 1) / DAYS_PER_WEEK * DAYS_PER_WEEK;

    let cells: Vec<DayCell> = (0..num_cells)
        .map(|i| {
            let date = start + Duration::days(i as i64);
            DayCell::new(date, idx.contains(&date), i % DAYS_PER_WEEK)
        })
        .collect();

    let rows = cells
        .chunks(DAYS_PER_WEEK)
        .map(|row| WeekRow::new(row.to_vec()))
        .collect();

    log::trace!("generated {} ({} start)", idx, week_start);

    Ok(MonthGrid {
        month: idx,
        week_start,
        header: None,
        rows,
    })
}
