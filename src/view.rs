use chrono::{Datelike, Month};
use num_traits::FromPrimitive;

use crate::compose::{compose_index, grid_layout};
use crate::config::CalendarConfiguration;
use crate::error::Result;
use crate::grid::{MonthGrid, MonthHeader};
use crate::locale::{labels_for, Labels, Translator};
use crate::month::{MAX_YEAR, MIN_YEAR};
use crate::style;

/// Picker panels are laid out in rows of this many entries.
pub const PICKER_COLUMNS: usize = 4;
/// Number of years listed by the year picker.
pub const YEAR_RANGE_LEN: i32 = 12;
/// Years shown before the current one in the year picker.
const YEAR_RANGE_LEAD: i32 = 5;

fn header_from(labels: &Labels, month: Month, year_first: bool) -> MonthHeader {
    MonthHeader {
        month_name: labels.month_name(month).to_owned(),
        short_month_name: labels.short_month_name(month),
        weekday_names: labels.weekday_names.to_vec(),
        short_weekday_names: labels.short_weekday_names(),
        year_first,
    }
}

/// The immutable result of laying out a configuration: what a renderer
/// draws. Never patched, every change builds a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarView {
    months: Vec<MonthGrid>,
    config: CalendarConfiguration,
    layout: (usize, usize),
}

impl CalendarView {
    pub fn build<T: Translator + ?Sized>(
        config: &CalendarConfiguration,
        translator: &T,
    ) -> Result<Self> {
        let grids = compose_index(config.anchor(), config.months(), config.week_start())?;
        let labels = labels_for(translator, config.language(), config.week_start());

        let months = grids
            .into_iter()
            .map(|grid| {
                let header = header_from(&labels, grid.month().month(), config.year_first());
                let grid = grid
                    .with_header(header)
                    .map_cells(|cell| style::resolve(cell, config));
                if config.show_week_numbers() {
                    grid
                } else {
                    grid.without_week_numbers()
                }
            })
            .collect();

        Ok(CalendarView {
            months,
            config: config.clone(),
            layout: config
                .grid_layout()
                .unwrap_or_else(|| grid_layout(config.months())),
        })
    }

    /// Same grids and styles with headers in `config`'s language.
    pub fn relabel<T: Translator + ?Sized>(
        &self,
        config: &CalendarConfiguration,
        translator: &T,
    ) -> Self {
        let labels = labels_for(translator, config.language(), config.week_start());
        let months = self
            .months
            .iter()
            .cloned()
            .map(|grid| {
                let header = header_from(&labels, grid.month().month(), config.year_first());
                grid.with_header(header)
            })
            .collect();

        CalendarView {
            months,
            config: config.clone(),
            layout: self.layout,
        }
    }

    pub fn months(&self) -> &[MonthGrid] {
        &self.months
    }

    pub fn config(&self) -> &CalendarConfiguration {
        &self.config
    }

    /// Panel (rows, columns).
    pub fn layout(&self) -> (usize, usize) {
        self.layout
    }

    /// Month grids grouped into layout rows.
    pub fn panel_rows(&self) -> impl Iterator<Item = &[MonthGrid]> {
        self.months.chunks(self.layout.1.max(1))
    }
}

/// One entry of the month or year picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerCell {
    pub label: String,
    pub value: i32,
    /// The entry the calendar currently shows.
    pub current: bool,
    /// Contains today.
    pub today: bool,
}

/// The twelve months of a year, three rows of four.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearView {
    year: i32,
    title: String,
    cells: Vec<PickerCell>,
}

impl YearView {
    pub fn build<T: Translator + ?Sized>(
        year: i32,
        config: &CalendarConfiguration,
        translator: &T,
    ) -> Self {
        let labels = labels_for(translator, config.language(), config.week_start());
        let anchor = config.anchor();
        let today = config.today();

        let cells = (1..=12u32)
            .filter_map(Month::from_u32)
            .map(|month| {
                let number = month.number_from_month();
                PickerCell {
                    label: labels.short_month_name(month),
                    value: number as i32,
                    current: anchor.year() == year && anchor.number() == number,
                    today: today.year() == year && today.month() == number,
                }
            })
            .collect();

        YearView {
            year,
            title: year.to_string(),
            cells,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn cells(&self) -> &[PickerCell] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[PickerCell]> {
        self.cells.chunks(PICKER_COLUMNS)
    }
}

/// First year of the picker page around `year`, kept inside the supported
/// range.
pub fn year_range_start(year: i32) -> i32 {
    (year - YEAR_RANGE_LEAD).clamp(MIN_YEAR, MAX_YEAR - YEAR_RANGE_LEN + 1)
}

/// Twelve consecutive years to pick from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearRangeView {
    start: i32,
    cells: Vec<PickerCell>,
}

impl YearRangeView {
    pub fn build(start: i32, config: &CalendarConfiguration) -> Self {
        let start = start.clamp(MIN_YEAR, MAX_YEAR - YEAR_RANGE_LEN + 1);
        let current = config.anchor().year();
        let this_year = config.today().year();

        let cells = (start..start + YEAR_RANGE_LEN)
            .map(|year| PickerCell {
                label: year.to_string(),
                value: year,
                current: year == current,
                today: year == this_year,
            })
            .collect();

        YearRangeView { start, cells }
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.start + YEAR_RANGE_LEN - 1
    }

    /// "2019-2030"
    pub fn title(&self) -> String {
        format!("{}-{}", self.start, self.end())
    }

    pub fn cells(&self) -> &[PickerCell] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[PickerCell]> {
        self.cells.chunks(PICKER_COLUMNS)
    }
}
