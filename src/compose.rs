use std::iter;

use crate::config::validate_months;
use crate::error::Result;
use crate::grid::{generate_index, MonthGrid, WeekStart};
use crate::month::MonthIndex;

const MAX_COLUMNS: usize = 4;

/// Grids for `months` consecutive months starting at the anchor.
pub fn compose(
    anchor_year: i32,
    anchor_month: u32,
    months: i64,
    week_start: WeekStart,
) -> Result<Vec<MonthGrid>> {
    let months = validate_months(months)?;
    let anchor = MonthIndex::from_ym(anchor_year, anchor_month)?;
    compose_index(anchor, months, week_start)
}

pub(crate) fn compose_index(
    anchor: MonthIndex,
    months: usize,
    week_start: WeekStart,
) -> Result<Vec<MonthGrid>> {
    iter::successors(Some(anchor), |idx| Some(idx.next()))
        .take(months)
        .map(|idx| generate_index(idx, week_start))
        .collect()
}

/// Rows and columns of month panels for `months` months.
pub fn grid_layout(months: usize) -> (usize, usize) {
    match months {
        0 => (0, 0),
        1..=3 => (1, months),
        4..=6 => (2, 3),
        7..=12 => (3, 4),
        _ => ((months + MAX_COLUMNS - 1) / MAX_COLUMNS, MAX_COLUMNS),
    }
}
