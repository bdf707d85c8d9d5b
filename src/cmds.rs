use chrono::{NaiveDate, Weekday};

use crate::config::{Holiday, TodayMarker};
use crate::error::Result;
use crate::grid::WeekStart;
use crate::selection::SelectMode;
use crate::theme::ColorToken;

/// Everything a front end can ask the calendar controller to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    Noop,
    ShiftMonths(i32),
    ShiftYears(i32),
    Today,
    Goto(i32, u32),
    Language(String),
    WeekStart(WeekStart),
    WeekNumbers(bool),
    Months(i64),
    Theme(String),
    TodayMarker(TodayMarker),
    SelectMode(SelectMode),
    Select(NaiveDate),
    SelectRange(NaiveDate, NaiveDate),
    Click(NaiveDate),
    ClearSelection,
    /// `None` removes the color.
    DayColor(Weekday, Option<ColorToken>),
    /// `None` removes the holiday.
    Holiday(NaiveDate, Option<Holiday>),
    OpenMonthPicker,
    OpenYearPicker,
    /// Pick a month or a year, depending on the open picker.
    Pick(i32),
    ShiftYearRange(i32),
    Exit,
}

/// `Ok(Cmd::Noop)` when the command was handled, otherwise the command is
/// handed back to the caller.
pub type CmdResult = Result<Cmd>;
