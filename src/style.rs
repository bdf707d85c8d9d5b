use chrono::Weekday;

use crate::config::{CalendarConfiguration, TodayMarker};
use crate::grid::DayCell;
use crate::selection::Mark;
use crate::theme::Swatch;

/// Which rule decided a cell's colors, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StyleSource {
    Selected,
    InRange,
    Holiday,
    DayOfWeek,
    OtherMonth,
    Weekend,
    Default,
}

impl StyleSource {
    pub fn is_selection(&self) -> bool {
        matches!(self, StyleSource::Selected | StyleSource::InRange)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellStyle {
    source: StyleSource,
    swatch: Swatch,
    is_today: bool,
    today: Option<Swatch>,
}

impl CellStyle {
    pub fn source(&self) -> StyleSource {
        self.source
    }

    /// Colors chosen by precedence, ignoring the today marker.
    pub fn swatch(&self) -> &Swatch {
        &self.swatch
    }

    pub fn is_today(&self) -> bool {
        self.is_today
    }

    /// Today marker colors, `None` if not today or the marker is hidden.
    pub fn today(&self) -> Option<&Swatch> {
        self.today.as_ref()
    }

    /// What a renderer should paint: selection beats the today marker, the
    /// today marker beats everything else.
    pub fn effective(&self) -> &Swatch {
        match &self.today {
            Some(today) if !self.source.is_selection() => today,
            _ => &self.swatch,
        }
    }
}

fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

/// Attach the resolved style (and holiday label) to a cell. Never fails.
pub fn resolve(cell: DayCell, config: &CalendarConfiguration) -> DayCell {
    let theme = config.theme();
    let date = cell.date();
    let holiday = config.holidays().get(&date);
    let day_fg = || theme.day.fg.clone();

    let (source, swatch) = if let Some(mark) = config.selection().mark(date) {
        match mark {
            Mark::Edge => (StyleSource::Selected, theme.selected.clone()),
            Mark::Interior => (StyleSource::InRange, theme.range.clone()),
        }
    } else if let Some(holiday) = holiday {
        (
            StyleSource::Holiday,
            Swatch::new(holiday.color.clone(), day_fg()),
        )
    } else if let Some(color) = config.day_colors().get(&cell.weekday()) {
        (StyleSource::DayOfWeek, Swatch::new(color.clone(), day_fg()))
    } else if !cell.in_month() {
        (StyleSource::OtherMonth, theme.adjacent_day.clone())
    } else if is_weekend(cell.weekday()) {
        (StyleSource::Weekend, theme.weekend.clone())
    } else {
        (StyleSource::Default, theme.day.clone())
    };

    let is_today = date == config.today();
    let today = if is_today {
        match config.today_marker() {
            TodayMarker::Theme => Some(theme.today.clone()),
            TodayMarker::Color(color) => Some(Swatch::new(color.clone(), day_fg())),
            TodayMarker::Hidden => None,
        }
    } else {
        None
    };

    let label = holiday.and_then(|h| h.label.clone());

    cell.styled(
        CellStyle {
            source,
            swatch,
            is_today,
            today,
        },
        label,
    )
}
