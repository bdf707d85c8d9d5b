use chrono::{NaiveDate, Weekday};
use std::collections::HashMap;

use crate::clock::Clock;
use crate::cmds::{Cmd, CmdResult};
use crate::config::{
    parse_day_colors, parse_holidays, validate_months, CalendarConfiguration, CalendarOptions,
    Holiday, HolidaySpec, TodayMarker,
};
use crate::ctrl::Control;
use crate::error::{Error, ErrorKind, Result};
use crate::grid::WeekStart;
use crate::locale::{Catalog, Translator};
use crate::month::MonthIndex;
use crate::selection::{SelectMode, Selection};
use crate::theme::{CalendarTheme, ColorToken};
use crate::view::{year_range_start, CalendarView, YearRangeView, YearView};

/// Years skipped by one page of the year picker.
pub const YEAR_RANGE_PAGE: i32 = 10;

/// Which panel the calendar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Day grids of the configured months.
    #[default]
    Days,
    /// The months of the anchor year.
    Months,
    /// A page of years starting at the given one.
    Years(i32),
}

fn check_date(date: NaiveDate) -> Result<NaiveDate> {
    MonthIndex::from(date).validate()?;
    Ok(date)
}

/// Owns the configuration and the view derived from it.
///
/// Every transition first builds the new view from a modified copy of the
/// configuration and only then replaces both, so a failing transition leaves
/// the controller exactly as it was.
pub struct CalendarController<T: Translator = Catalog> {
    config: CalendarConfiguration,
    view: CalendarView,
    mode: DisplayMode,
    translator: T,
}

impl<T: Translator> CalendarController<T> {
    pub fn new(config: CalendarConfiguration, translator: T) -> Result<Self> {
        let view = CalendarView::build(&config, &translator)?;
        log::debug!("Calendar showing {} month(s) from {}", config.months(), config.anchor());

        Ok(CalendarController {
            config,
            view,
            mode: DisplayMode::Days,
            translator,
        })
    }

    pub fn from_options<C: Clock + ?Sized>(
        options: &CalendarOptions,
        clock: &C,
        translator: T,
    ) -> Result<Self> {
        Self::new(options.validate(clock.today())?, translator)
    }

    pub fn view(&self) -> &CalendarView {
        &self.view
    }

    pub fn config(&self) -> &CalendarConfiguration {
        &self.config
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }

    /// Month picker for the anchor year.
    pub fn year_view(&self) -> YearView {
        YearView::build(self.config.anchor().year(), &self.config, &self.translator)
    }

    /// Year picker page, only while it is open.
    pub fn year_range_view(&self) -> Option<YearRangeView> {
        match self.mode {
            DisplayMode::Years(start) => Some(YearRangeView::build(start, &self.config)),
            _ => None,
        }
    }

    fn apply(&mut self, config: CalendarConfiguration) -> Result<&CalendarView> {
        let view = CalendarView::build(&config, &self.translator)?;
        self.config = config;
        self.view = view;
        Ok(&self.view)
    }

    fn update<F>(&mut self, what: &str, f: F) -> Result<&CalendarView>
    where
        F: FnOnce(&mut CalendarConfiguration) -> Result<()>,
    {
        let mut config = self.config.clone();
        if let Err(e) = f(&mut config) {
            log::debug!("Rejected {}: {}", what, e);
            return Err(e);
        }
        log::debug!("Applying {}", what);
        self.apply(config)
    }

    pub fn shift_months(&mut self, delta: i32) -> Result<&CalendarView> {
        self.update("month shift", |config| {
            let anchor = config.anchor.shift(delta);
            anchor.validate()?;
            config.anchor = anchor;
            Ok(())
        })
    }

    pub fn next_month(&mut self) -> Result<&CalendarView> {
        self.shift_months(1)
    }

    pub fn previous_month(&mut self) -> Result<&CalendarView> {
        self.shift_months(-1)
    }

    pub fn next_year(&mut self) -> Result<&CalendarView> {
        self.shift_months(12)
    }

    pub fn previous_year(&mut self) -> Result<&CalendarView> {
        self.shift_months(-12)
    }

    pub fn goto(&mut self, year: i32, month: u32) -> Result<&CalendarView> {
        self.update("goto", |config| {
            config.anchor = MonthIndex::from_ym(year, month)?;
            Ok(())
        })
    }

    /// Show the month containing today.
    pub fn today(&mut self) -> Result<&CalendarView> {
        let today = self.config.today();
        self.update("jump to today", |config| {
            let anchor = MonthIndex::from(today);
            anchor.validate()?;
            config.anchor = anchor;
            Ok(())
        })?;
        self.mode = DisplayMode::Days;
        Ok(&self.view)
    }

    /// Only headers change; unknown languages fall back to the default one.
    pub fn set_language(&mut self, language: &str) -> &CalendarView {
        log::debug!("Switching language to '{}'", language);
        self.config.language = language.to_owned();
        self.view = self.view.relabel(&self.config, &self.translator);
        &self.view
    }

    /// Merge day colors and holidays, given in their config file form, into
    /// the current ones.
    pub fn update_styling(
        &mut self,
        day_colors: Option<&HashMap<String, String>>,
        holidays: Option<&HashMap<String, HolidaySpec>>,
    ) -> Result<&CalendarView> {
        self.update("styling", |config| {
            let day_colors = parse_day_colors(day_colors)?;
            let holidays = parse_holidays(holidays)?;
            for date in holidays.keys() {
                check_date(*date)?;
            }
            config.day_colors.extend(day_colors);
            config.holidays.extend(holidays);
            Ok(())
        })
    }

    pub fn set_day_color(
        &mut self,
        weekday: Weekday,
        color: Option<ColorToken>,
    ) -> Result<&CalendarView> {
        self.update("day color", |config| {
            match color {
                Some(color) => config.day_colors.insert(weekday, color),
                None => config.day_colors.remove(&weekday),
            };
            Ok(())
        })
    }

    pub fn set_holiday(&mut self, date: NaiveDate, holiday: Option<Holiday>) -> Result<&CalendarView> {
        self.update("holiday", |config| {
            check_date(date)?;
            match holiday {
                Some(holiday) => config.holidays.insert(date, holiday),
                None => config.holidays.remove(&date),
            };
            Ok(())
        })
    }

    pub fn set_week_start(&mut self, week_start: WeekStart) -> Result<&CalendarView> {
        self.update("week start", |config| {
            config.week_start = week_start;
            Ok(())
        })
    }

    pub fn set_show_week_numbers(&mut self, show: bool) -> Result<&CalendarView> {
        self.update("week numbers", |config| {
            config.show_week_numbers = show;
            Ok(())
        })
    }

    pub fn set_months(&mut self, months: i64) -> Result<&CalendarView> {
        self.update("months count", |config| {
            config.months = validate_months(months)?;
            Ok(())
        })
    }

    pub fn set_theme(&mut self, name: &str) -> Result<&CalendarView> {
        self.update("theme", |config| {
            config.theme = CalendarTheme::named(name, config.theme_dir())?;
            Ok(())
        })
    }

    pub fn set_today_marker(&mut self, marker: TodayMarker) -> Result<&CalendarView> {
        self.update("today marker", |config| {
            config.today_marker = marker;
            Ok(())
        })
    }

    /// Switching the mode drops the current selection.
    pub fn set_select_mode(&mut self, mode: SelectMode) -> Result<&CalendarView> {
        self.update("select mode", |config| {
            if config.select_mode != mode {
                config.selection = Selection::Nothing;
            }
            config.select_mode = mode;
            Ok(())
        })
    }

    pub fn select_date(&mut self, date: NaiveDate) -> Result<&CalendarView> {
        self.update("selection", |config| {
            config.selection = Selection::Date(check_date(date)?);
            Ok(())
        })
    }

    pub fn select_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<&CalendarView> {
        self.update("range selection", |config| {
            config.selection = Selection::range(check_date(start)?, check_date(end)?);
            Ok(())
        })
    }

    /// Select as if the user clicked `date`, honoring the select mode.
    pub fn click(&mut self, date: NaiveDate) -> Result<&CalendarView> {
        self.update("click", |config| {
            config.selection = config.selection.click(config.select_mode, check_date(date)?);
            Ok(())
        })
    }

    /// Click the cell at `row`/`column` of the `month`th displayed grid.
    pub fn click_at(&mut self, month: usize, row: usize, column: usize) -> Result<&CalendarView> {
        let date = self
            .view
            .months()
            .get(month)
            .and_then(|grid| grid.rows().get(row))
            .and_then(|row| row.cells().get(column))
            .map(|cell| cell.date())
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidDate,
                    &format!("no cell at month {}, row {}, column {}", month, row, column),
                )
            })?;
        self.click(date)
    }

    pub fn clear_selection(&mut self) -> Result<&CalendarView> {
        self.update("clear selection", |config| {
            config.selection = Selection::Nothing;
            Ok(())
        })
    }

    /// Days -> months of the anchor year.
    pub fn open_month_picker(&mut self) -> YearView {
        log::debug!("Opening month picker");
        self.mode = DisplayMode::Months;
        self.year_view()
    }

    /// Open the year picker on the page around the anchor year.
    pub fn open_year_picker(&mut self) -> YearRangeView {
        log::debug!("Opening year picker");
        let start = year_range_start(self.config.anchor().year());
        let view = YearRangeView::build(start, &self.config);
        self.mode = DisplayMode::Years(view.start());
        view
    }

    /// Months -> days of `month` in the anchor year.
    pub fn pick_month(&mut self, month: u32) -> Result<&CalendarView> {
        let year = self.config.anchor().year();
        self.goto(year, month)?;
        self.mode = DisplayMode::Days;
        Ok(&self.view)
    }

    /// Years -> months of `year`.
    pub fn pick_year(&mut self, year: i32) -> Result<YearView> {
        let month = self.config.anchor().number();
        self.goto(year, month)?;
        self.mode = DisplayMode::Months;
        Ok(self.year_view())
    }

    /// Page the year picker by `pages` times ten years.
    pub fn shift_year_range(&mut self, pages: i32) -> YearRangeView {
        let start = match self.mode {
            DisplayMode::Years(start) => start,
            _ => year_range_start(self.config.anchor().year()),
        };
        let view = YearRangeView::build(
            start.saturating_add(pages.saturating_mul(YEAR_RANGE_PAGE)),
            &self.config,
        );
        self.mode = DisplayMode::Years(view.start());
        view
    }

    pub fn next_year_range(&mut self) -> YearRangeView {
        self.shift_year_range(1)
    }

    pub fn prev_year_range(&mut self) -> YearRangeView {
        self.shift_year_range(-1)
    }
}

impl<T: Translator> Control for CalendarController<T> {
    fn send_cmd(&mut self, cmd: &Cmd) -> CmdResult {
        match cmd {
            Cmd::ShiftMonths(n) => {
                self.shift_months(*n)?;
            }
            Cmd::ShiftYears(n) => {
                self.shift_months(n.saturating_mul(12))?;
            }
            Cmd::Today => {
                self.today()?;
            }
            Cmd::Goto(year, month) => {
                self.goto(*year, *month)?;
            }
            Cmd::Language(language) => {
                self.set_language(language);
            }
            Cmd::WeekStart(week_start) => {
                self.set_week_start(*week_start)?;
            }
            Cmd::WeekNumbers(show) => {
                self.set_show_week_numbers(*show)?;
            }
            Cmd::Months(months) => {
                self.set_months(*months)?;
            }
            Cmd::Theme(name) => {
                self.set_theme(name)?;
            }
            Cmd::TodayMarker(marker) => {
                self.set_today_marker(marker.clone())?;
            }
            Cmd::SelectMode(mode) => {
                self.set_select_mode(*mode)?;
            }
            Cmd::Select(date) => {
                self.select_date(*date)?;
            }
            Cmd::SelectRange(start, end) => {
                self.select_range(*start, *end)?;
            }
            Cmd::Click(date) => {
                self.click(*date)?;
            }
            Cmd::ClearSelection => {
                self.clear_selection()?;
            }
            Cmd::DayColor(weekday, color) => {
                self.set_day_color(*weekday, color.clone())?;
            }
            Cmd::Holiday(date, holiday) => {
                self.set_holiday(*date, holiday.clone())?;
            }
            Cmd::OpenMonthPicker => {
                self.open_month_picker();
            }
            Cmd::OpenYearPicker => {
                self.open_year_picker();
            }
            Cmd::Pick(value) => match self.mode {
                DisplayMode::Months if *value >= 0 => {
                    self.pick_month(*value as u32)?;
                }
                DisplayMode::Years(_) => {
                    self.pick_year(*value)?;
                }
                _ => {
                    return Err(Error::new(
                        ErrorKind::InvalidDate,
                        &format!("cannot pick {} in {:?} mode", value, self.mode),
                    ))
                }
            },
            Cmd::ShiftYearRange(pages) => {
                self.shift_year_range(*pages);
            }
            Cmd::Noop | Cmd::Exit => return Ok(cmd.clone()),
        }

        Ok(Cmd::Noop)
    }
}
