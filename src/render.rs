use itertools::Itertools;

use crate::config::CalendarConfiguration;
use crate::grid::{DayCell, MonthGrid, DAYS_PER_WEEK};
use crate::style::StyleSource;
use crate::theme::{ColorToken, Swatch};
use crate::view::{CalendarView, PickerCell, YearRangeView, YearView};

const CELL_WIDTH: usize = 3;
const WEEK_NUMBER_WIDTH: usize = 4;
const PANEL_GAP: &str = "   ";
const RESET: &str = "\x1b[0m";

const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (205, 49, 49)),
    ("green", (13, 188, 121)),
    ("yellow", (229, 229, 16)),
    ("blue", (36, 114, 200)),
    ("magenta", (188, 63, 188)),
    ("cyan", (17, 168, 205)),
    ("orange", (255, 165, 0)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("lightgray", (211, 211, 211)),
];

/// "#abc", "#aabbcc" or a handful of names. Anything else renders uncolored.
fn rgb(color: &ColorToken) -> Option<(u8, u8, u8)> {
    let s = color.as_str().trim();
    if let Some(hex) = s.strip_prefix('#') {
        let channel = |h: &str| u8::from_str_radix(h, 16).ok();
        return match hex.len() {
            3 => {
                let mut it = hex.chars().map(|c| channel(&c.to_string().repeat(2)));
                Some((it.next()??, it.next()??, it.next()??))
            }
            6 => Some((
                channel(hex.get(0..2)?)?,
                channel(hex.get(2..4)?)?,
                channel(hex.get(4..6)?)?,
            )),
            _ => None,
        };
    }

    NAMED_COLORS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(s))
        .map(|(_, rgb)| *rgb)
}

/// Renders views as plain text, optionally with 24-bit ANSI colors.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer {
    pub color: bool,
    /// Print days of neighbouring months instead of leaving them blank.
    pub show_overflow: bool,
}

impl TextRenderer {
    pub fn new(color: bool) -> Self {
        TextRenderer {
            color,
            show_overflow: false,
        }
    }

    fn paint(&self, text: &str, swatch: &Swatch) -> String {
        if !self.color {
            return text.to_owned();
        }

        let fg = rgb(&swatch.fg).map(|(r, g, b)| format!("\x1b[38;2;{};{};{}m", r, g, b));
        let bg = rgb(&swatch.bg).map(|(r, g, b)| format!("\x1b[48;2;{};{};{}m", r, g, b));
        match (fg, bg) {
            (None, None) => text.to_owned(),
            (fg, bg) => format!(
                "{}{}{}{}",
                fg.unwrap_or_default(),
                bg.unwrap_or_default(),
                text,
                RESET
            ),
        }
    }

    fn marker(cell: &DayCell) -> char {
        let source = cell.style().map(|s| s.source());
        match source {
            Some(StyleSource::Selected) => '>',
            Some(StyleSource::InRange) => '~',
            _ if cell.style().and_then(|s| s.today()).is_some() => '*',
            Some(StyleSource::Holiday) => '!',
            _ => ' ',
        }
    }

    fn day(&self, cell: &DayCell) -> String {
        if !cell.in_month() && !self.show_overflow {
            return " ".repeat(CELL_WIDTH);
        }

        let text = format!("{}{:>2}", Self::marker(cell), cell.text());
        match cell.style() {
            Some(style) => self.paint(&text, style.effective()),
            None => text,
        }
    }

    fn panel_width(config: &CalendarConfiguration) -> usize {
        let numbers = if config.show_week_numbers() {
            WEEK_NUMBER_WIDTH
        } else {
            0
        };
        numbers + DAYS_PER_WEEK * CELL_WIDTH
    }

    fn month_lines(&self, grid: &MonthGrid, config: &CalendarConfiguration) -> Vec<String> {
        let theme = config.theme();
        let width = Self::panel_width(config);
        let numbers_pad = " ".repeat(width - DAYS_PER_WEEK * CELL_WIDTH);
        let mut lines = Vec::new();

        if let Some(header) = grid.header().filter(|_| config.show_month_headers()) {
            let title = format!("{:^width$}", header.title(grid.year()), width = width);
            lines.push(self.paint(&title, &theme.month_header));

            let weekdays = header
                .short_weekday_names
                .iter()
                .map(|name| format!("{:>3}", name.chars().take(2).collect::<String>()))
                .join("");
            lines.push(format!(
                "{}{}",
                numbers_pad,
                self.paint(&weekdays, &theme.day_header)
            ));
        }

        for row in grid.rows() {
            let number = if config.show_week_numbers() {
                let n = row
                    .week_number()
                    .map_or_else(String::new, |n| n.to_string());
                self.paint(&format!("{:>3} ", n), &theme.week_number)
            } else {
                String::new()
            };
            lines.push(format!(
                "{}{}",
                number,
                row.cells().iter().map(|cell| self.day(cell)).join("")
            ));
        }

        lines
    }

    /// Holiday labels of the displayed days, one per line.
    fn holiday_lines(&self, view: &CalendarView) -> Vec<String> {
        view.months()
            .iter()
            .flat_map(|grid| grid.days())
            .filter_map(|cell| {
                cell.holiday_label().map(|label| {
                    format!("! {} {}", view.config().format_date(cell.date()), label)
                })
            })
            .collect()
    }

    pub fn render(&self, view: &CalendarView) -> String {
        let config = view.config();
        let width = Self::panel_width(config);
        let blank = " ".repeat(width);
        let mut out = Vec::new();

        if config.show_navigation() {
            let first = view.months().first().map(|g| g.month());
            let last = view.months().last().map(|g| g.month());
            if let (Some(first), Some(last)) = (first, last) {
                let span = if first == last {
                    first.to_string()
                } else {
                    format!("{} .. {}", first, last)
                };
                out.push(self.paint(&format!("<  {}  >", span), &config.theme().navigation));
            }
        }

        let body = view.panel_rows().map(|panels| {
            let panels: Vec<Vec<String>> = panels
                .iter()
                .map(|grid| self.month_lines(grid, config))
                .collect();
            let height = panels.iter().map(Vec::len).max().unwrap_or(0);
            (0..height)
                .map(|i| {
                    panels
                        .iter()
                        .map(|lines| lines.get(i).map_or(blank.as_str(), String::as_str))
                        .join(PANEL_GAP)
                        .trim_end()
                        .to_owned()
                })
                .join("\n")
        });
        out.push(body.collect::<Vec<_>>().join("\n\n"));

        let holidays = self.holiday_lines(view);
        if !holidays.is_empty() {
            out.push(String::new());
            out.extend(holidays);
        }

        out.join("\n")
    }

    fn picker(&self, title: &str, rows: impl Iterator<Item = impl AsRef<[PickerCell]>>) -> String {
        let width = 4 * 6;
        let mut out = vec![format!("{:^width$}", title, width = width)];
        out.extend(rows.map(|row| {
            row.as_ref()
                .iter()
                .map(|cell| {
                    let marker = if cell.current {
                        '>'
                    } else if cell.today {
                        '*'
                    } else {
                        ' '
                    };
                    format!("{}{:<5}", marker, cell.label)
                })
                .join("")
                .trim_end()
                .to_owned()
        }));
        out.join("\n")
    }

    pub fn render_year(&self, view: &YearView) -> String {
        self.picker(view.title(), view.rows())
    }

    pub fn render_years(&self, view: &YearRangeView) -> String {
        self.picker(&view.title(), view.rows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Holiday;
    use crate::locale::Catalog;
    use crate::month::MonthIndex;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config() -> CalendarConfiguration {
        let mut config = CalendarConfiguration::new(date(2024, 2, 14));
        config.anchor = MonthIndex::from_ym(2024, 2).unwrap();
        config.show_navigation = false;
        config
    }

    #[test]
    fn plain_february() {
        let view = CalendarView::build(&config(), &Catalog::new()).unwrap();
        let text = TextRenderer::new(false).render(&view);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0].trim(), "2024 Feb");
        assert_eq!(lines[1], " Su Mo Tu We Th Fr Sa");
        assert_eq!(lines[2], "              1  2  3");
        assert_eq!(lines[4], " 11 12 13*14 15 16 17");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn week_numbers_and_holidays() {
        let mut config = config();
        config.show_week_numbers = true;
        config.week_start = crate::grid::WeekStart::Monday;
        config.holidays.insert(
            date(2024, 2, 12),
            Holiday {
                color: "red".into(),
                label: Some("Founding".to_owned()),
            },
        );
        let view = CalendarView::build(&config, &Catalog::new()).unwrap();
        let text = TextRenderer::new(false).render(&view);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[1], "     Mo Tu We Th Fr Sa Su");
        assert!(lines[2].starts_with("  5 "));
        assert_eq!(lines[4], "  7 !12 13*14 15 16 17 18");
        assert_eq!(*lines.last().unwrap(), "! 2024-02-12 Founding");
    }

    #[test]
    fn panels_side_by_side() {
        let mut config = config();
        config.months = 2;
        config.show_navigation = true;
        let view = CalendarView::build(&config, &Catalog::new()).unwrap();
        let text = TextRenderer::new(false).render(&view);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "<  2024-02 .. 2024-03  >");
        assert!(lines[1].contains("2024 Feb") && lines[1].contains("2024 Mar"));
    }

    #[test]
    fn colors() {
        assert_eq!(rgb(&"#ff8000".into()), Some((255, 128, 0)));
        assert_eq!(rgb(&"#fff".into()), Some((255, 255, 255)));
        assert_eq!(rgb(&"Red".into()), Some((205, 49, 49)));
        assert_eq!(rgb(&"chartreuse-ish".into()), None);

        let swatch = Swatch::new("#000000", "#ffffff");
        let painted = TextRenderer::new(true).paint("x", &swatch);
        assert!(painted.starts_with("\x1b[38;2;255;255;255m"));
        assert!(painted.ends_with(RESET));
    }

    #[test]
    fn year_picker() {
        let config = config();
        let view = YearView::build(2024, &config, &Catalog::new());
        let text = TextRenderer::default().render_year(&view);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], " Jan  >Feb   Mar   Apr");
    }
}
