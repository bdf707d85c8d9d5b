pub mod clock;
pub mod cmds;
pub mod command;
pub mod compose;
pub mod config;
pub mod ctrl;
pub mod error;
pub mod grid;
pub mod locale;
pub mod month;
pub mod render;
pub mod selection;
pub mod style;
pub mod theme;
pub mod view;

pub use compose::compose;
pub use config::{CalendarConfiguration, CalendarOptions};
pub use ctrl::{CalendarController, Control, DisplayMode};
pub use error::{Error, ErrorKind, Result};
pub use grid::{generate, DayCell, MonthGrid, WeekRow, WeekStart};
pub use style::resolve;
pub use view::CalendarView;
