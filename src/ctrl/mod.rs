pub mod calctrl;
pub mod control;

pub use calctrl::{CalendarController, DisplayMode};
pub use control::Control;
