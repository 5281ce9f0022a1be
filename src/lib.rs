pub mod calendar;
pub mod config;
pub mod error;
pub mod layout;
pub mod render;

pub use calendar::{days_in_month, first_weekday_of_month, CalendarMonth, WeekdayIndex};
pub use error::{Error, ErrorKind, Result};
pub use layout::{generate_layout, CalendarLayout, Cell, Row};
