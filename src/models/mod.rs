pub mod enums;

mod appointment;
mod doctor;
mod followup;
mod patient;
mod registry;

pub use appointment::*;
pub use doctor::*;
pub use followup::*;
pub use patient::*;
pub use registry::*;

/// Storage format for calendar dates (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Storage format for appointment times (`HH:MM`).
pub const TIME_FORMAT: &str = "%H:%M";
