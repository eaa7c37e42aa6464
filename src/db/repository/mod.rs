//! Repository layer: one sub-module per table, all taking a borrowed
//! connection owned by the caller.
//!
//! Updates and deletes report `DatabaseError::NotFound` when no row has
//! the given id. Referential rules (cascade / set null) are declared in the
//! schema and enforced by SQLite.

mod appointment;
mod doctor;
mod followup;
mod patient;
mod registry;

use chrono::{NaiveDate, NaiveTime};

use super::DatabaseError;
use crate::models::{DATE_FORMAT, TIME_FORMAT};

pub use appointment::*;
pub use doctor::*;
pub use followup::*;
pub use patient::*;
pub use registry::*;

pub(crate) fn parse_date(field: &str, value: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| DatabaseError::InvalidDate {
        field: field.into(),
        value: value.into(),
    })
}

/// Accepts `HH:MM`, plus `HH:MM:SS` for rows written by other tools.
pub(crate) fn parse_time(field: &str, value: &str) -> Result<NaiveTime, DatabaseError> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| DatabaseError::InvalidDate {
            field: field.into(),
            value: value.into(),
        })
}
