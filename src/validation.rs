//! Front-desk input checks run before a store is called.
//!
//! These mirror the blocking notices the register forms show: required
//! fields, a selected row for edits, and no bookings earlier than the
//! current time on the current day. Nothing here touches the database.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::models::{NewAppointment, NewPatient};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Select a {0} first")]
    NoSelection(&'static str),

    #[error("Cannot book {date} at {time}: that time has already passed today")]
    PastAppointmentTime { date: NaiveDate, time: NaiveTime },
}

/// Returns the selected id, or `NoSelection` naming what was expected.
pub fn require_selection(selected: Option<i64>, what: &'static str) -> Result<i64, ValidationError> {
    selected.ok_or(ValidationError::NoSelection(what))
}

fn require_text(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

/// Name and phone number must be filled in.
pub fn validate_patient(patient: &NewPatient) -> Result<(), ValidationError> {
    require_text(&patient.name, "name")?;
    require_text(&patient.phone_number, "phone number")?;
    Ok(())
}

pub fn validate_doctor(name: &str, specialization_id: Option<i64>) -> Result<(), ValidationError> {
    require_text(name, "name")?;
    require_selection(specialization_id, "specialization")?;
    Ok(())
}

/// A slot on today's date must not be earlier than `now`. Other dates
/// are accepted as-is.
pub fn validate_appointment_slot(
    date: NaiveDate,
    time: NaiveTime,
    now: NaiveDateTime,
) -> Result<(), ValidationError> {
    if date == now.date() && date.and_time(time) < now {
        return Err(ValidationError::PastAppointmentTime { date, time });
    }
    Ok(())
}

/// Checks a new booking: a status must be chosen and the slot must not
/// already have passed.
pub fn validate_new_appointment(
    appt: &NewAppointment,
    now: NaiveDateTime,
) -> Result<(), ValidationError> {
    require_selection(appt.status_id, "status")?;
    validate_appointment_slot(appt.date, appt.time, now)
}
