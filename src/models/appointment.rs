use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub date: NaiveDate,
    /// Minute precision; seconds are always zero.
    pub time: NaiveTime,
    pub reason: String,
    pub status_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date: NaiveDate,
    /// Stored as `HH:MM`. Seconds and fractions are discarded on insert
    /// and update.
    pub time: NaiveTime,
    pub reason: String,
    pub status_id: Option<i64>,
}

/// Appointment joined with the names it references. Any reference that
/// was deleted comes back as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentListing {
    pub id: i64,
    pub patient_name: Option<String>,
    pub patient_phone: Option<String>,
    pub doctor_name: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub reason: String,
    pub status: Option<String>,
}
