use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{parse_date, parse_time};
use crate::db::DatabaseError;
use crate::models::*;

const LISTING_SELECT: &str = "
    SELECT a.id, p.name, p.phone_number, d.name, a.date, a.time, a.reason, s.name
    FROM appointments a
    LEFT JOIN patients p ON a.patient_id = p.id
    LEFT JOIN doctors d ON a.doctor_id = d.id
    LEFT JOIN statuses s ON a.status_id = s.id";

pub fn insert_appointment(conn: &Connection, appt: &NewAppointment) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (patient_id, doctor_id, date, time, reason, status_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            appt.patient_id,
            appt.doctor_id,
            appt.date.format(DATE_FORMAT).to_string(),
            appt.time.format(TIME_FORMAT).to_string(),
            appt.reason,
            appt.status_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_appointment(
    conn: &Connection,
    id: i64,
    appt: &NewAppointment,
) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE appointments
         SET patient_id = ?1, doctor_id = ?2, date = ?3, time = ?4, reason = ?5, status_id = ?6
         WHERE id = ?7",
        params![
            appt.patient_id,
            appt.doctor_id,
            appt.date.format(DATE_FORMAT).to_string(),
            appt.time.format(TIME_FORMAT).to_string(),
            appt.reason,
            appt.status_id,
            id,
        ],
    )?;
    if updated == 0 {
        return Err(DatabaseError::not_found("appointment", id));
    }
    Ok(())
}

pub fn delete_appointment(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM appointments WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::not_found("appointment", id));
    }
    tracing::info!(appointment_id = id, "Deleted appointment");
    Ok(())
}

pub fn get_appointment(conn: &Connection, id: i64) -> Result<Option<Appointment>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, patient_id, doctor_id, date, time, reason, status_id
             FROM appointments WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<i64>>(1)?,
                    row.get::<_, Option<i64>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, Option<i64>>(6)?,
                ))
            },
        )
        .optional()?;

    match row {
        Some((id, patient_id, doctor_id, date, time, reason, status_id)) => Ok(Some(Appointment {
            id,
            patient_id,
            doctor_id,
            date: parse_date("appointments.date", &date)?,
            time: parse_time("appointments.time", &time)?,
            reason,
            status_id,
        })),
        None => Ok(None),
    }
}

/// Every appointment with patient, doctor and status names.
pub fn list_appointments(conn: &Connection) -> Result<Vec<AppointmentListing>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{LISTING_SELECT} ORDER BY a.date, a.time, a.id"))?;
    let rows = stmt.query_map([], listing_row)?;
    listing_rows_to_vec(rows)
}

/// Appointments whose stored date is exactly `date`.
pub fn list_appointments_by_date(
    conn: &Connection,
    date: &NaiveDate,
) -> Result<Vec<AppointmentListing>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{LISTING_SELECT} WHERE a.date = ?1 ORDER BY a.time, a.id"
    ))?;
    let rows = stmt.query_map(params![date.format(DATE_FORMAT).to_string()], listing_row)?;
    listing_rows_to_vec(rows)
}

/// Case-insensitive substring search on the patient's name. A blank
/// keyword returns every appointment.
pub fn search_appointments_by_patient(
    conn: &Connection,
    keyword: &str,
) -> Result<Vec<AppointmentListing>, DatabaseError> {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return list_appointments(conn);
    }
    let mut stmt = conn.prepare(&format!(
        "{LISTING_SELECT} WHERE instr(fold_case(p.name), ?1) > 0 ORDER BY a.date, a.time, a.id"
    ))?;
    let rows = stmt.query_map(params![keyword], listing_row)?;
    listing_rows_to_vec(rows)
}

type ListingRow = (
    i64,
    Option<String>,
    Option<String>,
    Option<String>,
    String,
    String,
    String,
    Option<String>,
);

fn listing_row(row: &Row<'_>) -> rusqlite::Result<ListingRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn listing_rows_to_vec(
    rows: impl Iterator<Item = rusqlite::Result<ListingRow>>,
) -> Result<Vec<AppointmentListing>, DatabaseError> {
    let mut listings = Vec::new();
    for row in rows {
        let (id, patient_name, patient_phone, doctor_name, date, time, reason, status) = row?;
        listings.push(AppointmentListing {
            id,
            patient_name,
            patient_phone,
            doctor_name,
            date: parse_date("appointments.date", &date)?,
            time: parse_time("appointments.time", &time)?,
            reason,
            status,
        });
    }
    Ok(listings)
}
