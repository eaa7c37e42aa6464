use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::enums::Gender;
use crate::models::*;

const SUMMARY_SELECT: &str = "
    SELECT p.id, p.name, p.gender, p.date_of_birth, p.phone_number, p.address,
           IFNULL(appt.total, 0) AS appointment_count,
           IFNULL(fup.total, 0) AS followup_count
    FROM patients p
    LEFT JOIN (
        SELECT patient_id, COUNT(*) AS total FROM appointments GROUP BY patient_id
    ) appt ON p.id = appt.patient_id
    LEFT JOIN (
        SELECT patient_id, COUNT(*) AS total FROM followups GROUP BY patient_id
    ) fup ON p.id = fup.patient_id";

pub fn insert_patient(conn: &Connection, patient: &NewPatient) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO patients (name, gender, date_of_birth, phone_number, address)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            patient.name,
            patient.gender.as_str(),
            patient.date_of_birth,
            patient.phone_number,
            patient.address,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_patient(conn: &Connection, id: i64, patient: &NewPatient) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE patients SET name = ?1, gender = ?2, date_of_birth = ?3, phone_number = ?4, address = ?5
         WHERE id = ?6",
        params![
            patient.name,
            patient.gender.as_str(),
            patient.date_of_birth,
            patient.phone_number,
            patient.address,
            id,
        ],
    )?;
    if updated == 0 {
        return Err(DatabaseError::not_found("patient", id));
    }
    Ok(())
}

/// Removes the patient. Their follow-ups go with them; their appointments
/// stay with the patient reference cleared.
pub fn delete_patient(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM patients WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::not_found("patient", id));
    }
    tracing::info!(patient_id = id, "Deleted patient");
    Ok(())
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Option<Patient>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, name, gender, date_of_birth, phone_number, address
             FROM patients WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            },
        )
        .optional()?;

    match row {
        Some((id, name, gender, date_of_birth, phone_number, address)) => Ok(Some(Patient {
            id,
            name,
            gender: Gender::from_str(&gender)?,
            date_of_birth,
            phone_number,
            address,
        })),
        None => Ok(None),
    }
}

/// (id, name) pairs for selection widgets.
pub fn list_patients(conn: &Connection) -> Result<Vec<PatientOption>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT id, name FROM patients ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(PatientOption {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Every patient with their appointment and follow-up totals.
pub fn list_patients_with_summary(conn: &Connection) -> Result<Vec<PatientSummary>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{SUMMARY_SELECT} ORDER BY p.id"))?;
    let rows = stmt.query_map([], summary_row)?;
    summary_rows_to_vec(rows)
}

/// Case-insensitive substring match on name or phone number. An empty
/// needle matches every patient.
pub fn search_patients(conn: &Connection, needle: &str) -> Result<Vec<PatientSummary>, DatabaseError> {
    let needle = needle.trim().to_lowercase();
    let mut stmt = conn.prepare(&format!(
        "{SUMMARY_SELECT}
         WHERE instr(fold_case(p.name), ?1) > 0 OR instr(fold_case(p.phone_number), ?1) > 0
         ORDER BY p.id"
    ))?;
    let rows = stmt.query_map(params![needle], summary_row)?;
    summary_rows_to_vec(rows)
}

type SummaryRow = (i64, String, String, String, String, String, u32, u32);

fn summary_row(row: &Row<'_>) -> rusqlite::Result<SummaryRow> {
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

fn summary_rows_to_vec(
    rows: impl Iterator<Item = rusqlite::Result<SummaryRow>>,
) -> Result<Vec<PatientSummary>, DatabaseError> {
    let mut patients = Vec::new();
    for row in rows {
        let (id, name, gender, date_of_birth, phone_number, address, appointment_count, followup_count) =
            row?;
        patients.push(PatientSummary {
            id,
            name,
            gender: Gender::from_str(&gender)?,
            date_of_birth,
            phone_number,
            address,
            appointment_count,
            followup_count,
        });
    }
    Ok(patients)
}
