use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::parse_date;
use crate::db::DatabaseError;
use crate::models::enums::SortOrder;
use crate::models::*;

// The per-patient count is a correlated sub-query, recomputed on every read.
const LISTING_SELECT: &str = "
    SELECT f.id, f.patient_id, p.name, p.phone_number, d.name, f.date, f.remarks, s.name,
           (SELECT COUNT(*) FROM followups c WHERE c.patient_id = f.patient_id) AS followup_count
    FROM followups f
    LEFT JOIN patients p ON f.patient_id = p.id
    LEFT JOIN doctors d ON f.doctor_id = d.id
    LEFT JOIN statuses s ON f.status_id = s.id";

pub fn insert_followup(conn: &Connection, followup: &NewFollowUp) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO followups (patient_id, doctor_id, date, remarks, status_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            followup.patient_id,
            followup.doctor_id,
            followup.date.format(DATE_FORMAT).to_string(),
            followup.remarks,
            followup.status_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_followup(
    conn: &Connection,
    id: i64,
    followup: &NewFollowUp,
) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE followups
         SET patient_id = ?1, doctor_id = ?2, date = ?3, remarks = ?4, status_id = ?5
         WHERE id = ?6",
        params![
            followup.patient_id,
            followup.doctor_id,
            followup.date.format(DATE_FORMAT).to_string(),
            followup.remarks,
            followup.status_id,
            id,
        ],
    )?;
    if updated == 0 {
        return Err(DatabaseError::not_found("followup", id));
    }
    Ok(())
}

pub fn delete_followup(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM followups WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::not_found("followup", id));
    }
    tracing::info!(followup_id = id, "Deleted follow-up");
    Ok(())
}

pub fn get_followup(conn: &Connection, id: i64) -> Result<Option<FollowUp>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, patient_id, doctor_id, date, remarks, status_id
             FROM followups WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, Option<i64>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, Option<i64>>(5)?,
                ))
            },
        )
        .optional()?;

    match row {
        Some((id, patient_id, doctor_id, date, remarks, status_id)) => Ok(Some(FollowUp {
            id,
            patient_id,
            doctor_id,
            date: parse_date("followups.date", &date)?,
            remarks,
            status_id,
        })),
        None => Ok(None),
    }
}

pub fn list_followups(conn: &Connection) -> Result<Vec<FollowUpListing>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{LISTING_SELECT} ORDER BY f.id"))?;
    let rows = stmt.query_map([], listing_row)?;
    listing_rows_to_vec(rows)
}

/// Follow-ups ordered by how many follow-ups their patient has; ties keep
/// insertion order.
pub fn list_followups_sorted_by_count(
    conn: &Connection,
    order: SortOrder,
) -> Result<Vec<FollowUpListing>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{LISTING_SELECT} ORDER BY followup_count {}, f.id",
        order.as_str()
    ))?;
    let rows = stmt.query_map([], listing_row)?;
    listing_rows_to_vec(rows)
}

pub fn list_followups_by_status(
    conn: &Connection,
    status_name: &str,
) -> Result<Vec<FollowUpListing>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{LISTING_SELECT} WHERE s.name = ?1 ORDER BY f.date, f.id"
    ))?;
    let rows = stmt.query_map(params![status_name], listing_row)?;
    listing_rows_to_vec(rows)
}

pub fn list_followups_by_date(
    conn: &Connection,
    date: &NaiveDate,
) -> Result<Vec<FollowUpListing>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{LISTING_SELECT} WHERE f.date = ?1 ORDER BY f.id"))?;
    let rows = stmt.query_map(params![date.format(DATE_FORMAT).to_string()], listing_row)?;
    listing_rows_to_vec(rows)
}

/// Case-insensitive substring search on the patient's name. A blank
/// keyword returns every follow-up.
pub fn search_followups_by_patient(
    conn: &Connection,
    keyword: &str,
) -> Result<Vec<FollowUpListing>, DatabaseError> {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return list_followups(conn);
    }
    let mut stmt = conn.prepare(&format!(
        "{LISTING_SELECT} WHERE instr(fold_case(p.name), ?1) > 0 ORDER BY f.id"
    ))?;
    let rows = stmt.query_map(params![keyword], listing_row)?;
    listing_rows_to_vec(rows)
}

/// One row per patient, including patients with no follow-ups.
pub fn followup_counts_by_patient(conn: &Connection) -> Result<Vec<PatientFollowUpCount>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.name, COUNT(f.id)
         FROM patients p
         LEFT JOIN followups f ON p.id = f.patient_id
         GROUP BY p.id
         ORDER BY p.id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(PatientFollowUpCount {
                patient_id: row.get(0)?,
                patient_name: row.get(1)?,
                followup_count: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

type ListingRow = (
    i64,
    i64,
    Option<String>,
    Option<String>,
    Option<String>,
    String,
    String,
    Option<String>,
    u32,
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
        row.get(8)?,
    ))
}

fn listing_rows_to_vec(
    rows: impl Iterator<Item = rusqlite::Result<ListingRow>>,
) -> Result<Vec<FollowUpListing>, DatabaseError> {
    let mut listings = Vec::new();
    for row in rows {
        let (id, patient_id, patient_name, patient_phone, doctor_name, date, remarks, status, followup_count) =
            row?;
        listings.push(FollowUpListing {
            id,
            patient_id,
            patient_name,
            patient_phone,
            doctor_name,
            date: parse_date("followups.date", &date)?,
            remarks,
            status,
            followup_count,
        });
    }
    Ok(listings)
}
