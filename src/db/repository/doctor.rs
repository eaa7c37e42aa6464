use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_doctor(
    conn: &Connection,
    name: &str,
    specialization_id: Option<i64>,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO doctors (name, specialization_id) VALUES (?1, ?2)",
        params![name, specialization_id],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_doctor(
    conn: &Connection,
    id: i64,
    name: &str,
    specialization_id: Option<i64>,
) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE doctors SET name = ?1, specialization_id = ?2 WHERE id = ?3",
        params![name, specialization_id, id],
    )?;
    if updated == 0 {
        return Err(DatabaseError::not_found("doctor", id));
    }
    Ok(())
}

pub fn delete_doctor(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM doctors WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::not_found("doctor", id));
    }
    tracing::info!(doctor_id = id, "Deleted doctor");
    Ok(())
}

pub fn get_doctor(conn: &Connection, id: i64) -> Result<Option<Doctor>, DatabaseError> {
    let doctor = conn
        .query_row(
            "SELECT id, name, specialization_id FROM doctors WHERE id = ?1",
            params![id],
            |row| {
                Ok(Doctor {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    specialization_id: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(doctor)
}

pub fn list_doctors(conn: &Connection) -> Result<Vec<DoctorOption>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT id, name FROM doctors ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(DoctorOption {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn list_doctors_with_specialization(conn: &Connection) -> Result<Vec<DoctorListing>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT d.id, d.name, s.name
         FROM doctors d
         LEFT JOIN specializations s ON d.specialization_id = s.id
         ORDER BY d.id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(DoctorListing {
                id: row.get(0)?,
                name: row.get(1)?,
                specialization: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
