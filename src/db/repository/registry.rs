use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::*;

pub const PENDING_STATUS: &str = "Pending";

/// Statuses every clinic database starts with.
pub const DEFAULT_STATUSES: [&str; 3] = [PENDING_STATUS, "Completed", "Cancelled"];

/// Named lookup tables. The table name is interpolated into SQL, so it
/// must only ever come from this enum.
#[derive(Debug, Clone, Copy)]
enum Lookup {
    Status,
    Specialization,
}

impl Lookup {
    fn table(self) -> &'static str {
        match self {
            Self::Status => "statuses",
            Self::Specialization => "specializations",
        }
    }

    fn entity(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Specialization => "specialization",
        }
    }
}

/// Insert `name` unless it already exists; returns the id either way.
fn insert_lookup(conn: &Connection, lookup: Lookup, name: &str) -> Result<i64, DatabaseError> {
    let table = lookup.table();
    conn.execute(
        &format!("INSERT OR IGNORE INTO {table} (name) VALUES (?1)"),
        params![name],
    )?;
    let id = conn.query_row(
        &format!("SELECT id FROM {table} WHERE name = ?1"),
        params![name],
        |row| row.get(0),
    )?;
    Ok(id)
}

fn list_lookup(conn: &Connection, lookup: Lookup) -> Result<Vec<LookupEntry>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, name FROM {} ORDER BY id",
        lookup.table()
    ))?;
    let rows = stmt
        .query_map([], |row| {
            Ok(LookupEntry {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn delete_lookup(conn: &Connection, lookup: Lookup, id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1", lookup.table()),
        params![id],
    )?;
    if deleted == 0 {
        return Err(DatabaseError::not_found(lookup.entity(), id));
    }
    tracing::info!(id, table = lookup.table(), "Deleted lookup entry");
    Ok(())
}

pub fn insert_status(conn: &Connection, name: &str) -> Result<i64, DatabaseError> {
    insert_lookup(conn, Lookup::Status, name)
}

pub fn list_statuses(conn: &Connection) -> Result<Vec<Status>, DatabaseError> {
    list_lookup(conn, Lookup::Status)
}

/// Deleting a status clears it from every appointment and follow-up
/// that referenced it.
pub fn delete_status(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    delete_lookup(conn, Lookup::Status, id)
}

pub fn find_status_by_name(conn: &Connection, name: &str) -> Result<Option<Status>, DatabaseError> {
    let status = conn
        .query_row(
            "SELECT id, name FROM statuses WHERE name = ?1",
            params![name],
            |row| {
                Ok(LookupEntry {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(status)
}

/// Insert any of [`DEFAULT_STATUSES`] that are missing.
pub fn seed_default_statuses(conn: &Connection) -> Result<(), DatabaseError> {
    let mut seeded = 0;
    for name in DEFAULT_STATUSES {
        seeded += conn.execute(
            "INSERT OR IGNORE INTO statuses (name) VALUES (?1)",
            params![name],
        )?;
    }
    if seeded > 0 {
        tracing::info!(count = seeded, "Seeded default statuses");
    }
    Ok(())
}

pub fn insert_specialization(conn: &Connection, name: &str) -> Result<i64, DatabaseError> {
    insert_lookup(conn, Lookup::Specialization, name)
}

pub fn list_specializations(conn: &Connection) -> Result<Vec<Specialization>, DatabaseError> {
    list_lookup(conn, Lookup::Specialization)
}

/// Doctors holding this specialization keep their row; the reference is
/// cleared.
pub fn delete_specialization(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    delete_lookup(conn, Lookup::Specialization, id)
}
