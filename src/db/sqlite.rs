use std::path::Path;

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

use super::repository::seed_default_statuses;
use super::DatabaseError;

/// Open the clinic database at the given path, run migrations and seed
/// the default statuses. Safe to call repeatedly on the same file.
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path)?;
    prepare(&conn)?;
    tracing::debug!(path = %path.display(), "Opened clinic database");
    Ok(conn)
}

/// Open an in-memory database (for testing)
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    prepare(&conn)?;
    Ok(conn)
}

fn prepare(conn: &Connection) -> Result<(), DatabaseError> {
    configure_pragmas(conn)?;
    register_functions(conn)?;
    run_migrations(conn)?;
    seed_default_statuses(conn)?;
    Ok(())
}

fn configure_pragmas(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "PRAGMA journal_mode=DELETE;
         PRAGMA foreign_keys=ON;"
    )?;
    Ok(())
}

/// `fold_case(text)`: Unicode lowercase, matching Rust's `str::to_lowercase`.
/// SQLite's built-in `lower()` only folds ASCII. NULL stays NULL.
fn register_functions(conn: &Connection) -> Result<(), DatabaseError> {
    conn.create_scalar_function(
        "fold_case",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )?;
    Ok(())
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_current_version(conn);

    let migrations: Vec<(i64, &str)> = vec![
        (1, include_str!("../../resources/migrations/001_initial.sql")),
        (2, include_str!("../../resources/migrations/002_followup_doctor.sql")),
        (3, include_str!("../../resources/migrations/003_lookup_indexes.sql")),
    ];

    for (version, sql) in migrations {
        if version > current_version {
            tracing::info!("Running migration v{version}");
            conn.execute_batch(sql).map_err(|e| DatabaseError::MigrationFailed {
                version,
                reason: e.to_string(),
            })?;
        }
    }

    Ok(())
}

/// Get the current schema version (0 if no schema exists yet)
fn get_current_version(conn: &Connection) -> i64 {
    conn.query_row(
        "SELECT MAX(version) FROM schema_version",
        [],
        |row| row.get::<_, i64>(0),
    )
    .unwrap_or(0)
}

/// Count tables in the database (for verification)
pub fn count_tables(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_initializes_all_tables() {
        let conn = open_memory_database().unwrap();
        // 6 clinic tables + schema_version
        let count = count_tables(&conn).unwrap();
        assert_eq!(count, 7, "Expected 7 tables, got {count}");
    }

    #[test]
    fn schema_version_is_current() {
        let conn = open_memory_database().unwrap();
        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, 3);
    }

    #[test]
    fn migration_idempotent() {
        let conn = open_memory_database().unwrap();
        let result = run_migrations(&conn);
        assert!(result.is_ok());
    }

    #[test]
    fn foreign_keys_enabled() {
        let conn = open_memory_database().unwrap();
        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn followups_carry_doctor_column_after_migration() {
        let conn = open_memory_database().unwrap();
        let has_doctor: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('followups') WHERE name = 'doctor_id'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(has_doctor, 1);
    }

    #[test]
    fn fold_case_lowercases_beyond_ascii() {
        let conn = open_memory_database().unwrap();
        let folded: String = conn
            .query_row("SELECT fold_case('ÉLODIE Öz')", [], |row| row.get(0))
            .unwrap();
        assert_eq!(folded, "élodie öz");
        let null: Option<String> = conn
            .query_row("SELECT fold_case(NULL)", [], |row| row.get(0))
            .unwrap();
        assert_eq!(null, None);
    }

    #[test]
    fn reopening_file_keeps_rows_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinic.db");

        let conn = open_database(&path).unwrap();
        conn.execute("INSERT INTO specializations (name) VALUES ('Cardiology')", [])
            .unwrap();
        drop(conn);

        let conn2 = open_database(&path).unwrap();
        assert_eq!(count_tables(&conn2).unwrap(), 7);
        let specs: i64 = conn2
            .query_row("SELECT COUNT(*) FROM specializations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(specs, 1);
        let statuses: i64 = conn2
            .query_row("SELECT COUNT(*) FROM statuses", [], |row| row.get(0))
            .unwrap();
        assert_eq!(statuses, 3);
    }
}
