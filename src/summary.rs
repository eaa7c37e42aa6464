//! Dashboard summary: cross-table counts and contact lookups.
//!
//! Read-only views composed from the clinic tables. Nothing computed here
//! is persisted; every call re-runs its queries.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::db::{DatabaseError, PENDING_STATUS};
use crate::models::DATE_FORMAT;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Headline counts for the dashboard strip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_patients: u32,
    pub total_doctors: u32,
    pub appointments_today: u32,
    pub pending_followups: u32,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Fetches the dashboard counts. `today` is passed in so callers (and
/// tests) control the clock.
pub fn fetch_dashboard_stats(
    conn: &Connection,
    today: &NaiveDate,
) -> Result<DashboardStats, DatabaseError> {
    let total_patients: u32 =
        conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;

    let total_doctors: u32 =
        conn.query_row("SELECT COUNT(*) FROM doctors", [], |row| row.get(0))?;

    let appointments_today: u32 = conn.query_row(
        "SELECT COUNT(*) FROM appointments WHERE date = ?1",
        params![today.format(DATE_FORMAT).to_string()],
        |row| row.get(0),
    )?;

    let pending_followups: u32 = conn.query_row(
        "SELECT COUNT(*) FROM followups f
         JOIN statuses s ON f.status_id = s.id
         WHERE s.name = ?1",
        params![PENDING_STATUS],
        |row| row.get(0),
    )?;

    Ok(DashboardStats {
        total_patients,
        total_doctors,
        appointments_today,
        pending_followups,
    })
}

/// Patient name → phone number. When names repeat, the most recently
/// registered patient wins.
pub fn patient_phone_directory(conn: &Connection) -> Result<BTreeMap<String, String>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT name, phone_number FROM patients ORDER BY id")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

    let mut directory = BTreeMap::new();
    for row in rows {
        let (name, phone) = row?;
        directory.insert(name, phone);
    }
    Ok(directory)
}

/// Same resolution rule as [`patient_phone_directory`], for a single name.
pub fn find_phone_by_patient_name(
    conn: &Connection,
    name: &str,
) -> Result<Option<String>, DatabaseError> {
    let phone = conn
        .query_row(
            "SELECT phone_number FROM patients WHERE name = ?1 ORDER BY id DESC LIMIT 1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(phone)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::db::{
        find_status_by_name, insert_appointment, insert_doctor, insert_followup, insert_patient,
    };
    use crate::models::enums::Gender;
    use crate::models::{NewAppointment, NewFollowUp, NewPatient};
    use chrono::NaiveTime;

    fn add_patient(conn: &Connection, name: &str, phone: &str) -> i64 {
        insert_patient(
            conn,
            &NewPatient {
                name: name.into(),
                gender: Gender::Female,
                date_of_birth: "30".into(),
                phone_number: phone.into(),
                address: "Pune".into(),
            },
        )
        .unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn empty_database_has_zero_stats() {
        let conn = open_memory_database().unwrap();
        let stats = fetch_dashboard_stats(&conn, &date(1)).unwrap();
        assert_eq!(stats, DashboardStats::default());
    }

    #[test]
    fn stats_count_today_and_pending_only() {
        let conn = open_memory_database().unwrap();
        let asha = add_patient(&conn, "Asha", "9990001111");
        add_patient(&conn, "Ravi", "8880001111");
        let doctor = insert_doctor(&conn, "Dr. Mehta", None).unwrap();
        let pending = find_status_by_name(&conn, "Pending").unwrap().unwrap().id;
        let done = find_status_by_name(&conn, "Completed").unwrap().unwrap().id;

        for d in [1, 1, 2] {
            insert_appointment(
                &conn,
                &NewAppointment {
                    patient_id: asha,
                    doctor_id: doctor,
                    date: date(d),
                    time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                    reason: String::new(),
                    status_id: Some(pending),
                },
            )
            .unwrap();
        }
        for status in [Some(pending), Some(pending), Some(done), None] {
            insert_followup(
                &conn,
                &NewFollowUp {
                    patient_id: asha,
                    doctor_id: None,
                    date: date(4),
                    remarks: String::new(),
                    status_id: status,
                },
            )
            .unwrap();
        }

        let stats = fetch_dashboard_stats(&conn, &date(1)).unwrap();
        assert_eq!(
            stats,
            DashboardStats {
                total_patients: 2,
                total_doctors: 1,
                appointments_today: 2,
                pending_followups: 2,
            }
        );
    }

    #[test]
    fn phone_directory_prefers_latest_duplicate() {
        let conn = open_memory_database().unwrap();
        add_patient(&conn, "Asha", "111");
        add_patient(&conn, "Ravi", "222");
        add_patient(&conn, "Asha", "333");

        let directory = patient_phone_directory(&conn).unwrap();
        assert_eq!(directory.len(), 2);
        assert_eq!(directory["Asha"], "333");
        assert_eq!(directory["Ravi"], "222");

        assert_eq!(
            find_phone_by_patient_name(&conn, "Asha").unwrap().as_deref(),
            Some("333")
        );
        assert!(find_phone_by_patient_name(&conn, "Nobody").unwrap().is_none());
    }
}
