use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUp {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: Option<i64>,
    pub date: NaiveDate,
    pub remarks: String,
    pub status_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFollowUp {
    pub patient_id: i64,
    pub doctor_id: Option<i64>,
    pub date: NaiveDate,
    pub remarks: String,
    pub status_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpListing {
    pub id: i64,
    pub patient_id: i64,
    pub patient_name: Option<String>,
    pub patient_phone: Option<String>,
    pub doctor_name: Option<String>,
    pub date: NaiveDate,
    pub remarks: String,
    pub status: Option<String>,
    /// Follow-ups recorded for the same patient, this one included.
    pub followup_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientFollowUpCount {
    pub patient_id: i64,
    pub patient_name: String,
    pub followup_count: u32,
}
