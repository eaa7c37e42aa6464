use serde::{Deserialize, Serialize};

use super::enums::Gender;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub gender: Gender,
    /// Either a birth date or an age, as typed at the front desk.
    pub date_of_birth: String,
    pub phone_number: String,
    pub address: String,
}

/// Editable patient fields, used for both insert and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub gender: Gender,
    pub date_of_birth: String,
    pub phone_number: String,
    pub address: String,
}

/// Selector entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientOption {
    pub id: i64,
    pub name: String,
}

/// Patient row for the register table, with visit counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub id: i64,
    pub name: String,
    pub gender: Gender,
    pub date_of_birth: String,
    pub phone_number: String,
    pub address: String,
    pub appointment_count: u32,
    pub followup_count: u32,
}
