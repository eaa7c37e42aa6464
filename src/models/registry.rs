use serde::{Deserialize, Serialize};

/// Row of a named lookup table (statuses, specializations).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub id: i64,
    pub name: String,
}

pub type Status = LookupEntry;
pub type Specialization = LookupEntry;
