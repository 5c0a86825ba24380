//! Patient aggregate root. Independent of Doctor — no cross-ownership.

use serde::{Deserialize, Serialize};

/// One registered patient, keyed by a business-unique `patient_number`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub patient_number: i64,
    pub name: String,
    pub contact_number: String,
    pub email: String,
    pub age: i64,
    pub gender: String,
    pub blood_group: String,
    pub address: String,
    /// Stored locations of medical-history documents.
    #[serde(default)]
    pub medical_history: Vec<HistoryDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryDocument {
    pub document_name: String,
    pub file_url: String,
}
