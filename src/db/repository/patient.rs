//! Patient repository.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::repository::doctor::is_unique_violation;
use crate::db::DatabaseError;
use crate::models::{HistoryDocument, Patient};

/// Fields supplied when registering a new patient.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPatient {
    pub patient_number: i64,
    pub name: String,
    pub contact_number: String,
    pub email: String,
    pub age: i64,
    pub gender: String,
    #[serde(default = "default_blood_group")]
    pub blood_group: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub medical_history: Vec<HistoryDocument>,
}

fn default_blood_group() -> String {
    "Unknown".to_string()
}

/// Inserts a new patient and returns the row id.
pub fn insert(conn: &Connection, new: &NewPatient) -> Result<String, DatabaseError> {
    let id = Uuid::new_v4().to_string();
    let history = serde_json::to_string(&new.medical_history).map_err(|e| {
        DatabaseError::CorruptDocument {
            entity_type: "Patient".into(),
            number: new.patient_number,
            reason: e.to_string(),
        }
    })?;

    let result = conn.execute(
        "INSERT INTO patients (id, patient_number, name, contact_number, email,
                               age, gender, blood_group, address, medical_history)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            id,
            new.patient_number,
            new.name,
            new.contact_number,
            new.email,
            new.age,
            new.gender,
            new.blood_group,
            new.address,
            history,
        ],
    );

    match result {
        Ok(_) => Ok(id),
        Err(e) if is_unique_violation(&e) => Err(DatabaseError::DuplicateKey {
            entity_type: "Patient".into(),
            number: new.patient_number,
        }),
        Err(e) => Err(e.into()),
    }
}

/// Looks up a patient by business number.
pub fn find_by_number(conn: &Connection, patient_number: i64) -> Result<Patient, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, patient_number, name, contact_number, email,
                    age, gender, blood_group, address, medical_history
             FROM patients WHERE patient_number = ?1",
            params![patient_number],
            |row| {
                let history_json: String = row.get(9)?;
                Ok((
                    Patient {
                        id: row.get(0)?,
                        patient_number: row.get(1)?,
                        name: row.get(2)?,
                        contact_number: row.get(3)?,
                        email: row.get(4)?,
                        age: row.get(5)?,
                        gender: row.get(6)?,
                        blood_group: row.get(7)?,
                        address: row.get(8)?,
                        medical_history: Vec::new(),
                    },
                    history_json,
                ))
            },
        )
        .optional()?;

    match row {
        Some((mut patient, history_json)) => {
            patient.medical_history = serde_json::from_str(&history_json).map_err(|e| {
                DatabaseError::CorruptDocument {
                    entity_type: "Patient".into(),
                    number: patient_number,
                    reason: e.to_string(),
                }
            })?;
            Ok(patient)
        }
        None => Err(DatabaseError::NotFound {
            entity_type: "Patient".into(),
            number: patient_number,
        }),
    }
}
