//! Doctor aggregate: profile fields plus the nested per-date schedule.
//!
//! The schedule is owned exclusively by the doctor and persisted as one JSON
//! document. Appointments reference patients by `patient_number` only —
//! never an embedded copy — so the patient record stays the single owner of
//! its own fields.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One clinic doctor, keyed by a business-unique `doctor_number` in addition
/// to the storage-internal row id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub doctor_number: i64,
    pub name: String,
    pub specialization: String,
    pub experience: i64,
    pub phone: String,
    pub email: String,
    pub gender: String,
    pub qualifications: Vec<String>,
    pub ratings: f64,
    /// Ordered date buckets; at most one entry per calendar date.
    pub schedule: Vec<DateEntry>,
}

/// All appointments for one calendar date. Insertion order = arrival order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateEntry {
    pub date: NaiveDate,
    pub appointments: Vec<Appointment>,
}

/// A single booked slot. `patient_number` is a weak reference — resolving it
/// to a full patient record is an explicit lookup step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub patient_number: i64,
    /// Free-form time-of-day string, e.g. "3:30 PM".
    pub time: String,
    #[serde(default)]
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}
