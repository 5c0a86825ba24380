//! Date-bucketed schedule merge and per-doctor write serialization.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::models::{Appointment, AppointmentStatus, DateEntry};

/// Merges one appointment into a doctor's schedule document.
///
/// Matching is by calendar date only; the time string is payload, never a
/// bucket key. Repeat submissions accumulate — callers wanting idempotence
/// must deduplicate before merging. Returns `true` when a new date bucket
/// was created.
pub fn merge_appointment(
    schedule: &mut Vec<DateEntry>,
    date: NaiveDate,
    time: &str,
    patient_number: i64,
) -> bool {
    let appointment = Appointment {
        patient_number,
        time: time.to_string(),
        status: AppointmentStatus::Scheduled,
    };

    if let Some(entry) = schedule.iter_mut().find(|e| e.date == date) {
        entry.appointments.push(appointment);
        return false;
    }

    schedule.push(DateEntry {
        date,
        appointments: vec![appointment],
    });
    true
}

/// One async mutex per doctor number, created on first use.
///
/// The booking pipeline holds a doctor's lock across its whole
/// read-modify-write of the schedule document, so two bookings for the same
/// doctor can never overwrite each other's merge. Locks for distinct doctors
/// are independent.
#[derive(Clone, Default)]
pub struct DoctorLocks {
    inner: Arc<Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>>,
}

impl DoctorLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, doctor_number: i64) -> tokio::sync::OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().expect("doctor lock registry poisoned");
            map.entry(doctor_number)
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
