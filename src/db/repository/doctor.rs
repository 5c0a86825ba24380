//! Doctor repository. The schedule column is one JSON document read and
//! written as a whole; callers that merge appointments must hold the
//! per-doctor lock (see `pipeline::schedule::DoctorLocks`) around the
//! read-modify-write cycle.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{DateEntry, Doctor};

/// Fields supplied when registering a new doctor.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDoctor {
    pub doctor_number: i64,
    pub name: String,
    pub specialization: String,
    #[serde(default)]
    pub experience: i64,
    pub phone: String,
    pub email: String,
    pub gender: String,
    #[serde(default)]
    pub qualifications: Vec<String>,
    #[serde(default)]
    pub ratings: f64,
}

/// Inserts a new doctor with an empty schedule and returns the row id.
pub fn insert(conn: &Connection, new: &NewDoctor) -> Result<String, DatabaseError> {
    let id = Uuid::new_v4().to_string();
    let qualifications = serde_json::to_string(&new.qualifications)
        .map_err(|e| corrupt("Doctor", new.doctor_number, e))?;

    let result = conn.execute(
        "INSERT INTO doctors (id, doctor_number, name, specialization, experience,
                              phone, email, gender, qualifications, ratings, schedule)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, '[]')",
        params![
            id,
            new.doctor_number,
            new.name,
            new.specialization,
            new.experience,
            new.phone,
            new.email,
            new.gender,
            qualifications,
            new.ratings,
        ],
    );

    match result {
        Ok(_) => Ok(id),
        Err(e) if is_unique_violation(&e) => Err(DatabaseError::DuplicateKey {
            entity_type: "Doctor".into(),
            number: new.doctor_number,
        }),
        Err(e) => Err(e.into()),
    }
}

/// Looks up a doctor by business number, schedule included.
pub fn find_by_number(conn: &Connection, doctor_number: i64) -> Result<Doctor, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, doctor_number, name, specialization, experience,
                    phone, email, gender, qualifications, ratings, schedule
             FROM doctors WHERE doctor_number = ?1",
            params![doctor_number],
            map_doctor_row,
        )
        .optional()?;

    match row {
        Some((doctor, qualifications_json, schedule_json)) => {
            hydrate(doctor, &qualifications_json, &schedule_json)
        }
        None => Err(DatabaseError::NotFound {
            entity_type: "Doctor".into(),
            number: doctor_number,
        }),
    }
}

/// Lists all doctors ordered by doctor number.
pub fn list(conn: &Connection) -> Result<Vec<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, doctor_number, name, specialization, experience,
                phone, email, gender, qualifications, ratings, schedule
         FROM doctors ORDER BY doctor_number ASC",
    )?;
    let rows = stmt.query_map([], map_doctor_row)?;

    let mut doctors = Vec::new();
    for row in rows {
        let (doctor, qualifications_json, schedule_json) = row?;
        doctors.push(hydrate(doctor, &qualifications_json, &schedule_json)?);
    }
    Ok(doctors)
}

/// Persists the whole schedule document for a doctor.
pub fn save_schedule(
    conn: &Connection,
    doctor_number: i64,
    schedule: &[DateEntry],
) -> Result<(), DatabaseError> {
    let json =
        serde_json::to_string(schedule).map_err(|e| corrupt("Doctor", doctor_number, e))?;
    let changed = conn.execute(
        "UPDATE doctors SET schedule = ?1 WHERE doctor_number = ?2",
        params![json, doctor_number],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Doctor".into(),
            number: doctor_number,
        });
    }
    Ok(())
}

type DoctorRow = (Doctor, String, String);

fn map_doctor_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DoctorRow> {
    let doctor = Doctor {
        id: row.get(0)?,
        doctor_number: row.get(1)?,
        name: row.get(2)?,
        specialization: row.get(3)?,
        experience: row.get(4)?,
        phone: row.get(5)?,
        email: row.get(6)?,
        gender: row.get(7)?,
        qualifications: Vec::new(),
        ratings: row.get(9)?,
        schedule: Vec::new(),
    };
    let qualifications_json: String = row.get(8)?;
    let schedule_json: String = row.get(10)?;
    Ok((doctor, qualifications_json, schedule_json))
}

fn hydrate(
    mut doctor: Doctor,
    qualifications_json: &str,
    schedule_json: &str,
) -> Result<Doctor, DatabaseError> {
    doctor.qualifications = serde_json::from_str(qualifications_json)
        .map_err(|e| corrupt("Doctor", doctor.doctor_number, e))?;
    doctor.schedule = serde_json::from_str(schedule_json)
        .map_err(|e| corrupt("Doctor", doctor.doctor_number, e))?;
    Ok(doctor)
}

fn corrupt(entity_type: &str, number: i64, e: serde_json::Error) -> DatabaseError {
    DatabaseError::CorruptDocument {
        entity_type: entity_type.into(),
        number,
        reason: e.to_string(),
    }
}

pub(crate) fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::models::{Appointment, AppointmentStatus};
    use chrono::NaiveDate;

    fn sample_doctor(number: i64) -> NewDoctor {
        NewDoctor {
            doctor_number: number,
            name: "Dr. Chen".into(),
            specialization: "General Medicine".into(),
            experience: 12,
            phone: "5550100200".into(),
            email: format!("chen{number}@clinic.test"),
            gender: "Female".into(),
            qualifications: vec!["MBBS".into(), "MD".into()],
            ratings: 4.5,
        }
    }

    #[test]
    fn insert_and_find_round_trip() {
        let conn = open_memory_database().unwrap();
        insert(&conn, &sample_doctor(7)).unwrap();

        let doctor = find_by_number(&conn, 7).unwrap();
        assert_eq!(doctor.doctor_number, 7);
        assert_eq!(doctor.name, "Dr. Chen");
        assert_eq!(doctor.qualifications, vec!["MBBS", "MD"]);
        assert!(doctor.schedule.is_empty());
    }

    #[test]
    fn find_missing_doctor_is_not_found() {
        let conn = open_memory_database().unwrap();
        let err = find_by_number(&conn, 99).unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::NotFound { ref entity_type, number: 99 } if entity_type == "Doctor"
        ));
    }

    #[test]
    fn duplicate_doctor_number_rejected() {
        let conn = open_memory_database().unwrap();
        insert(&conn, &sample_doctor(7)).unwrap();
        let mut dup = sample_doctor(7);
        dup.email = "other@clinic.test".into();
        let err = insert(&conn, &dup).unwrap_err();
        assert!(matches!(err, DatabaseError::DuplicateKey { number: 7, .. }));
    }

    #[test]
    fn save_schedule_persists_document() {
        let conn = open_memory_database().unwrap();
        insert(&conn, &sample_doctor(7)).unwrap();

        let schedule = vec![DateEntry {
            date: NaiveDate::from_ymd_opt(2026, 8, 23).unwrap(),
            appointments: vec![Appointment {
                patient_number: 42,
                time: "3:00 PM".into(),
                status: AppointmentStatus::Scheduled,
            }],
        }];
        save_schedule(&conn, 7, &schedule).unwrap();

        let doctor = find_by_number(&conn, 7).unwrap();
        assert_eq!(doctor.schedule.len(), 1);
        assert_eq!(doctor.schedule[0].appointments[0].patient_number, 42);
    }

    #[test]
    fn save_schedule_for_missing_doctor_fails() {
        let conn = open_memory_database().unwrap();
        let err = save_schedule(&conn, 99, &[]).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn list_orders_by_number() {
        let conn = open_memory_database().unwrap();
        insert(&conn, &sample_doctor(9)).unwrap();
        insert(&conn, &sample_doctor(3)).unwrap();
        let doctors = list(&conn).unwrap();
        assert_eq!(doctors.len(), 2);
        assert_eq!(doctors[0].doctor_number, 3);
        assert_eq!(doctors[1].doctor_number, 9);
    }
}
