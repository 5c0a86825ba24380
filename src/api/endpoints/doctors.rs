//! Doctor registration, listing and the resolved schedule view.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::{doctor, patient};
use crate::db::{open_database, DatabaseError};
use crate::models::{AppointmentStatus, Doctor};

#[derive(Serialize)]
pub struct CreateDoctorResponse {
    pub id: String,
    pub doctor_number: i64,
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Json(new): Json<doctor::NewDoctor>,
) -> Result<Json<CreateDoctorResponse>, ApiError> {
    let conn = open_database(&ctx.config.db_path)?;
    let id = doctor::insert(&conn, &new)?;
    tracing::info!(doctor_number = new.doctor_number, "doctor registered");
    Ok(Json(CreateDoctorResponse {
        id,
        doctor_number: new.doctor_number,
    }))
}

#[derive(Serialize)]
pub struct DoctorListResponse {
    pub doctors: Vec<Doctor>,
}

pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<DoctorListResponse>, ApiError> {
    let conn = open_database(&ctx.config.db_path)?;
    let doctors = doctor::list(&conn)?;
    Ok(Json(DoctorListResponse { doctors }))
}

/// One appointment in the schedule view, with the patient name resolved.
#[derive(Serialize)]
pub struct ScheduleAppointment {
    pub patient_number: i64,
    pub patient_name: String,
    pub time: String,
    pub status: AppointmentStatus,
}

#[derive(Serialize)]
pub struct ScheduleDay {
    pub date: chrono::NaiveDate,
    pub appointments: Vec<ScheduleAppointment>,
}

#[derive(Serialize)]
pub struct ScheduleResponse {
    pub doctor_number: i64,
    pub doctor_name: String,
    pub schedule: Vec<ScheduleDay>,
}

/// Resolved schedule for one doctor. A patient number with no matching row
/// still shows, labeled as unknown, so the schedule never hides a booking.
pub async fn schedule(
    State(ctx): State<ApiContext>,
    Path(doctor_number): Path<i64>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let conn = open_database(&ctx.config.db_path)?;
    let doc = doctor::find_by_number(&conn, doctor_number)?;

    let mut schedule = Vec::with_capacity(doc.schedule.len());
    for entry in &doc.schedule {
        let mut appointments = Vec::with_capacity(entry.appointments.len());
        for appointment in &entry.appointments {
            let patient_name = match patient::find_by_number(&conn, appointment.patient_number) {
                Ok(p) => p.name,
                Err(DatabaseError::NotFound { .. }) => "Unknown patient".to_string(),
                Err(e) => return Err(e.into()),
            };
            appointments.push(ScheduleAppointment {
                patient_number: appointment.patient_number,
                patient_name,
                time: appointment.time.clone(),
                status: appointment.status,
            });
        }
        schedule.push(ScheduleDay {
            date: entry.date,
            appointments,
        });
    }

    Ok(Json(ScheduleResponse {
        doctor_number: doc.doctor_number,
        doctor_name: doc.name,
        schedule,
    }))
}
