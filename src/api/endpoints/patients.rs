//! Patient registration.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::open_database;
use crate::db::repository::patient;

#[derive(Serialize)]
pub struct CreatePatientResponse {
    pub id: String,
    pub patient_number: i64,
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Json(new): Json<patient::NewPatient>,
) -> Result<Json<CreatePatientResponse>, ApiError> {
    let conn = open_database(&ctx.config.db_path)?;
    let id = patient::insert(&conn, &new)?;
    tracing::info!(patient_number = new.patient_number, "patient registered");
    Ok(Json(CreatePatientResponse {
        id,
        patient_number: new.patient_number,
    }))
}
