//! Prescription generation and PDF download.

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::render::{normalize_medications, render_prescription_pdf, write_prescription_file};
use crate::worker::{PrescriptionReply, PrescriptionRequest};

/// Forwards the patient context to the prescription worker and returns the
/// generated prescription verbatim.
pub async fn generate(
    State(ctx): State<ApiContext>,
    Json(request): Json<PrescriptionRequest>,
) -> Result<Json<PrescriptionReply>, ApiError> {
    let reply = ctx.worker.generate_prescription(&request).await?;
    tracing::info!(prescription_id = %reply.prescription_id, "prescription generated");
    Ok(Json(reply))
}

/// Client-edited prescription content to render. `medications` arrives as
/// one newline-separated string, the shape the editing textarea produces.
#[derive(Debug, Deserialize)]
pub struct PdfRequest {
    pub prescription_id: String,
    pub patient_name: String,
    pub medications: String,
}

/// Renders the (possibly edited) prescription to PDF, archives a copy under
/// the prescriptions directory and returns the bytes as a download.
pub async fn pdf(
    State(ctx): State<ApiContext>,
    Json(request): Json<PdfRequest>,
) -> Result<(HeaderMap, Vec<u8>), ApiError> {
    let lines: Vec<String> = request.medications.lines().map(str::to_string).collect();
    let medications = normalize_medications(&lines);

    let bytes = render_prescription_pdf(
        &request.prescription_id,
        &request.patient_name,
        &medications,
    )?;
    write_prescription_file(
        &ctx.config.prescriptions_dir,
        &request.prescription_id,
        &bytes,
    )?;

    let filename = format!(
        "{}_prescription.pdf",
        sanitize_filename(&request.patient_name)
    );
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
            .map_err(|e| ApiError::Internal(e.to_string()))?,
    );
    Ok((headers, bytes))
}

/// Keeps header values well-formed regardless of what the patient name holds.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "patient".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_are_header_safe() {
        assert_eq!(sanitize_filename("Alice Johnson"), "Alice_Johnson");
        assert_eq!(sanitize_filename("O'Brien, Pat"), "O_Brien__Pat");
        assert_eq!(sanitize_filename("\"quoted\"\r\n"), "_quoted___");
        assert_eq!(sanitize_filename(""), "patient");
    }
}
