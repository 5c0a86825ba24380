//! Voice appointment booking.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::extraction::ExtractionResult;
use crate::pipeline::intake::store_audio;

#[derive(Serialize)]
pub struct VoiceBookingResponse {
    pub message: &'static str,
    pub transcription: String,
    pub extraction: ExtractionResult,
}

/// Accepts one multipart upload under the `audio` field, runs the booking
/// pipeline against it and reports the transcript plus extracted fields.
pub async fn voice(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<VoiceBookingResponse>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("audio") {
            let filename = field.file_name().unwrap_or("recording.webm").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("unreadable audio field: {e}")))?;
            upload = Some((filename, bytes.to_vec()));
            break;
        }
    }

    let (filename, bytes) =
        upload.ok_or_else(|| ApiError::BadRequest("no audio file provided".to_string()))?;
    let audio_path = store_audio(&ctx.config.audio_dir, &filename, &bytes)?;

    let today = chrono::Local::now().date_naive();
    let outcome = ctx
        .booking
        .run(&ctx.config.db_path, &audio_path, today)
        .await?;

    Ok(Json(VoiceBookingResponse {
        message: "Appointment added to doctor schedule",
        transcription: outcome.transcript,
        extraction: outcome.extraction,
    }))
}
