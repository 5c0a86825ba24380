//! Voice booking: transcribe, extract, resolve, merge, persist.

use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

use crate::db::repository::{doctor, patient};
use crate::db::{open_database, DatabaseError};
use crate::pipeline::extraction::{
    build_extraction_prompt, parse_extraction, ExtractionError, ExtractionResult, LlmClient,
};
use crate::pipeline::schedule::{merge_appointment, DoctorLocks};
use crate::pipeline::transcription::{Transcriber, TranscriptionError};

#[derive(Debug, Error)]
pub enum BookingError {
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// What the caller gets back after a successful booking.
#[derive(Debug, serde::Serialize)]
pub struct BookingOutcome {
    pub transcript: String,
    pub extraction: ExtractionResult,
}

/// The voice-to-appointment pipeline. One instance is shared by all
/// requests; per-request state lives on the stack of [`run`](Self::run).
pub struct VoiceBookingPipeline<T: Transcriber, L: LlmClient> {
    transcriber: T,
    llm: L,
    model: String,
    locks: DoctorLocks,
}

impl<T: Transcriber, L: LlmClient> VoiceBookingPipeline<T, L> {
    pub fn new(transcriber: T, llm: L, model: String, locks: DoctorLocks) -> Self {
        Self {
            transcriber,
            llm,
            model,
            locks,
        }
    }

    /// Runs the full pipeline for one stored audio clip.
    ///
    /// The database connection is opened only after the external calls
    /// finish, under the doctor's lock, so the schedule read-modify-write
    /// is never interleaved with another booking for the same doctor.
    /// Nothing is persisted unless every stage succeeds.
    pub async fn run(
        &self,
        db_path: &Path,
        audio: &Path,
        today: NaiveDate,
    ) -> Result<BookingOutcome, BookingError> {
        let transcript = self.transcriber.transcribe(audio).await?;
        tracing::info!(chars = transcript.len(), "transcription complete");

        let prompt = build_extraction_prompt(&transcript);
        let reply = self.llm.generate(&self.model, &prompt).await?;
        let extraction = parse_extraction(&reply)?;
        tracing::info!(
            doctor_number = extraction.doctor_number,
            patient_number = extraction.patient_number,
            "appointment fields extracted"
        );

        let _guard = self.locks.acquire(extraction.doctor_number).await;

        let conn = open_database(db_path)?;
        let mut doc = doctor::find_by_number(&conn, extraction.doctor_number)?;
        // Resolve the patient before touching the schedule; an unknown
        // patient number aborts the booking with nothing written.
        patient::find_by_number(&conn, extraction.patient_number)?;

        merge_appointment(
            &mut doc.schedule,
            today,
            &extraction.appointment_time,
            extraction.patient_number,
        );
        doctor::save_schedule(&conn, doc.doctor_number, &doc.schedule)?;
        tracing::info!(
            doctor_number = doc.doctor_number,
            date = %today,
            "appointment merged into schedule"
        );

        Ok(BookingOutcome {
            transcript,
            extraction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{doctor::NewDoctor, patient::NewPatient};
    use crate::pipeline::extraction::ollama::MockLlmClient;
    use std::future::Future;
    use std::path::PathBuf;

    struct MockTranscriber {
        transcript: Result<String, ()>,
    }

    impl Transcriber for MockTranscriber {
        fn transcribe(
            &self,
            _audio: &Path,
        ) -> impl Future<Output = Result<String, TranscriptionError>> + Send {
            let out = self
                .transcript
                .clone()
                .map_err(|_| TranscriptionError::EmptyTranscript);
            async move { out }
        }
    }

    fn seeded_db() -> (tempfile::TempDir, PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("clinic.db");
        let conn = open_database(&db_path).unwrap();
        doctor::insert(
            &conn,
            &NewDoctor {
                doctor_number: 7,
                name: "Dr. Chen".into(),
                specialization: "General Medicine".into(),
                experience: 12,
                phone: "5550100200".into(),
                email: "chen@clinic.test".into(),
                gender: "Female".into(),
                qualifications: vec!["MBBS".into()],
                ratings: 4.5,
            },
        )
        .unwrap();
        patient::insert(
            &conn,
            &NewPatient {
                patient_number: 42,
                name: "Alice Johnson".into(),
                contact_number: "5550300400".into(),
                email: "alice@example.test".into(),
                age: 32,
                gender: "Female".into(),
                blood_group: "O+".into(),
                address: String::new(),
                medical_history: Vec::new(),
            },
        )
        .unwrap();
        (tmp, db_path)
    }

    fn pipeline(reply: &str) -> VoiceBookingPipeline<MockTranscriber, MockLlmClient> {
        VoiceBookingPipeline::new(
            MockTranscriber {
                transcript: Ok("Book doctor 7 for patient 42, headache, 3 PM".into()),
            },
            MockLlmClient::new(reply),
            "medgemma".into(),
            DoctorLocks::new(),
        )
    }

    fn today() -> NaiveDate {
        "2026-08-23".parse().unwrap()
    }

    #[tokio::test]
    async fn successful_booking_writes_schedule() {
        let (_tmp, db_path) = seeded_db();
        let p = pipeline(r#"{"dn": 7, "pn": 42, "ds": "headache", "time": "3:00 PM"}"#);

        let outcome = p.run(&db_path, Path::new("unused.webm"), today()).await.unwrap();
        assert_eq!(outcome.extraction.doctor_number, 7);
        assert_eq!(outcome.extraction.disease, "headache");

        let conn = open_database(&db_path).unwrap();
        let doc = doctor::find_by_number(&conn, 7).unwrap();
        assert_eq!(doc.schedule.len(), 1);
        assert_eq!(doc.schedule[0].date, today());
        assert_eq!(doc.schedule[0].appointments[0].patient_number, 42);
        assert_eq!(doc.schedule[0].appointments[0].time, "3:00 PM");
    }

    #[tokio::test]
    async fn second_booking_same_day_appends() {
        let (_tmp, db_path) = seeded_db();
        let p = pipeline(r#"{"dn": 7, "pn": 42, "ds": "headache", "time": "3:00 PM"}"#);
        p.run(&db_path, Path::new("a.webm"), today()).await.unwrap();

        let p2 = pipeline(r#"{"dn": 7, "pn": 42, "ds": "follow-up", "time": "4:00 PM"}"#);
        p2.run(&db_path, Path::new("b.webm"), today()).await.unwrap();

        let conn = open_database(&db_path).unwrap();
        let doc = doctor::find_by_number(&conn, 7).unwrap();
        assert_eq!(doc.schedule.len(), 1);
        assert_eq!(doc.schedule[0].appointments.len(), 2);
        assert_eq!(doc.schedule[0].appointments[1].time, "4:00 PM");
    }

    #[tokio::test]
    async fn unknown_doctor_aborts_without_writes() {
        let (_tmp, db_path) = seeded_db();
        let p = pipeline(r#"{"dn": 99, "pn": 42, "ds": "headache", "time": "3:00 PM"}"#);
        let err = p.run(&db_path, Path::new("a.webm"), today()).await.unwrap_err();
        assert!(matches!(
            err,
            BookingError::Database(DatabaseError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_patient_aborts_without_writes() {
        let (_tmp, db_path) = seeded_db();
        let p = pipeline(r#"{"dn": 7, "pn": 404, "ds": "headache", "time": "3:00 PM"}"#);
        let err = p.run(&db_path, Path::new("a.webm"), today()).await.unwrap_err();
        assert!(matches!(
            err,
            BookingError::Database(DatabaseError::NotFound { .. })
        ));

        let conn = open_database(&db_path).unwrap();
        let doc = doctor::find_by_number(&conn, 7).unwrap();
        assert!(doc.schedule.is_empty());
    }

    #[tokio::test]
    async fn unusable_model_reply_aborts() {
        let (_tmp, db_path) = seeded_db();
        let p = pipeline("I do not see any appointment details here.");
        let err = p.run(&db_path, Path::new("a.webm"), today()).await.unwrap_err();
        assert!(matches!(
            err,
            BookingError::Extraction(ExtractionError::NoPayload)
        ));
    }

    #[tokio::test]
    async fn transcription_failure_aborts() {
        let (_tmp, db_path) = seeded_db();
        let p = VoiceBookingPipeline::new(
            MockTranscriber {
                transcript: Err(()),
            },
            MockLlmClient::new("{}"),
            "medgemma".into(),
            DoctorLocks::new(),
        );
        let err = p.run(&db_path, Path::new("a.webm"), today()).await.unwrap_err();
        assert!(matches!(err, BookingError::Transcription(_)));
    }
}
