//! The clinical-workflow pipeline: voice-to-appointment booking.
//!
//! Stages compose strictly sequentially — audio intake, transcription,
//! structured extraction, entity resolution, schedule merge. A failed stage
//! aborts the remainder of its pipeline; no stage retries automatically.

pub mod booking;
pub mod extraction;
pub mod intake;
pub mod schedule;
pub mod transcription;
