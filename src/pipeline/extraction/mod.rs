//! Structured appointment extraction from a free-text transcript.
//!
//! The transcript is embedded in a fixed prompt, sent to the local
//! generative-language service, and the reply — treated as untrusted,
//! semi-structured text — is parsed and schema-validated before use.

pub mod ollama;
pub mod parser;
pub mod prompt;

use thiserror::Error;

pub use ollama::{LlmClient, OllamaClient};
pub use parser::parse_extraction;
pub use prompt::build_extraction_prompt;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("language model unreachable at {0}")]
    Connection(String),

    #[error("language model request failed: {0}")]
    HttpClient(String),

    #[error("language model returned status {status}")]
    UpstreamStatus { status: u16 },

    #[error("no structured payload found")]
    NoPayload,

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),
}

/// The validated record recovered from one model reply. Consumed once by
/// entity resolution and the schedule merge, then discarded.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ExtractionResult {
    pub doctor_number: i64,
    pub patient_number: i64,
    pub disease: String,
    pub appointment_time: String,
}
