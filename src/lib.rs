//! ClinicDesk — clinic front-desk service.
//!
//! Two workflows around a local SQLite store: voice appointment booking
//! (audio upload, external transcription, structured extraction, schedule
//! merge) and prescription generation (worker exchange over WebSocket, PDF
//! rendering). Served over an axum HTTP API.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod worker;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
