//! Shared state handed to every endpoint handler.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::pipeline::booking::VoiceBookingPipeline;
use crate::pipeline::extraction::OllamaClient;
use crate::pipeline::schedule::DoctorLocks;
use crate::pipeline::transcription::ProcessTranscriber;
use crate::worker::WorkerClient;

/// Everything a handler needs: configuration, the booking pipeline and the
/// prescription worker client. Cheap to clone; all members are shared.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<AppConfig>,
    pub booking: Arc<VoiceBookingPipeline<ProcessTranscriber, OllamaClient>>,
    pub worker: Arc<WorkerClient>,
}

impl ApiContext {
    pub fn new(config: AppConfig) -> Self {
        let transcriber =
            ProcessTranscriber::new(&config.transcribe_command, config.transcribe_timeout);
        let llm = OllamaClient::new(&config.llm_base_url, config.llm_timeout);
        let booking = VoiceBookingPipeline::new(
            transcriber,
            llm,
            config.llm_model.clone(),
            DoctorLocks::new(),
        );
        let worker = WorkerClient::new(&config.worker_endpoint, config.worker_timeout);

        Self {
            config: Arc::new(config),
            booking: Arc::new(booking),
            worker: Arc::new(worker),
        }
    }
}
