//! Transcription via an external speech-to-text process.
//!
//! Contract: the process is invoked with the audio file path as its sole
//! extra argument, writes the transcript to stdout and exits 0 on success.
//! Diagnostics on stderr are logged, never surfaced to callers.

use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("cannot start transcription process: {0}")]
    Spawn(String),

    #[error("transcription process failed")]
    ProcessFailed { exit_code: Option<i32> },

    #[error("transcription timed out after {0}s")]
    TimedOut(u64),

    #[error("transcription produced no text")]
    EmptyTranscript,
}

/// Seam for the speech-to-text step so the booking pipeline can run against
/// a fake in tests.
pub trait Transcriber: Send + Sync {
    fn transcribe(
        &self,
        audio: &Path,
    ) -> impl Future<Output = Result<String, TranscriptionError>> + Send;
}

/// Runs a configured command (e.g. `python3 transcribe.py`) against the
/// stored audio file, bounded by a hard timeout. `kill_on_drop` guarantees a
/// hung process does not outlive a timed-out or cancelled request.
pub struct ProcessTranscriber {
    program: String,
    base_args: Vec<String>,
    timeout: Duration,
}

impl ProcessTranscriber {
    /// Splits `command` on whitespace into program + leading arguments.
    pub fn new(command: &str, timeout: Duration) -> Self {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_else(|| "python3".to_string());
        Self {
            program,
            base_args: parts.collect(),
            timeout,
        }
    }
}

impl Transcriber for ProcessTranscriber {
    fn transcribe(
        &self,
        audio: &Path,
    ) -> impl Future<Output = Result<String, TranscriptionError>> + Send {
        let audio = audio.to_path_buf();
        async move {
            let mut command = Command::new(&self.program);
            command
                .args(&self.base_args)
                .arg(&audio)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true);

            let timeout_secs = self.timeout.as_secs();
            let output = tokio::time::timeout(self.timeout, command.output())
                .await
                .map_err(|_| {
                    tracing::warn!(audio = %audio.display(), timeout_secs, "transcription timed out");
                    TranscriptionError::TimedOut(timeout_secs)
                })?
                .map_err(|e| TranscriptionError::Spawn(e.to_string()))?;

            if !output.status.success() {
                // Keep the process's own diagnostics out of the response path.
                tracing::warn!(
                    exit_code = ?output.status.code(),
                    stderr = %String::from_utf8_lossy(&output.stderr),
                    "transcription process failed"
                );
                return Err(TranscriptionError::ProcessFailed {
                    exit_code: output.status.code(),
                });
            }

            let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if transcript.is_empty() {
                return Err(TranscriptionError::EmptyTranscript);
            }
            Ok(transcript)
        }
    }
}
