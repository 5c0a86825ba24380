//! Audio intake: persist an uploaded clip under a collision-free handle.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("no audio data provided")]
    Empty,

    #[error("cannot store audio file: {0}")]
    Io(#[from] std::io::Error),
}

/// Process-wide upload sequence. Combined with a millisecond timestamp it
/// guarantees two concurrent uploads never receive the same handle.
static UPLOAD_SEQ: AtomicU64 = AtomicU64::new(0);

/// Writes an uploaded audio clip to `dir` and returns its storage handle.
///
/// The file is durably flushed before the handle is returned, so a
/// subsequent transcription run always sees complete data.
pub fn store_audio(dir: &Path, original_filename: &str, bytes: &[u8]) -> Result<PathBuf, UploadError> {
    if bytes.is_empty() {
        return Err(UploadError::Empty);
    }

    std::fs::create_dir_all(dir)?;

    let seq = UPLOAD_SEQ.fetch_add(1, Ordering::Relaxed);
    let millis = chrono::Utc::now().timestamp_millis();
    let ext = audio_extension(original_filename);
    let path = dir.join(format!("audio-{millis}-{seq}.{ext}"));

    let mut file = File::create(&path)?;
    file.write_all(bytes)?;
    file.sync_all()?;

    tracing::info!(handle = %path.display(), size = bytes.len(), "audio clip stored");
    Ok(path)
}

/// Extension taken from the original filename; uploads from the browser
/// recorder arrive as webm, which is also the fallback.
fn audio_extension(original_filename: &str) -> String {
    Path::new(original_filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| "webm".to_string())
}
