use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "ClinicDesk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    "clinicdesk=info,tower_http=info".to_string()
}

/// Get the application data directory
/// ~/ClinicDesk/ on all platforms (user-visible, per front-desk requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("ClinicDesk")
}

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory where uploaded audio clips are stored.
    pub audio_dir: PathBuf,
    /// Directory where rendered prescription PDFs are stored.
    pub prescriptions_dir: PathBuf,
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Command line invoking the external speech-to-text process.
    /// The audio file path is appended as the final argument.
    pub transcribe_command: String,
    /// Upper bound on one transcription run.
    pub transcribe_timeout: Duration,
    /// Base URL of the local generative-language service.
    pub llm_base_url: String,
    /// Model name passed to the language service.
    pub llm_model: String,
    /// Timeout for one language-model generation.
    pub llm_timeout: Duration,
    /// WebSocket endpoint of the prescription-generation worker.
    pub worker_endpoint: String,
    /// Timeout for one worker exchange (connect, send, await).
    pub worker_timeout: Duration,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
}

impl AppConfig {
    /// Build configuration from environment variables, falling back to
    /// defaults rooted in the app data directory.
    pub fn from_env() -> Self {
        let data_dir = std::env::var("CLINICDESK_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| app_data_dir());

        Self {
            audio_dir: data_dir.join("audio"),
            prescriptions_dir: data_dir.join("prescriptions"),
            db_path: data_dir.join("clinic.db"),
            transcribe_command: std::env::var("CLINICDESK_TRANSCRIBE_CMD")
                .unwrap_or_else(|_| "python3 transcribe.py".to_string()),
            transcribe_timeout: Duration::from_secs(
                env_u64("CLINICDESK_TRANSCRIBE_TIMEOUT_SECS", 60),
            ),
            llm_base_url: std::env::var("CLINICDESK_LLM_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            llm_model: std::env::var("CLINICDESK_LLM_MODEL")
                .unwrap_or_else(|_| "medgemma".to_string()),
            llm_timeout: Duration::from_secs(env_u64("CLINICDESK_LLM_TIMEOUT_SECS", 120)),
            worker_endpoint: std::env::var("CLINICDESK_WORKER_URL")
                .unwrap_or_else(|_| "ws://localhost:8765".to_string()),
            worker_timeout: Duration::from_secs(env_u64("CLINICDESK_WORKER_TIMEOUT_SECS", 30)),
            bind_addr: std::env::var("CLINICDESK_BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:3000".to_string()),
        }
    }

    /// Configuration rooted in an explicit directory (used by tests).
    pub fn with_data_dir(data_dir: &std::path::Path) -> Self {
        let mut config = Self::from_env();
        config.audio_dir = data_dir.join("audio");
        config.prescriptions_dir = data_dir.join("prescriptions");
        config.db_path = data_dir.join("clinic.db");
        config
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("ClinicDesk"));
    }

    #[test]
    fn with_data_dir_roots_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig::with_data_dir(tmp.path());
        assert!(config.audio_dir.starts_with(tmp.path()));
        assert!(config.prescriptions_dir.ends_with("prescriptions"));
        assert!(config.db_path.ends_with("clinic.db"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
