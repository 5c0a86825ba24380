//! HTTP client for the local Ollama generation endpoint.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Seam for the generation step so the booking pipeline can run against a
/// canned reply in tests.
pub trait LlmClient: Send + Sync {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<String, ExtractionError>> + Send;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Blocking (non-streaming) client for `POST /api/generate`.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

impl LlmClient for OllamaClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<String, ExtractionError>> + Send {
        let url = format!("{}/api/generate", self.base_url);
        let body = serde_json::to_value(GenerateRequest {
            model,
            prompt,
            stream: false,
        })
        .expect("request body is always serializable");
        async move {
            let response = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| {
                    if e.is_connect() {
                        ExtractionError::Connection(self.base_url.clone())
                    } else if e.is_timeout() {
                        ExtractionError::HttpClient("request timed out".to_string())
                    } else {
                        ExtractionError::HttpClient(e.to_string())
                    }
                })?;

            let status = response.status();
            if !status.is_success() {
                let detail = response.text().await.unwrap_or_default();
                tracing::warn!(status = status.as_u16(), %detail, "generation request rejected");
                return Err(ExtractionError::UpstreamStatus {
                    status: status.as_u16(),
                });
            }

            let parsed: GenerateResponse = response
                .json()
                .await
                .map_err(|e| ExtractionError::Malformed(e.to_string()))?;
            Ok(parsed.response)
        }
    }
}

#[cfg(test)]
pub struct MockLlmClient {
    response: String,
}

#[cfg(test)]
impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

#[cfg(test)]
impl LlmClient for MockLlmClient {
    fn generate(
        &self,
        _model: &str,
        _prompt: &str,
    ) -> impl Future<Output = Result<String, ExtractionError>> + Send {
        let response = self.response.clone();
        async move { Ok(response) }
    }
}
