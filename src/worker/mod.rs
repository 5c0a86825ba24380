//! One-shot WebSocket client for the prescription worker.
//!
//! Protocol: one JSON request frame, one JSON reply frame, connection
//! discarded. Reply envelopes are tagged by a `type` field:
//! `prescription_generated` carries the result, `error` carries a message.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("prescription worker unreachable at {0}")]
    Unreachable(String),

    #[error("prescription worker timed out after {0}s")]
    Timeout(u64),

    #[error("prescription worker closed the connection before replying")]
    ConnectionClosed,

    #[error("malformed worker reply: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    Worker(String),

    #[error("unexpected worker message type: {0}")]
    UnexpectedMessage(String),
}

/// Patient context sent to the worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionRequest {
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub diagnosis: String,
    pub symptoms: Vec<String>,
}

/// A generated prescription as returned by the worker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrescriptionReply {
    pub prescription_id: String,
    pub patient_name: String,
    pub medications: Vec<String>,
}

/// Connects, sends one request, awaits one reply.
pub struct WorkerClient {
    endpoint: String,
    timeout: Duration,
}

impl WorkerClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            timeout,
        }
    }

    pub async fn generate_prescription(
        &self,
        request: &PrescriptionRequest,
    ) -> Result<PrescriptionReply, WorkerError> {
        let timeout_secs = self.timeout.as_secs();

        let (mut stream, _) = tokio::time::timeout(self.timeout, connect_async(&self.endpoint))
            .await
            .map_err(|_| WorkerError::Timeout(timeout_secs))?
            .map_err(|e| {
                tracing::warn!(endpoint = %self.endpoint, error = %e, "worker connect failed");
                WorkerError::Unreachable(self.endpoint.clone())
            })?;

        let frame = serde_json::json!({
            "type": "generate_prescription",
            "patient_input": request,
        });
        stream
            .send(Message::Text(frame.to_string()))
            .await
            .map_err(|_| WorkerError::ConnectionClosed)?;

        // One text frame is the reply; control frames in between are the
        // library's concern, non-text data frames are skipped.
        let reply = loop {
            let next = tokio::time::timeout(self.timeout, stream.next())
                .await
                .map_err(|_| WorkerError::Timeout(timeout_secs))?;
            match next {
                Some(Ok(Message::Text(text))) => break text,
                Some(Ok(Message::Close(_))) | None => return Err(WorkerError::ConnectionClosed),
                Some(Ok(_)) => continue,
                Some(Err(_)) => return Err(WorkerError::ConnectionClosed),
            }
        };

        let _ = stream.close(None).await;
        parse_worker_reply(&reply)
    }
}

/// Decodes one reply envelope.
pub fn parse_worker_reply(text: &str) -> Result<PrescriptionReply, WorkerError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| WorkerError::MalformedResponse(e.to_string()))?;

    match value.get("type").and_then(Value::as_str) {
        Some("prescription_generated") => {
            let prescription_id = value
                .get("prescription_id")
                .and_then(Value::as_str)
                .ok_or_else(|| WorkerError::MalformedResponse("missing prescription_id".into()))?
                .to_string();
            let prescription = value
                .get("prescription")
                .ok_or_else(|| WorkerError::MalformedResponse("missing prescription".into()))?;
            let patient_name = prescription
                .get("patient_name")
                .and_then(Value::as_str)
                .ok_or_else(|| WorkerError::MalformedResponse("missing patient_name".into()))?
                .to_string();
            let medications = prescription
                .get("medications")
                .and_then(Value::as_array)
                .ok_or_else(|| WorkerError::MalformedResponse("missing medications".into()))?
                .iter()
                .map(|m| {
                    m.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| {
                            WorkerError::MalformedResponse("non-string medication entry".into())
                        })
                })
                .collect::<Result<Vec<String>, WorkerError>>()?;
            Ok(PrescriptionReply {
                prescription_id,
                patient_name,
                medications,
            })
        }
        Some("error") => {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("worker reported an unspecified error")
                .to_string();
            Err(WorkerError::Worker(message))
        }
        Some(other) => Err(WorkerError::UnexpectedMessage(other.to_string())),
        None => Err(WorkerError::MalformedResponse("missing type tag".into())),
    }
}
