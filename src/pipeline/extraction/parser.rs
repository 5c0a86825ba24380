//! Recovers the appointment record from a raw model reply.
//!
//! Models wrap their JSON in markdown fences, prose, or nothing at all, so
//! recovery runs in two passes: a fenced ```json block first, then the first
//! balanced brace group. Validation is all-or-nothing — a reply missing any
//! field yields an error, never a partial record.

use regex::Regex;
use serde_json::Value;

use super::{ExtractionError, ExtractionResult};

/// Parses and validates one model reply into an [`ExtractionResult`].
pub fn parse_extraction(raw: &str) -> Result<ExtractionResult, ExtractionError> {
    let payload = extract_json_payload(raw).ok_or(ExtractionError::NoPayload)?;

    let value: Value = serde_json::from_str(&payload)
        .map_err(|e| ExtractionError::Malformed(e.to_string()))?;

    let doctor_number = require_int(&value, "dn")?;
    let patient_number = require_int(&value, "pn")?;
    let disease = require_string(&value, "ds")?;
    let appointment_time = require_string(&value, "time")?;

    Ok(ExtractionResult {
        doctor_number,
        patient_number,
        disease,
        appointment_time,
    })
}

/// Finds the JSON text inside a possibly-decorated reply.
fn extract_json_payload(raw: &str) -> Option<String> {
    let fenced = Regex::new(r"(?is)```(?:json)?\s*(\{.*?\})\s*```")
        .expect("fence pattern is valid");
    if let Some(captures) = fenced.captures(raw) {
        return Some(captures[1].to_string());
    }
    balanced_braces(raw)
}

/// Returns the first balanced `{ ... }` group, respecting string literals.
fn balanced_braces(raw: &str) -> Option<String> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in raw[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(raw[start..start + offset + ch.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

fn require_int(value: &Value, key: &'static str) -> Result<i64, ExtractionError> {
    value
        .get(key)
        .and_then(Value::as_i64)
        .ok_or(ExtractionError::MissingField(key))
}

fn require_string(value: &Value, key: &'static str) -> Result<String, ExtractionError> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(ExtractionError::MissingField(key))
}
