// Request validation — payload shape and threshold range.
//
// Pure functions over the raw JSON body, run before any classifier work
// so malformed requests are rejected cheaply. Field presence and types
// are checked here; string contents are not — empty strings, non-ASCII,
// and arbitrary length all pass through untouched.

use serde_json::Value;
use thiserror::Error;

/// Threshold used when the caller doesn't supply one.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("{field} must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
}

/// A validated single-item moderation request.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleRequest {
    pub text: String,
    pub threshold: f64,
}

/// A validated batch moderation request.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest {
    pub texts: Vec<String>,
    pub threshold: f64,
}

/// Validate a `{text, threshold?}` payload.
///
/// A payload that isn't a JSON object has no fields, so it reports the
/// missing field like any other absent `text`.
pub fn parse_single(payload: &Value) -> Result<SingleRequest, ValidationError> {
    let text = match payload.get("text") {
        None => return Err(ValidationError::MissingField("text")),
        Some(value) => value
            .as_str()
            .ok_or(ValidationError::InvalidType {
                field: "text",
                expected: "a string",
            })?
            .to_string(),
    };

    let threshold = parse_threshold(payload)?;

    Ok(SingleRequest { text, threshold })
}

/// Validate a `{texts, threshold?}` payload. `texts` must be an array of
/// strings — a map or scalar in its place is a type error, not a missing
/// field.
pub fn parse_batch(payload: &Value) -> Result<BatchRequest, ValidationError> {
    let items = match payload.get("texts") {
        None => return Err(ValidationError::MissingField("texts")),
        Some(value) => value.as_array().ok_or(ValidationError::InvalidType {
            field: "texts",
            expected: "an array",
        })?,
    };

    let mut texts = Vec::with_capacity(items.len());
    for item in items {
        let text = item.as_str().ok_or(ValidationError::InvalidType {
            field: "texts",
            expected: "an array of strings",
        })?;
        texts.push(text.to_string());
    }

    let threshold = parse_threshold(payload)?;

    Ok(BatchRequest { texts, threshold })
}

/// Threshold is optional; when present it must be a number in [0, 1],
/// inclusive on both ends.
fn parse_threshold(payload: &Value) -> Result<f64, ValidationError> {
    let value = match payload.get("threshold") {
        None => return Ok(DEFAULT_THRESHOLD),
        Some(value) => value,
    };

    let threshold = value.as_f64().ok_or(ValidationError::InvalidType {
        field: "threshold",
        expected: "a number",
    })?;

    if !(0.0..=1.0).contains(&threshold) {
        return Err(ValidationError::OutOfRange {
            field: "threshold",
            min: 0.0,
            max: 1.0,
        });
    }

    Ok(threshold)
}
