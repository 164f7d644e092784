//! Response Parser — pulls the JSON payload out of a Gemini response envelope.
//!
//! The model answers in free text and often wraps JSON in markdown fences.
//! Everything here is an untrusted-input boundary: callers decode into a
//! strict type and choose their own fallback on `ParseError`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Envelope does not match the expected candidates/content/parts shape: {0}")]
    Envelope(String),

    #[error("Envelope contains no text payload")]
    MissingText,

    #[error("Payload is not valid JSON for the expected schema: {0}")]
    Json(#[from] serde_json::Error),

    /// Decoded fine but violates a caller-side rule (arity, empty fields).
    #[error("Payload has the wrong shape: {0}")]
    Shape(String),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Extracts the primary text payload: first candidate, first part.
pub fn extract_text(envelope: &Value) -> Result<String, ParseError> {
    let envelope = Envelope::deserialize(envelope)
        .map_err(|e| ParseError::Envelope(e.to_string()))?;

    envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or(ParseError::MissingText)
}

/// Removes markdown code-fence markers anywhere in the text, not only at the
/// edges, then trims.
pub fn strip_json_fences(text: &str) -> String {
    text.trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Extracts, cleans and decodes the envelope's payload as `T`.
pub fn parse_payload<T: DeserializeOwned>(envelope: &Value) -> Result<T, ParseError> {
    let text = extract_text(envelope)?;
    let cleaned = strip_json_fences(&text);
    Ok(serde_json::from_str(&cleaned)?)
}
