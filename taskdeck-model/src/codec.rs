//! JSON encoding of [`TasksState`] for the persisted slot.
//!
//! The layout is the camelCase object described on [`TasksState`]; all
//! timestamps travel as ISO-8601 strings and come back as typed values.

use crate::state::TasksState;

/// Error type for encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encodes a state into its persisted JSON form.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if serialization fails.
pub fn encode(state: &TasksState) -> Result<String, CodecError> {
    Ok(serde_json::to_string(state)?)
}

/// Decodes a state from its persisted JSON form.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if the text is not valid JSON, does not
/// match the layout, or contains an unparsable timestamp.
pub fn decode(json: &str) -> Result<TasksState, CodecError> {
    Ok(serde_json::from_str(json)?)
}
