//! Error types for delta conversion

use crate::format::CallbackError;
use thiserror::Error;

/// Errors that can occur while converting a delta to markup
#[derive(Debug, Error)]
pub enum ConvertError {
    /// An operation carries no `insert` (retain, delete, or malformed input)
    #[error("Cannot convert delta with non-insert operations (operation {index} has no insert)")]
    InvalidOperation { index: usize },
    /// An attribute has no entry in the format registry and unknown attributes are rejected
    #[error("No format registered for attribute '{name}'")]
    UnknownAttribute { name: String },
    /// A custom `mutate` callback failed
    #[error("Format '{format}' callback failed: {source}")]
    FormatCallback {
        format: String,
        #[source]
        source: CallbackError,
    },
    /// The delta could not be decoded from JSON
    #[error("Invalid delta JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// The markup tree could not be written out
    #[error("Serialization error: {0}")]
    Serialization(String),
}
