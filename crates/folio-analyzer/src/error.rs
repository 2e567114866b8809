//! Error types for model reply parsing

use thiserror::Error;

/// Why a model reply could not be turned into structured data
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// The reply contains no `{` at all
    #[error("No JSON object found in response")]
    NoJson,

    /// A candidate span was found but is not valid JSON
    #[error("JSON parse error: {0}")]
    InvalidJson(String),

    /// The object lacks a required top-level array
    #[error("Missing or invalid '{0}' array")]
    MissingArray(&'static str),

    /// An array element does not have the expected shape
    #[error("Invalid '{field}' entry: {reason}")]
    InvalidEntry {
        /// Array the element belongs to
        field: &'static str,
        /// Deserializer message
        reason: String,
    },
}
