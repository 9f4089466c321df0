//! Error types for the library layer.

use std::fmt;
use std::path::PathBuf;

/// Errors produced by the library layer, wrapping protocol errors and
/// adding configuration and file failures.
#[derive(Debug)]
pub enum TranscriptError {
    /// An error from the retrieval protocol.
    Api(transcript_api::Error),
    /// Reading or writing a dataset or report file failed.
    Io { path: PathBuf, source: std::io::Error },
    /// JSON serialization or deserialization failed.
    Serialization(serde_json::Error),
    /// The configuration file could not be parsed.
    Config(String),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for TranscriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "Retrieval error: {}", e),
            Self::Io { path, source } => write!(f, "I/O error on {}: {}", path.display(), source),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::Config(msg) => write!(f, "Config error: {}", msg),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for TranscriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Io { source, .. } => Some(source),
            Self::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<transcript_api::Error> for TranscriptError {
    fn from(e: transcript_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<serde_json::Error> for TranscriptError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}
