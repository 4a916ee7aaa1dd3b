//! Error types for vocabulary loading and recognizer transport failures
//!
//! Word resolution itself never fails: unknown words and a `back` with an
//! empty log are silently ignored by the processor.

use thiserror::Error;

/// Invalid vocabulary configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VocabularyError {
    #[error("{table} entry has an empty canonical value")]
    EmptyValue { table: &'static str },

    #[error("{table} entry '{value}' has no spellings")]
    NoSpellings { table: &'static str, value: String },

    #[error("{table} value '{value}' is defined more than once")]
    DuplicateValue { table: &'static str, value: String },

    #[error("'{0}' is defined both as a command and as a parameter")]
    SharedValue(String),
}

/// Failure reported by the external speech recognizer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecognizerError {
    #[error("Check your internet connection")]
    Network,

    #[error("Network timeout error")]
    NetworkTimeout,

    #[error("No recognition result matched")]
    NoMatch,

    #[error("Error {0}")]
    Client(i32),
}

impl RecognizerError {
    /// Whether observers should be told about this failure
    pub fn is_reportable(&self) -> bool {
        !matches!(self, RecognizerError::NoMatch)
    }
}
