//! Error handling for the match engine and its CLI host

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemtchError {
    #[error("Document is {size} bytes, which exceeds the {limit} byte upload limit")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Could not read the document: {0}")]
    UnparsableDocument(String),

    #[error("Unsupported document type '{0}'. Please upload a PDF or plain text file.")]
    UnsupportedDocumentType(String),

    #[error("Job description cannot be empty")]
    EmptyJobDescription,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Skill taxonomy error: {0}")]
    Taxonomy(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),

    #[error("Match request timed out after {0}s")]
    Timeout(u64),
}

pub type Result<T> = std::result::Result<T, RemtchError>;

/// Coarse error classification surfaced to consumers next to the detail message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    PayloadTooLarge,
    UnparsableDocument,
    UnsupportedDocumentType,
    EmptyJobDescription,
    Internal,
}

/// Structured failure payload: a kind plus the human-readable detail shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub kind: ErrorKind,
    pub detail: String,
}

impl RemtchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RemtchError::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
            RemtchError::UnparsableDocument(_) => ErrorKind::UnparsableDocument,
            RemtchError::UnsupportedDocumentType(_) => ErrorKind::UnsupportedDocumentType,
            RemtchError::EmptyJobDescription => ErrorKind::EmptyJobDescription,
            _ => ErrorKind::Internal,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            kind: self.kind(),
            detail: self.to_string(),
        }
    }
}

/// Convert anyhow errors raised at the binary edge to our custom error type
impl From<anyhow::Error> for RemtchError {
    fn from(err: anyhow::Error) -> Self {
        RemtchError::InvalidInput(format!("{:#}", err))
    }
}

impl From<toml::de::Error> for RemtchError {
    fn from(err: toml::de::Error) -> Self {
        RemtchError::Configuration(format!("Failed to parse config: {}", err))
    }
}
