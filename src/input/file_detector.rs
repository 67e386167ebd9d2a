//! Document kind detection and the raw upload payload

use crate::error::{Result, RemtchError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    /// Map a file extension to a kind. Markdown is a text kind.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "txt" | "text" | "md" | "markdown" => Some(DocumentKind::Text),
            _ => None,
        }
    }

    /// Markdown sources need their markup rendered away before profiling.
    pub fn is_markdown(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| matches!(ext.to_lowercase().as_str(), "md" | "markdown"))
            .unwrap_or(false)
    }

    /// Parse a caller-declared kind (short name or MIME type).
    pub fn from_declared(declared: &str) -> Result<Self> {
        match declared.trim().to_lowercase().as_str() {
            "pdf" | "application/pdf" => Ok(DocumentKind::Pdf),
            "text" | "txt" | "text/plain" => Ok(DocumentKind::Text),
            _ => Err(RemtchError::UnsupportedDocumentType(declared.trim().to_string())),
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Pdf => write!(f, "pdf"),
            DocumentKind::Text => write!(f, "text"),
        }
    }
}

/// Uploaded bytes plus the kind the caller declared for them.
///
/// The declared kind is kept verbatim and only validated when the engine
/// picks the document up, so an empty job description is reported first.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    bytes: Vec<u8>,
    declared_kind: String,
}

impl RawDocument {
    pub fn new(bytes: Vec<u8>, declared_kind: impl Into<String>) -> Self {
        Self {
            bytes,
            declared_kind: declared_kind.into(),
        }
    }

    pub fn pdf(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "pdf")
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text.into().into_bytes(), "text")
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn declared_kind(&self) -> &str {
        &self.declared_kind
    }

    pub fn kind(&self) -> Result<DocumentKind> {
        DocumentKind::from_declared(&self.declared_kind)
    }
}
