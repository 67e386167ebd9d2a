//! Input manager for loading documents from disk

use crate::error::{Result, RemtchError};
use crate::input::file_detector::{DocumentKind, RawDocument};
use crate::input::text_extractor::{MarkdownExtractor, TextExtractor};
use log::info;
use std::path::Path;

pub struct InputManager {
    max_payload_bytes: usize,
}

impl InputManager {
    pub fn new(max_payload_bytes: usize) -> Self {
        Self { max_payload_bytes }
    }

    /// Read a document. The kind comes from `kind_override` when given,
    /// otherwise from the file extension. Markdown files are rendered to
    /// plain text here, so the engine only ever sees pdf or text payloads.
    pub async fn load(&self, path: &Path, kind_override: Option<DocumentKind>) -> Result<RawDocument> {
        let metadata = tokio::fs::metadata(path).await.map_err(|_| {
            RemtchError::InvalidInput(format!("File does not exist: {}", path.display()))
        })?;

        if !metadata.is_file() {
            return Err(RemtchError::InvalidInput(format!(
                "Not a regular file: {}",
                path.display()
            )));
        }

        let kind = match kind_override {
            Some(kind) => kind,
            None => self.detect_kind(path)?,
        };

        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > self.max_payload_bytes {
            return Err(RemtchError::PayloadTooLarge {
                size,
                limit: self.max_payload_bytes,
            });
        }

        info!("Reading {} document: {}", kind, path.display());
        let bytes = tokio::fs::read(path).await?;

        if kind == DocumentKind::Text && DocumentKind::is_markdown(path) {
            let text = MarkdownExtractor.extract(&bytes)?;
            return Ok(RawDocument::text(text));
        }

        Ok(RawDocument::new(bytes, kind.to_string()))
    }

    /// Read a job description file as text.
    pub async fn load_text(&self, path: &Path) -> Result<String> {
        let document = self.load(path, Some(DocumentKind::Text)).await?;
        Ok(String::from_utf8_lossy(document.bytes()).into_owned())
    }

    fn detect_kind(&self, path: &Path) -> Result<DocumentKind> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                RemtchError::InvalidInput(format!("File has no extension: {}", path.display()))
            })?;

        DocumentKind::from_extension(extension)
            .ok_or_else(|| RemtchError::UnsupportedDocumentType(format!(".{}", extension)))
    }
}
