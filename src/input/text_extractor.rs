//! Text extraction from uploaded document payloads

use crate::error::{Result, RemtchError};
use crate::input::file_detector::DocumentKind;
use log::{debug, warn};
use pulldown_cmark::{Event, Parser, Tag};
use std::panic::{self, AssertUnwindSafe};

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

/// Page-by-page PDF extraction. Pages that fail to decode are skipped.
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        if bytes.is_empty() {
            return Err(RemtchError::UnparsableDocument("PDF payload is empty".to_string()));
        }

        let document = guarded(|| lopdf::Document::load_mem(bytes))
            .ok_or_else(|| RemtchError::UnparsableDocument("PDF parser aborted".to_string()))?
            .map_err(|e| {
                RemtchError::UnparsableDocument(format!("Not a well-formed PDF: {}", e))
            })?;

        let pages = document.get_pages();
        let mut page_texts = Vec::with_capacity(pages.len());

        for &page_number in pages.keys() {
            match guarded(|| document.extract_text(&[page_number])) {
                Some(Ok(text)) => page_texts.push(text),
                Some(Err(e)) => warn!("Skipping unreadable PDF page {}: {}", page_number, e),
                None => warn!("Skipping PDF page {}: text decoder aborted", page_number),
            }
        }

        debug!(
            "Extracted text from {}/{} PDF pages",
            page_texts.len(),
            pages.len()
        );

        let mut text = page_texts
            .iter()
            .map(|page| page.trim_end())
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() && !pages.is_empty() {
            debug!("Page extraction produced no text, trying whole-document extraction");
            if let Some(Ok(fallback)) = guarded(|| pdf_extract::extract_text_from_mem(bytes)) {
                text = fallback;
            }
        }

        Ok(text)
    }
}

/// Lossy UTF-8 decoding; invalid sequences become U+FFFD.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Markdown rendered down to its text, one line per heading, paragraph or
/// list item. Emphasis, link and heading markup is dropped.
pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let markdown = String::from_utf8_lossy(bytes);
        let mut text = String::with_capacity(markdown.len());

        for event in Parser::new(&markdown) {
            match event {
                Event::Text(content) | Event::Code(content) => text.push_str(&content),
                Event::SoftBreak | Event::HardBreak | Event::Rule => text.push('\n'),
                Event::End(Tag::Heading(..) | Tag::Paragraph | Tag::Item | Tag::CodeBlock(_)) => {
                    text.push('\n')
                }
                _ => {}
            }
        }

        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

/// Route a payload to the extractor for its kind.
pub fn extract_text(kind: DocumentKind, bytes: &[u8]) -> Result<String> {
    match kind {
        DocumentKind::Pdf => PdfExtractor.extract(bytes),
        DocumentKind::Text => PlainTextExtractor.extract(bytes),
    }
}

// Third-party PDF decoders can panic on hostile input; contain it to the call.
fn guarded<T>(f: impl FnOnce() -> T) -> Option<T> {
    panic::catch_unwind(AssertUnwindSafe(f)).ok()
}
