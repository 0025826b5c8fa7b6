//! PDF text extraction.
//!
//! Only the first page of a report is read. Lab summaries put their key values up front and
//! later pages are deliberately ignored, so callers must not expect full-document text here.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Index of the only page the extractor reads.
pub const FIRST_PAGE: usize = 0;

/// Errors raised while extracting text from an uploaded document.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The upload could not be read from disk.
    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not a PDF or its structure could not be parsed.
    #[error("Malformed document: {0}")]
    Malformed(String),
}

/// One contiguous run of text found on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFragment {
    /// Raw text as reported by the extractor (untrimmed).
    pub text: String,
    /// Zero-based page the fragment was found on.
    pub page_index: usize,
}

impl ExtractedFragment {
    /// Construct a fragment for the given page.
    pub fn new(text: impl Into<String>, page_index: usize) -> Self {
        Self {
            text: text.into(),
            page_index,
        }
    }
}

/// Interface implemented by document text extractors.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Return the ordered text fragments of the document's first page.
    async fn extract_first_page(
        &self,
        path: &Path,
    ) -> Result<Vec<ExtractedFragment>, ExtractionError>;
}

/// Extractor backed by the `pdf-extract` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Construct a new PDF extractor.
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract_first_page(
        &self,
        path: &Path,
    ) -> Result<Vec<ExtractedFragment>, ExtractionError> {
        let bytes = tokio::fs::read(path).await?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Extracting PDF text");

        // pdf-extract panics on some malformed inputs; a panicking blocking task surfaces as a
        // join error instead of tearing down the runtime worker.
        let pages = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
        })
        .await
        .map_err(|error| {
            ExtractionError::Malformed(format!("PDF parser aborted: {error}"))
        })?
        .map_err(|error| ExtractionError::Malformed(error.to_string()))?;

        let page_count = pages.len();
        let fragments = pages
            .into_iter()
            .nth(FIRST_PAGE)
            .map(|page| split_fragments(&page, FIRST_PAGE))
            .unwrap_or_default();

        tracing::info!(
            path = %path.display(),
            page_count,
            fragments = fragments.len(),
            "PDF text extraction complete"
        );
        Ok(fragments)
    }
}

/// Split one page of extracted text into line fragments, preserving order.
pub fn split_fragments(page: &str, page_index: usize) -> Vec<ExtractedFragment> {
    page.lines()
        .map(|line| ExtractedFragment::new(line, page_index))
        .collect()
}
