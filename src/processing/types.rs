//! Data types and error definitions for the report pipeline.

use crate::{extraction::ExtractionError, summarization::SummarizationClientError};
use thiserror::Error;

/// Errors emitted by the report pipeline.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// The uploaded document could not be turned into text.
    #[error("Failed to extract text: {0}")]
    Extraction(#[from] ExtractionError),
    /// The language model did not return a usable summary.
    #[error("Failed to generate summary: {0}")]
    Summarization(#[from] SummarizationClientError),
}

/// Plain-language summary produced for one uploaded report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResult {
    /// Summary text returned by the model.
    pub text: String,
}
