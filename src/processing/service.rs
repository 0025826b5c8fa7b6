//! Report service coordinating extraction, keyword assembly, and summarization.

use crate::{
    extraction::TextExtractor,
    processing::{
        keywords::assemble_keywords,
        types::{ProcessingError, SummaryResult},
    },
    summarization::{SummarizationClient, SummaryRequest},
    upload::UploadedFile,
};
use async_trait::async_trait;

/// Abstraction over the report pipeline used by the HTTP surface.
#[async_trait]
pub trait ReportApi: Send + Sync {
    /// Summarize an uploaded report. The transient file is removed before this returns, or
    /// when the returned future is dropped unfinished.
    async fn summarize_report(&self, upload: UploadedFile)
    -> Result<SummaryResult, ProcessingError>;
}

/// Runs the upload → extract → keywords → summary pipeline.
///
/// Stages execute strictly in sequence; the service holds no per-request state, so one
/// instance is shared across all in-flight requests through an `Arc`.
pub struct ReportService {
    extractor: Box<dyn TextExtractor>,
    summarizer: Box<dyn SummarizationClient>,
}

impl ReportService {
    /// Build a service from its two collaborators.
    pub fn new(extractor: Box<dyn TextExtractor>, summarizer: Box<dyn SummarizationClient>) -> Self {
        Self {
            extractor,
            summarizer,
        }
    }

    async fn run(&self, upload: &UploadedFile) -> Result<SummaryResult, ProcessingError> {
        let fragments = match self.extractor.extract_first_page(&upload.path).await {
            Ok(fragments) => fragments,
            Err(error) => {
                tracing::error!(
                    path = %upload.path.display(),
                    original_name = %upload.original_name,
                    %error,
                    "Text extraction failed"
                );
                return Err(error.into());
            }
        };

        let keywords = assemble_keywords(&fragments);
        tracing::debug!(
            fragments = fragments.len(),
            keyword_chars = keywords.len(),
            "Assembled keywords"
        );

        let request = SummaryRequest::new(keywords);
        let text = match self.summarizer.generate_summary(&request).await {
            Ok(text) => text,
            Err(error) => {
                tracing::error!(%error, "Summary generation failed");
                return Err(error.into());
            }
        };

        tracing::info!(
            original_name = %upload.original_name,
            summary_chars = text.len(),
            "Report summarized"
        );
        Ok(SummaryResult { text })
    }
}

#[async_trait]
impl ReportApi for ReportService {
    async fn summarize_report(
        &self,
        upload: UploadedFile,
    ) -> Result<SummaryResult, ProcessingError> {
        let outcome = self.run(&upload).await;
        drop(upload);
        outcome
    }
}
