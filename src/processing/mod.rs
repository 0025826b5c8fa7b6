//! Report pipeline: extraction, keyword assembly, summarization, and cleanup.

pub mod keywords;
mod service;
pub mod types;

pub use keywords::assemble_keywords;
pub use service::{ReportApi, ReportService};
pub use types::{ProcessingError, SummaryResult};
