#![deny(missing_docs)]

//! Core library for the MediClarity backend.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// PDF text extraction adapter.
pub mod extraction;
/// Structured logging and tracing setup.
pub mod logging;
/// Contact-form mail delivery.
pub mod mail;
/// Report summarization pipeline.
pub mod processing;
/// Chat-completion client used to summarize reports.
pub mod summarization;
/// Transient storage for uploaded files.
pub mod upload;

#[cfg(test)]
mod test_support;
