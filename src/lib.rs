#![deny(missing_docs)]

//! Core library for the docsum document summarizer.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Text extraction from PDF, DOCX, image, and text uploads.
pub mod extraction;
/// Structured logging and tracing setup.
pub mod logging;
/// Pipeline metrics helpers.
pub mod metrics;
/// Document processing pipeline utilities.
pub mod processing;
/// Summarization model clients.
pub mod summarization;
/// Translation service clients.
pub mod translation;
