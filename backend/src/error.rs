//! Error types for the report pipeline.
//!
//! - [`CsvError`] - CSV parsing errors (defined in [`crate::parser`])
//! - [`TransformError`] - schema and parse failures inside the transform
//! - [`FormattingError`] - sidecar formatting file problems
//! - [`RenderError`] - document rendering errors
//! - [`DeliveryError`] - report delivery errors
//! - [`PipelineError`] - top-level orchestration errors
//! - [`ServerError`] - HTTP layer errors
//!
//! [`TransformError`] never leaves [`crate::transform::summarize`] and
//! [`CsvError`] never leaves the pipeline's CSV step: both are logged and
//! turned into an empty table. Render, delivery and IO errors convert into
//! [`PipelineError`] via `From`, so `?` works across the adapters.

use thiserror::Error;

pub use crate::parser::CsvError;

// =============================================================================
// Transform Errors
// =============================================================================

/// Conditions that abort the transform to the empty result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// A required column is absent.
    #[error("Column '{column}' not found in table during {stage}")]
    SchemaMissing { column: String, stage: String },

    /// A cell could not be coerced to a finite number.
    #[error("Row {row}, column '{column}': cannot parse '{value}' as a number")]
    ParseFailure {
        column: String,
        row: usize,
        value: String,
    },
}

impl TransformError {
    pub fn missing(column: impl Into<String>, stage: impl Into<String>) -> Self {
        Self::SchemaMissing {
            column: column.into(),
            stage: stage.into(),
        }
    }
}

// =============================================================================
// Formatting Sidecar Errors
// =============================================================================

/// Why the formatting sidecar could not be used. Never fatal.
#[derive(Debug, Error)]
pub enum FormattingError {
    /// The file does not exist.
    #[error("Formatting file not found: {0}")]
    NotFound(String),

    /// The file exists but could not be read.
    #[error("Error reading formatting file {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not JSON or does not match the hint schema.
    #[error("Invalid formatting file {path}: {message}")]
    Invalid { path: String, message: String },
}

// =============================================================================
// Render Errors
// =============================================================================

/// Errors while laying out a report document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Nothing to render.
    #[error("Cannot render a table with no rows")]
    EmptyTable,

    /// Layout parameters make rendering impossible.
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
}

// =============================================================================
// Delivery Errors
// =============================================================================

/// Errors while handing a document to the delivery collaborator.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Destination address is unusable.
    #[error("Invalid recipient address: '{0}'")]
    InvalidRecipient(String),

    /// IO error writing the outbox.
    #[error("Outbox IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Envelope serialization failed.
    #[error("Envelope JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// Returned by [`crate::transform::pipeline::process_report`]. An empty
/// transform result is not an error; it is reported as "No data to process.".
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Rendering error.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Delivery error.
    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// No recipient configured.
    #[error("No recipient configured (set VAULTREPORT_RECIPIENT or pass --to)")]
    MissingRecipient,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for transform stages.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for rendering.
pub type RenderResult<T> = Result<T, RenderError>;

/// Result type for delivery.
pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
