//! # Vault Report - terminal settlement summaries
//!
//! Turns a monthly ATM terminal settlement export (CSV) into a summary
//! report: currency columns cleaned, per-withdrawal metrics and commission
//! derived, source-only columns dropped, rows sorted by surcharge.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Transform  │────▶│   Render +  │
//! │  (upload)   │     │  (auto-enc) │     │ (summarize) │     │   Deliver   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vaultreport::{parse_csv, summarize, MemorySink};
//!
//! let raw = parse_csv(include_str!("june.csv"), ',')?;
//! let report = summarize(&raw, &MemorySink::new());
//! if report.is_empty() {
//!     println!("No data to process.");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Table model
//! - [`parser`] - CSV parsing with auto-detection
//! - [`formatting`] - Formatting-hint sidecar
//! - [`transform`] - The report transform and pipeline
//! - [`render`] - Paginated text rendering
//! - [`delivery`] - Outbox delivery
//! - [`config`] - Settings from the environment
//! - [`api`] - HTTP API server and log streaming

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Configuration
pub mod config;
pub mod formatting;

// Transformation
pub mod transform;

// Adapters
pub mod delivery;
pub mod render;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    DeliveryError, FormattingError, PipelineError, RenderError, ServerError, TransformError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Row, Table};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes_auto, parse_csv,
    parse_csv_file_auto, CsvError, ParseResult,
};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    deliver_summary, process_report, summarize, summarize_csv_bytes, summarize_csv_file,
    try_summarize, CsvInfo, Summary, NO_DATA_MESSAGE,
};

// =============================================================================
// Re-exports - Adapters
// =============================================================================

pub use config::Settings;
pub use delivery::{Delivery, DeliveryReceipt, OutboxDelivery};
pub use formatting::{load_hints, FormattingHints};
pub use render::{Document, Page, Renderer, TextRenderer};

// =============================================================================
// Re-exports - Logging
// =============================================================================

pub use api::logs::{ConsoleSink, LogEntry, LogLevel, LogSink, MemorySink, LOG_BROADCASTER};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server, AppState};
}
