//! Report transformation.
//!
//! - Columns: names and the per-column policy table
//! - Clean: required column validation and numeric cleanup
//! - Metrics: per-withdrawal and daily averages
//! - Commission: rate extraction and totals
//! - Reshape: drop source-only columns, sort
//! - Summary: the transform itself
//! - Pipeline: CSV in, rendered and delivered report out

pub mod clean;
pub mod columns;
pub mod commission;
pub mod metrics;
pub mod pipeline;
pub mod reshape;
pub mod summary;

pub use pipeline::*;
pub use summary::{summarize, try_summarize};
