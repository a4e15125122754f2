//! HTTP API module.
//!
//! This module provides the HTTP server, its response types, and the
//! diagnostics sink shared by the pipeline.

pub mod server;
pub mod types;
pub mod logs;

pub use server::start_server;
pub use types::*;
pub use logs::*;
