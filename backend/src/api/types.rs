//! HTTP API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ServerError;
use crate::transform::pipeline::Summary;

/// JSON preview of a transformed report (no rendering, no delivery).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    /// Unique job identifier
    pub job_id: String,

    /// "ready" when rows were produced, "empty" otherwise
    pub status: String,

    /// Report columns in presentation order
    pub columns: Vec<String>,

    /// Report rows
    pub rows: Value,

    /// Metadata about the transformation
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub row_count: usize,
    /// Number of columns with formatting hints
    pub formatting_hints: usize,
    pub csv_info: CsvMetadata,
}

/// CSV file metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvMetadata {
    pub encoding: String,
    pub delimiter: String,
    pub row_count: usize,
    pub columns: Vec<String>,
}

impl From<Summary> for SummaryResponse {
    fn from(summary: Summary) -> Self {
        let row_count = summary.table.len();

        SummaryResponse {
            job_id: Uuid::new_v4().to_string(),
            status: if row_count > 0 { "ready" } else { "empty" }.to_string(),
            rows: summary.table.to_json(),
            columns: summary.table.columns,
            metadata: ResponseMetadata {
                row_count,
                formatting_hints: summary.hints.len(),
                csv_info: CsvMetadata {
                    encoding: summary.csv_info.encoding,
                    delimiter: summary.csv_info.delimiter.to_string(),
                    row_count: summary.csv_info.row_count,
                    columns: summary.csv_info.headers,
                },
            },
        }
    }
}

/// Create a JSON error body
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "columns": [],
        "rows": [],
    })
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Pipeline(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Plain-text failure, the same shape the upload form shows on success.
impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status(), format!("❌ Error: {}", self)).into_response()
    }
}
