//! High-level pipeline API: CSV in, summary report out.
//!
//! # Example
//!
//! ```rust,ignore
//! use vaultreport::{process_report, OutboxDelivery, Settings, TextRenderer, LOG_BROADCASTER};
//! use std::path::Path;
//!
//! let settings = Settings::from_env();
//! let message = process_report(
//!     Path::new("settlement.csv"),
//!     &settings,
//!     &TextRenderer::default(),
//!     &OutboxDelivery::new(&settings.outbox_dir),
//!     &*LOG_BROADCASTER,
//! )?;
//! println!("{}", message);
//! ```

use std::path::Path;

use super::summary::summarize;
use crate::api::logs::LogSink;
use crate::config::Settings;
use crate::delivery::Delivery;
use crate::error::{PipelineError, PipelineResult};
use crate::formatting::{load_hints, FormattingHints};
use crate::models::Table;
use crate::parser::{parse_bytes_auto, parse_csv_file_auto, CsvError, ParseResult};
use crate::render::Renderer;

/// Message returned when the transform produced no rows.
pub const NO_DATA_MESSAGE: &str = "No data to process.";

/// A transformed report together with what was learned on the way.
#[derive(Debug, Clone)]
pub struct Summary {
    /// Final report table (empty when the transform aborted)
    pub table: Table,
    /// Formatting hints read from the sidecar
    pub hints: FormattingHints,
    /// CSV parsing metadata
    pub csv_info: CsvInfo,
}

/// CSV file information
#[derive(Debug, Clone, Default)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Transform a CSV file into the summary report.
///
/// An unreadable or unparseable CSV is logged and yields an empty table, the
/// same outcome as a schema failure inside the transform.
pub fn summarize_csv_file(path: &Path, formatting_file: &Path, sink: &dyn LogSink) -> Summary {
    sink.info(&format!("📖 Reading CSV file {}...", path.display()));
    summarize_parsed(parse_csv_file_auto(path), formatting_file, sink)
}

/// Same as [`summarize_csv_file`] for raw bytes.
pub fn summarize_csv_bytes(bytes: &[u8], formatting_file: &Path, sink: &dyn LogSink) -> Summary {
    sink.info(&format!("📖 Reading {} bytes of CSV...", bytes.len()));
    summarize_parsed(parse_bytes_auto(bytes), formatting_file, sink)
}

fn summarize_parsed(
    parsed: Result<ParseResult, CsvError>,
    formatting_file: &Path,
    sink: &dyn LogSink,
) -> Summary {
    let parsed = match parsed {
        Ok(p) => p,
        Err(e) => {
            sink.error(&format!("Problem reading CSV: {}", e));
            return Summary {
                table: Table::empty(),
                hints: FormattingHints::default(),
                csv_info: CsvInfo::default(),
            };
        }
    };

    let csv_info = CsvInfo {
        encoding: parsed.encoding.clone(),
        delimiter: parsed.delimiter,
        headers: parsed.table.columns.clone(),
        row_count: parsed.table.len(),
    };
    sink.debug(&format!(
        "Read CSV with {} rows and {} columns (encoding {}, separator '{}').",
        csv_info.row_count,
        csv_info.headers.len(),
        csv_info.encoding,
        format_delimiter(csv_info.delimiter)
    ));

    // TODO: apply hints to rendering once column widths/precision are agreed on
    let hints = load_hints(formatting_file, sink);
    let table = summarize(&parsed.table, sink);

    Summary {
        table,
        hints,
        csv_info,
    }
}

/// Format delimiter for display
fn format_delimiter(d: char) -> &'static str {
    match d {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        '|' => "|",
        _ => "?",
    }
}

/// Transform, render and deliver one report file.
///
/// Returns a human-readable outcome. An empty transform result is not an
/// error: it returns [`NO_DATA_MESSAGE`] and nothing is rendered or sent.
pub fn process_report(
    path: &Path,
    settings: &Settings,
    renderer: &dyn Renderer,
    delivery: &dyn Delivery,
    sink: &dyn LogSink,
) -> PipelineResult<String> {
    let summary = summarize_csv_file(path, &settings.formatting_file, sink);
    deliver_summary(&summary.table, path, settings, renderer, delivery, sink)
}

/// Render and deliver an already transformed table.
pub fn deliver_summary(
    table: &Table,
    source: &Path,
    settings: &Settings,
    renderer: &dyn Renderer,
    delivery: &dyn Delivery,
    sink: &dyn LogSink,
) -> PipelineResult<String> {
    if table.is_empty() {
        sink.warning(NO_DATA_MESSAGE);
        return Ok(NO_DATA_MESSAGE.to_string());
    }

    let recipient = settings
        .recipient
        .as_deref()
        .ok_or(PipelineError::MissingRecipient)?;

    let document = renderer.render(table)?;
    sink.info(&format!("Rendered {} rows on {} page(s)", table.len(), document.page_count()));

    let file_name = source
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| format!("{}.txt", s))
        .unwrap_or_else(|| "report.txt".to_string());

    let receipt = delivery.deliver(&document, &file_name, recipient)?;
    sink.success(&format!("Report {} sent to {}", receipt.id, receipt.to));

    Ok(format!("Report sent to {}", receipt.to))
}
