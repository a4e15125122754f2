//! The report transform.
//!
//! ```text
//! clean ─▶ Surcharge amt ─▶ Average WD amount ─▶ Daily Vault AVG
//!   │            │                  │                   │
//!   └────────────┴──── abort ───────┴───────────────────┴──▶ EMPTY
//!
//! ─▶ Commission rate ─▶ Commission total ─▶ drop ─▶ sort ─▶ DONE
//! ```
//!
//! Schema and parse failures are logged and turned into [`Table::empty`]
//! here; callers only ever see "rows or no rows".

use super::clean::validate_and_clean;
use super::commission::{aggregate_commission, apply_commission_rate};
use super::metrics::apply_metrics;
use super::reshape::reshape;
use crate::api::logs::LogSink;
use crate::error::TransformResult;
use crate::models::Table;

/// Run every stage, stopping at the first abort.
pub fn try_summarize(raw: &Table, sink: &dyn LogSink) -> TransformResult<Table> {
    let mut table = validate_and_clean(raw, sink)?;
    apply_metrics(&mut table, sink)?;
    apply_commission_rate(&mut table, sink);
    aggregate_commission(&mut table, sink)?;
    reshape(&mut table, sink);
    Ok(table)
}

/// Transform a raw report table into the summary report.
///
/// Returns the empty table when a required column is missing or a numeric
/// cell cannot be parsed. Never panics on bad input and never mutates `raw`.
pub fn summarize(raw: &Table, sink: &dyn LogSink) -> Table {
    match try_summarize(raw, sink) {
        Ok(table) => {
            sink.debug(&format!(
                "Summarized {} rows into {} columns",
                table.len(),
                table.columns.len()
            ));
            table
        }
        Err(e) => {
            sink.error(&e.to_string());
            Table::empty()
        }
    }
}
