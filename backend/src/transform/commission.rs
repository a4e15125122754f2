//! Commission extractor & aggregator.
//!
//! The `Group` column carries free text such as `"Commission 2.5"`. The first
//! signed decimal in a group mentioning "Commission" is the per-withdrawal
//! rate; the total is that rate times `Surcharge WDs`.
//!
//! Neither column is required. A missing `Group` gives every row the
//! policy fallback rate and a missing `Surcharge WDs` leaves the rate as the
//! final value.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::clean::clean_column;
use super::columns::{
    number, policy_for, Cleaning, Fallback, Requirement, COMMISSION, GROUP, SURCHARGE_WDS,
};
use crate::api::logs::LogSink;
use crate::error::TransformResult;
use crate::models::Table;

const COMMISSION_MARKER: &str = "Commission";

static RATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(-?\d+(?:\.\d+)?)").expect("Invalid rate pattern"));

/// Commission rate carried by a `Group` cell.
pub fn commission_rate(group: &Value) -> f64 {
    match group {
        Value::String(text) if text.contains(COMMISSION_MARKER) => RATE_PATTERN
            .captures(text)
            .and_then(|c| c[1].parse::<f64>().ok())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

fn fallback_of(column: &str) -> Option<Fallback> {
    match policy_for(column).map(|p| &p.requirement) {
        Some(Requirement::Optional { fallback }) => Some(fallback.clone()),
        _ => None,
    }
}

/// Fill the `Commission` column with per-row rates.
pub fn apply_commission_rate(table: &mut Table, sink: &dyn LogSink) {
    let rates: Vec<Value> = if table.has_column(GROUP) {
        let rates = table
            .rows
            .iter()
            .map(|row| Value::from(commission_rate(row.get(GROUP).unwrap_or(&Value::Null))))
            .collect();
        sink.debug("Extracted commission rate into 'Commission' column.");
        rates
    } else {
        let rate = match fallback_of(GROUP) {
            Some(Fallback::Constant(rate)) => rate,
            _ => 0.0,
        };
        sink.warning(&format!(
            "'{}' column not found; '{}' column initialized to {}.",
            GROUP, COMMISSION, rate
        ));
        vec![Value::from(rate); table.len()]
    };

    table.set_column(COMMISSION, rates);
}

/// Multiply the rate in `Commission` by `Surcharge WDs`.
///
/// `Surcharge WDs` is rewritten as numbers. A cell that is present but not a
/// number aborts, like any other unparseable numeric input.
pub fn aggregate_commission(table: &mut Table, sink: &dyn LogSink) -> TransformResult<()> {
    if !table.has_column(SURCHARGE_WDS) {
        match fallback_of(SURCHARGE_WDS) {
            Some(Fallback::Constant(value)) => {
                sink.error(&format!(
                    "Column '{}' not found during {} calculation. Using {}.",
                    SURCHARGE_WDS, COMMISSION, value
                ));
                let len = table.len();
                table.set_column(COMMISSION, vec![Value::from(value); len]);
            }
            _ => sink.error(&format!(
                "Column '{}' not found during {} calculation. Leaving '{}' as-is.",
                SURCHARGE_WDS, COMMISSION, COMMISSION
            )),
        }
        return Ok(());
    }

    let cleaning = policy_for(SURCHARGE_WDS)
        .map(|p| p.cleaning)
        .unwrap_or(Cleaning::Number);
    let counts = clean_column(table, SURCHARGE_WDS, cleaning)?;

    let totals: Vec<Value> = table
        .rows
        .iter()
        .zip(&counts)
        .map(|(row, count)| {
            let rate = row.get(COMMISSION).map(number).unwrap_or(0.0);
            Value::from(rate * number(count))
        })
        .collect();

    table.set_column(SURCHARGE_WDS, counts);
    table.set_column(COMMISSION, totals);
    sink.debug("Computed total Commission as commission rate * 'Surcharge WDs'.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::logs::{LogLevel, MemorySink};
    use crate::error::TransformError;
    use crate::models::Row;
    use serde_json::json;

    fn table(columns: &[&str], rows: Vec<Value>) -> Table {
        Table::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.into_iter()
                .map(|v| v.as_object().unwrap().clone())
                .collect::<Vec<Row>>(),
        )
    }

    #[test]
    fn test_rate_extraction() {
        assert_eq!(commission_rate(&json!("Commission 2.5")), 2.5);
        assert_eq!(commission_rate(&json!("Tier 3 Commission 0.25")), 3.0);
        assert_eq!(commission_rate(&json!("Commission -1.5 clawback")), -1.5);
        assert_eq!(commission_rate(&json!("Commission")), 0.0);
    }

    #[test]
    fn test_rate_requires_marker_and_text() {
        assert_eq!(commission_rate(&json!("Group 7")), 0.0);
        assert_eq!(commission_rate(&json!("commission 7")), 0.0);
        assert_eq!(commission_rate(&json!(7)), 0.0);
        assert_eq!(commission_rate(&Value::Null), 0.0);
    }

    #[test]
    fn test_commission_total() {
        let mut t = table(
            &["Group", "Surcharge WDs"],
            vec![
                json!({"Group": "Commission 2.5", "Surcharge WDs": "4"}),
                json!({"Group": "House", "Surcharge WDs": "9"}),
            ],
        );
        let sink = MemorySink::new();
        apply_commission_rate(&mut t, &sink);
        aggregate_commission(&mut t, &sink).unwrap();

        assert_eq!(t.rows[0][COMMISSION], 10.0);
        assert_eq!(t.rows[1][COMMISSION], 0.0);
        assert_eq!(t.rows[0][SURCHARGE_WDS], 4.0);
        assert_eq!(sink.count(LogLevel::Warning), 0);
    }

    #[test]
    fn test_missing_group_defaults_to_zero() {
        let mut t = table(&["Surcharge WDs"], vec![json!({"Surcharge WDs": "4"})]);
        let sink = MemorySink::new();
        apply_commission_rate(&mut t, &sink);
        aggregate_commission(&mut t, &sink).unwrap();

        assert_eq!(t.rows[0][COMMISSION], 0.0);
        assert!(sink.contains(LogLevel::Warning, "'Group' column not found"));
    }

    #[test]
    fn test_missing_surcharge_wds_keeps_rate() {
        let mut t = table(&["Group"], vec![json!({"Group": "Commission 1.75"})]);
        let sink = MemorySink::new();
        apply_commission_rate(&mut t, &sink);
        aggregate_commission(&mut t, &sink).unwrap();

        assert_eq!(t.rows[0][COMMISSION], 1.75);
        assert!(sink.contains(LogLevel::Error, "Surcharge WDs"));
    }

    #[test]
    fn test_unparseable_surcharge_wds_aborts() {
        let mut t = table(
            &["Group", "Surcharge WDs"],
            vec![json!({"Group": "Commission 1", "Surcharge WDs": "n/a"})],
        );
        let sink = MemorySink::new();
        apply_commission_rate(&mut t, &sink);
        let err = aggregate_commission(&mut t, &sink).unwrap_err();
        assert!(matches!(err, TransformError::ParseFailure { row: 1, .. }));
    }
}
