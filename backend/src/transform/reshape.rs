//! Final report shape: drop source-only columns, sort by surcharge.

use std::cmp::Ordering;

use super::columns::{number, DROPPED_COLUMNS, SORT_COLUMN};
use crate::api::logs::LogSink;
use crate::models::{Row, Table};

/// Remove [`DROPPED_COLUMNS`]. Columns already absent are skipped.
pub fn drop_report_columns(table: &mut Table, sink: &dyn LogSink) {
    let dropped: Vec<&str> = DROPPED_COLUMNS
        .into_iter()
        .filter(|column| table.drop_column(column))
        .collect();
    sink.debug(&format!("Dropped columns: {}", dropped.join(", ")));
}

fn by_surch_descending(a: &Row, b: &Row) -> Ordering {
    let a = a.get(SORT_COLUMN).map(number).unwrap_or(0.0);
    let b = b.get(SORT_COLUMN).map(number).unwrap_or(0.0);
    b.total_cmp(&a)
}

/// Stable sort on the cleaned `Surch` value, highest first.
pub fn sort_by_surcharge(table: &mut Table, sink: &dyn LogSink) {
    table.rows.sort_by(by_surch_descending);
    sink.debug(&format!("Sorted table by '{}' in descending order.", SORT_COLUMN));
}

/// Drop then sort.
pub fn reshape(table: &mut Table, sink: &dyn LogSink) {
    drop_report_columns(table, sink);
    sort_by_surcharge(table, sink);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::logs::MemorySink;
    use serde_json::{json, Value};

    fn table(columns: &[&str], rows: Vec<Value>) -> Table {
        Table::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.into_iter()
                .map(|v| v.as_object().unwrap().clone())
                .collect(),
        )
    }

    #[test]
    fn test_drop_tolerates_absent_columns() {
        let mut t = table(
            &["Surch", "Terminal"],
            vec![json!({"Surch": 1.0, "Terminal": "T1"})],
        );
        drop_report_columns(&mut t, &MemorySink::new());
        assert_eq!(t.columns, vec!["Surch"]);
        assert!(t.rows[0].get("Terminal").is_none());
    }

    #[test]
    fn test_sort_descending_and_stable() {
        let mut t = table(
            &["Surch", "id"],
            vec![
                json!({"Surch": 5.0, "id": "a"}),
                json!({"Surch": 20.0, "id": "b"}),
                json!({"Surch": 5.0, "id": "c"}),
                json!({"Surch": -1.0, "id": "d"}),
            ],
        );
        sort_by_surcharge(&mut t, &MemorySink::new());
        let ids: Vec<_> = t.rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["b", "a", "c", "d"]);
    }
}
