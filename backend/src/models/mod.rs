//! Table model shared by the parser, the transform and the renderer.
//!
//! A [`Table`] is an ordered list of column names plus a list of rows. Each
//! row is a JSON object keyed by column name, so cells can hold a string, a
//! number, or `null` for a missing value.

use serde::Serialize;
use serde_json::{Map, Value};

/// One table row: column name -> cell value.
pub type Row = Map<String, Value>;

/// An in-memory table with presentation column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    /// Column names in presentation order
    pub columns: Vec<String>,
    /// Rows, each keyed by column name
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// The "no data" result: zero columns, zero rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when there is nothing to render.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Set `column` in every row from `values`, appending the column name if
    /// it is new. An existing column keeps its position.
    pub fn set_column(&mut self, column: &str, values: Vec<Value>) {
        if !self.has_column(column) {
            self.columns.push(column.to_string());
        }
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.insert(column.to_string(), value);
        }
    }

    /// Remove a column from the header and every row. Absent columns are a no-op.
    pub fn drop_column(&mut self, column: &str) -> bool {
        let before = self.columns.len();
        self.columns.retain(|c| c != column);
        for row in &mut self.rows {
            row.remove(column);
        }
        before != self.columns.len()
    }

    /// Rows as JSON objects holding exactly the table's columns.
    pub fn to_json(&self) -> Value {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut obj = Map::new();
                for col in &self.columns {
                    obj.insert(col.clone(), row.get(col).cloned().unwrap_or(Value::Null));
                }
                Value::Object(obj)
            })
            .collect();
        Value::Array(rows)
    }

    /// Serialize as comma-separated text with a header row.
    pub fn to_csv(&self) -> Result<String, csv::Error> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(
                self.columns
                    .iter()
                    .map(|col| cell_text(row.get(col).unwrap_or(&Value::Null))),
            )?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Display text for a cell: strings unquoted, numbers as JSON prints them,
/// `null` as an empty string.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Table {
        let rows = vec![
            json!({"a": "1", "b": 2.5}),
            json!({"a": "x"}),
        ]
        .into_iter()
        .map(|v| v.as_object().unwrap().clone())
        .collect();
        Table::new(vec!["a".into(), "b".into()], rows)
    }

    #[test]
    fn test_empty_table() {
        let table = Table::empty();
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
    }

    #[test]
    fn test_set_column_appends_once() {
        let mut table = sample();
        table.set_column("c", vec![json!(1), json!(2)]);
        table.set_column("a", vec![json!("y"), json!("z")]);
        assert_eq!(table.columns, vec!["a", "b", "c"]);
        assert_eq!(table.rows[1]["a"], "z");
        assert_eq!(table.rows[0]["c"], 1);
    }

    #[test]
    fn test_drop_missing_column_is_noop() {
        let mut table = sample();
        assert!(!table.drop_column("missing"));
        assert!(table.drop_column("b"));
        assert_eq!(table.columns, vec!["a"]);
        assert!(table.rows[0].get("b").is_none());
    }

    #[test]
    fn test_to_csv_quotes_and_nulls() {
        let mut table = sample();
        table.set_column("c", vec![json!("1,000"), Value::Null]);
        let csv = table.to_csv().unwrap();
        assert_eq!(csv, "a,b,c\n1,2.5,\"1,000\"\nx,,\n");
    }

    #[test]
    fn test_to_json_fills_missing_cells() {
        let json = sample().to_json();
        assert_eq!(json[1]["b"], Value::Null);
        assert_eq!(json[0]["b"], 2.5);
    }
}
