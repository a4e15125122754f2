//! Formatting-hint sidecar.
//!
//! An optional JSON file maps column names to presentation hints:
//!
//! ```json
//! { "Surch": { "format": "currency", "width": 12 }, "WD Trxs": { "format": "integer" } }
//! ```
//!
//! The file is read best-effort before every transform. A missing file and
//! an unreadable or malformed one are both tolerated (logged differently) and
//! yield empty hints. Hints are loaded and reported but do not yet change
//! the report.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

use crate::api::logs::LogSink;
use crate::error::FormattingError;

/// Default sidecar location, relative to the working directory.
pub const DEFAULT_FORMATTING_FILE: &str = "config/formatting.json";

const HINT_SCHEMA: &str = r#"{
    "$schema": "http://json-schema.org/draft-07/schema#",
    "type": "object",
    "additionalProperties": {
        "type": "object",
        "properties": {
            "format": { "type": "string" },
            "width": { "type": "integer", "minimum": 1 },
            "precision": { "type": "integer", "minimum": 0 },
            "label": { "type": "string" }
        }
    }
}"#;

/// Column name -> hint object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormattingHints {
    columns: BTreeMap<String, Map<String, Value>>,
}

impl FormattingHints {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, column: &str) -> Option<&Map<String, Value>> {
        self.columns.get(column)
    }

    /// Parse hints from JSON text, checking them against the hint schema.
    pub fn from_json(content: &str) -> Result<Self, Vec<String>> {
        let data: Value = serde_json::from_str(content).map_err(|e| vec![e.to_string()])?;
        validate_hints(&data)?;

        let columns = match data {
            Value::Object(obj) => obj
                .into_iter()
                .filter_map(|(column, hint)| match hint {
                    Value::Object(hint) => Some((column, hint)),
                    _ => None,
                })
                .collect(),
            _ => BTreeMap::new(),
        };
        Ok(Self { columns })
    }
}

/// Check a parsed sidecar against the embedded schema.
pub fn validate_hints(data: &Value) -> Result<(), Vec<String>> {
    let schema: Value = serde_json::from_str(HINT_SCHEMA)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;
    let validator = jsonschema::draft7::new(&schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator.iter_errors(data).map(|e| e.to_string()).collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Read the sidecar, reporting exactly why it could not be used.
pub fn read_hints(path: &Path) -> Result<FormattingHints, FormattingError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            FormattingError::NotFound(display.clone())
        } else {
            FormattingError::Unreadable {
                path: display.clone(),
                source: e,
            }
        }
    })?;

    FormattingHints::from_json(&content).map_err(|errors| FormattingError::Invalid {
        path: display,
        message: errors.join("; "),
    })
}

/// Best-effort load: never fails, logs the outcome.
pub fn load_hints(path: &Path, sink: &dyn LogSink) -> FormattingHints {
    sink.debug(&format!("Attempting to read formatting file at {}", path.display()));

    match read_hints(path) {
        Ok(hints) => {
            sink.info(&format!(
                "Loaded column formatting from {} ({} columns)",
                path.display(),
                hints.len()
            ));
            hints
        }
        Err(e @ FormattingError::NotFound(_)) => {
            sink.warning(&format!("{}. Proceeding without it.", e));
            FormattingHints::default()
        }
        Err(e) => {
            sink.error(&format!("{}. Proceeding without formatting.", e));
            FormattingHints::default()
        }
    }
}
