//! Column names and the per-column policy table.
//!
//! Every stage asks [`policy_for`] what a missing column means instead of
//! hard-coding it, so the abort/degrade split lives in one place.

use serde_json::Value;

pub const SURCH: &str = "Surch";
pub const SETTLEMENT: &str = "Settlement";
pub const WD_TRXS: &str = "WD Trxs";
pub const GROUP: &str = "Group";
pub const SURCHARGE_WDS: &str = "Surcharge WDs";
pub const SETTLEMENT_DATE: &str = "Settlement Date";
pub const TERMINAL: &str = "Terminal";

pub const SURCHARGE_AMT: &str = "Surcharge amt";
pub const AVERAGE_WD_AMOUNT: &str = "Average WD amount";
pub const DAILY_VAULT_AVG: &str = "Daily Vault AVG";
pub const COMMISSION: &str = "Commission";

/// Days in the settlement period used for the daily vault average.
pub const SETTLEMENT_PERIOD_DAYS: f64 = 30.0;

/// Columns removed from the final report.
pub const DROPPED_COLUMNS: [&str; 3] = [SETTLEMENT_DATE, TERMINAL, GROUP];

/// Column the report is sorted on (descending).
pub const SORT_COLUMN: &str = SURCH;

/// What happens when a column is absent from the input.
#[derive(Debug, Clone, PartialEq)]
pub enum Requirement {
    /// Absence aborts the transform to the empty result.
    Required,
    /// Absence is tolerated; `fallback` describes the substitute.
    Optional { fallback: Fallback },
    /// Only ever dropped from the output, so absence changes nothing.
    DropOnly,
}

/// Substitute used when an optional column is absent.
#[derive(Debug, Clone, PartialEq)]
pub enum Fallback {
    /// Every row gets this value in the dependent column.
    Constant(f64),
    /// The dependent column keeps the value it already has.
    KeepCurrent,
}

/// How a source column is cleaned before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cleaning {
    /// Strip `$`, `,` and `)` then parse as a float.
    Currency,
    /// Parse as a float as-is.
    Number,
    /// Left untouched.
    Raw,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPolicy {
    pub name: &'static str,
    pub requirement: Requirement,
    pub cleaning: Cleaning,
}

/// Policy for every source column the report knows about.
pub static COLUMN_POLICIES: &[ColumnPolicy] = &[
    ColumnPolicy { name: SURCH, requirement: Requirement::Required, cleaning: Cleaning::Currency },
    ColumnPolicy { name: SETTLEMENT, requirement: Requirement::Required, cleaning: Cleaning::Currency },
    ColumnPolicy { name: WD_TRXS, requirement: Requirement::Required, cleaning: Cleaning::Number },
    ColumnPolicy {
        name: GROUP,
        requirement: Requirement::Optional { fallback: Fallback::Constant(0.0) },
        cleaning: Cleaning::Raw,
    },
    ColumnPolicy {
        name: SURCHARGE_WDS,
        requirement: Requirement::Optional { fallback: Fallback::KeepCurrent },
        cleaning: Cleaning::Number,
    },
    ColumnPolicy { name: SETTLEMENT_DATE, requirement: Requirement::DropOnly, cleaning: Cleaning::Raw },
    ColumnPolicy { name: TERMINAL, requirement: Requirement::DropOnly, cleaning: Cleaning::Raw },
];

/// Look up the policy of a known column.
pub fn policy_for(name: &str) -> Option<&'static ColumnPolicy> {
    COLUMN_POLICIES.iter().find(|p| p.name == name)
}

/// Columns whose absence aborts the transform.
pub fn required_columns() -> impl Iterator<Item = &'static ColumnPolicy> {
    COLUMN_POLICIES
        .iter()
        .filter(|p| p.requirement == Requirement::Required)
}

/// Columns that are validated and cleaned before any metric is derived.
pub fn cleaned_required_columns() -> impl Iterator<Item = &'static ColumnPolicy> {
    required_columns().filter(|p| p.cleaning != Cleaning::Raw)
}

/// Numeric view of a cleaned cell. Cleaning guarantees a number for
/// required columns; anything else reads as zero.
pub fn number(value: &Value) -> f64 {
    value.as_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_set() {
        let required: Vec<_> = required_columns().map(|p| p.name).collect();
        assert_eq!(required, vec![SURCH, SETTLEMENT, WD_TRXS]);
    }

    #[test]
    fn test_optional_fallbacks() {
        assert_eq!(
            policy_for(GROUP).unwrap().requirement,
            Requirement::Optional { fallback: Fallback::Constant(0.0) }
        );
        assert_eq!(
            policy_for(SURCHARGE_WDS).unwrap().requirement,
            Requirement::Optional { fallback: Fallback::KeepCurrent }
        );
    }

    #[test]
    fn test_dropped_columns_are_drop_only_or_optional() {
        for name in DROPPED_COLUMNS {
            let policy = policy_for(name).unwrap();
            assert_ne!(policy.requirement, Requirement::Required, "{name}");
        }
        assert!(policy_for("Unknown").is_none());
    }
}
