//! Derived-metric calculator.
//!
//! Each metric is a pure `&Row -> Value` function over cleaned rows. A zero
//! withdrawal count yields `0` for the per-withdrawal metrics.

use serde_json::Value;

use super::columns::{
    number, AVERAGE_WD_AMOUNT, DAILY_VAULT_AVG, SETTLEMENT, SETTLEMENT_PERIOD_DAYS, SURCH,
    SURCHARGE_AMT, WD_TRXS,
};
use crate::api::logs::LogSink;
use crate::error::{TransformError, TransformResult};
use crate::models::{Row, Table};

/// Round to two decimal places from the exact decimal expansion of `value`,
/// ties to even. Scaling by 100 first would push values such as
/// `0.0849999...` onto a false half.
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// `round2(numerator / divisor)` when the divisor is positive, else `0`.
pub fn per_withdrawal(numerator: f64, divisor: f64) -> f64 {
    if divisor > 0.0 {
        round2(numerator / divisor)
    } else {
        0.0
    }
}

pub fn surcharge_amount(row: &Row) -> Value {
    let surch = row.get(SURCH).map(number).unwrap_or(0.0);
    let trxs = row.get(WD_TRXS).map(number).unwrap_or(0.0);
    Value::from(per_withdrawal(surch, trxs))
}

pub fn average_withdrawal(row: &Row) -> Value {
    let settlement = row.get(SETTLEMENT).map(number).unwrap_or(0.0);
    let trxs = row.get(WD_TRXS).map(number).unwrap_or(0.0);
    Value::from(per_withdrawal(settlement, trxs))
}

pub fn daily_vault_average(row: &Row) -> Value {
    let settlement = row.get(SETTLEMENT).map(number).unwrap_or(0.0);
    Value::from(round2(settlement / SETTLEMENT_PERIOD_DAYS))
}

/// A derived column: its name, the columns it reads, and the row function.
pub struct Metric {
    pub column: &'static str,
    pub depends_on: &'static [&'static str],
    pub compute: fn(&Row) -> Value,
}

/// Metrics in the order they are appended to the report.
pub static METRICS: &[Metric] = &[
    Metric { column: SURCHARGE_AMT, depends_on: &[SURCH, WD_TRXS], compute: surcharge_amount },
    Metric { column: AVERAGE_WD_AMOUNT, depends_on: &[SETTLEMENT, WD_TRXS], compute: average_withdrawal },
    Metric { column: DAILY_VAULT_AVG, depends_on: &[SETTLEMENT], compute: daily_vault_average },
];

/// Compute one metric into `table`, re-checking its dependencies first.
pub fn apply_metric(table: &mut Table, metric: &Metric, sink: &dyn LogSink) -> TransformResult<()> {
    if let Some(missing) = metric.depends_on.iter().find(|c| !table.has_column(c)) {
        return Err(TransformError::missing(
            *missing,
            format!("{} calculation", metric.column),
        ));
    }

    let values: Vec<Value> = table.rows.iter().map(metric.compute).collect();
    table.set_column(metric.column, values);
    sink.debug(&format!("Computed '{}'", metric.column));
    Ok(())
}

/// Compute every metric in order, stopping at the first failure.
pub fn apply_metrics(table: &mut Table, sink: &dyn LogSink) -> TransformResult<()> {
    for metric in METRICS {
        apply_metric(table, metric, sink)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::logs::MemorySink;
    use serde_json::json;

    fn row(v: Value) -> Row {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(3.3333), 3.33);
        assert_eq!(round2(2.0), 2.0);
        assert_eq!(round2(-1.006), -1.01);
    }

    #[test]
    fn test_round2_ties_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(3.75 / 30.0), 0.12);
        assert_eq!(per_withdrawal(1.0, 8.0), 0.12);
    }

    #[test]
    fn test_round2_below_half_stays_down() {
        // 2.55 / 30 is 0.08499999... in binary
        assert_eq!(round2(2.55 / 30.0), 0.08);
    }

    #[test]
    fn test_daily_vault_on_near_half_settlements() {
        let r = row(json!({"Surch": 1.0, "Settlement": 2.55, "WD Trxs": 8.0}));
        assert_eq!(daily_vault_average(&r), 0.08);
        assert_eq!(surcharge_amount(&r), 0.12);

        let r = row(json!({"Surch": 1.0, "Settlement": 3.75, "WD Trxs": 0.0}));
        assert_eq!(daily_vault_average(&r), 0.12);
    }

    #[test]
    fn test_per_withdrawal_zero_guard() {
        assert_eq!(per_withdrawal(10.0, 5.0), 2.0);
        assert_eq!(per_withdrawal(10.0, 0.0), 0.0);
        assert_eq!(per_withdrawal(10.0, -2.0), 0.0);
        assert_eq!(per_withdrawal(10.0, 3.0), 3.33);
    }

    #[test]
    fn test_row_metrics() {
        let r = row(json!({"Surch": 10.0, "Settlement": 100.0, "WD Trxs": 5.0}));
        assert_eq!(surcharge_amount(&r), 2.0);
        assert_eq!(average_withdrawal(&r), 20.0);
        assert_eq!(daily_vault_average(&r), 3.33);
    }

    #[test]
    fn test_zero_withdrawals() {
        let r = row(json!({"Surch": 10.0, "Settlement": 100.0, "WD Trxs": 0.0}));
        assert_eq!(surcharge_amount(&r), 0.0);
        assert_eq!(average_withdrawal(&r), 0.0);
        assert_eq!(daily_vault_average(&r), 3.33);
    }

    #[test]
    fn test_apply_metrics_appends_in_order() {
        let mut table = Table::new(
            vec!["Surch".into(), "Settlement".into(), "WD Trxs".into()],
            vec![row(json!({"Surch": 9.0, "Settlement": 90.0, "WD Trxs": 3.0}))],
        );
        apply_metrics(&mut table, &MemorySink::new()).unwrap();

        assert_eq!(
            table.columns[3..],
            [SURCHARGE_AMT, AVERAGE_WD_AMOUNT, DAILY_VAULT_AVG]
        );
        assert_eq!(table.rows[0][SURCHARGE_AMT], 3.0);
        assert_eq!(table.rows[0][AVERAGE_WD_AMOUNT], 30.0);
        assert_eq!(table.rows[0][DAILY_VAULT_AVG], 3.0);
    }

    #[test]
    fn test_missing_dependency_names_stage() {
        let mut table = Table::new(
            vec!["Surch".into(), "WD Trxs".into()],
            vec![row(json!({"Surch": 9.0, "WD Trxs": 3.0}))],
        );
        let err = apply_metrics(&mut table, &MemorySink::new()).unwrap_err();
        assert_eq!(
            err,
            TransformError::missing(SETTLEMENT, "Average WD amount calculation")
        );
        // first metric already applied
        assert!(table.has_column(SURCHARGE_AMT));
    }
}
