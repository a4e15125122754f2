//! End-to-end checks through the public API: CSV bytes in, report out.

use std::fs;

use serde_json::Value;
use tempfile::tempdir;
use vaultreport::{
    parse_csv, process_report, summarize, summarize_csv_bytes, LogLevel, MemorySink,
    OutboxDelivery, Settings, TextRenderer, NO_DATA_MESSAGE,
};

const EXPORT: &str = "\
Terminal,Settlement Date,Group,Surch,Settlement,WD Trxs,Surcharge WDs
T-100,2024-06-30,Commission 2.5,$10.00,$100.00,5,4
T-200,2024-06-30,House,\"$1,250.00\",\"$30,000.00\",400,380
T-300,2024-06-30,Commission 0.75,$0.00,$45.00),0,0
T-400,2024-06-30,Commission 1,$62.50,\"$9,000.00\",25,20
";

fn num(v: &Value) -> f64 {
    v.as_f64().unwrap()
}

#[test]
fn test_export_summary() {
    let raw = parse_csv(EXPORT, ',').unwrap();
    let sink = MemorySink::new();
    let report = summarize(&raw, &sink);

    assert_eq!(report.len(), 4);
    for dropped in ["Settlement Date", "Terminal", "Group"] {
        assert!(!report.has_column(dropped));
    }

    let surch: Vec<f64> = report.rows.iter().map(|r| num(&r["Surch"])).collect();
    assert_eq!(surch, vec![1250.0, 62.5, 10.0, 0.0]);

    // T-100
    let row = &report.rows[2];
    assert_eq!(row["Surcharge amt"], 2.0);
    assert_eq!(row["Average WD amount"], 20.0);
    assert_eq!(row["Daily Vault AVG"], 3.33);
    assert_eq!(row["Commission"], 10.0);

    // T-300: no withdrawals, trailing ')' on the settlement
    let row = &report.rows[3];
    assert_eq!(row["Settlement"], 45.0);
    assert_eq!(row["Surcharge amt"], 0.0);
    assert_eq!(row["Average WD amount"], 0.0);
    assert_eq!(row["Daily Vault AVG"], 1.5);

    // T-200: not a commission group
    assert_eq!(report.rows[0]["Commission"], 0.0);
    assert_eq!(report.rows[0]["Daily Vault AVG"], 1000.0);

    assert_eq!(sink.count(LogLevel::Error), 0);
}

#[test]
fn test_missing_required_columns_give_empty_report() {
    for column in ["Surch", "Settlement", "WD Trxs"] {
        let mut raw = parse_csv(EXPORT, ',').unwrap();
        raw.drop_column(column);
        let sink = MemorySink::new();

        assert!(summarize(&raw, &sink).is_empty(), "{column}");
        assert!(sink.contains(LogLevel::Error, column));
    }
}

#[test]
fn test_missing_group_still_reports() {
    let mut raw = parse_csv(EXPORT, ',').unwrap();
    raw.drop_column("Group");
    let sink = MemorySink::new();
    let report = summarize(&raw, &sink);

    assert_eq!(report.len(), 4);
    assert!(report.rows.iter().all(|r| r["Commission"] == 0.0));
    assert!(sink.contains(LogLevel::Warning, "'Group' column not found"));
}

#[test]
fn test_semicolon_export_and_determinism() {
    let dir = tempdir().unwrap();
    let hints = dir.path().join("formatting.json");
    let export = "Surch;Settlement;WD Trxs\n$3.00;$60.00;3\n$9.00;$90.00;0\n";

    let first = summarize_csv_bytes(export.as_bytes(), &hints, &MemorySink::new());
    let second = summarize_csv_bytes(export.as_bytes(), &hints, &MemorySink::new());

    assert_eq!(first.csv_info.delimiter, ';');
    assert_eq!(first.table, second.table);
    assert_eq!(first.table.to_csv().unwrap(), second.table.to_csv().unwrap());
    assert_eq!(
        first.table.to_csv().unwrap(),
        "Surch,Settlement,WD Trxs,Surcharge amt,Average WD amount,Daily Vault AVG,Commission\n\
9.0,90.0,0.0,0.0,0.0,3.0,0.0\n\
3.0,60.0,3.0,1.0,20.0,2.0,0.0\n"
    );
}

#[test]
fn test_sidecar_diagnostics() {
    let dir = tempdir().unwrap();

    let missing = MemorySink::new();
    summarize_csv_bytes(EXPORT.as_bytes(), &dir.path().join("absent.json"), &missing);
    assert!(missing.contains(LogLevel::Warning, "not found"));

    let unreadable = MemorySink::new();
    summarize_csv_bytes(EXPORT.as_bytes(), dir.path(), &unreadable);
    assert!(unreadable.contains(LogLevel::Error, "Error reading formatting file"));
    assert!(!unreadable.contains(LogLevel::Warning, "not found"));
}

#[test]
fn test_report_lands_in_outbox() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("june.csv");
    fs::write(&input, EXPORT).unwrap();

    let settings = Settings::default()
        .with_recipient(Some("ops@example.com".into()))
        .with_outbox_dir(Some(dir.path().join("outbox")))
        .with_formatting_file(Some(dir.path().join("formatting.json")));
    let outbox = OutboxDelivery::new(&settings.outbox_dir);
    let renderer = TextRenderer { lines_per_page: 3, ..TextRenderer::default() };

    let message = process_report(&input, &settings, &renderer, &outbox, &MemorySink::new()).unwrap();
    assert_eq!(message, "Report sent to ops@example.com");

    let receipts = outbox.list();
    assert_eq!(receipts.len(), 1);
    // header + 4 rows over 3-line pages
    assert_eq!(receipts[0].page_count, 2);

    let body = fs::read_to_string(outbox.outbox_dir().join(&receipts[0].attachment)).unwrap();
    assert!(body.starts_with("Surch"));
    assert!(!body.contains("T-100"));
}

#[test]
fn test_unusable_export_is_no_data() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("july.csv");
    fs::write(&input, "Terminal,Group\nT-1,House\n").unwrap();

    let settings = Settings::default()
        .with_recipient(Some("ops@example.com".into()))
        .with_outbox_dir(Some(dir.path().join("outbox")));
    let outbox = OutboxDelivery::new(&settings.outbox_dir);

    let message = process_report(
        &input,
        &settings,
        &TextRenderer::default(),
        &outbox,
        &MemorySink::new(),
    )
    .unwrap();

    assert_eq!(message, NO_DATA_MESSAGE);
    assert!(outbox.list().is_empty());
}
