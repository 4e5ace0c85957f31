#![cfg(feature = "cli")]

use std::process::Command;

const BIN: &str = env!("CARGO_BIN_EXE_aidreport-pdf");

const DELIVERIES: &str = r#"{
    "report_type": "deliveries",
    "period": {"month": 11, "year": 2025},
    "records": [
        {"id": "d1", "survey_date": "2025-11-02T10:00:00Z", "beneficiary_name": "Silva Family",
         "status": "DELIVERED", "evaluated_by": "Ana", "evaluation_date": "2025-11-04T09:00:00Z"},
        {"id": "d2", "status": "UNDER_REVIEW"}
    ]
}"#;

#[test]
fn render_writes_a_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("request.json");
    let output = dir.path().join("out.pdf");
    std::fs::write(&input, DELIVERIES).unwrap();

    let status = Command::new(BIN)
        .env_remove("AIDREPORT_FONT")
        .args(["render", input.to_str().unwrap(), "-o", output.to_str().unwrap()])
        .status()
        .unwrap();
    assert!(status.success());

    let bytes = std::fs::read(&output).unwrap();
    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn publish_stores_reports_and_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("deliveries.json");
    std::fs::write(&input, DELIVERIES).unwrap();
    let root = dir.path().join("store");

    let status = Command::new(BIN)
        .env_remove("AIDREPORT_FONT")
        .args(["publish", input.to_str().unwrap(), "--dir", root.to_str().unwrap(), "--by", "test"])
        .status()
        .unwrap();
    assert!(status.success());

    let stored: Vec<_> = std::fs::read_dir(root.join("reports"))
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].starts_with("deliveries_2025_11_"), "{}", stored[0]);

    let metadata = std::fs::read_to_string(root.join("reports.jsonl")).unwrap();
    let entry: serde_json::Value = serde_json::from_str(metadata.lines().next().unwrap()).unwrap();
    assert_eq!(entry["type"], "deliveries");
    assert_eq!(entry["recordCount"], 2);
    assert_eq!(entry["generatedBy"], "test");
    assert_eq!(entry["title"], "Deliveries Report - 11/2025");
}

#[test]
fn unknown_report_type_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.json");
    std::fs::write(&input, r#"{"report_type": "payroll", "period": {"month": 1, "year": 2026}}"#).unwrap();

    let output = Command::new(BIN)
        .args(["render", input.to_str().unwrap(), "-o", dir.path().join("x.pdf").to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("payroll"));
}

#[test]
fn publish_rejects_two_requests_for_the_same_report() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("a.json");
    let second = dir.path().join("b.json");
    std::fs::write(&first, DELIVERIES).unwrap();
    std::fs::write(&second, DELIVERIES).unwrap();
    let root = dir.path().join("store");

    let output = Command::new(BIN)
        .env_remove("AIDREPORT_FONT")
        .args([
            "publish",
            first.to_str().unwrap(),
            second.to_str().unwrap(),
            "--dir",
            root.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("more than one deliveries report for 11/2025"));
    assert!(!root.exists());
}

#[test]
fn storage_failure_is_not_reported_as_a_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("deliveries.json");
    std::fs::write(&input, DELIVERIES).unwrap();
    // A plain file where the storage root should be.
    let root = dir.path().join("store");
    std::fs::write(&root, b"").unwrap();

    let output = Command::new(BIN)
        .env_remove("AIDREPORT_FONT")
        .args(["publish", input.to_str().unwrap(), "--dir", root.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("1 of 1 reports were not published"), "{stderr}");
    assert!(!stderr.contains("invalid report request"), "{stderr}");
}
