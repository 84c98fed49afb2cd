// End-to-end checks of the upload → preview → results flow on real files.
use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::json;
use tempfile::TempDir;
use tenantimport_lib::client::{ImportError, ImportGateway};
use tenantimport_lib::models::{Block, FailedImport, ImportRequest, ImportResult};
use tenantimport_lib::parsers::{parse_import_file, EMPTY_FILE_MESSAGE};
use tenantimport_lib::processors::cleaner::to_import_records;
use tenantimport_lib::processors::partition::partition_records;
use tenantimport_lib::reporter::{render, ResultsView, WizardView};
use tenantimport_lib::validators::validate_records;
use tenantimport_lib::wizard::{run_import, ImportWizard, WizardState};

fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn tower_a() -> Vec<Block> {
    vec![Block {
        block_id: json!(1),
        block_name: "Tower A".to_string(),
    }]
}

/// Accepts the first user and rejects the rest as duplicates.
struct FirstWinsGateway;

#[async_trait]
impl ImportGateway for FirstWinsGateway {
    async fn import_customers(&self, request: &ImportRequest) -> Result<ImportResult, ImportError> {
        let mut users = request.users.iter();
        let successful = users.next().cloned().into_iter().collect();
        let failed = users
            .map(|user| FailedImport {
                user: serde_json::to_value(user).unwrap(),
                error: "duplicate email".to_string(),
            })
            .collect();
        Ok(ImportResult { successful, failed })
    }

    async fn fetch_blocks(&self) -> Result<Vec<Block>, ImportError> {
        Ok(tower_a())
    }

    async fn refresh_customers(&self) -> Result<usize, ImportError> {
        Ok(1)
    }
}

const HEADER: &str = "Name,Email,Password,Phone,Block Name,Room Number,DOB\n";

#[test]
fn test_record_count_matches_data_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "customers.csv",
        &format!(
            "\u{FEFF}{HEADER}\
             Jay,jay@x.com,secret1,9876543210,,,\n\
             Ana,ana@x.com,secret2,9876543211,Tower A,101,1999-04-01\n\
             Raj,raj@x.com,secret3,9876543212\n"
        ),
    );

    let records = parse_import_file(&path).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records.iter().map(|r| r.key).collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(records[1].text("block_name").unwrap(), "Tower A");
}

#[test]
fn test_missing_headers_yield_single_row_zero_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "bad.csv", "name,phone\nJay,9876543210\n");

    let failure = parse_import_file(&path).unwrap_err();
    let row_errors = failure.to_row_errors();
    assert_eq!(row_errors.row, 0);
    assert_eq!(row_errors.errors, vec!["Missing required columns: email, password.".to_string()]);
}

#[test]
fn test_header_only_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "empty.csv", HEADER);
    assert_eq!(parse_import_file(&path).unwrap_err().message, EMPTY_FILE_MESSAGE);
}

#[test]
fn test_unsupported_and_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "notes.txt", "hello");
    assert!(parse_import_file(&path).unwrap_err().message.contains("Unsupported file type"));
    assert!(parse_import_file(dir.path().join("absent.csv"))
        .unwrap_err()
        .message
        .contains("File not found"));
}

#[test]
fn test_scenarios_through_validation_and_cleaning() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "scenarios.csv",
        &format!(
            "{HEADER}\
             Jay,jay@x.com,secret1,9876543210,,,\n\
             Kim,kim@x.com,secret1,9876543210,Tower A,,\n\
             Lee,lee@x.com,secret1,12345,,,\n\
             Mia,mia@x.com,secret1,9876543210,tower a,12,\n"
        ),
    );

    let records = parse_import_file(&path).unwrap();
    let errors = validate_records(&records, &tower_a());

    // Scenario B and C; A and D are clean
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].row, 1);
    assert_eq!(
        errors[0].errors,
        vec!["room_number is required when block_name is provided.".to_string()]
    );
    assert_eq!(errors[1].row, 2);
    assert_eq!(errors[1].errors, vec!["phone must be exactly 10 digits.".to_string()]);

    assert_eq!(validate_records(&records, &tower_a()), errors);

    let partition = partition_records(&records, &errors);
    assert_eq!(partition.valid_count() + partition.invalid_count(), records.len());
    assert_eq!(partition.invalid_keys, vec![1, 2]);

    let cleaned = to_import_records(&partition.valid);
    assert_eq!(cleaned.len(), 2);
    for record in &cleaned {
        assert!(!record.contains("key"));
        for (name, value) in &record.0 {
            if name != "block_name" && name != "room_number" {
                assert_ne!(value, &json!(""), "{name} should have been dropped");
            }
        }
    }
    assert_eq!(cleaned[0].get("block_name"), Some(&json!("")));
    assert!(!cleaned[0].contains("dob"));
}

#[test]
fn test_key_column_and_padded_email_are_not_sent() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "keyed.csv",
        "name,email,password,phone,Key\n\
         Jay, jay@x.com ,secret1,9876543210,abc\n",
    );

    let records = parse_import_file(&path).unwrap();
    let errors = validate_records(&records, &[]);
    assert!(errors.is_empty());

    let partition = partition_records(&records, &errors);
    let out = to_import_records(&partition.valid);
    assert_eq!(out.len(), 1);
    assert!(!out[0].contains("key"));
    assert_eq!(out[0].get("email"), Some(&json!("jay@x.com")));
}

#[tokio::test]
async fn test_full_wizard_reports_per_record_failures() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "wizard.csv",
        &format!(
            "{HEADER}\
             Jay,jay@x.com,secret1,9876543210,,,\n\
             Ana,ana@x.com,secret2,9876543211,,,\n\
             Bad,not-an-email,secret3,9876543212,,,\n"
        ),
    );

    let gateway = FirstWinsGateway;
    let blocks = gateway.fetch_blocks().await.unwrap();

    let mut wizard = ImportWizard::new();
    wizard.accept_upload(parse_import_file(&path), &blocks).unwrap();

    match render(&wizard) {
        WizardView::Preview(preview) => {
            assert_eq!(preview.valid_count, 2);
            assert_eq!(preview.invalid_count, 1);
            assert!(preview.can_import);
            assert_eq!(preview.rows[2].row, 4);
        }
        other => panic!("unexpected view {other:?}"),
    }

    run_import(&mut wizard, &gateway).await.unwrap();

    match render(&wizard) {
        WizardView::Results(view @ ResultsView::Completed { .. }) => {
            assert_eq!(
                view.to_string(),
                "Successfully imported: 1. Failed: 1.\n  ana@x.com: duplicate email"
            );
        }
        other => panic!("unexpected view {other:?}"),
    }

    wizard.reset().unwrap();
    assert!(matches!(wizard.state(), WizardState::Upload { error: None }));
}
