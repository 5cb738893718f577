// End-to-end: party files on disk → generated_gst_codes.csv

use bill_tools::{generate, MergeError};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_party_files(dir: &TempDir, addresses: &str, marks: &str) -> (PathBuf, PathBuf) {
    let addresses_path = dir.path().join("addresses.json");
    let marks_path = dir.path().join("pvtaddresses.json");
    fs::write(&addresses_path, addresses).unwrap();
    fs::write(&marks_path, marks).unwrap();
    (addresses_path, marks_path)
}

#[test]
fn test_generate_writes_sorted_numbered_report() {
    let dir = TempDir::new().unwrap();
    let (addresses, marks) = write_party_files(
        &dir,
        r#"{
            "Sri Ganesh Pipes": ["4 Mill Rd", "29AAA"],
            "Acme Hardware": ["12 Market St", "29BBB"],
            "Kaveri Traders": ["7 Lake View", "29CCC"]
        }"#,
        r#"{"SG": "Sri Ganesh Pipes", "KT": "29CCC"}"#,
    );
    let output = dir.path().join("generated_gst_codes.csv");

    let rows = generate(&addresses, &marks, &output).unwrap();

    assert_eq!(rows, 3);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "1,29BBB,--,Acme Hardware\n2,29CCC,KT,Kaveri Traders\n3,29AAA,SG,Sri Ganesh Pipes\n"
    );
    assert!(!dir.path().join("generated_gst_codes.csv.tmp").exists());
}

#[test]
fn test_unknown_mark_target_leaves_previous_report_untouched() {
    let dir = TempDir::new().unwrap();
    let (addresses, marks) = write_party_files(
        &dir,
        r#"{"Acme": ["123 St", "T1"]}"#,
        r#"{"X": "Nobody"}"#,
    );
    let output = dir.path().join("generated_gst_codes.csv");
    fs::write(&output, "previous\n").unwrap();

    let err = generate(&addresses, &marks, &output).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<MergeError>(),
        Some(MergeError::UnknownParty { .. })
    ));
    assert_eq!(fs::read_to_string(&output).unwrap(), "previous\n");
}

#[test]
fn test_malformed_address_book_fails() {
    let dir = TempDir::new().unwrap();
    let (addresses, marks) = write_party_files(&dir, r#"{"Acme": "123 St"}"#, "{}");
    let output = dir.path().join("generated_gst_codes.csv");

    assert!(generate(&addresses, &marks, &output).is_err());
    assert!(!output.exists());
}

#[test]
fn test_missing_private_marks_file_fails() {
    let dir = TempDir::new().unwrap();
    let addresses = dir.path().join("addresses.json");
    fs::write(&addresses, r#"{"Acme": ["123 St", "T1"]}"#).unwrap();
    let output = dir.path().join("generated_gst_codes.csv");

    let err = generate(&addresses, &dir.path().join("pvtaddresses.json"), &output).unwrap_err();
    assert!(err.to_string().contains("Failed to read private marks"));
}
