use assert_cmd::cargo_bin;
use billsplit::interfaces::csv::resident_reader::ResidentReader;
use std::fs::File;
use std::process::Command;

mod common;

#[test]
fn test_generate_roster() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.csv");
    common::generate_roster(&path, 5).expect("Failed to generate roster");

    let content = std::fs::read_to_string(&path).expect("Failed to read file");
    // Header + 5 rows = 6 lines
    assert_eq!(content.lines().count(), 6);

    let residents = ResidentReader::new(File::open(&path).unwrap())
        .read_all()
        .expect("generated roster parses");
    assert_eq!(residents.len(), 5);
    assert!(residents.iter().all(|r| r.unit_size.is_some()));
}

#[test]
fn test_large_roster_size_based() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("large_roster.csv");
    common::generate_roster(&path, 5_000).expect("Failed to generate roster");

    let output = Command::new(cargo_bin!("billsplit"))
        .arg("allocate")
        .arg(&path)
        .args(["--total", "1234567.89", "--split", "size-based"])
        .args(["--rounding", "largest-remainder"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success(), "Binary failed to split a large roster");

    let mut reader = csv::Reader::from_reader(output.stdout.as_slice());
    let mut sum = rust_decimal::Decimal::ZERO;
    let mut rows = 0;
    for record in reader.records() {
        let record = record.expect("Failed to read record");
        sum += record[5].parse::<rust_decimal::Decimal>().unwrap();
        rows += 1;
    }
    assert_eq!(rows, 5_000);
    assert_eq!(sum, rust_decimal_macros::dec!(1234567.89));
}
