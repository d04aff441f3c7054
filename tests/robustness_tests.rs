use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn roster(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "id,name,email,building,flat_number,unit_size,custom_amount").unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}

#[test]
fn test_missing_custom_amount_names_resident() {
    let file = roster(&[
        "r1,Asha,asha@example.com,A,101,,600",
        "r2,Ravi,ravi@example.com,A,102,,",
    ]);

    let mut cmd = Command::new(cargo_bin!("billsplit"));
    cmd.arg("allocate")
        .arg(file.path())
        .args(["--total", "1000", "--split", "custom"]);

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Split amount missing for resident r2"));
}

#[test]
fn test_missing_unit_size_names_flat() {
    let file = roster(&[
        "r1,Asha,asha@example.com,A,101,900,",
        "r2,Ravi,ravi@example.com,A,203,,",
    ]);

    let mut cmd = Command::new(cargo_bin!("billsplit"));
    cmd.arg("allocate")
        .arg(file.path())
        .args(["--total", "1000", "--split", "sqft"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("flat A-203"));
}

#[test]
fn test_unknown_split_strategy() {
    let mut cmd = Command::new(cargo_bin!("billsplit"));
    cmd.args([
        "allocate",
        "tests/fixtures/residents.csv",
        "--total",
        "1000",
        "--split",
        "weighted",
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported split strategy"));
}

#[test]
fn test_duplicate_resident_rejected() {
    let file = roster(&[
        "r1,Asha,asha@example.com,A,101,,",
        "r1,Asha again,asha2@example.com,A,102,,",
    ]);

    let mut cmd = Command::new(cargo_bin!("billsplit"));
    cmd.arg("allocate").arg(file.path()).args(["--total", "10"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("appears more than once"));
}

#[test]
fn test_discrepancy_rejects_duplicate_resident() {
    let file = roster(&[
        "r1,Asha,asha@example.com,A,101,,600",
        "r1,Asha again,asha2@example.com,A,102,,400",
        "r2,Ravi,ravi@example.com,A,103,,",
    ]);

    let mut cmd = Command::new(cargo_bin!("billsplit"));
    cmd.arg("discrepancy").arg(file.path()).args(["--total", "1000"]);

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Resident r1 appears more than once"));
}

#[test]
fn test_non_finite_total_rejected_by_cli() {
    let mut cmd = Command::new(cargo_bin!("billsplit"));
    cmd.args(["allocate", "tests/fixtures/residents.csv", "--total", "NaN"]);

    cmd.assert().failure().stdout(predicate::str::is_empty());
}

#[test]
fn test_negative_total_rejected() {
    let mut cmd = Command::new(cargo_bin!("billsplit"));
    cmd.args(["allocate", "tests/fixtures/residents.csv", "--total", "-5"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid total amount"));
}

#[test]
fn test_empty_roster_rejected() {
    let file = roster(&[]);

    let mut cmd = Command::new(cargo_bin!("billsplit"));
    cmd.arg("allocate").arg(file.path()).args(["--total", "10"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("empty resident list"));
}

#[test]
fn test_malformed_roster_rejected() {
    let file = roster(&["r1,Asha,asha@example.com,A,101,not_a_number,"]);

    let mut cmd = Command::new(cargo_bin!("billsplit"));
    cmd.arg("allocate")
        .arg(file.path())
        .args(["--total", "10", "--split", "size-based"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("CSV error"));
}
