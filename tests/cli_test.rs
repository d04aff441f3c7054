use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_cli_equal_split_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("billsplit"));
    cmd.args(["allocate", "tests/fixtures/residents.csv", "--total", "1000"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "resident_id,resident_name,resident_email,building,flat_number,amount,status",
        ))
        .stdout(predicate::str::contains(
            "r1,Asha Rao,asha@example.com,A,101,333.33,pending",
        ))
        .stdout(predicate::str::contains(
            "r3,Meera Iyer,meera@example.com,B,203,333.33,pending",
        ));

    Ok(())
}

#[test]
fn test_cli_size_based_split() {
    let mut cmd = Command::new(cargo_bin!("billsplit"));
    cmd.args([
        "allocate",
        "tests/fixtures/residents.csv",
        "--total",
        "3000",
        "--split",
        "size-based",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("A,101,800.00,pending"))
        .stdout(predicate::str::contains("A,102,1200.00,pending"))
        .stdout(predicate::str::contains("B,203,1000.00,pending"));
}

#[test]
fn test_cli_custom_split_uses_roster_amounts() {
    let mut cmd = Command::new(cargo_bin!("billsplit"));
    cmd.args([
        "allocate",
        "tests/fixtures/residents.csv",
        "--total",
        "1000",
        "--split",
        "custom",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("A,101,250.00,pending"))
        .stdout(predicate::str::contains("A,102,400.00,pending"))
        .stdout(predicate::str::contains("B,203,350.00,pending"));
}

#[test]
fn test_cli_json_output() {
    let mut cmd = Command::new(cargo_bin!("billsplit"));
    cmd.args([
        "allocate",
        "tests/fixtures/residents.csv",
        "--total",
        "3000",
        "--format",
        "json",
    ]);

    let output = cmd.output().expect("Failed to execute command");
    assert!(output.status.success());

    let allocations: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    let allocations = allocations.as_array().expect("a JSON array");
    assert_eq!(allocations.len(), 3);
    assert_eq!(allocations[0]["residentId"], "r1");
    assert_eq!(allocations[0]["flatNumber"], "101");
    assert_eq!(allocations[0]["amount"], "1000.00");
    assert_eq!(allocations[0]["status"], "pending");
}

#[test]
fn test_cli_discrepancy_report() {
    let mut cmd = Command::new(cargo_bin!("billsplit"));
    cmd.args([
        "discrepancy",
        "tests/fixtures/residents.csv",
        "--total",
        "1200",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "total,custom_sum,discrepancy,residents_without_amount",
        ))
        .stdout(predicate::str::contains("1200.00,1000.00,-200.00,0"));
}
