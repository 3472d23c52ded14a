use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn venpay(data_dir: &Path, workbook: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin!("venpay"));
    cmd.arg("--data-dir").arg(data_dir);
    cmd.arg("--workbook").arg(workbook);
    cmd
}

fn login(data_dir: &Path, workbook: &Path) {
    venpay(data_dir, workbook)
        .args(["login", "alex"])
        .assert()
        .success();
}

#[test]
fn test_mutations_mirror_to_workbook_sheets() {
    let data = tempdir().unwrap();
    let workbook = tempdir().unwrap();
    login(data.path(), workbook.path());

    venpay(data.path(), workbook.path())
        .args(["vendor", "add", "Acme", "--payment-type", "on-demand"])
        .assert()
        .success();
    venpay(data.path(), workbook.path())
        .args(["pay", "1"])
        .assert()
        .success();

    let vendors = fs::read_to_string(workbook.path().join("Vendors.csv")).unwrap();
    assert!(vendors.contains("Name,Payment Type,Assigned Account,Date Added"));
    assert!(vendors.contains("Acme,On-Demand,Account 1"));

    let payments = fs::read_to_string(workbook.path().join("Payments.csv")).unwrap();
    assert!(payments.contains("Acme"));
    assert!(payments.contains("Completed"));

    let balances = fs::read_to_string(workbook.path().join("Balances.csv")).unwrap();
    assert!(balances.contains("Account 1,199800"));
}

#[test]
fn test_fresh_session_reads_vendors_from_workbook() {
    let workbook = tempdir().unwrap();
    fs::write(
        workbook.path().join("Vendors.csv"),
        "Name,Payment Type,Assigned Account,Date Added\n\
         From Sheet,Weekly,Account 2,2026-08-28\n",
    )
    .unwrap();

    // Brand-new local store: the vendor list comes from the sheet.
    let data = tempdir().unwrap();
    login(data.path(), workbook.path());
    venpay(data.path(), workbook.path())
        .args(["vendor", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. From Sheet - Weekly - Account 2"));
}

#[test]
fn test_report_exports_current_report_sheet() {
    let data = tempdir().unwrap();
    let workbook = tempdir().unwrap();
    login(data.path(), workbook.path());

    venpay(data.path(), workbook.path())
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("No completed payments"));

    let sheet = fs::read_to_string(workbook.path().join("CurrentReport.csv")).unwrap();
    assert!(sheet.contains("Balances"));
    assert!(sheet.contains("Account 1,200000"));
}

#[test]
fn test_missing_workbook_is_nonfatal_and_noticed_on_export() {
    let data = tempdir().unwrap();
    let workbook = data.path().join("not-a-workbook");
    login(data.path(), &workbook);

    // Data commands silently fall back to the local store.
    venpay(data.path(), &workbook)
        .args(["vendor", "add", "Acme"])
        .assert()
        .success();

    // The explicit export is the one place unavailability is surfaced, and
    // the preview still renders.
    venpay(data.path(), &workbook)
        .arg("report")
        .assert()
        .success()
        .stderr(predicate::str::contains("report export failed"))
        .stdout(predicate::str::contains("Balances"));
}
