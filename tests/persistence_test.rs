use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn venpay(data_dir: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin!("venpay"));
    cmd.arg("--data-dir").arg(data_dir);
    cmd
}

fn login(data_dir: &Path) {
    venpay(data_dir).args(["login", "alex"]).assert().success();
}

#[test]
fn test_state_survives_across_runs() {
    let dir = tempdir().unwrap();
    login(dir.path());

    // First run: add a vendor and pay it.
    venpay(dir.path())
        .args(["vendor", "add", "Acme", "--payment-type", "on-demand"])
        .assert()
        .success();
    venpay(dir.path()).args(["pay", "1"]).assert().success();

    // Second run: the vendor, the payment and the debited balance are all
    // recovered from the local store.
    venpay(dir.path())
        .args(["vendor", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Acme"));
    venpay(dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme"))
        .stdout(predicate::str::contains("Completed"));
    venpay(dir.path())
        .arg("balances")
        .assert()
        .success()
        .stdout(predicate::str::contains("Account 1: $199800"));
}

#[test]
fn test_local_store_slots_match_original_keys() {
    let dir = tempdir().unwrap();
    login(dir.path());

    venpay(dir.path()).args(["vendor", "add", "Acme"]).assert().success();
    venpay(dir.path()).arg("balances").assert().success();

    assert!(dir.path().join("vendors.json").exists());
    assert!(dir.path().join("loggedInUser").exists());
    // Balances are only written on mutation; run a payment to mirror them.
    venpay(dir.path()).args(["pay", "1"]).assert().success();
    assert_eq!(
        fs::read_to_string(dir.path().join("account1Balance")).unwrap(),
        "199800"
    );
    assert!(dir.path().join("paymentsHistory.json").exists());
}

#[test]
fn test_pending_payment_retry_after_top_up() {
    let dir = tempdir().unwrap();
    login(dir.path());

    // Seed empty accounts so the first payment goes pending.
    fs::write(dir.path().join("account1Balance"), "0").unwrap();
    fs::write(dir.path().join("account2Balance"), "0").unwrap();

    venpay(dir.path())
        .args(["vendor", "add", "Acme", "--payment-type", "on-demand"])
        .assert()
        .success();
    venpay(dir.path())
        .args(["pay", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Insufficient funds for Acme"));

    // Grab the pending payment id.
    let pending = venpay(dir.path()).arg("pending").output().unwrap();
    let stdout = String::from_utf8_lossy(&pending.stdout);
    let payment_id = stdout
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().next())
        .expect("pending payment id")
        .to_string();

    // Retry with funds still short leaves it pending.
    venpay(dir.path())
        .args(["retry", &payment_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Still insufficient funds for Acme"));

    // Top up the account out of band, retry again: exactly covered.
    fs::write(dir.path().join("account1Balance"), "200").unwrap();
    venpay(dir.path())
        .args(["retry", &payment_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Payment to Acme completed on retry"));
    venpay(dir.path())
        .arg("balances")
        .assert()
        .success()
        .stdout(predicate::str::contains("Account 1: $0"));

    // Retrying the completed payment again is a no-op.
    venpay(dir.path())
        .args(["retry", &payment_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to retry"));
    venpay(dir.path())
        .arg("balances")
        .assert()
        .success()
        .stdout(predicate::str::contains("Account 1: $0"));
}
