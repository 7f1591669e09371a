use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn splitwallet(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("splitwallet").unwrap();
    cmd.env("SPLITWALLET_DATA_DIR", data_dir.path())
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn init_writes_config() {
    let data_dir = TempDir::new().unwrap();

    splitwallet(&data_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete"));

    assert!(data_dir.path().join("config.json").exists());
}

#[test]
fn expense_flow_raises_and_clears_notifications() {
    let data_dir = TempDir::new().unwrap();

    splitwallet(&data_dir)
        .args(["account", "register", "Alice", "alice@example.com", "--allowance", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered account: Alice"));

    splitwallet(&data_dir)
        .args(["expense", "add", "alice@example.com", "850", "--description", "Rent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$150.00"))
        .stdout(predicate::str::contains("NEAR_LIMIT"));

    splitwallet(&data_dir)
        .args(["notification", "list", "alice@example.com", "--unread"])
        .assert()
        .success()
        .stdout(predicate::str::contains("80% or more"));

    splitwallet(&data_dir)
        .args(["notification", "read-all", "alice@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked 1 notification(s) as read"));

    splitwallet(&data_dir)
        .args(["notification", "list", "alice@example.com", "--unread"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No notifications."));

    splitwallet(&data_dir)
        .args(["expense", "list", "alice@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rent"));
}

#[test]
fn unknown_account_fails() {
    let data_dir = TempDir::new().unwrap();

    splitwallet(&data_dir)
        .args(["account", "show", "nobody@example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Account not found"));
}

#[test]
fn non_positive_allowance_is_rejected() {
    let data_dir = TempDir::new().unwrap();

    splitwallet(&data_dir)
        .args(["account", "register", "Bob", "bob@example.com", "--allowance", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid budget"));
}

#[test]
fn reset_run_reports_nothing_due() {
    let data_dir = TempDir::new().unwrap();

    splitwallet(&data_dir)
        .args(["account", "register", "Carol", "carol@example.com", "--allowance", "200"])
        .assert()
        .success();

    splitwallet(&data_dir)
        .args(["reset", "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reset 0 account(s)"));
}

#[test]
fn amounts_use_the_configured_currency_symbol() {
    let data_dir = TempDir::new().unwrap();
    std::fs::write(
        data_dir.path().join("config.json"),
        r#"{"currency_symbol": "€"}"#,
    )
    .unwrap();

    splitwallet(&data_dir)
        .args(["account", "register", "Dana", "dana@example.com", "--allowance", "300"])
        .assert()
        .success()
        .stdout(predicate::str::contains("€300.00"));

    splitwallet(&data_dir)
        .args(["expense", "add", "dana@example.com", "45", "--description", "Books"])
        .assert()
        .success()
        .stdout(predicate::str::contains("€255.00"))
        .stdout(predicate::str::contains("$").not());

    splitwallet(&data_dir)
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("€255.00"));
}
