//! Command-line validation happens before any configuration, credential or
//! network access, so these runs never prompt and never leave the machine.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

fn chartmogul() -> (TempDir, Command) {
    let config_dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("chartmogul").unwrap();
    cmd.env("CHARTMOGUL_CONFIG_DIR", config_dir.path())
        .env_remove("CHARTMOGUL_API_TOKEN")
        .env_remove("CHARTMOGUL_SECRET_KEY")
        .env_remove("CHARTMOGUL_FORMAT");
    (config_dir, cmd)
}

#[test]
fn test_missing_metric_prints_help() {
    let (_dir, mut cmd) = chartmogul();
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Please specify the metric"))
        .stderr(predicate::str::contains("Usage: chartmogul <metric> [options]"));
}

#[test]
fn test_unsupported_metric_lists_supported_metrics() {
    let (dir, mut cmd) = chartmogul();
    cmd.args(["revenue", "--this", "month"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("revenue is not a supported metric"))
        .stderr(predicate::str::contains(
            "all, mrr, arr, customer-churn-rate, mrr-churn-rate, ltv, customers, asp, arpa",
        ));

    // nothing was written before validation failed
    assert!(!dir.path().join("config.yml").exists());
    assert!(!dir.path().join("credentials.json").exists());
}

#[test]
fn test_missing_date_range() {
    let (_dir, mut cmd) = chartmogul();
    cmd.arg("mrr")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Missing parameters --start-date and --end-date or just --this are required.",
        ));
}

#[test]
fn test_invalid_date() {
    let (_dir, mut cmd) = chartmogul();
    cmd.args(["arr", "--start-date", "2016-1-1", "--end-date", "2016-01-31"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid date '2016-1-1'"));
}

#[test]
fn test_reversed_date_range() {
    let (_dir, mut cmd) = chartmogul();
    cmd.args(["ltv", "-s", "2016-02-01", "-e", "2016-01-01"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid date range"));
}

#[test]
fn test_unknown_unit_exits_with_failure() {
    let (_dir, mut cmd) = chartmogul();
    cmd.args(["mrr", "--this", "year"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("year"));
}
