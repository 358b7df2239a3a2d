//! End-to-end tests of the `cryptogap` binary.

mod support;

use assert_cmd::Command;
use predicates::prelude::*;

use cryptogap::testkit::config::SAMPLE_TOML;
use support::config::temp_config;

fn cryptogap() -> Command {
    Command::cargo_bin("cryptogap").unwrap()
}

#[test]
fn help_lists_commands() {
    cryptogap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn check_shows_native_symbols() {
    let file = temp_config(SAMPLE_TOML);
    cryptogap()
        .args(["check", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("BTCUSDT"))
        .stdout(predicate::str::contains("XBTUSD"));
}

#[test]
fn check_json_emits_typed_lines() {
    let file = temp_config(SAMPLE_TOML);
    let output = cryptogap()
        .args(["--json", "check", "--config"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let kinds: Vec<String> = stdout
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            value["type"].as_str().unwrap().to_string()
        })
        .collect();
    assert!(kinds.iter().any(|k| k == "symbols"));
    assert!(kinds.iter().any(|k| k == "success"));
}

#[test]
fn invalid_config_exits_nonzero() {
    let file = temp_config(&SAMPLE_TOML.replace("min_profit_pct = 0.1", "min_profit_pct = -1"));
    cryptogap()
        .args(["check", "--config"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("min_profit_pct"));
}

#[test]
fn missing_config_exits_nonzero() {
    cryptogap()
        .args(["check", "--config", "/nonexistent/cryptogap.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn scan_against_unreachable_exchanges_reports_no_data() {
    let toml = SAMPLE_TOML.replace(
        "poll_interval_secs = 30",
        "poll_interval_secs = 30\ncycle_deadline_ms = 300",
    );
    let file = temp_config(&toml);
    let output = cryptogap()
        .args(["--json", "scan", "--config"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let cycle = stdout
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .find(|value| value["type"] == "cycle")
        .expect("cycle line");
    assert_eq!(cycle["payload"]["opportunities"].as_array().unwrap().len(), 0);
    assert_eq!(cycle["payload"]["health"].as_array().unwrap().len(), 2);
}
