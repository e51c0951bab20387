use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn poker_ev() -> Command {
    Command::cargo_bin("poker-ev").expect("binary exists")
}

#[test]
fn equity_subcommand_prints_a_summary() {
    poker_ev()
        .args(["equity", "--hero", "AsAh", "--range", "KK"])
        .args(["--sims", "2000", "--seed", "7", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Equity"))
        .stdout(predicate::str::contains("Hero AsAh"));
}

#[test]
fn range_subcommand_counts_combos() {
    poker_ev()
        .args(["range", "JJ+", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Range JJ+: 24 combos"));
}

#[test]
fn icm_subcommand_lists_every_seat() {
    poker_ev()
        .args(["icm", "--stacks", "5000,3000,2000", "--payouts", "50,30,20", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Seat 1: stack 5000"))
        .stdout(predicate::str::contains("Seat 3: stack 2000"));
}

#[test]
fn ev_subcommand_emits_json() {
    let output = poker_ev()
        .args(["ev", "--hero", "AsKd", "--range", "QQ", "--pot", "40"])
        .args(["--action", "call", "--bet", "20", "--sims", "2000", "--seed", "3", "--json"])
        .output()
        .expect("runs");
    assert!(output.status.success());
    let outcome: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(outcome["action"], "call");
    assert_eq!(outcome["reward"], 40.0);
    assert!(outcome["equity"].as_f64().is_some());
}

#[test]
fn zero_raise_is_rejected() {
    poker_ev()
        .args(["ev", "--hero", "AsAh", "--range", "KK"])
        .args(["--action", "raise", "--bet", "0", "--no-color"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bet size"));
}

#[test]
fn optimal_subcommand_names_a_best_action() {
    poker_ev()
        .args(["optimal", "--hero", "AsAh", "--range", "QQ+", "--to-call", "2"])
        .args(["--sims", "1000", "--seed", "5", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Optimal action:"));
}

#[test]
fn icm_subcommand_rejects_oversized_fields() {
    let field = vec!["1000"; 20].join(",");
    let payouts = vec!["5"; 20].join(",");
    poker_ev()
        .args(["icm", "--stacks", &field, "--payouts", &payouts, "--no-color"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("too large"));
}
