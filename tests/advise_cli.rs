use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::{Command, Stdio};

use riftadvisor::{Evaluation, RecommendationKind};

fn run_with_stdin(input: &str, args: &[&str]) -> std::process::Output {
    let mut cmd = Command::cargo_bin("advise").expect("binary exists");
    cmd.args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = cmd.spawn().expect("spawn");
    {
        let stdin = child.stdin.as_mut().expect("stdin");
        stdin.write_all(input.as_bytes()).expect("write stdin");
    }
    child.wait_with_output().expect("wait output")
}

const PLAYABLES: &str = r#"{
    "turn": 3, "phase": "main",
    "me": {"mana_total": 4, "hand": ["OGN-001", "OGN-003", "OGN-012"], "mana_by_rune": {"body": 1}},
    "opponent": {"mana_total": 3},
    "battlefields": [{}, {"opponent_unit": {"card_id": "X", "might": 3}}]
}"#;

#[test]
fn playables_from_stdin() {
    let out = run_with_stdin(PLAYABLES, &["--mode", "playables"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let eval: Evaluation = serde_json::from_slice(&out.stdout).expect("evaluation JSON");
    assert!(!eval.is_empty());
    assert!(eval
        .recommendations
        .iter()
        .all(|r| r.kind == RecommendationKind::PlayUnit && r.card_id != "OGN-012"));
    let top = eval.top().unwrap();
    assert_eq!(top.card_id, "OGN-003");
    assert_eq!(top.battlefield_index, Some(0));
}

#[test]
fn repeated_runs_are_byte_identical() {
    let a = run_with_stdin(PLAYABLES, &[]);
    let b = run_with_stdin(PLAYABLES, &[]);
    assert!(a.status.success());
    assert_eq!(a.stdout, b.stdout);
}

#[test]
fn mulligan_accepts_a_bare_hand() {
    let out = run_with_stdin(r#"{"hand": ["OGN-001", "OGN-004", "OGN-012", "OGN-010"]}"#, &["--mode", "mulligan"]);
    assert!(out.status.success());
    let eval: Evaluation = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(eval.len(), 4);
    assert!(eval.recommendations.iter().all(|r| r.kind.is_mulligan_decision()));
}

#[test]
fn mulligan_accepts_a_full_snapshot() {
    let out = run_with_stdin(PLAYABLES, &["--mode", "mulligan"]);
    assert!(out.status.success());
    let eval: Evaluation = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(eval.len(), 3);
}

#[test]
fn invalid_json_exits_nonzero() {
    let mut cmd = assert_cmd::Command::cargo_bin("advise").unwrap();
    cmd.write_stdin("{not json").assert().failure().stderr(predicate::str::contains("[advise]"));
}

#[test]
fn negative_mana_is_reported() {
    let out = run_with_stdin(
        r#"{"turn": 1, "phase": "main", "me": {"mana_total": -2}, "opponent": {}}"#,
        &[],
    );
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("me.mana_total is negative"), "{stderr}");
    assert!(out.stdout.is_empty());
}

#[test]
fn batch_keeps_line_order_and_reports_bad_lines() {
    let dir = tempfile::tempdir().unwrap();
    let batch = dir.path().join("requests.jsonl");
    let observe = dir.path().join("records.jsonl");
    let good_a = r#"{"turn": 2, "phase": "main", "me": {"mana_total": 2, "hand": ["OGN-001"]}, "opponent": {}, "battlefields": [{}]}"#;
    let good_b = r#"{"turn": 2, "phase": "main", "me": {"mana_total": 2, "hand": ["OGN-005"]}, "opponent": {}, "battlefields": [{}]}"#;
    std::fs::write(&batch, format!("{good_a}\n\n{{broken\n{good_b}\n")).unwrap();

    let out = Command::cargo_bin("advise")
        .unwrap()
        .args(["--batch", batch.to_str().unwrap(), "--observe", observe.to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("line 3:"), "{stderr}");

    let stdout = String::from_utf8(out.stdout).unwrap();
    let evals: Vec<Evaluation> = stdout.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(evals.len(), 2);
    assert_eq!(evals[0].recommendations[0].card_id, "OGN-001");
    assert_eq!(evals[1].recommendations[0].card_id, "OGN-005");

    let records = std::fs::read_to_string(&observe).unwrap();
    assert_eq!(records.lines().count(), 2);
}

#[test]
fn missing_catalog_fails_cleanly() {
    Command::cargo_bin("advise")
        .unwrap()
        .args(["--cards", "data/nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cards load error"));
}
