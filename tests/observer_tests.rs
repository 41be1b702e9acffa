use std::fs;
use std::sync::Arc;

use serde_json::json;

use riftadvisor::observer::RequestKind;
use riftadvisor::{
    load_cards_from_json, Advisor, AdvisorError, CollectingObserver, EvaluationObserver, EvaluationRecord,
    GameState, GameStateInput, JsonlObserver,
};

fn sample_state() -> GameState {
    let input: GameStateInput = serde_json::from_value(json!({
        "turn": 3, "phase": "main",
        "me": {"mana_total": 3, "hand": ["OGN-001", "OGN-005"]},
        "opponent": {},
        "battlefields": [{}]
    }))
    .unwrap();
    GameState::try_from(input).unwrap()
}

#[test]
fn collecting_observer_sees_every_evaluation() {
    let db = load_cards_from_json("data/cards.json").unwrap();
    let collector = Arc::new(CollectingObserver::new());
    let advisor = Advisor::new(&db).with_observer(collector.clone());

    let eval = advisor.evaluate_playables(&sample_state());
    advisor.evaluate_mulligan(&["OGN-001".to_string()]);

    let records = collector.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].kind, RequestKind::Playables);
    assert_eq!(records[0].turn, Some(3));
    assert_eq!(records[0].evaluation, eval);
    assert_eq!(records[0].catalog_fingerprint.as_deref(), Some(db.fingerprint()));
    assert_eq!(records[1].kind, RequestKind::Mulligan);
    assert_eq!(records[0].state_digest.len(), 64);
}

#[test]
fn state_digest_is_deterministic() {
    let db = load_cards_from_json("data/cards.json").unwrap();
    let collector = Arc::new(CollectingObserver::new());
    let advisor = Advisor::new(&db).with_observer(collector.clone());
    advisor.evaluate_playables(&sample_state());
    advisor.evaluate_playables(&sample_state());
    let r = collector.records();
    assert_eq!(r[0].state_digest, r[1].state_digest);
    assert_eq!(r[0], r[1]);
}

#[test]
fn jsonl_observer_writes_one_line_per_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("evaluations.jsonl");
    let db = load_cards_from_json("data/cards.json").unwrap();
    let sink = Arc::new(JsonlObserver::create(&path).unwrap());
    {
        let advisor = Advisor::new(&db).with_observer(sink.clone());
        for _ in 0..3 {
            advisor.evaluate_playables(&sample_state());
        }
    }
    let stats = sink.finish().unwrap();
    assert_eq!(stats.total_lines, 3);

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    let rec: EvaluationRecord = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(rec.kind, RequestKind::Playables);
    assert!(!rec.evaluation.recommendations.is_empty());
}

#[test]
fn finished_observer_rejects_records_without_affecting_advice() {
    let dir = tempfile::tempdir().unwrap();
    let db = load_cards_from_json("data/cards.json").unwrap();
    let sink = Arc::new(JsonlObserver::create(dir.path().join("out.jsonl")).unwrap());
    sink.finish().unwrap();
    assert!(matches!(sink.finish(), Err(AdvisorError::Observer(_))));

    let record = EvaluationRecord::for_mulligan(&[], None, &Default::default());
    assert!(matches!(sink.observe(&record), Err(AdvisorError::Observer(_))));

    let advisor = Advisor::new(&db).with_observer(sink.clone());
    let eval = advisor.evaluate_playables(&sample_state());
    assert!(!eval.is_empty());
}

#[test]
fn reopening_a_record_file_appends() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runs.jsonl");
    let db = load_cards_from_json("data/cards.json").unwrap();
    for run in 1..=2u64 {
        let sink = Arc::new(JsonlObserver::create(&path).unwrap());
        let advisor = Advisor::new(&db).with_observer(sink.clone());
        advisor.evaluate_playables(&sample_state());
        drop(advisor);
        let stats = sink.finish().unwrap();
        assert_eq!(stats.total_lines, 1, "stats cover run {run} only");
    }
    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 2);
    for line in text.lines() {
        let rec: EvaluationRecord = serde_json::from_str(line).unwrap();
        assert_eq!(rec.kind, RequestKind::Playables);
    }
}
