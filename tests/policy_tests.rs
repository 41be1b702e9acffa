use std::io::Write;

use riftadvisor::{load_cards_from_json, load_policy_from_json, Advisor, AdvisorError, AdvisorPolicy, VerdictWeights};

#[test]
fn policy_file_overrides_defaults() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    write!(
        tmp,
        r#"{{"spell_base": 55.0, "mulligan": {{"max_mulligans": 1}}, "legend_shortfall_allowance": 0}}"#
    )
    .unwrap();
    let p = load_policy_from_json(tmp.path()).unwrap();
    assert!((p.spell_base - 55.0).abs() < f64::EPSILON);
    assert_eq!(p.mulligan.max_mulligans, 1);
    assert_eq!(p.mulligan.cheap_cost_max, 3);
    assert_eq!(p.legend_shortfall_allowance, 0);
    assert_eq!(p.verdict_weights, VerdictWeights::default());
}

#[test]
fn tier_gaps_must_exceed_modifier_sum() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    write!(
        tmp,
        r#"{{"verdict_weights": {{"uncontested": 100, "favorable": 90, "even": 40, "unfavorable": 10}}}}"#
    )
    .unwrap();
    let err = load_policy_from_json(tmp.path()).unwrap_err();
    match err {
        AdvisorError::InvalidPolicy(msg) => assert!(msg.contains("'uncontested'"), "{msg}"),
        other => panic!("expected InvalidPolicy, got {other:?}"),
    }
}

#[test]
fn advisor_rejects_invalid_policy() {
    let db = load_cards_from_json("data/cards.json").unwrap();
    let policy = AdvisorPolicy {
        efficiency_weight: -1.0,
        ..AdvisorPolicy::default()
    };
    assert!(matches!(
        Advisor::with_policy(&db, policy),
        Err(AdvisorError::InvalidPolicy(_))
    ));
}

#[test]
fn upper_case_hint_phrases_are_rejected() {
    let mut policy = AdvisorPolicy::default();
    policy.text_hints.remove_unit.push("Kill".to_string());
    assert!(matches!(policy.validate(), Err(AdvisorError::InvalidPolicy(_))));
}
