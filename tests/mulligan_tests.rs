use riftadvisor::{load_cards_from_json, Advisor, AdvisorPolicy, CardsDb, MulliganPolicy, RecommendationKind};

fn cards() -> CardsDb {
    load_cards_from_json("data/cards.json").expect("cards load")
}

fn hand(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| (*s).to_string()).collect()
}

fn kind_of(eval: &riftadvisor::Evaluation, hand_index: usize) -> RecommendationKind {
    eval.recommendations
        .iter()
        .find(|r| r.hand_index == Some(hand_index))
        .map(|r| r.kind)
        .expect("one decision per hand card")
}

#[test]
fn two_expensive_cards_are_mulliganed_cheap_ones_kept() {
    // Costs 1, 1, 6, 6.
    let db = cards();
    let advisor = Advisor::new(&db);
    let eval = advisor.evaluate_mulligan(&hand(&["OGN-001", "OGN-001", "OGN-004", "OGN-018"]));

    assert_eq!(eval.len(), 4);
    assert_eq!(kind_of(&eval, 0), RecommendationKind::Keep);
    assert_eq!(kind_of(&eval, 1), RecommendationKind::Keep);
    assert_eq!(kind_of(&eval, 2), RecommendationKind::Mulligan);
    assert_eq!(kind_of(&eval, 3), RecommendationKind::Mulligan);

    // Mulligans rank first (base + cost beats base - cost).
    assert_eq!(eval.recommendations[0].kind, RecommendationKind::Mulligan);
    assert_eq!(eval.recommendations[0].hand_index, Some(2));
    assert!(eval.skipped.is_empty());
}

#[test]
fn short_on_early_plays_keeps_cheap_cards_with_reason() {
    let db = cards();
    let advisor = Advisor::new(&db);
    let eval = advisor.evaluate_mulligan(&hand(&["OGN-001", "OGN-004", "OGN-012", "OGN-007"]));
    let cheap = eval
        .recommendations
        .iter()
        .find(|r| r.card_id == "OGN-001")
        .unwrap();
    assert_eq!(cheap.kind, RecommendationKind::Keep);
    assert!(cheap.rationale[0].contains("early plays are short"), "{:?}", cheap.rationale);
    assert!(cheap.rationale.iter().any(|l| l.starts_with("curve ")));
}

#[test]
fn mulligan_limit_converts_lowest_toss_priority_to_keep() {
    // Costs 6, 6, 7, 5: all four qualify but only two may go.
    let db = cards();
    let advisor = Advisor::new(&db);
    let eval = advisor.evaluate_mulligan(&hand(&["OGN-004", "OGN-018", "OGN-012", "OGN-007"]));
    assert_eq!(eval.count_kind(RecommendationKind::Mulligan), 2);
    assert_eq!(kind_of(&eval, 2), RecommendationKind::Mulligan); // cost 7
    assert_eq!(kind_of(&eval, 1), RecommendationKind::Mulligan); // cost 6, no keywords
    assert_eq!(kind_of(&eval, 0), RecommendationKind::Keep); // cost 6, Guard
    assert_eq!(kind_of(&eval, 3), RecommendationKind::Keep);
    let kept = eval.recommendations.iter().find(|r| r.hand_index == Some(3)).unwrap();
    assert!(kept.rationale[0].contains("may be mulliganed"), "{:?}", kept.rationale);
}

#[test]
fn mulligan_limit_tosses_under_statted_units_first() {
    // Legion Warbanner (4, might 5) comes first; Mindspire Oracle (4, might 3) is worse for its cost.
    let db = cards();
    let policy = AdvisorPolicy::default().with_mulligan(MulliganPolicy {
        expensive_cost_min: 4,
        max_mulligans: 1,
        ..MulliganPolicy::standard()
    });
    let advisor = Advisor::with_policy(&db, policy).unwrap();
    let eval = advisor.evaluate_mulligan(&hand(&["OGN-009", "OGN-011", "OGN-010"]));
    assert_eq!(kind_of(&eval, 1), RecommendationKind::Mulligan);
    assert_eq!(kind_of(&eval, 0), RecommendationKind::Keep);
    assert_eq!(kind_of(&eval, 2), RecommendationKind::Keep);
}

#[test]
fn whole_hand_is_never_tossed() {
    let db = cards();
    let policy = AdvisorPolicy::default().with_mulligan(MulliganPolicy {
        max_mulligans: 10,
        ..MulliganPolicy::standard()
    });
    let advisor = Advisor::with_policy(&db, policy).unwrap();
    let eval = advisor.evaluate_mulligan(&hand(&["OGN-004", "OGN-018"]));
    assert_eq!(eval.count_kind(RecommendationKind::Mulligan), 1);
    assert_eq!(eval.count_kind(RecommendationKind::Keep), 1);
}

#[test]
fn empty_hand_yields_empty_evaluation() {
    let db = cards();
    let eval = Advisor::new(&db).evaluate_mulligan(&[]);
    assert!(eval.is_empty());
    assert!(eval.skipped.is_empty());
}

#[test]
fn unknown_ids_are_skipped_not_fatal() {
    let db = cards();
    let eval = Advisor::new(&db).evaluate_mulligan(&hand(&["OGN-001", "NOPE-404"]));
    assert_eq!(eval.len(), 1);
    assert_eq!(eval.skipped.len(), 1);
    assert_eq!(eval.skipped[0].card_id, "NOPE-404");
    assert!(eval.skipped[0].reason.contains("not found"));
}

#[test]
fn cheaper_keeps_rank_above_pricier_keeps() {
    let db = cards();
    let eval = Advisor::new(&db).evaluate_mulligan(&hand(&["OGN-003", "OGN-010", "OGN-005"]));
    let order: Vec<&str> = eval.recommendations.iter().map(|r| r.card_id.as_str()).collect();
    assert_eq!(order, vec!["OGN-010", "OGN-005", "OGN-003"]);
}
