use riftadvisor::{evaluate_trade, BattlefieldSlot, TradeVerdict, UnitRef};

fn opp_slot(might: u32) -> BattlefieldSlot {
    BattlefieldSlot::empty(0).with_opponent(UnitRef::new("opp", might))
}

#[test]
fn empty_slot_is_uncontested_with_max_score() {
    let t = evaluate_trade(3, &BattlefieldSlot::empty(2)).expect("empty slot is a target");
    assert_eq!(t.verdict, TradeVerdict::Uncontested);
    assert!((t.raw_score - 1.0).abs() < 1e-12);
    assert_eq!(t.opponent_might, None);
}

#[test]
fn opponent_only_slot_compares_might() {
    assert_eq!(evaluate_trade(6, &opp_slot(5)).unwrap().verdict, TradeVerdict::Favorable);
    assert_eq!(evaluate_trade(5, &opp_slot(5)).unwrap().verdict, TradeVerdict::Even);
    assert_eq!(evaluate_trade(2, &opp_slot(5)).unwrap().verdict, TradeVerdict::Unfavorable);
}

#[test]
fn slots_holding_my_unit_are_not_targets() {
    let mine = BattlefieldSlot::empty(0).with_mine(UnitRef::new("me", 4));
    assert!(evaluate_trade(9, &mine).is_none());
    let contested = mine.with_opponent(UnitRef::new("opp", 1));
    assert!(evaluate_trade(9, &contested).is_none());
}

#[test]
fn favorable_score_discounts_overkill() {
    let slot = opp_slot(5);
    let scores: Vec<f64> = (6..=10).map(|m| evaluate_trade(m, &slot).unwrap().raw_score).collect();
    for pair in scores.windows(2) {
        assert!(pair[0] > pair[1], "larger margins must score lower: {scores:?}");
    }
}

#[test]
fn unfavorable_score_shrinks_with_deficit() {
    let slot = opp_slot(6);
    let close = evaluate_trade(5, &slot).unwrap().raw_score;
    let far = evaluate_trade(1, &slot).unwrap().raw_score;
    assert!((close - 0.25).abs() < 1e-12);
    assert!(far < close);
    assert!(far > 0.0);
}

#[test]
fn raw_scores_stay_in_unit_interval() {
    for my in 0..12u32 {
        for opp in 0..12u32 {
            let t = evaluate_trade(my, &opp_slot(opp)).unwrap();
            assert!((0.0..=1.0).contains(&t.raw_score), "my={my} opp={opp} raw={}", t.raw_score);
        }
    }
}

#[test]
fn verdicts_order_best_last() {
    assert!(TradeVerdict::Uncontested > TradeVerdict::Favorable);
    assert!(TradeVerdict::Favorable > TradeVerdict::Even);
    assert!(TradeVerdict::Even > TradeVerdict::Unfavorable);
}
