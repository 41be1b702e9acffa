use crate::cards::{Card, CardCatalog};
use crate::engine::keywords::{placement_note, spell_note};
use crate::engine::legend::{alternate_path, usable_abilities, AlternatePath, LegendContext, PathBlock};
use crate::engine::mana::{plan_card, plan_payment, ManaPool, PaymentPlan};
use crate::engine::trade::evaluate_trade;
use crate::legend::{AbilityTiming, Legend};
use crate::policy::AdvisorPolicy;
use crate::recommendation::{Evaluation, Recommendation, RecommendationKind, SkippedEntry};
use crate::state::GameState;
use crate::text_hints::TextHints;
use crate::types::CardType;
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// A hand card that passed the affordability filter.
struct Candidate<'a> {
    hand_index: usize,
    card: &'a Card,
    plan: PaymentPlan,
    path: AlternatePath,
}

fn base_recommendation(kind: RecommendationKind, c: &Candidate<'_>, priority: f64) -> Recommendation {
    let mut rec = Recommendation::new(kind, c.card.card_id.clone(), priority);
    rec.name = Some(c.card.name.clone());
    rec.hand_index = Some(c.hand_index);
    rec.mana_spent.clone_from(&c.plan.by_domain);
    rec.unaligned_mana_spent = c.plan.unaligned;
    rec.reason(format!("pays {}", c.plan.describe()));
    match c.path {
        AlternatePath::Required { shortfall } => {
            rec.alternate_path = true;
            rec.reason(format!(
                "short {shortfall} energy: playable by exhausting your legend as an additional cost"
            ));
        }
        AlternatePath::Optional => {
            rec.reason("affordable on mana; your legend may optionally be exhausted for it");
        }
        AlternatePath::NotApplicable | AlternatePath::Unavailable(_) => {}
    }
    rec
}

fn modifiers(policy: &AdvisorPolicy, plan: &PaymentPlan, mana_total: u32) -> f64 {
    policy.efficiency_weight * plan.efficiency(mana_total) + policy.scarce_bonus * plan.scarce_fraction()
}

/// Legends sent without any abilities take them from their catalog card's rules text.
fn with_catalog_legends<'s>(
    state: &'s GameState,
    catalog: &dyn CardCatalog,
    hints: &TextHints,
) -> Cow<'s, GameState> {
    let needs_fill = |legend: Option<&Legend>| {
        legend.is_some_and(|l| {
            !l.has_abilities()
                && catalog
                    .resolve_card(&l.card_id)
                    .is_some_and(|c| !c.rules_text.trim().is_empty())
        })
    };
    if !needs_fill(state.me.legend.as_ref()) && !needs_fill(state.opponent.legend.as_ref()) {
        return Cow::Borrowed(state);
    }
    let mut owned = state.clone();
    for legend in [owned.me.legend.as_mut(), owned.opponent.legend.as_mut()]
        .into_iter()
        .flatten()
    {
        if legend.has_abilities() {
            continue;
        }
        let Some(card) = catalog.resolve_card(&legend.card_id) else {
            continue;
        };
        let lists = hints.legend_abilities(&card.rules_text);
        legend.activated_abilities = lists.activated;
        legend.triggered_abilities = lists.triggered;
        legend.passive_abilities = lists.passive;
        legend.name.get_or_insert_with(|| card.name.clone());
        legend.domain.get_or_insert(card.domain);
        debug!(card_id = %legend.card_id, "legend abilities taken from catalog");
    }
    Cow::Owned(owned)
}

/// Ranked play recommendations for my hand and legend in `state`.
pub(crate) fn advise(catalog: &dyn CardCatalog, policy: &AdvisorPolicy, state: &GameState) -> Evaluation {
    let mut eval = Evaluation::default();
    if state.is_over() {
        eval.notes.push("game is over: a player is at or below zero health".to_string());
        return eval;
    }

    let state = with_catalog_legends(state, catalog, &policy.text_hints);
    let state: &GameState = &state;
    let me = &state.me;
    let pool = ManaPool::of(me);
    let ctx = LegendContext::from_state(state);

    // 1. Affordability filter.
    let mut candidates: Vec<Candidate<'_>> = Vec::new();
    for (hand_index, id) in me.hand.iter().enumerate() {
        let card = match catalog.require_card(id) {
            Ok(card) => card,
            Err(e) => {
                warn!(card_id = %id, "playables: unresolved card");
                eval.skipped.push(SkippedEntry {
                    card_id: id.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        if matches!(card.card_type, CardType::Legend | CardType::Battlefield) {
            debug!(card_id = %card.card_id, card_type = ?card.card_type, "not playable from hand");
            continue;
        }
        let plan = match plan_card(&pool, card) {
            Ok(plan) => plan,
            Err(short) => {
                debug!(card_id = %card.card_id, %short, "not affordable");
                continue;
            }
        };
        let path = alternate_path(card, &plan, &ctx, policy.legend_shortfall_allowance);
        let affordable = plan.is_complete() || matches!(path, AlternatePath::Required { .. });
        if !affordable {
            match path {
                AlternatePath::Unavailable(PathBlock::LegendExhausted) => {
                    debug!(card_id = %card.card_id, "legend exhausted: alternate path closed");
                }
                _ => debug!(card_id = %card.card_id, short = plan.energy_shortfall, "not affordable"),
            }
            continue;
        }
        candidates.push(Candidate {
            hand_index,
            card,
            plan,
            path,
        });
    }

    let (my_units, opponent_units) = state.battlefields.unit_counts();
    let mut units = Vec::new();
    let mut spells = Vec::new();

    for c in &candidates {
        if c.card.card_type.is_unit() {
            // 3-4. One placement per open slot.
            for slot in state.battlefields.open_for_me() {
                let Some(trade) = evaluate_trade(c.card.might, slot) else {
                    continue;
                };
                let mut verdict = trade.verdict;
                let mut cautions = Vec::new();
                if let Some(threat) = ctx.unit_threat {
                    verdict = verdict.downgraded();
                    cautions.push(format!(
                        "opponent legend can remove or weaken units ('{}'): verdict lowered to {}",
                        threat.text,
                        verdict.as_str()
                    ));
                }
                let priority = verdict.weight(&policy.verdict_weights)
                    + modifiers(policy, &c.plan, me.mana_total)
                    + policy.trade_score_weight * trade.raw_score;
                let mut rec = base_recommendation(RecommendationKind::PlayUnit, c, priority);
                rec.battlefield_index = Some(slot.index);
                rec.verdict = Some(verdict);
                rec.reason(trade.describe(slot.index));
                if let Some(note) = placement_note(c.card, trade.verdict) {
                    rec.reason(note);
                }
                for line in cautions {
                    rec.reason(line);
                }
                if let Some(support) = ctx.unit_support {
                    rec.reason(format!("your legend can follow up: '{}'", support.text));
                }
                if rec.alternate_path {
                    if let Some(ready) = ctx.ready_source {
                        rec.reason(format!("your legend can be readied again: '{}'", ready.text));
                    }
                }
                debug!(card_id = %c.card.card_id, slot = slot.index, verdict = verdict.as_str(), priority, "placement");
                units.push(rec);
            }
        } else {
            // 2. Non-units.
            let priority = policy.spell_base + modifiers(policy, &c.plan, me.mana_total);
            let mut rec = base_recommendation(RecommendationKind::PlaySpell, c, priority);
            rec.reason(format!(
                "uses {:.0}% of available mana",
                c.plan.efficiency(me.mana_total) * 100.0
            ));
            if let Some(note) = spell_note(c.card, opponent_units, my_units) {
                rec.reason(note);
            }
            if let Some(counter) = ctx.spell_counter {
                rec.reason(format!("opponent legend can counter spells ('{}')", counter.text));
            }
            debug!(card_id = %c.card.card_id, priority, "spell");
            spells.push(rec);
        }
    }

    // 5. My legend's activated abilities.
    let mut abilities = Vec::new();
    if let Some(legend) = me.legend.as_ref() {
        for (timing, idx, ability) in usable_abilities(legend, me.mana_total) {
            if timing != AbilityTiming::Activated {
                continue;
            }
            let energy = ability.cost.map_or(0, |c| c.energy);
            let Ok(plan) = plan_payment(&pool, energy, &BTreeMap::new()) else {
                continue;
            };
            if !plan.is_complete() {
                continue;
            }
            let priority = policy.ability_base + policy.efficiency_weight * plan.efficiency(me.mana_total);
            let mut rec = Recommendation::new(RecommendationKind::ActivateAbility, legend.card_id.clone(), priority);
            rec.name = Some(legend.display_name().to_string());
            rec.ability_index = Some(idx);
            rec.mana_spent.clone_from(&plan.by_domain);
            rec.unaligned_mana_spent = plan.unaligned;
            rec.reason(format!("activate: {}", ability.text));
            if ability.cost.is_some_and(|c| c.exhaust) {
                rec.reason("exhausts your legend");
            }
            if energy > 0 {
                rec.reason(format!("pays {}", plan.describe()));
            }
            abilities.push(rec);
        }
    }

    let n_units = units.len();
    let n_spells = spells.len();
    let n_abilities = abilities.len();
    eval.recommendations = crate::advisor::rank::merge_and_rank(vec![units, spells, abilities]);
    debug!(
        units = n_units,
        spells = n_spells,
        abilities = n_abilities,
        kept = eval.recommendations.len(),
        "playables merged"
    );
    eval
}
