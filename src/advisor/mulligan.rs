use crate::advisor::rank::rank;
use crate::cards::{Card, CardCatalog};
use crate::engine::keywords::toss_priority;
use crate::policy::MulliganPolicy;
use crate::recommendation::{Evaluation, Recommendation, RecommendationKind, SkippedEntry};
use tracing::{debug, warn};

/// Energy-cost curve buckets: 0-1, 2-3, 4-5, 6+.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CostCurve {
    pub buckets: [usize; 4],
}

impl CostCurve {
    #[inline]
    pub fn bucket_of(cost: u32) -> usize {
        match cost {
            0 | 1 => 0,
            2 | 3 => 1,
            4 | 5 => 2,
            _ => 3,
        }
    }

    pub fn of<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Self {
        let mut curve = CostCurve::default();
        for c in cards {
            curve.buckets[Self::bucket_of(c.energy_cost)] += 1;
        }
        curve
    }

    pub fn describe(&self) -> String {
        let [a, b, c, d] = self.buckets;
        format!("curve 0-1:{a} 2-3:{b} 4-5:{c} 6+:{d}")
    }
}

struct Decision<'a> {
    hand_index: usize,
    card: &'a Card,
    toss: bool,
    reason: String,
}

fn priority(policy: &MulliganPolicy, card: &Card, toss: bool) -> f64 {
    let cost = f64::from(card.energy_cost);
    if toss {
        policy.mulligan_base + cost
    } else {
        policy.keep_base - cost
    }
}

/// Keep/mulligan decision for every resolvable card in an opening hand.
pub(crate) fn advise(catalog: &dyn CardCatalog, policy: &MulliganPolicy, hand: &[String]) -> Evaluation {
    let mut eval = Evaluation::default();
    let mut resolved: Vec<(usize, &Card)> = Vec::with_capacity(hand.len());
    for (i, id) in hand.iter().enumerate() {
        match catalog.require_card(id) {
            Ok(card) => resolved.push((i, card)),
            Err(e) => {
                warn!(card_id = %id, "mulligan: unresolved card");
                eval.skipped.push(SkippedEntry {
                    card_id: id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
    if resolved.is_empty() {
        return eval;
    }

    let curve = CostCurve::of(resolved.iter().map(|(_, c)| *c));
    let units: Vec<&Card> = resolved
        .iter()
        .map(|(_, c)| *c)
        .filter(|c| c.card_type.is_unit())
        .collect();
    let unit_line = if units.is_empty() {
        "no units in hand".to_string()
    } else {
        let total: u32 = units.iter().map(|c| c.might).sum();
        #[allow(clippy::cast_precision_loss)]
        let avg = f64::from(total) / units.len() as f64;
        format!("{} units, average might {avg:.1}", units.len())
    };
    let early = resolved
        .iter()
        .filter(|(_, c)| c.energy_cost <= policy.cheap_cost_max)
        .count();
    let expensive = resolved
        .iter()
        .filter(|(_, c)| c.energy_cost >= policy.expensive_cost_min)
        .count();

    let mut decisions: Vec<Decision<'_>> = resolved
        .iter()
        .map(|&(hand_index, card)| {
            let cost = card.energy_cost;
            let (toss, reason) = if cost <= policy.cheap_cost_max && early < policy.early_plays_target {
                (
                    false,
                    format!(
                        "early plays are short ({early} of {} cost {} or less)",
                        policy.early_plays_target, policy.cheap_cost_max
                    ),
                )
            } else if cost >= policy.expensive_cost_min && expensive >= 2 {
                (
                    true,
                    format!(
                        "hand holds {expensive} cards costing {} or more",
                        policy.expensive_cost_min
                    ),
                )
            } else {
                (false, "fits the opening curve".to_string())
            };
            Decision {
                hand_index,
                card,
                toss,
                reason,
            }
        })
        .collect();

    // Limit: at most max_mulligans, never the whole hand.
    let allowed = policy.max_mulligans.min(decisions.len().saturating_sub(1));
    let mut tossed: Vec<usize> = (0..decisions.len()).filter(|&i| decisions[i].toss).collect();
    if tossed.len() > allowed {
        // Highest toss priority first; ties keep hand order. The tail gets kept.
        tossed.sort_by(|&a, &b| {
            toss_priority(decisions[b].card)
                .total_cmp(&toss_priority(decisions[a].card))
                .then(decisions[a].hand_index.cmp(&decisions[b].hand_index))
        });
        for &i in &tossed[allowed..] {
            let d = &mut decisions[i];
            d.toss = false;
            d.reason = format!(
                "{}; kept because at most {allowed} of {} cards may be mulliganed",
                d.reason,
                resolved.len()
            );
        }
    }

    let curve_line = curve.describe();
    eval.recommendations = decisions
        .into_iter()
        .map(|d| {
            let kind = if d.toss {
                RecommendationKind::Mulligan
            } else {
                RecommendationKind::Keep
            };
            debug!(card_id = %d.card.card_id, ?kind, "mulligan decision");
            let mut rec = Recommendation::new(kind, d.card.card_id.clone(), priority(policy, d.card, d.toss));
            rec.name = Some(d.card.name.clone());
            rec.hand_index = Some(d.hand_index);
            rec.reason(d.reason);
            rec.reason(curve_line.clone());
            rec.reason(unit_line.clone());
            rec
        })
        .collect();
    rank(&mut eval.recommendations);
    eval
}
