use crate::board::{BattlefieldSlot, Occupancy};
use crate::policy::VerdictWeights;
use serde::{Deserialize, Serialize};

/// Outcome class of placing a unit on a slot. Ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeVerdict {
    Unfavorable,
    Even,
    Favorable,
    Uncontested,
}

impl TradeVerdict {
    /// One tier worse; `Unfavorable` is the floor.
    #[inline]
    pub fn downgraded(self) -> Self {
        match self {
            TradeVerdict::Uncontested => TradeVerdict::Favorable,
            TradeVerdict::Favorable => TradeVerdict::Even,
            TradeVerdict::Even | TradeVerdict::Unfavorable => TradeVerdict::Unfavorable,
        }
    }

    #[inline]
    pub fn weight(self, weights: &VerdictWeights) -> f64 {
        match self {
            TradeVerdict::Uncontested => weights.uncontested,
            TradeVerdict::Favorable => weights.favorable,
            TradeVerdict::Even => weights.even,
            TradeVerdict::Unfavorable => weights.unfavorable,
        }
    }

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            TradeVerdict::Uncontested => "uncontested",
            TradeVerdict::Favorable => "favorable",
            TradeVerdict::Even => "even",
            TradeVerdict::Unfavorable => "unfavorable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeAssessment {
    pub verdict: TradeVerdict,
    /// In [0, 1]. Exact wins beat overkill; losing by less beats losing by more.
    pub raw_score: f64,
    pub my_might: u32,
    pub opponent_might: Option<u32>,
}

impl TradeAssessment {
    /// Short reason line for a placement on battlefield `index`.
    pub fn describe(&self, index: usize) -> String {
        match (self.verdict, self.opponent_might) {
            (TradeVerdict::Uncontested, _) | (_, None) => {
                format!("battlefield {index} is empty: uncontested placement")
            }
            (TradeVerdict::Favorable, Some(opp)) => format!(
                "might {} beats the opposing {opp} at battlefield {index} by {}",
                self.my_might,
                self.my_might - opp
            ),
            (TradeVerdict::Even, Some(opp)) => {
                format!("might {} matches the opposing {opp} at battlefield {index}", self.my_might)
            }
            (TradeVerdict::Unfavorable, Some(opp)) => format!(
                "might {} loses to the opposing {opp} at battlefield {index} by {}",
                self.my_might,
                opp - self.my_might
            ),
        }
    }
}

/// Classify placing a unit of `might` on `slot`.
///
/// Returns `None` when the slot already holds one of my units.
pub fn evaluate_trade(might: u32, slot: &BattlefieldSlot) -> Option<TradeAssessment> {
    match slot.occupancy() {
        Occupancy::MineOnly | Occupancy::Contested => None,
        Occupancy::Empty => Some(TradeAssessment {
            verdict: TradeVerdict::Uncontested,
            raw_score: 1.0,
            my_might: might,
            opponent_might: None,
        }),
        Occupancy::OpponentOnly => {
            let opp = slot.opponent_unit.as_ref().map_or(0, |u| u.might);
            let (verdict, raw_score) = match might.cmp(&opp) {
                std::cmp::Ordering::Greater => {
                    let margin = might - opp;
                    (TradeVerdict::Favorable, 1.0 / f64::from(margin))
                }
                std::cmp::Ordering::Equal => (TradeVerdict::Even, 0.5),
                std::cmp::Ordering::Less => {
                    let deficit = opp - might;
                    (TradeVerdict::Unfavorable, 0.5 / (1.0 + f64::from(deficit)))
                }
            };
            Some(TradeAssessment {
                verdict,
                raw_score,
                my_might: might,
                opponent_might: Some(opp),
            })
        }
    }
}
