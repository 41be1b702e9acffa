use crate::engine::trade::TradeVerdict;
use crate::types::Domain;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Keep,
    Mulligan,
    PlayUnit,
    PlaySpell,
    ActivateAbility,
}

impl RecommendationKind {
    #[inline]
    pub fn is_mulligan_decision(self) -> bool {
        matches!(self, RecommendationKind::Keep | RecommendationKind::Mulligan)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub card_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hand_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battlefield_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability_index: Option<usize>,
    pub priority: f64,
    pub mana_spent: BTreeMap<Domain, u32>,
    #[serde(default)]
    pub unaligned_mana_spent: u32,
    #[serde(default)]
    pub alternate_path: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<TradeVerdict>,
    pub rationale: Vec<String>,
}

impl Recommendation {
    pub fn new(kind: RecommendationKind, card_id: impl Into<String>, priority: f64) -> Self {
        Self {
            kind,
            card_id: card_id.into(),
            name: None,
            hand_index: None,
            battlefield_index: None,
            ability_index: None,
            priority,
            mana_spent: BTreeMap::new(),
            unaligned_mana_spent: 0,
            alternate_path: false,
            verdict: None,
            rationale: Vec::new(),
        }
    }

    #[inline]
    pub fn reason(&mut self, line: impl Into<String>) {
        self.rationale.push(line.into());
    }

    /// Identity used when merging candidate batches.
    #[inline]
    pub(crate) fn dedup_key(&self) -> (RecommendationKind, &str, Option<usize>, Option<usize>) {
        (self.kind, self.card_id.as_str(), self.battlefield_index, self.ability_index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
    pub card_id: String,
    pub reason: String,
}

/// Response envelope: ranked recommendations plus anything that could not be evaluated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub skipped: Vec<SkippedEntry>,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl Evaluation {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.recommendations.len()
    }

    #[inline]
    pub fn top(&self) -> Option<&Recommendation> {
        self.recommendations.first()
    }

    pub fn count_kind(&self, kind: RecommendationKind) -> usize {
        self.recommendations.iter().filter(|r| r.kind == kind).count()
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        let keeps = self.count_kind(RecommendationKind::Keep);
        let mulls = self.count_kind(RecommendationKind::Mulligan);
        if keeps + mulls > 0 {
            parts.push(format!("keep {keeps}, mulligan {mulls}"));
        }
        let plays = self.len() - keeps - mulls;
        if plays > 0 || keeps + mulls == 0 {
            parts.push(format!("{plays} playable"));
        }
        if let Some(top) = self.top().filter(|r| !r.kind.is_mulligan_decision()) {
            let label = top.name.as_deref().unwrap_or(&top.card_id);
            match top.battlefield_index {
                Some(bf) => parts.push(format!("best: {label} -> battlefield {bf}")),
                None => parts.push(format!("best: {label}")),
            }
        }
        if !self.skipped.is_empty() {
            parts.push(format!("{} skipped", self.skipped.len()));
        }
        parts.extend(self.notes.iter().cloned());
        parts.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_for_playables() {
        let mut r = Recommendation::new(RecommendationKind::PlayUnit, "u-1", 10.0);
        r.name = Some("Scout".into());
        r.battlefield_index = Some(1);
        let ev = Evaluation {
            recommendations: vec![r],
            skipped: vec![SkippedEntry {
                card_id: "zz".into(),
                reason: "unknown".into(),
            }],
            notes: vec![],
        };
        assert_eq!(ev.summary(), "1 playable; best: Scout -> battlefield 1; 1 skipped");
    }

    #[test]
    fn summary_for_empty_with_note() {
        let ev = Evaluation {
            notes: vec!["game is over".into()],
            ..Evaluation::default()
        };
        assert_eq!(ev.summary(), "0 playable; game is over");
    }
}
