use crate::error::{AdvisorError, Result};
use crate::text_hints::TextHints;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Base priority per trade verdict. Tiers must stay strictly ordered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerdictWeights {
    pub uncontested: f64,
    pub favorable: f64,
    pub even: f64,
    pub unfavorable: f64,
}

impl Default for VerdictWeights {
    fn default() -> Self {
        Self::new(100.0, 70.0, 40.0, 10.0)
    }
}

impl VerdictWeights {
    #[inline]
    pub const fn new(uncontested: f64, favorable: f64, even: f64, unfavorable: f64) -> Self {
        Self {
            uncontested,
            favorable,
            even,
            unfavorable,
        }
    }

    /// Weights in tier order, best first.
    #[inline]
    pub fn tiers(&self) -> [(&'static str, f64); 4] {
        [
            ("uncontested", self.uncontested),
            ("favorable", self.favorable),
            ("even", self.even),
            ("unfavorable", self.unfavorable),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MulliganPolicy {
    /// Cards at or below this energy cost count as early plays.
    pub cheap_cost_max: u32,
    /// Early plays wanted before cheap cards stop being automatic keeps.
    pub early_plays_target: usize,
    /// Cards at or above this energy cost are mulligan candidates when doubled up.
    pub expensive_cost_min: u32,
    /// Most cards that may be tossed. The whole hand is never tossed.
    pub max_mulligans: usize,
    pub keep_base: f64,
    pub mulligan_base: f64,
}

impl Default for MulliganPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl MulliganPolicy {
    #[inline]
    pub const fn standard() -> Self {
        Self {
            cheap_cost_max: 3,
            early_plays_target: 2,
            expensive_cost_min: 5,
            max_mulligans: 2,
            keep_base: 50.0,
            mulligan_base: 50.0,
        }
    }
}

/// Tunable weights and thresholds for every advisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorPolicy {
    pub verdict_weights: VerdictWeights,
    pub efficiency_weight: f64,
    pub scarce_bonus: f64,
    pub trade_score_weight: f64,
    pub spell_base: f64,
    pub ability_base: f64,
    /// Energy a card with the exhaust-legend cost may be short by.
    pub legend_shortfall_allowance: u32,
    pub mulligan: MulliganPolicy,
    pub text_hints: TextHints,
}

impl Default for AdvisorPolicy {
    fn default() -> Self {
        Self {
            verdict_weights: VerdictWeights::default(),
            efficiency_weight: 12.0,
            scarce_bonus: 4.0,
            trade_score_weight: 8.0,
            spell_base: 40.0,
            ability_base: 30.0,
            legend_shortfall_allowance: 2,
            mulligan: MulliganPolicy::standard(),
            text_hints: TextHints::default(),
        }
    }
}

impl AdvisorPolicy {
    #[inline]
    pub fn with_verdict_weights(mut self, weights: VerdictWeights) -> Self {
        self.verdict_weights = weights;
        self
    }

    #[inline]
    pub fn with_mulligan(mut self, mulligan: MulliganPolicy) -> Self {
        self.mulligan = mulligan;
        self
    }

    /// Largest amount the non-verdict terms can add to a unit placement.
    /// Efficiency, scarcity and raw trade score are each bounded by 1.
    #[inline]
    pub fn max_unit_modifier(&self) -> f64 {
        self.efficiency_weight + self.scarce_bonus + self.trade_score_weight
    }

    /// Reject weight sets that could let a lower verdict tier outrank a higher one.
    pub fn validate(&self) -> Result<()> {
        let scalars = [
            ("efficiency_weight", self.efficiency_weight),
            ("scarce_bonus", self.scarce_bonus),
            ("trade_score_weight", self.trade_score_weight),
        ];
        for (name, v) in scalars {
            if !v.is_finite() || v < 0.0 {
                return Err(invalid(format!("{name} must be finite and non-negative (got {v})")));
            }
        }
        for (name, v) in [
            ("spell_base", self.spell_base),
            ("ability_base", self.ability_base),
            ("mulligan.keep_base", self.mulligan.keep_base),
            ("mulligan.mulligan_base", self.mulligan.mulligan_base),
        ] {
            if !v.is_finite() {
                return Err(invalid(format!("{name} must be finite (got {v})")));
            }
        }

        let tiers = self.verdict_weights.tiers();
        if let Some((name, v)) = tiers.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("verdict weight '{name}' must be finite (got {v})")));
        }
        let max_mod = self.max_unit_modifier();
        for pair in tiers.windows(2) {
            let (hi_name, hi) = pair[0];
            let (lo_name, lo) = pair[1];
            if hi - lo <= max_mod {
                return Err(invalid(format!(
                    "gap between '{hi_name}' ({hi}) and '{lo_name}' ({lo}) must exceed \
                     the maximum modifier sum {max_mod}"
                )));
            }
        }

        if self.mulligan.expensive_cost_min <= self.mulligan.cheap_cost_max {
            return Err(invalid(format!(
                "mulligan.expensive_cost_min ({}) must exceed cheap_cost_max ({})",
                self.mulligan.expensive_cost_min, self.mulligan.cheap_cost_max
            )));
        }

        self.text_hints.validate().map_err(invalid)
    }
}

fn invalid(msg: String) -> AdvisorError {
    AdvisorError::InvalidPolicy(msg)
}

/// Load a policy file. Missing fields take their defaults; the result is validated.
pub fn load_policy_from_json<P: AsRef<Path>>(path: P) -> Result<AdvisorPolicy> {
    let data = fs::read_to_string(path.as_ref())
        .map_err(|e| invalid(format!("Failed to read policy JSON: {e}")))?;
    let policy: AdvisorPolicy = serde_json::from_str(&data)
        .map_err(|e| invalid(format!("Failed to parse policy JSON: {e}")))?;
    policy.validate()?;
    Ok(policy)
}
