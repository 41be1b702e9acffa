use serde::{Deserialize, Serialize};

use crate::text_hints::TextHints;
use crate::types::Domain;

/// Structured cost of a legend ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbilityCost {
    #[serde(default)]
    pub exhaust: bool,
    #[serde(default)]
    pub energy: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTag {
    RemoveUnit,
    WeakenUnit,
    BuffUnit,
    MoveUnit,
    DrawCards,
    CounterSpell,
    ReadyLegend,
    Other,
}

impl EffectTag {
    /// Effects that can punish a freshly placed unit.
    #[inline]
    pub fn threatens_units(self) -> bool {
        matches!(self, EffectTag::RemoveUnit | EffectTag::WeakenUnit)
    }

    /// Effects that help a friendly unit after placement.
    #[inline]
    pub fn supports_units(self) -> bool {
        matches!(self, EffectTag::BuffUnit | EffectTag::MoveUnit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbilityTiming {
    Activated,
    Triggered,
    Passive,
}

/// Ability text plus optional structured tags. Accepts either a bare string or
/// an object `{ "text": ..., "cost": ..., "effect": ... }` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AbilityInput")]
pub struct AbilityDescriptor {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<AbilityCost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<EffectTag>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AbilityInput {
    Text(String),
    Full {
        #[serde(default)]
        text: String,
        #[serde(default)]
        cost: Option<AbilityCost>,
        #[serde(default)]
        effect: Option<EffectTag>,
    },
}

impl From<AbilityInput> for AbilityDescriptor {
    fn from(input: AbilityInput) -> Self {
        match input {
            AbilityInput::Text(text) => Self {
                text,
                cost: None,
                effect: None,
            },
            AbilityInput::Full { text, cost, effect } => Self { text, cost, effect },
        }
    }
}

impl AbilityDescriptor {
    #[inline]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cost: None,
            effect: None,
        }
    }

    #[inline]
    pub fn with_cost(mut self, cost: AbilityCost) -> Self {
        self.cost = Some(cost);
        self
    }

    #[inline]
    pub fn with_effect(mut self, effect: EffectTag) -> Self {
        self.effect = Some(effect);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legend {
    pub card_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub domain: Option<Domain>,
    #[serde(default)]
    pub exhausted: bool,
    #[serde(default)]
    pub activated_abilities: Vec<AbilityDescriptor>,
    #[serde(default)]
    pub triggered_abilities: Vec<AbilityDescriptor>,
    #[serde(default)]
    pub passive_abilities: Vec<AbilityDescriptor>,
}

impl Legend {
    pub fn new(card_id: impl Into<String>) -> Self {
        Self {
            card_id: card_id.into(),
            name: None,
            domain: None,
            exhausted: false,
            activated_abilities: Vec::new(),
            triggered_abilities: Vec::new(),
            passive_abilities: Vec::new(),
        }
    }

    #[inline]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("legend")
    }

    #[inline]
    pub fn has_abilities(&self) -> bool {
        !(self.activated_abilities.is_empty()
            && self.triggered_abilities.is_empty()
            && self.passive_abilities.is_empty())
    }

    /// All abilities in a stable order: activated, triggered, passive; each by index.
    pub fn abilities(&self) -> impl Iterator<Item = (AbilityTiming, usize, &AbilityDescriptor)> {
        let act = self
            .activated_abilities
            .iter()
            .enumerate()
            .map(|(i, a)| (AbilityTiming::Activated, i, a));
        let trig = self
            .triggered_abilities
            .iter()
            .enumerate()
            .map(|(i, a)| (AbilityTiming::Triggered, i, a));
        let pass = self
            .passive_abilities
            .iter()
            .enumerate()
            .map(|(i, a)| (AbilityTiming::Passive, i, a));
        act.chain(trig).chain(pass)
    }

    /// Fill structured tags the wire left out, using the text adapter.
    pub fn complete_tags(&mut self, hints: &TextHints) {
        for (timing, list) in [
            (AbilityTiming::Activated, &mut self.activated_abilities),
            (AbilityTiming::Triggered, &mut self.triggered_abilities),
            (AbilityTiming::Passive, &mut self.passive_abilities),
        ] {
            for ability in list.iter_mut() {
                hints.complete_ability(ability, timing);
            }
        }
    }
}
