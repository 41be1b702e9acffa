//! Best-effort rules-text adapter.
//!
//! This is the only place free text is matched. It derives card `cost_tags`
//! at catalog load time and fills missing `cost`/`effect` tags on legend
//! abilities when a state is constructed. Everything downstream reads the
//! structured tags only.

use serde::{Deserialize, Serialize};

use crate::cards::CostTag;
use crate::legend::{AbilityCost, AbilityDescriptor, AbilityTiming, EffectTag};
use crate::types::Domain;

/// Lower-case phrase lists. A text matches a category when its words contain
/// any phrase word for word; a trailing "s", "es", "ed" or "d" is tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextHints {
    pub legend_exhaust_cost: Vec<String>,
    pub remove_unit: Vec<String>,
    pub weaken_unit: Vec<String>,
    pub counter_spell: Vec<String>,
    pub move_unit: Vec<String>,
    pub buff_unit: Vec<String>,
    pub draw_cards: Vec<String>,
    pub ready_legend: Vec<String>,
    /// Protective wording. Vetoes the remove and weaken categories.
    pub protective: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegendAbilityLists {
    pub activated: Vec<AbilityDescriptor>,
    pub triggered: Vec<AbilityDescriptor>,
    pub passive: Vec<AbilityDescriptor>,
}

fn phrases(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

impl Default for TextHints {
    fn default() -> Self {
        Self {
            legend_exhaust_cost: phrases(&[
                "exhaust your legend as an additional cost",
                "as an additional cost, exhaust your legend",
                "you may exhaust your legend to play",
            ]),
            remove_unit: phrases(&["kill", "destroy", "banish", "return a unit", "return target unit"]),
            weaken_unit: phrases(&["damage", "stun", "-1 might", "-2 might", "-3 might", "loses might"]),
            counter_spell: phrases(&["counter"]),
            move_unit: phrases(&["move a unit", "move target", "move a friendly", "move one"]),
            buff_unit: phrases(&["+1 might", "+2 might", "+3 might", "buff"]),
            draw_cards: phrases(&["draw"]),
            ready_legend: phrases(&["ready your legend", "ready this legend"]),
            protective: phrases(&["prevent", "protect", "can't be", "cannot be", "immune", "shield"]),
        }
    }
}

/// Lower-case words. Signs and apostrophes stay so "+2", "-1" and "can't" survive.
fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '-' | '\'')))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

#[inline]
fn word_matches(word: &str, phrase_word: &str) -> bool {
    word.strip_prefix(phrase_word)
        .is_some_and(|rest| matches!(rest, "" | "s" | "es" | "ed" | "d"))
}

fn contains_phrase(haystack: &[String], phrase: &str) -> bool {
    let needle = words(phrase);
    !needle.is_empty()
        && haystack
            .windows(needle.len())
            .any(|w| w.iter().zip(&needle).all(|(a, b)| word_matches(a, b)))
}

#[inline]
fn contains_any(haystack: &[String], phrases: &[String]) -> bool {
    phrases.iter().any(|p| contains_phrase(haystack, p))
}

/// Cost words that name power, not energy.
fn is_power_word(token: &str) -> bool {
    matches!(token, "power" | "rune" | "runes") || Domain::all().iter().any(|d| d.as_str() == token)
}

/// Split "Cost: effect" into its two halves. Only the first colon counts.
fn split_cost(text: &str) -> Option<(&str, &str)> {
    let (cost, effect) = text.split_once(':')?;
    if cost.trim().is_empty() {
        return None;
    }
    Some((cost, effect))
}

impl TextHints {
    /// Structured cost tags for a card's rules text.
    pub fn card_cost_tags(&self, rules_text: &str) -> Vec<CostTag> {
        let mut tags = Vec::new();
        if contains_any(&words(rules_text), &self.legend_exhaust_cost) {
            tags.push(CostTag::ExhaustLegend);
        }
        tags
    }

    /// Parse a leading "exhaust, 2 energy:" style cost. `None` when the text has no cost prefix.
    ///
    /// A bare number ("2: ..." or "1, Exhaust: ...") reads as energy. Numbers
    /// naming power ("1 fury") are not energy.
    pub fn ability_cost(&self, text: &str) -> Option<AbilityCost> {
        let (cost, _) = split_cost(text)?;
        let tokens = words(cost);
        let exhaust = tokens.iter().any(|t| t == "exhaust");
        let mut explicit = 0u32;
        let mut bare = 0u32;
        let mut pending: Option<u32> = None;
        for token in &tokens {
            if let Ok(n) = token.parse::<u32>() {
                if let Some(p) = pending.replace(n) {
                    bare = bare.saturating_add(p);
                }
                continue;
            }
            let number = pending.take();
            if token.starts_with("energy") || token == "mana" {
                explicit = explicit.saturating_add(number.unwrap_or(1));
            } else if !is_power_word(token) {
                bare = bare.saturating_add(number.unwrap_or(0));
            }
        }
        if let Some(p) = pending {
            bare = bare.saturating_add(p);
        }
        let energy = if explicit > 0 { explicit } else { bare };
        if !exhaust && energy == 0 {
            return None;
        }
        Some(AbilityCost { exhaust, energy })
    }

    /// Classify an ability's effect text. First matching category wins.
    ///
    /// Protective wording ("prevent", "can't be") rules out the remove and
    /// weaken categories.
    pub fn ability_effect(&self, text: &str) -> EffectTag {
        let effect_text = split_cost(text).map_or(text, |(_, e)| e);
        let tokens = words(effect_text);
        let protective = contains_any(&tokens, &self.protective);
        let ordered: [(&[String], EffectTag); 7] = [
            (self.remove_unit.as_slice(), EffectTag::RemoveUnit),
            (self.weaken_unit.as_slice(), EffectTag::WeakenUnit),
            (self.counter_spell.as_slice(), EffectTag::CounterSpell),
            (self.move_unit.as_slice(), EffectTag::MoveUnit),
            (self.buff_unit.as_slice(), EffectTag::BuffUnit),
            (self.draw_cards.as_slice(), EffectTag::DrawCards),
            (self.ready_legend.as_slice(), EffectTag::ReadyLegend),
        ];
        ordered
            .iter()
            .filter(|(_, tag)| !(protective && tag.threatens_units()))
            .find(|(list, _)| contains_any(&tokens, list))
            .map_or(EffectTag::Other, |(_, tag)| *tag)
    }

    /// Fill whichever of `cost`/`effect` the descriptor lacks.
    ///
    /// Activated abilities without a parseable cost are read as exhaust-only,
    /// since a legend's activated abilities are paid by exhausting it.
    pub fn complete_ability(&self, ability: &mut AbilityDescriptor, timing: AbilityTiming) {
        if ability.cost.is_none() {
            ability.cost = match (self.ability_cost(&ability.text), timing) {
                (Some(c), _) => Some(c),
                (None, AbilityTiming::Activated) => Some(AbilityCost { exhaust: true, energy: 0 }),
                (None, _) => None,
            };
        }
        if ability.effect.is_none() {
            ability.effect = Some(self.ability_effect(&ability.text));
        }
    }

    /// Split a legend card's rules text into ability lists, one ability per line.
    ///
    /// Lines with a cost prefix are activated; lines opening with "when",
    /// "whenever" or "at" are triggered; the rest are passive.
    pub fn legend_abilities(&self, rules_text: &str) -> LegendAbilityLists {
        let mut lists = LegendAbilityLists::default();
        for line in rules_text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let lower = line.to_lowercase();
            let timing = if self.ability_cost(line).is_some() {
                AbilityTiming::Activated
            } else if ["when ", "whenever ", "at "].iter().any(|p| lower.starts_with(p)) {
                AbilityTiming::Triggered
            } else {
                AbilityTiming::Passive
            };
            let mut ability = AbilityDescriptor::new(line);
            self.complete_ability(&mut ability, timing);
            match timing {
                AbilityTiming::Activated => lists.activated.push(ability),
                AbilityTiming::Triggered => lists.triggered.push(ability),
                AbilityTiming::Passive => lists.passive.push(ability),
            }
        }
        lists
    }

    /// Empty phrase lists make classification meaningless.
    pub(crate) fn validate(&self) -> Result<(), String> {
        let lists = [
            ("legend_exhaust_cost", &self.legend_exhaust_cost),
            ("remove_unit", &self.remove_unit),
            ("weaken_unit", &self.weaken_unit),
            ("counter_spell", &self.counter_spell),
            ("move_unit", &self.move_unit),
            ("buff_unit", &self.buff_unit),
            ("draw_cards", &self.draw_cards),
            ("ready_legend", &self.ready_legend),
            ("protective", &self.protective),
        ];
        for (name, list) in lists {
            if list.iter().any(|p| p.trim().is_empty()) {
                return Err(format!("text hint list '{name}' contains an empty phrase"));
            }
            if list.iter().any(|p| p.chars().any(char::is_uppercase)) {
                return Err(format!("text hint list '{name}' must be lower-case"));
            }
        }
        Ok(())
    }
}
