//! Keyword and tag signals. These add rationale lines and order mulligan
//! tosses; they never change a placement or play priority.

use crate::cards::Card;
use crate::engine::trade::TradeVerdict;
use crate::types::CardType;

/// How strongly a card wants to be tossed when the mulligan limit applies.
///
/// Cost dominates (ten per energy). Spells add 5 and gear 3, a unit whose
/// might is below its energy cost adds 5, and a card without keywords adds 2.
pub fn toss_priority(card: &Card) -> f64 {
    let mut score = f64::from(card.energy_cost) * 10.0;
    match card.card_type {
        CardType::Spell => score += 5.0,
        CardType::Gear => score += 3.0,
        CardType::Unit if card.might < card.energy_cost => score += 5.0,
        _ => {}
    }
    if card.keywords.is_empty() {
        score += 2.0;
    }
    score
}

/// Guard or Assault note for a unit placed with `verdict`. Guard wins when a card has both.
pub fn placement_note(card: &Card, verdict: TradeVerdict) -> Option<&'static str> {
    if card.has_keyword("guard") {
        match verdict {
            TradeVerdict::Uncontested => Some("guard unit can protect this battlefield"),
            TradeVerdict::Favorable | TradeVerdict::Even => {
                Some("guard unit can protect and contest this battlefield")
            }
            TradeVerdict::Unfavorable => None,
        }
    } else if card.has_keyword("assault") {
        match verdict {
            TradeVerdict::Uncontested => Some("assault unit can push damage from here"),
            TradeVerdict::Favorable => Some("assault unit can win the trade and push the advantage"),
            TradeVerdict::Even | TradeVerdict::Unfavorable => None,
        }
    } else {
        None
    }
}

/// Tag note for a non-unit card given the units on each side of the board.
pub fn spell_note(card: &Card, opponent_units: usize, my_units: usize) -> Option<String> {
    if card.has_tag("removal") || card.has_tag("damage") {
        return Some(match opponent_units {
            0 => "removal with no opposing units on the board".to_string(),
            1 => "removal: 1 opposing unit on the board to target".to_string(),
            n => format!("removal: {n} opposing units on the board to target"),
        });
    }
    if (card.has_tag("buff") || card.has_tag("protection")) && my_units > 0 {
        return Some(format!("can back up {my_units} of your units on the board"));
    }
    None
}
