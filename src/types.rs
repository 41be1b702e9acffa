use serde::{Deserialize, Serialize};

/// Rune identity. Gates which mana pays a card's power cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Fury,
    Body,
    Order,
    Calm,
    Mind,
    Chaos,
    Colorless,
}

impl Domain {
    #[inline]
    pub fn all() -> [Domain; 7] {
        [
            Domain::Fury,
            Domain::Body,
            Domain::Order,
            Domain::Calm,
            Domain::Mind,
            Domain::Chaos,
            Domain::Colorless,
        ]
    }

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Fury => "fury",
            Domain::Body => "body",
            Domain::Order => "order",
            Domain::Calm => "calm",
            Domain::Mind => "mind",
            Domain::Chaos => "chaos",
            Domain::Colorless => "colorless",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Unit,
    Spell,
    Legend,
    Gear,
    Battlefield,
    #[serde(other)]
    Other,
}

impl CardType {
    #[inline]
    pub fn is_unit(self) -> bool {
        matches!(self, CardType::Unit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Mulligan,
    Main,
    #[serde(alias = "showdown")]
    Combat,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Me,
    Opponent,
}
