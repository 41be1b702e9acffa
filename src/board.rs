use serde::{Deserialize, Serialize};

/// Upper bound on battlefield slots in a 1v1 snapshot.
pub const MAX_BATTLEFIELDS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRef {
    pub card_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub might: u32,
}

impl UnitRef {
    #[inline]
    pub fn new(card_id: impl Into<String>, might: u32) -> Self {
        Self {
            card_id: card_id.into(),
            name: None,
            might,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occupancy {
    Empty,
    MineOnly,
    OpponentOnly,
    Contested,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattlefieldSlot {
    pub index: usize,
    #[serde(default)]
    pub my_unit: Option<UnitRef>,
    #[serde(default)]
    pub opponent_unit: Option<UnitRef>,
}

impl BattlefieldSlot {
    #[inline]
    pub fn empty(index: usize) -> Self {
        Self {
            index,
            my_unit: None,
            opponent_unit: None,
        }
    }

    #[inline]
    pub fn with_mine(mut self, unit: UnitRef) -> Self {
        self.my_unit = Some(unit);
        self
    }

    #[inline]
    pub fn with_opponent(mut self, unit: UnitRef) -> Self {
        self.opponent_unit = Some(unit);
        self
    }

    #[inline]
    pub fn occupancy(&self) -> Occupancy {
        match (&self.my_unit, &self.opponent_unit) {
            (None, None) => Occupancy::Empty,
            (Some(_), None) => Occupancy::MineOnly,
            (None, Some(_)) => Occupancy::OpponentOnly,
            (Some(_), Some(_)) => Occupancy::Contested,
        }
    }

    /// A slot accepts one of my units only while I have none there.
    #[inline]
    pub fn is_open_for_me(&self) -> bool {
        self.my_unit.is_none()
    }
}

/// Ordered battlefield slots, sorted by index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    slots: Vec<BattlefieldSlot>,
}

impl Board {
    /// Slots are sorted by index; callers validate uniqueness and bounds beforehand.
    pub(crate) fn from_slots(mut slots: Vec<BattlefieldSlot>) -> Self {
        slots.sort_by_key(|s| s.index);
        Self { slots }
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&BattlefieldSlot> {
        self.slots.iter().find(|s| s.index == index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &BattlefieldSlot> {
        self.slots.iter()
    }

    /// Slots where a new unit of mine may be placed, ascending by index.
    #[inline]
    pub fn open_for_me(&self) -> impl Iterator<Item = &BattlefieldSlot> {
        self.slots.iter().filter(|s| s.is_open_for_me())
    }

    /// Units on the board as (mine, opponent's).
    pub fn unit_counts(&self) -> (usize, usize) {
        self.slots.iter().fold((0, 0), |(mine, theirs), s| {
            (
                mine + usize::from(s.my_unit.is_some()),
                theirs + usize::from(s.opponent_unit.is_some()),
            )
        })
    }
}
