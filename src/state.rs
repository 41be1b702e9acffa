use crate::board::{BattlefieldSlot, Board, UnitRef, MAX_BATTLEFIELDS};
use crate::error::{AdvisorError, Result};
use crate::legend::Legend;
use crate::text_hints::TextHints;
use crate::types::{Domain, Phase, Side};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Wire shapes. Integers are signed so negative values reach validation instead
// of failing inside serde with a less useful message.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStateInput {
    #[serde(default)]
    pub mana_total: i64,
    #[serde(default)]
    pub mana_by_rune: BTreeMap<Domain, i64>,
    #[serde(default)]
    pub hand: Vec<String>,
    #[serde(default)]
    pub legend: Option<Legend>,
    #[serde(default)]
    pub health: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRefInput {
    pub card_id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub might: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattlefieldSlotInput {
    /// Defaults to the slot's position in the list.
    #[serde(default)]
    pub index: Option<i64>,
    #[serde(default)]
    pub my_unit: Option<UnitRefInput>,
    #[serde(default)]
    pub opponent_unit: Option<UnitRefInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateInput {
    pub turn: i64,
    pub phase: Phase,
    #[serde(default = "default_active")]
    pub active_player: Side,
    #[serde(default)]
    pub me: Option<PlayerStateInput>,
    #[serde(default)]
    pub opponent: Option<PlayerStateInput>,
    #[serde(default)]
    pub battlefields: Vec<BattlefieldSlotInput>,
}

fn default_active() -> Side {
    Side::Me
}

impl Default for GameStateInput {
    fn default() -> Self {
        Self {
            turn: 1,
            phase: Phase::Main,
            active_player: Side::Me,
            me: Some(PlayerStateInput::default()),
            opponent: Some(PlayerStateInput::default()),
            battlefields: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validated state.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerState {
    pub mana_total: u32,
    pub mana_by_rune: BTreeMap<Domain, u32>,
    pub hand: Vec<String>,
    pub legend: Option<Legend>,
    pub health: Option<i64>,
}

impl PlayerState {
    /// Mana not attributed to any domain.
    #[inline]
    pub fn unaligned_mana(&self) -> u32 {
        self.mana_total - self.mana_by_rune.values().sum::<u32>()
    }

    #[inline]
    pub fn rune_mana(&self, domain: Domain) -> u32 {
        self.mana_by_rune.get(&domain).copied().unwrap_or(0)
    }

    #[inline]
    pub fn is_defeated(&self) -> bool {
        self.health.is_some_and(|h| h <= 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    pub turn: u32,
    pub phase: Phase,
    pub active_player: Side,
    pub me: PlayerState,
    pub opponent: PlayerState,
    pub battlefields: Board,
}

impl GameState {
    /// Either player at or below zero health.
    #[inline]
    pub fn is_over(&self) -> bool {
        self.me.is_defeated() || self.opponent.is_defeated()
    }

    /// Validate a wire snapshot, completing legend ability tags with `hints`.
    pub fn from_input_with_hints(input: GameStateInput, hints: &TextHints) -> Result<Self> {
        let turn = non_negative("turn", input.turn)?;
        if turn == 0 {
            return Err(malformed("turn must be at least 1"));
        }
        if !matches!(input.phase, Phase::Mulligan | Phase::Main) {
            debug!(phase = ?input.phase, "state outside mulligan/main; evaluating as sent");
        }

        let me = input.me.ok_or_else(|| malformed("missing player state 'me'"))?;
        let opponent = input
            .opponent
            .ok_or_else(|| malformed("missing player state 'opponent'"))?;
        let me = validate_player("me", me, hints)?;
        let opponent = validate_player("opponent", opponent, hints)?;

        if input.battlefields.len() > MAX_BATTLEFIELDS {
            return Err(malformed(format!(
                "{} battlefields exceeds the maximum of {MAX_BATTLEFIELDS}",
                input.battlefields.len()
            )));
        }
        let mut seen = BTreeSet::new();
        let mut slots = Vec::with_capacity(input.battlefields.len());
        for (pos, slot) in input.battlefields.into_iter().enumerate() {
            let index = match slot.index {
                Some(i) => usize::try_from(i)
                    .map_err(|_| malformed(format!("battlefield index {i} is negative")))?,
                None => pos,
            };
            if index >= MAX_BATTLEFIELDS {
                return Err(malformed(format!("battlefield index {index} out of range")));
            }
            if !seen.insert(index) {
                return Err(malformed(format!("duplicate battlefield index {index}")));
            }
            slots.push(BattlefieldSlot {
                index,
                my_unit: slot.my_unit.map(|u| validate_unit(index, u)).transpose()?,
                opponent_unit: slot.opponent_unit.map(|u| validate_unit(index, u)).transpose()?,
            });
        }

        Ok(GameState {
            turn,
            phase: input.phase,
            active_player: input.active_player,
            me,
            opponent,
            battlefields: Board::from_slots(slots),
        })
    }

    /// Parse and validate a JSON snapshot. Parse failures are `MalformedGameState` too.
    pub fn from_json(data: &str, hints: &TextHints) -> Result<Self> {
        let input: GameStateInput =
            serde_json::from_str(data).map_err(|e| malformed(format!("invalid JSON: {e}")))?;
        Self::from_input_with_hints(input, hints)
    }
}

impl TryFrom<GameStateInput> for GameState {
    type Error = AdvisorError;

    fn try_from(input: GameStateInput) -> Result<Self> {
        Self::from_input_with_hints(input, &TextHints::default())
    }
}

fn malformed(msg: impl Into<String>) -> AdvisorError {
    let msg = msg.into();
    warn!(reason = %msg, "rejecting game state");
    AdvisorError::MalformedGameState(msg)
}

fn non_negative(field: &str, v: i64) -> Result<u32> {
    if v < 0 {
        return Err(malformed(format!("{field} is negative ({v})")));
    }
    u32::try_from(v).map_err(|_| malformed(format!("{field} is too large ({v})")))
}

fn validate_player(side: &str, p: PlayerStateInput, hints: &TextHints) -> Result<PlayerState> {
    let mana_total = non_negative(&format!("{side}.mana_total"), p.mana_total)?;
    let mut mana_by_rune = BTreeMap::new();
    let mut rune_sum: u64 = 0;
    for (domain, amount) in p.mana_by_rune {
        let amount = non_negative(&format!("{side}.mana_by_rune.{}", domain.as_str()), amount)?;
        rune_sum += u64::from(amount);
        if amount > 0 {
            mana_by_rune.insert(domain, amount);
        }
    }
    if rune_sum > u64::from(mana_total) {
        return Err(malformed(format!(
            "{side}.mana_by_rune sums to {rune_sum}, above mana_total {mana_total}"
        )));
    }
    if p.hand.iter().any(|id| id.trim().is_empty()) {
        return Err(malformed(format!("{side}.hand contains an empty card id")));
    }
    let legend = match p.legend {
        Some(mut legend) => {
            if legend.card_id.trim().is_empty() {
                return Err(malformed(format!("{side}.legend has an empty card_id")));
            }
            legend.complete_tags(hints);
            Some(legend)
        }
        None => None,
    };
    Ok(PlayerState {
        mana_total,
        mana_by_rune,
        hand: p.hand,
        legend,
        health: p.health,
    })
}

fn validate_unit(slot: usize, u: UnitRefInput) -> Result<UnitRef> {
    if u.card_id.trim().is_empty() {
        return Err(malformed(format!("battlefield {slot} unit has an empty card_id")));
    }
    let might = non_negative(&format!("battlefield {slot} unit might"), u.might)?;
    Ok(UnitRef {
        card_id: u.card_id,
        name: u.name,
        might,
    })
}
