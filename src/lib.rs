#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // may be revisited
#![allow(clippy::must_use_candidate)]

pub mod types;
pub mod error;
pub mod text_hints;
pub mod cards;
pub mod legend;
pub mod board;
pub mod state;
pub mod policy;
pub mod recommendation;

pub mod engine {
    pub mod trade;
    pub mod mana;
    pub mod legend;
    pub mod keywords;
}

pub mod advisor;
pub mod observer;

// Re-exports: stable minimal API surface for external callers
pub use crate::advisor::Advisor;
pub use crate::board::{BattlefieldSlot, Board, Occupancy, UnitRef, MAX_BATTLEFIELDS};
pub use crate::cards::{
    load_cards_from_json, load_cards_from_json_with_hints, parse_cards_json, Card, CardCatalog, CardsDb,
    CostTag,
};
pub use crate::engine::trade::{evaluate_trade, TradeAssessment, TradeVerdict};
pub use crate::error::AdvisorError;
pub use crate::legend::{AbilityCost, AbilityDescriptor, AbilityTiming, EffectTag, Legend};
pub use crate::observer::{CollectingObserver, EvaluationObserver, EvaluationRecord, JsonlObserver};
pub use crate::policy::{load_policy_from_json, AdvisorPolicy, MulliganPolicy, VerdictWeights};
pub use crate::recommendation::{Evaluation, Recommendation, RecommendationKind, SkippedEntry};
pub use crate::state::{
    BattlefieldSlotInput, GameState, GameStateInput, PlayerState, PlayerStateInput, UnitRefInput,
};
pub use crate::text_hints::TextHints;
pub use crate::types::{CardType, Domain, Phase, Side};
