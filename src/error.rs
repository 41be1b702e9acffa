use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdvisorError {
    /// Catalog lookup miss. Advisors recover from this per card.
    #[error("card '{card_id}' not found in catalog")]
    UnresolvedCardReference { card_id: String },
    #[error("malformed game state: {0}")]
    MalformedGameState(String),
    #[error("invalid advisor policy: {0}")]
    InvalidPolicy(String),
    #[error("catalog error: {0}")]
    Catalog(String),
    #[error("observer error: {0}")]
    Observer(String),
}

pub type Result<T, E = AdvisorError> = std::result::Result<T, E>;
