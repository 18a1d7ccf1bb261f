//! Engine error taxonomy.
//!
//! Invalid flips are not errors: they are absorbed silently by the turn
//! controller. Everything here is recoverable by retrying (start again, or
//! wait for the next round).

use thiserror::Error;

use super::config::Difficulty;

/// Errors raised by a token supplier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SupplyError {
    /// The supplier could not reach its source.
    #[error("network error: {0}")]
    Network(String),

    /// The supplier had fewer distinct tokens than requested.
    #[error("requested {requested} tokens but only {available} are available")]
    Short { requested: usize, available: usize },
}

/// Errors surfaced by the turn engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Token fetch failed; the round did not start and prior state is intact.
    #[error("cannot start round: {0}")]
    SupplierFailure(#[from] SupplyError),

    /// The power-up has been used as many times as the difficulty allows.
    #[error("You can only use Power-Up {} in {} mode.", times_phrase(.quota), .difficulty.label())]
    QuotaExceeded { quota: u32, difficulty: Difficulty },

    /// An action that needs a round in play was issued outside one.
    #[error("no round in progress")]
    RoundNotActive,

    /// A board needs at least one pair.
    #[error("cannot build a board from zero tokens")]
    EmptyTokens,

    /// Every token must be distinct so that each one backs exactly two cards.
    #[error("token {name:?} supplied more than once")]
    DuplicateToken { name: String },

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A round snapshot could not be encoded or decoded.
    #[error("snapshot encoding failed: {0}")]
    Snapshot(String),
}

impl EngineError {
    /// All engine errors are recoverable except a bad configuration, which
    /// needs a new engine.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, EngineError::InvalidConfig(_))
    }
}

fn times_phrase(quota: &u32) -> String {
    match *quota {
        1 => "once".to_string(),
        2 => "twice".to_string(),
        3 => "three times".to_string(),
        n => format!("{n} times"),
    }
}
