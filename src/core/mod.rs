//! Core engine types: card IDs, configuration, events, errors, RNG.
//!
//! These are the building blocks shared by the board, the timers and the
//! turn engine.

pub mod entity;
pub mod rng;
pub mod config;
pub mod error;
pub mod event;

pub use entity::CardId;
pub use rng::GameRng;
pub use config::{Difficulty, DifficultyConfig, EngineConfig};
pub use error::{EngineError, SupplyError};
pub use event::{EngineEvent, RoundOutcome};
