//! # memory-match
//!
//! Turn engine for a pair-matching card game.
//!
//! ## Design Principles
//!
//! 1. **Owned engine**: No globals. Each `MatchEngine` owns its board,
//!    round state, clock and timers, and is configured once at construction.
//!
//! 2. **Virtual time**: Delayed work (clock ticks, mismatch flip-back,
//!    power-up reveal) is scheduled on the engine's own timeline and only
//!    fires when the host calls `advance`. Reset and round end cancel it all.
//!
//! 3. **Absorb, don't error**: Flips that make no sense right now (locked
//!    board, matched card, same card twice) are ignored. Only things the
//!    player should be told about are errors.
//!
//! ## Modules
//!
//! - `core`: Card IDs, configuration, events, errors, RNG
//! - `cards`: Tokens, cards and the shuffled board
//! - `timing`: Round clock and task scheduler
//! - `engine`: Turn controller, power-up limiter, `MatchEngine`
//! - `supply`: Token suppliers

pub mod core;
pub mod cards;
pub mod timing;
pub mod engine;
pub mod supply;

// Re-export commonly used types
pub use crate::core::{
    CardId, Difficulty, DifficultyConfig, EngineConfig, EngineError, EngineEvent, GameRng,
    RoundOutcome, SupplyError,
};

pub use crate::cards::{Board, Card, Token};

pub use crate::timing::{RoundClock, Scheduler, Task, Tick, TICK_INTERVAL};

pub use crate::engine::{
    CardView, EventBatch, FlipResult, MatchEngine, PowerUpLimiter, RoundSnapshot, TurnController,
    TurnPhase,
};

pub use crate::supply::{CatalogSupplier, TokenSupplier, DEFAULT_CATALOG};
