//! Turn engine: turn controller, power-up limiter and the `MatchEngine`
//! that drives them on the engine's own timeline.
//!
//! ## Key Types
//!
//! - `MatchEngine`: Owned engine instance; `start`, `flip`, `use_power_up`,
//!   `advance`, `reset` plus read-only observers
//! - `TurnController`: Pending slots, lock, counters, match evaluation
//! - `PowerUpLimiter`: Per-round quota of peeks
//! - `RoundSnapshot`: Serializable copy of all observable state

pub mod turn;
pub mod power_up;
pub mod snapshot;
pub mod match_engine;

pub use turn::{FlipResult, TurnController, TurnPhase};
pub use power_up::PowerUpLimiter;
pub use snapshot::{CardView, RoundSnapshot};
pub use match_engine::{EventBatch, MatchEngine};
