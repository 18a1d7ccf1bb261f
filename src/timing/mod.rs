//! Time: the round countdown and the engine's timer queue.
//!
//! - `RoundClock`: counts remaining seconds, reports low time and expiry
//! - `Scheduler`: virtual-time queue of delayed `Task`s, cancellable as a unit

pub mod clock;
pub mod scheduler;

pub use clock::{RoundClock, Tick, TICK_INTERVAL};
pub(crate) use scheduler::saturating_millis;
pub use scheduler::{Scheduler, Task};
