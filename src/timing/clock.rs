//! Round countdown.
//!
//! The clock only counts. Scheduling its ticks is the engine's job, so the
//! countdown itself stays a plain value that tests can drive directly.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Engine time between two clock ticks. Each tick removes one second.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// What a single tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// The clock is stopped; nothing changed.
    Idle,
    /// One second elapsed and time remains.
    Running {
        time_left: u32,
        /// True only on the tick that first reaches the low-time threshold.
        low_time_crossed: bool,
    },
    /// Time ran out. The clock has stopped itself.
    Expired,
}

/// One-second-granularity countdown with a low-time signal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundClock {
    time_left: u32,
    low_time_threshold: u32,
    running: bool,
    low_time_signaled: bool,
}

impl RoundClock {
    /// Create a stopped clock.
    #[must_use]
    pub fn new(low_time_threshold: u32) -> Self {
        Self {
            low_time_threshold,
            ..Self::default()
        }
    }

    /// Begin counting down from `duration_secs`.
    pub fn start(&mut self, duration_secs: u32) {
        self.time_left = duration_secs;
        self.running = duration_secs > 0;
        self.low_time_signaled = false;
    }

    /// Remove one second.
    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::Idle;
        }

        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.running = false;
            return Tick::Expired;
        }

        let low_time_crossed = !self.low_time_signaled && self.is_low_time();
        if low_time_crossed {
            self.low_time_signaled = true;
        }
        Tick::Running {
            time_left: self.time_left,
            low_time_crossed,
        }
    }

    /// Stop counting. Safe to call any number of times.
    pub fn stop(&mut self) {
        self.running = false;
    }

    #[must_use]
    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Is remaining time at or under the threshold?
    #[must_use]
    pub fn is_low_time(&self) -> bool {
        self.time_left <= self.low_time_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_and_expires() {
        let mut clock = RoundClock::new(0);
        clock.start(3);
        assert!(clock.is_running());

        assert!(matches!(clock.tick(), Tick::Running { time_left: 2, .. }));
        assert!(matches!(clock.tick(), Tick::Running { time_left: 1, .. }));
        assert_eq!(clock.tick(), Tick::Expired);
        assert!(!clock.is_running());
        assert_eq!(clock.time_left(), 0);

        // Expired clocks stay put
        assert_eq!(clock.tick(), Tick::Idle);
    }

    #[test]
    fn test_low_time_signals_once() {
        let mut clock = RoundClock::new(10);
        clock.start(12);

        assert_eq!(clock.tick(), Tick::Running { time_left: 11, low_time_crossed: false });
        assert_eq!(clock.tick(), Tick::Running { time_left: 10, low_time_crossed: true });
        assert_eq!(clock.tick(), Tick::Running { time_left: 9, low_time_crossed: false });
        assert!(clock.is_low_time());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut clock = RoundClock::new(10);
        clock.start(30);
        clock.stop();
        clock.stop();
        assert_eq!(clock.tick(), Tick::Idle);
        assert_eq!(clock.time_left(), 30);
    }

    #[test]
    fn test_restart_rearms_low_time() {
        let mut clock = RoundClock::new(1);
        clock.start(2);
        assert_eq!(clock.tick(), Tick::Running { time_left: 1, low_time_crossed: true });

        clock.start(2);
        assert_eq!(clock.tick(), Tick::Running { time_left: 1, low_time_crossed: true });
    }
}
