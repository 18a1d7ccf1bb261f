//! Power-up limiter: a bounded number of peeks per round.

use serde::{Deserialize, Serialize};

use crate::core::{Difficulty, EngineError};

/// Tracks power-up use against the round's quota.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpLimiter {
    difficulty: Difficulty,
    quota: u32,
    used: u32,
}

impl PowerUpLimiter {
    #[must_use]
    pub fn new(difficulty: Difficulty, quota: u32) -> Self {
        Self {
            difficulty,
            quota,
            used: 0,
        }
    }

    #[must_use]
    pub fn quota(&self) -> u32 {
        self.quota
    }

    #[must_use]
    pub fn used(&self) -> u32 {
        self.used
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.quota.saturating_sub(self.used)
    }

    /// Spend one power-up.
    ///
    /// Fails with `QuotaExceeded` once `used == quota`, leaving `used` as is.
    pub fn try_use(&mut self) -> Result<u32, EngineError> {
        if self.used >= self.quota {
            return Err(EngineError::QuotaExceeded {
                quota: self.quota,
                difficulty: self.difficulty,
            });
        }
        self.used += 1;
        Ok(self.used)
    }
}
