//! Engine configuration types.
//!
//! The engine is configured once at construction by providing:
//! - `DifficultyConfig`: pairs, time limit and power-up quota per difficulty
//! - `EngineConfig`: the difficulty table plus the engine's display delays
//!
//! The round clock always ticks once per second of engine time; that is not
//! configurable.
//!
//! Configuration is read-only for the lifetime of an engine. A difficulty is
//! picked per round, but its settings never change mid-round.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::EngineError;

/// Round difficulty, selected before `start`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All difficulties, easiest first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Capitalized display name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(EngineError::InvalidConfig(format!("unknown difficulty {other:?}"))),
        }
    }
}

/// Settings for one difficulty level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Number of token pairs on the board.
    pub pair_count: u32,

    /// Round length in whole seconds.
    pub time_limit_secs: u32,

    /// How many power-ups a round allows.
    pub power_up_quota: u32,
}

impl DifficultyConfig {
    /// Create a difficulty configuration.
    #[must_use]
    pub const fn new(pair_count: u32, time_limit_secs: u32, power_up_quota: u32) -> Self {
        Self {
            pair_count,
            time_limit_secs,
            power_up_quota,
        }
    }

    /// Built-in settings for a difficulty.
    #[must_use]
    pub const fn preset(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self::new(6, 90, 1),
            Difficulty::Medium => Self::new(10, 60, 2),
            Difficulty::Hard => Self::new(15, 45, 3),
        }
    }
}

/// Complete engine configuration.
///
/// ## Example
///
/// ```
/// use std::time::Duration;
/// use memory_match::core::{Difficulty, DifficultyConfig, EngineConfig};
///
/// let config = EngineConfig::default()
///     .with_difficulty(Difficulty::Easy, DifficultyConfig::new(2, 30, 1))
///     .with_mismatch_delay(Duration::from_millis(500));
///
/// assert_eq!(config.difficulty(Difficulty::Easy).pair_count, 2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub easy: DifficultyConfig,
    pub medium: DifficultyConfig,
    pub hard: DifficultyConfig,

    /// How long a mismatched pair stays face up before flipping back.
    #[serde(with = "millis")]
    pub mismatch_delay: Duration,

    /// How long a power-up keeps every unmatched card face up.
    #[serde(with = "millis")]
    pub reveal_duration: Duration,

    /// Remaining seconds at or below which the clock reports low time.
    pub low_time_threshold: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            easy: DifficultyConfig::preset(Difficulty::Easy),
            medium: DifficultyConfig::preset(Difficulty::Medium),
            hard: DifficultyConfig::preset(Difficulty::Hard),
            mismatch_delay: Duration::from_millis(1000),
            reveal_duration: Duration::from_millis(1500),
            low_time_threshold: 10,
        }
    }
}

impl EngineConfig {
    /// Settings for a difficulty.
    #[must_use]
    pub fn difficulty(&self, difficulty: Difficulty) -> DifficultyConfig {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    /// Replace the settings for one difficulty.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty, settings: DifficultyConfig) -> Self {
        match difficulty {
            Difficulty::Easy => self.easy = settings,
            Difficulty::Medium => self.medium = settings,
            Difficulty::Hard => self.hard = settings,
        }
        self
    }

    /// Set the mismatch display delay.
    #[must_use]
    pub fn with_mismatch_delay(mut self, delay: Duration) -> Self {
        self.mismatch_delay = delay;
        self
    }

    /// Set the power-up reveal duration.
    #[must_use]
    pub fn with_reveal_duration(mut self, duration: Duration) -> Self {
        self.reveal_duration = duration;
        self
    }

    /// Set the low-time threshold in seconds.
    #[must_use]
    pub fn with_low_time_threshold(mut self, seconds: u32) -> Self {
        self.low_time_threshold = seconds;
        self
    }

    /// One-line summary shown next to the difficulty selector.
    ///
    /// ```
    /// use memory_match::core::{Difficulty, EngineConfig};
    ///
    /// let config = EngineConfig::default();
    /// assert_eq!(
    ///     config.describe(Difficulty::Easy),
    ///     "Easy Mode: Match 6 pairs within 90 seconds."
    /// );
    /// ```
    #[must_use]
    pub fn describe(&self, difficulty: Difficulty) -> String {
        let settings = self.difficulty(difficulty);
        format!(
            "{} Mode: Match {} pairs within {} seconds.",
            difficulty.label(),
            settings.pair_count,
            settings.time_limit_secs
        )
    }

    /// Check that every difficulty can produce a playable round.
    pub fn validate(&self) -> Result<(), EngineError> {
        for difficulty in Difficulty::ALL {
            let settings = self.difficulty(difficulty);
            if settings.pair_count == 0 {
                return Err(EngineError::InvalidConfig(format!("{difficulty}: pair_count must be > 0")));
            }
            if settings.time_limit_secs == 0 {
                return Err(EngineError::InvalidConfig(format!(
                    "{difficulty}: time_limit_secs must be > 0"
                )));
            }
        }
        Ok(())
    }
}

/// Serialize `Duration` as whole milliseconds.
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
