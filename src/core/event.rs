//! Engine events.
//!
//! Every observable state change is reported as an `EngineEvent`. The
//! presentation layer drains them from the engine after each call and
//! re-renders whatever they name; it never reaches into engine internals.

use serde::{Deserialize, Serialize};

use super::config::Difficulty;
use super::entity::CardId;

/// How a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// Every pair was matched before the clock ran out.
    Won,
    /// The clock reached zero first.
    Lost,
}

impl std::fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundOutcome::Won => f.write_str("You Win!"),
            RoundOutcome::Lost => f.write_str("Game Over"),
        }
    }
}

/// Something that happened inside the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A new board was dealt.
    RoundStarted {
        difficulty: Difficulty,
        total_pairs: u32,
        time_left: u32,
    },
    /// The round was torn down without an outcome.
    RoundReset,
    /// A card was turned face up by the player.
    CardFlipped { card: CardId, clicks: u32 },
    /// Two face-up cards share a token.
    PairMatched {
        first: CardId,
        second: CardId,
        matched_pairs: u32,
    },
    /// Two face-up cards differ; the board is locked until they flip back.
    PairMismatched { first: CardId, second: CardId },
    /// A mismatched pair flipped back and the board unlocked.
    PairHidden { first: CardId, second: CardId },
    /// The round clock moved.
    ClockTicked { time_left: u32 },
    /// Remaining time crossed the low-time threshold.
    LowTime { time_left: u32 },
    /// A power-up turned every unmatched card face up.
    RevealStarted { used: u32, quota: u32 },
    /// The reveal window closed and unmatched cards flipped back.
    RevealEnded,
    /// The round reached a terminal state.
    RoundEnded { outcome: RoundOutcome },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_display() {
        assert_eq!(RoundOutcome::Won.to_string(), "You Win!");
        assert_eq!(RoundOutcome::Lost.to_string(), "Game Over");
    }

    #[test]
    fn test_event_serialization() {
        let event = EngineEvent::PairMatched {
            first: CardId::new(2),
            second: CardId::new(7),
            matched_pairs: 1,
        };
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: EngineEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }
}
