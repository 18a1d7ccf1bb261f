//! Read-only round snapshots for presentation layers.
//!
//! A snapshot is a plain serde value, so hosts can ship it across a
//! process boundary. `to_bytes`/`from_bytes` use bincode.

use serde::{Deserialize, Serialize};

use super::turn::TurnPhase;
use crate::cards::Card;
use crate::core::{CardId, Difficulty, EngineError, RoundOutcome};

/// What the presentation layer needs to draw one card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub id: CardId,
    pub name: String,
    pub image: String,
    pub face_up: bool,
    pub matched: bool,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id(),
            name: card.token().name().to_owned(),
            image: card.token().image().to_owned(),
            face_up: card.is_face_up(),
            matched: card.is_matched(),
        }
    }
}

/// Every observable round field at one instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub difficulty: Option<Difficulty>,
    pub phase: TurnPhase,
    pub clicks: u32,
    pub matched_pairs: u32,
    pub total_pairs: u32,
    pub time_left: u32,
    pub low_time: bool,
    pub locked: bool,
    pub revealing: bool,
    pub pending_first: Option<CardId>,
    pub pending_second: Option<CardId>,
    pub outcome: Option<RoundOutcome>,
    pub power_ups_used: u32,
    pub power_up_quota: u32,
    pub cards: Vec<CardView>,
}

impl RoundSnapshot {
    /// Pairs still to find.
    ///
    /// Zero for inconsistent decoded snapshots that claim more matches than pairs.
    #[must_use]
    pub fn pairs_left(&self) -> u32 {
        self.total_pairs.saturating_sub(self.matched_pairs)
    }

    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EngineError> {
        bincode::serialize(self).map_err(|e| EngineError::Snapshot(e.to_string()))
    }

    /// Decode bytes produced by `to_bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EngineError> {
        bincode::deserialize(bytes).map_err(|e| EngineError::Snapshot(e.to_string()))
    }
}
