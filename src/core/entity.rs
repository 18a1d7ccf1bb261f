//! Card identification.
//!
//! A `CardId` is an opaque handle the presentation layer binds its input
//! listeners to. Ids are allocated per round as board positions
//! `0..card_count`, so they are only meaningful for the round that issued
//! them.
//!
//! ```
//! use memory_match::core::CardId;
//!
//! let card = CardId::new(3);
//! assert_eq!(card.index(), 3);
//! assert_eq!(card.to_string(), "Card(3)");
//! ```

use serde::{Deserialize, Serialize};

/// Opaque identifier for one card slot on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Board position this ID addresses.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for CardId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index() {
        let id = CardId::new(11);
        assert_eq!(id.index(), 11);
        assert_eq!(CardId::from(11), id);
    }

    #[test]
    fn test_ordering() {
        assert!(CardId::new(1) < CardId::new(2));
    }

    #[test]
    fn test_serialization() {
        let id = CardId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: CardId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
