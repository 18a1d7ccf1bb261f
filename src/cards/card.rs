//! Card instances - one face-down/face-up slot on the board.
//!
//! Two cards are created per token each round. A card holds a shared
//! reference to its token and the only mutable state in the board model:
//! whether it is face up and whether it has been matched.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::token::Token;
use crate::core::CardId;

/// A card on the board.
///
/// `matched` is terminal: once set it is never cleared for the rest of the
/// round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    token: Arc<Token>,
    face_up: bool,
    matched: bool,
}

impl Card {
    /// Create a face-down, unmatched card.
    #[must_use]
    pub fn new(id: CardId, token: Arc<Token>) -> Self {
        Self {
            id,
            token,
            face_up: false,
            matched: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn token(&self) -> &Token {
        &self.token
    }

    #[must_use]
    pub fn is_face_up(&self) -> bool {
        self.face_up
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.matched
    }

    /// Do both cards show the same token?
    #[must_use]
    pub fn same_token(&self, other: &Card) -> bool {
        Arc::ptr_eq(&self.token, &other.token) || self.token.name() == other.token.name()
    }

    pub(crate) fn set_face_up(&mut self, face_up: bool) {
        self.face_up = face_up;
    }

    pub(crate) fn mark_matched(&mut self) {
        self.matched = true;
        self.face_up = true;
    }
}
