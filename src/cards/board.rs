//! The board - every card dealt for a round, in display order.
//!
//! ## Invariants
//!
//! - `len() == 2 * pair_count()`
//! - every token is referenced by exactly two cards
//! - a card's `CardId` is its position on the board
//! - cards are never removed; `matched` is never unset
//!
//! Boards are shuffled exactly once, when built.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::card::Card;
use super::token::Token;
use crate::core::{CardId, EngineError, GameRng};

/// Ordered sequence of paired cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    /// Deal two cards per token and shuffle them.
    ///
    /// Fails if `tokens` is empty or names the same token twice.
    ///
    /// ```
    /// use memory_match::cards::{Board, Token};
    /// use memory_match::core::GameRng;
    ///
    /// let tokens = vec![Token::with_artwork("pikachu"), Token::with_artwork("eevee")];
    /// let board = Board::build(tokens, &mut GameRng::new(1)).unwrap();
    /// assert_eq!(board.len(), 4);
    /// assert_eq!(board.pair_count(), 2);
    /// ```
    pub fn build(tokens: Vec<Token>, rng: &mut GameRng) -> Result<Self, EngineError> {
        if tokens.is_empty() {
            return Err(EngineError::EmptyTokens);
        }

        let mut seen = FxHashSet::default();
        let mut deck = Vec::with_capacity(tokens.len() * 2);
        for token in tokens {
            if !seen.insert(token.name().to_owned()) {
                return Err(EngineError::DuplicateToken {
                    name: token.name().to_owned(),
                });
            }
            let token = Arc::new(token);
            deck.push(Arc::clone(&token));
            deck.push(token);
        }

        rng.shuffle(&mut deck);

        let cards = deck
            .into_iter()
            .enumerate()
            .map(|(position, token)| Card::new(CardId::new(position as u32), token))
            .collect();

        Ok(Self { cards })
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Boards are never empty once built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of token pairs.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.index())
    }

    /// Cards in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Has this card been matched? Unknown ids are never matched.
    #[must_use]
    pub fn is_matched(&self, id: CardId) -> bool {
        self.get(id).is_some_and(Card::is_matched)
    }

    /// Is this card face up? Unknown ids are never face up.
    #[must_use]
    pub fn is_face_up(&self, id: CardId) -> bool {
        self.get(id).is_some_and(Card::is_face_up)
    }

    /// Do the two cards share a token?
    #[must_use]
    pub fn same_token(&self, a: CardId, b: CardId) -> bool {
        match (self.get(a), self.get(b)) {
            (Some(a), Some(b)) => a.same_token(b),
            _ => false,
        }
    }

    /// Cards currently face up that are not yet matched.
    pub fn face_up_unmatched(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards
            .iter()
            .filter(|c| c.is_face_up() && !c.is_matched())
            .map(Card::id)
    }

    /// Number of pairs matched so far.
    #[must_use]
    pub fn matched_pairs(&self) -> usize {
        self.cards.iter().filter(|c| c.is_matched()).count() / 2
    }

    pub(crate) fn set_face_up(&mut self, id: CardId, face_up: bool) {
        if let Some(card) = self.cards.get_mut(id.index()) {
            card.set_face_up(face_up);
        }
    }

    pub(crate) fn mark_matched(&mut self, id: CardId) {
        if let Some(card) = self.cards.get_mut(id.index()) {
            card.mark_matched();
        }
    }

    /// Turn every unmatched card face up or down.
    pub(crate) fn set_unmatched_face_up(&mut self, face_up: bool) {
        for card in self.cards.iter_mut().filter(|c| !c.is_matched()) {
            card.set_face_up(face_up);
        }
    }
}
