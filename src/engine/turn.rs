//! Turn controller: the "two cards face up, then resolve" protocol.
//!
//! ## States
//!
//! ```text
//! Idle -> AwaitingFirst -> AwaitingSecond -> Resolving -> AwaitingFirst
//!                                                     \-> RoundWon
//!                      (clock expiry from any state)  --> RoundLost
//! ```
//!
//! The controller owns the round counters and the pending slots. It never
//! waits: a mismatch locks the board and reports `FlipResult::Mismatched`,
//! and the caller is responsible for calling `finish_mismatch` once the
//! display delay has passed.

use serde::{Deserialize, Serialize};

use crate::cards::Board;
use crate::core::{CardId, RoundOutcome};

/// Where the round is in the turn protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// No round in play.
    Idle,
    /// Waiting for the first card of a turn.
    AwaitingFirst,
    /// One card is face up, waiting for its partner.
    AwaitingSecond,
    /// A mismatched pair is on display; flips are ignored.
    Resolving,
    RoundWon,
    RoundLost,
}

impl TurnPhase {
    /// Has the round reached an outcome?
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, TurnPhase::RoundWon | TurnPhase::RoundLost)
    }
}

/// What a flip did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipResult {
    /// The flip was absorbed: locked board, ended round, matched card,
    /// unknown card, or the card already pending.
    Ignored,
    /// First card of the turn is now face up.
    Pending(CardId),
    /// The two cards share a token and are now matched.
    Matched {
        first: CardId,
        second: CardId,
        round_won: bool,
    },
    /// The two cards differ; the board is locked.
    Mismatched { first: CardId, second: CardId },
}

/// Round counters, lock and pending slots.
///
/// `pending_second` is only ever set while `pending_first` is set, and
/// only for the duration of a mismatch display.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnController {
    clicks: u32,
    matched_pairs: u32,
    total_pairs: u32,
    locked: bool,
    pending_first: Option<CardId>,
    pending_second: Option<CardId>,
    outcome: Option<RoundOutcome>,
}

impl TurnController {
    /// Fresh controller for a round of `total_pairs` pairs.
    #[must_use]
    pub fn new(total_pairs: u32) -> Self {
        Self {
            total_pairs,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    #[must_use]
    pub fn matched_pairs(&self) -> u32 {
        self.matched_pairs
    }

    #[must_use]
    pub fn total_pairs(&self) -> u32 {
        self.total_pairs
    }

    #[must_use]
    pub fn pairs_left(&self) -> u32 {
        self.total_pairs - self.matched_pairs
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[must_use]
    pub fn pending_first(&self) -> Option<CardId> {
        self.pending_first
    }

    #[must_use]
    pub fn pending_second(&self) -> Option<CardId> {
        self.pending_second
    }

    #[must_use]
    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        match self.outcome {
            Some(RoundOutcome::Won) => TurnPhase::RoundWon,
            Some(RoundOutcome::Lost) => TurnPhase::RoundLost,
            None if self.pending_second.is_some() => TurnPhase::Resolving,
            None if self.pending_first.is_some() => TurnPhase::AwaitingSecond,
            None => TurnPhase::AwaitingFirst,
        }
    }

    /// Would flipping `card` be accepted right now?
    #[must_use]
    pub fn can_flip(&self, board: &Board, card: CardId) -> bool {
        !self.locked
            && self.outcome.is_none()
            && self.pending_first != Some(card)
            && board.get(card).is_some_and(|c| !c.is_matched())
    }

    /// Turn `card` face up and, if it is the second of the turn, resolve it.
    pub fn flip(&mut self, board: &mut Board, card: CardId) -> FlipResult {
        if !self.can_flip(board, card) {
            return FlipResult::Ignored;
        }

        board.set_face_up(card, true);
        self.clicks += 1;

        let Some(first) = self.pending_first else {
            self.pending_first = Some(card);
            return FlipResult::Pending(card);
        };

        self.pending_second = Some(card);
        self.evaluate(board, first, card)
    }

    fn evaluate(&mut self, board: &mut Board, first: CardId, second: CardId) -> FlipResult {
        if board.same_token(first, second) {
            board.mark_matched(first);
            board.mark_matched(second);
            self.matched_pairs += 1;
            self.clear_pending();

            let round_won = self.matched_pairs == self.total_pairs;
            if round_won {
                self.finish(RoundOutcome::Won);
            }
            FlipResult::Matched {
                first,
                second,
                round_won,
            }
        } else {
            self.locked = true;
            FlipResult::Mismatched { first, second }
        }
    }

    /// End the mismatch display: hide the pair, clear the turn, unlock.
    ///
    /// Returns the pair that was hidden, or `None` if no mismatch was pending
    /// (the round ended or was reset in the meantime).
    pub fn finish_mismatch(&mut self, board: &mut Board) -> Option<(CardId, CardId)> {
        if self.outcome.is_some() {
            return None;
        }
        let (Some(first), Some(second)) = (self.pending_first, self.pending_second) else {
            return None;
        };

        board.set_face_up(first, false);
        board.set_face_up(second, false);
        self.clear_pending();
        self.locked = false;
        Some((first, second))
    }

    /// Enter a terminal state. Further flips are ignored.
    pub fn finish(&mut self, outcome: RoundOutcome) {
        if self.outcome.is_none() {
            self.outcome = Some(outcome);
        }
        self.locked = true;
        self.clear_pending();
    }

    fn clear_pending(&mut self) {
        self.pending_first = None;
        self.pending_second = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Token;
    use crate::core::GameRng;

    /// Board with the given names, and a lookup for "the two cards of `name`".
    fn board(names: &[&str]) -> Board {
        let tokens = names.iter().map(|n| Token::with_artwork(*n)).collect();
        Board::build(tokens, &mut GameRng::new(42)).unwrap()
    }

    fn pair(board: &Board, name: &str) -> (CardId, CardId) {
        let ids: Vec<_> = board
            .iter()
            .filter(|c| c.token().name() == name)
            .map(|c| c.id())
            .collect();
        (ids[0], ids[1])
    }

    #[test]
    fn test_initial_phase() {
        let controller = TurnController::new(2);
        assert_eq!(controller.phase(), TurnPhase::AwaitingFirst);
        assert_eq!(controller.pairs_left(), 2);
        assert!(!controller.is_locked());
    }

    #[test]
    fn test_match_clears_pending_immediately() {
        let mut b = board(&["pikachu", "bulbasaur"]);
        let mut t = TurnController::new(2);
        let (a, a2) = pair(&b, "pikachu");

        assert_eq!(t.flip(&mut b, a), FlipResult::Pending(a));
        assert_eq!(t.phase(), TurnPhase::AwaitingSecond);

        let result = t.flip(&mut b, a2);
        assert_eq!(result, FlipResult::Matched { first: a, second: a2, round_won: false });
        assert!(b.is_matched(a) && b.is_matched(a2));
        assert_eq!(t.matched_pairs(), 1);
        assert_eq!(t.pending_first(), None);
        assert_eq!(t.pending_second(), None);
        assert!(!t.is_locked());
        assert_eq!(t.clicks(), 2);
        assert_eq!(t.phase(), TurnPhase::AwaitingFirst);
    }

    #[test]
    fn test_mismatch_locks_until_finished() {
        let mut b = board(&["pikachu", "bulbasaur"]);
        let mut t = TurnController::new(2);
        let (a, _) = pair(&b, "pikachu");
        let (c, _) = pair(&b, "bulbasaur");

        t.flip(&mut b, a);
        assert_eq!(t.flip(&mut b, c), FlipResult::Mismatched { first: a, second: c });
        assert!(t.is_locked());
        assert_eq!(t.phase(), TurnPhase::Resolving);
        assert!(b.is_face_up(a) && b.is_face_up(c));

        assert_eq!(t.finish_mismatch(&mut b), Some((a, c)));
        assert!(!b.is_face_up(a) && !b.is_face_up(c));
        assert!(!t.is_locked());
        assert_eq!(t.pending_first(), None);
        assert_eq!(t.matched_pairs(), 0);

        // Nothing left to finish
        assert_eq!(t.finish_mismatch(&mut b), None);
    }

    #[test]
    fn test_flips_ignored_while_locked() {
        let mut b = board(&["pikachu", "bulbasaur", "eevee"]);
        let mut t = TurnController::new(3);
        let (a, _) = pair(&b, "pikachu");
        let (c, _) = pair(&b, "bulbasaur");
        let (e, _) = pair(&b, "eevee");

        t.flip(&mut b, a);
        t.flip(&mut b, c);
        assert_eq!(t.flip(&mut b, e), FlipResult::Ignored);
        assert!(!b.is_face_up(e));
        assert_eq!(t.clicks(), 2);
    }

    #[test]
    fn test_reflip_pending_first_ignored() {
        let mut b = board(&["pikachu", "bulbasaur"]);
        let mut t = TurnController::new(2);
        let (a, _) = pair(&b, "pikachu");

        t.flip(&mut b, a);
        assert_eq!(t.flip(&mut b, a), FlipResult::Ignored);
        assert_eq!(t.clicks(), 1);
        assert_eq!(t.pending_first(), Some(a));
    }

    #[test]
    fn test_matched_card_ignored() {
        let mut b = board(&["pikachu", "bulbasaur"]);
        let mut t = TurnController::new(2);
        let (a, a2) = pair(&b, "pikachu");

        t.flip(&mut b, a);
        t.flip(&mut b, a2);
        let before = t.clone();
        assert_eq!(t.flip(&mut b, a), FlipResult::Ignored);
        assert_eq!(t, before);
    }

    #[test]
    fn test_unknown_card_ignored() {
        let mut b = board(&["pikachu"]);
        let mut t = TurnController::new(1);
        assert_eq!(t.flip(&mut b, CardId::new(50)), FlipResult::Ignored);
        assert_eq!(t.clicks(), 0);
    }

    #[test]
    fn test_last_pair_wins() {
        let mut b = board(&["pikachu"]);
        let mut t = TurnController::new(1);
        let (a, a2) = pair(&b, "pikachu");

        t.flip(&mut b, a);
        assert_eq!(t.flip(&mut b, a2), FlipResult::Matched { first: a, second: a2, round_won: true });
        assert_eq!(t.outcome(), Some(RoundOutcome::Won));
        assert_eq!(t.phase(), TurnPhase::RoundWon);
        assert!(t.is_locked());
        assert!(t.phase().is_terminal());
    }

    #[test]
    fn test_finish_blocks_further_flips() {
        let mut b = board(&["pikachu", "bulbasaur"]);
        let mut t = TurnController::new(2);
        let (a, _) = pair(&b, "pikachu");
        let (c, _) = pair(&b, "bulbasaur");

        t.flip(&mut b, a);
        t.flip(&mut b, c);
        t.finish(RoundOutcome::Lost);

        assert_eq!(t.phase(), TurnPhase::RoundLost);
        assert_eq!(t.finish_mismatch(&mut b), None);
        // The pair stays as it was when time ran out
        assert!(b.is_face_up(a) && b.is_face_up(c));
        assert_eq!(t.flip(&mut b, a), FlipResult::Ignored);

        // A later outcome does not overwrite the first
        t.finish(RoundOutcome::Won);
        assert_eq!(t.outcome(), Some(RoundOutcome::Lost));
    }
}
