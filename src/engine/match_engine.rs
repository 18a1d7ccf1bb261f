//! The turn engine: one owned instance per game table.
//!
//! `MatchEngine` ties the board, turn controller, round clock and power-up
//! limiter together and owns every delayed task through its `Scheduler`.
//! It is single-threaded: all mutation goes through `&mut self`, and time
//! only moves when the host calls `advance`.
//!
//! ## Usage
//!
//! ```
//! use std::time::Duration;
//! use memory_match::core::{Difficulty, EngineConfig};
//! use memory_match::engine::{MatchEngine, TurnPhase};
//! use memory_match::supply::CatalogSupplier;
//! use memory_match::core::GameRng;
//!
//! let mut engine = MatchEngine::with_seed(EngineConfig::default(), 7).unwrap();
//! let mut supplier = CatalogSupplier::with_default_catalog(GameRng::new(7));
//!
//! engine.start(Difficulty::Easy, &mut supplier).unwrap();
//! assert_eq!(engine.phase(), TurnPhase::AwaitingFirst);
//! assert_eq!(engine.time_left(), 90);
//!
//! engine.advance(Duration::from_secs(5));
//! assert_eq!(engine.time_left(), 85);
//! ```

use std::time::Duration;

use im::Vector;
use smallvec::SmallVec;
use tracing::{debug, info, trace, warn};

use super::power_up::PowerUpLimiter;
use super::snapshot::{CardView, RoundSnapshot};
use super::turn::{FlipResult, TurnController, TurnPhase};
use crate::cards::{Board, Token};
use crate::core::{
    CardId, Difficulty, EngineConfig, EngineError, EngineEvent, GameRng, RoundOutcome, SupplyError,
};
use crate::supply::TokenSupplier;
use crate::timing::{saturating_millis, RoundClock, Scheduler, Task, Tick, TICK_INTERVAL};

/// Events produced by a single engine call.
pub type EventBatch = SmallVec<[EngineEvent; 4]>;

/// Everything that exists only while a round is on the table.
#[derive(Clone, Debug)]
struct Round {
    difficulty: Difficulty,
    board: Board,
    turn: TurnController,
    clock: RoundClock,
    power_up: PowerUpLimiter,
    revealing: bool,
}

/// Pair-matching turn engine.
#[derive(Clone, Debug)]
pub struct MatchEngine {
    config: EngineConfig,
    rng: GameRng,
    round: Option<Round>,
    scheduler: Scheduler,
    events: Vector<EngineEvent>,
}

impl MatchEngine {
    /// Create an engine seeded from entropy.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_rng(config, GameRng::from_entropy())
    }

    /// Create an engine whose shuffles are reproducible from `seed`.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Result<Self, EngineError> {
        Self::with_rng(config, GameRng::new(seed))
    }

    fn with_rng(config: EngineConfig, rng: GameRng) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            round: None,
            scheduler: Scheduler::new(),
            events: Vector::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // === Round lifecycle ===

    /// Fetch tokens and deal a new round.
    ///
    /// On supplier failure nothing changes: a round already in play keeps
    /// going exactly as before.
    pub fn start<S>(&mut self, difficulty: Difficulty, supplier: &mut S) -> Result<(), EngineError>
    where
        S: TokenSupplier + ?Sized,
    {
        let pair_count = self.config.difficulty(difficulty).pair_count as usize;
        let tokens = supplier.fetch_tokens(pair_count).map_err(|err| {
            warn!(%difficulty, error = %err, "token supplier failed, round not started");
            EngineError::from(err)
        })?;
        self.start_with_tokens(difficulty, tokens)
    }

    /// Deal a new round from tokens fetched elsewhere.
    ///
    /// The first `pair_count` tokens are used. Fewer than that is a
    /// `SupplierFailure`; as with `start`, a failure changes nothing.
    pub fn start_with_tokens(
        &mut self,
        difficulty: Difficulty,
        mut tokens: Vec<Token>,
    ) -> Result<(), EngineError> {
        let settings = self.config.difficulty(difficulty);
        let pair_count = settings.pair_count as usize;
        if tokens.len() < pair_count {
            return Err(SupplyError::Short {
                requested: pair_count,
                available: tokens.len(),
            }
            .into());
        }
        tokens.truncate(pair_count);

        let board = Board::build(tokens, &mut self.rng)?;

        self.scheduler.clear();
        // The log covers the current round only.
        self.events.clear();
        let mut clock = RoundClock::new(self.config.low_time_threshold);
        clock.start(settings.time_limit_secs);
        self.round = Some(Round {
            difficulty,
            board,
            turn: TurnController::new(settings.pair_count),
            clock,
            power_up: PowerUpLimiter::new(difficulty, settings.power_up_quota),
            revealing: false,
        });
        self.scheduler.schedule(TICK_INTERVAL, Task::ClockTick);

        info!(
            %difficulty,
            pairs = settings.pair_count,
            time_limit = settings.time_limit_secs,
            seed = self.rng.seed(),
            "round started"
        );
        self.emit(EngineEvent::RoundStarted {
            difficulty,
            total_pairs: settings.pair_count,
            time_left: settings.time_limit_secs,
        });
        Ok(())
    }

    /// Tear down the current round and cancel every pending task.
    ///
    /// Safe to call with no round in play.
    pub fn reset(&mut self) {
        self.scheduler.clear();
        if self.round.take().is_some() {
            debug!("round reset");
            self.emit(EngineEvent::RoundReset);
        }
    }

    // === Player actions ===

    /// Flip a card. Invalid flips are absorbed and return `FlipResult::Ignored`.
    pub fn flip(&mut self, card: CardId) -> FlipResult {
        let Some(round) = self.round.as_mut() else {
            return FlipResult::Ignored;
        };
        if round.revealing {
            return FlipResult::Ignored;
        }

        let result = round.turn.flip(&mut round.board, card);
        let clicks = round.turn.clicks();
        let matched_pairs = round.turn.matched_pairs();

        match result {
            FlipResult::Ignored => {
                trace!(%card, "flip ignored");
            }
            FlipResult::Pending(card) => {
                self.emit(EngineEvent::CardFlipped { card, clicks });
            }
            FlipResult::Matched {
                first,
                second,
                round_won,
            } => {
                debug!(%first, %second, matched_pairs, "pair matched");
                self.emit(EngineEvent::CardFlipped { card: second, clicks });
                self.emit(EngineEvent::PairMatched {
                    first,
                    second,
                    matched_pairs,
                });
                if round_won {
                    self.end_round(RoundOutcome::Won);
                }
            }
            FlipResult::Mismatched { first, second } => {
                debug!(%first, %second, "pair mismatched, board locked");
                self.emit(EngineEvent::CardFlipped { card: second, clicks });
                self.emit(EngineEvent::PairMismatched { first, second });
                self.scheduler
                    .schedule(self.config.mismatch_delay, Task::FlipBack { first, second });
            }
        }
        result
    }

    /// Spend a power-up: every unmatched card shows its face for the reveal
    /// duration. Does not count as a flip and leaves the turn untouched.
    pub fn use_power_up(&mut self) -> Result<(), EngineError> {
        let round = match self.round.as_mut() {
            Some(round) if round.turn.outcome().is_none() => round,
            _ => return Err(EngineError::RoundNotActive),
        };

        let used = round.power_up.try_use().map_err(|err| {
            debug!(error = %err, "power-up refused");
            err
        })?;
        let quota = round.power_up.quota();
        round.board.set_unmatched_face_up(true);
        round.revealing = true;

        // A second peek during a reveal restarts the window.
        self.scheduler.cancel(|t| *t == Task::EndReveal);
        self.scheduler.schedule(self.config.reveal_duration, Task::EndReveal);

        info!(used, quota, "power-up used");
        self.emit(EngineEvent::RevealStarted { used, quota });
        Ok(())
    }

    // === Time ===

    /// Move time forward, firing every task that falls due, in order.
    ///
    /// Returns the events those tasks produced.
    pub fn advance(&mut self, elapsed: Duration) -> EventBatch {
        let until = self
            .scheduler
            .now_ms()
            .saturating_add(saturating_millis(elapsed));
        let first_new = self.events.len();

        while let Some(task) = self.scheduler.pop_due(until) {
            self.run(task);
        }
        self.scheduler.settle(until);

        self.events.skip(first_new).into_iter().collect()
    }

    fn run(&mut self, task: Task) {
        let Some(round) = self.round.as_mut() else {
            return;
        };

        match task {
            Task::ClockTick => match round.clock.tick() {
                Tick::Idle => {}
                Tick::Running {
                    time_left,
                    low_time_crossed,
                } => {
                    self.scheduler.schedule(TICK_INTERVAL, Task::ClockTick);
                    self.emit(EngineEvent::ClockTicked { time_left });
                    if low_time_crossed {
                        debug!(time_left, "low time");
                        self.emit(EngineEvent::LowTime { time_left });
                    }
                }
                Tick::Expired => {
                    self.emit(EngineEvent::ClockTicked { time_left: 0 });
                    self.end_round(RoundOutcome::Lost);
                }
            },
            Task::FlipBack { .. } => {
                if let Some((first, second)) = round.turn.finish_mismatch(&mut round.board) {
                    trace!(%first, %second, "mismatch hidden, board unlocked");
                    self.emit(EngineEvent::PairHidden { first, second });
                }
            }
            Task::EndReveal => {
                round.revealing = false;
                round.board.set_unmatched_face_up(false);
                trace!("reveal ended");
                self.emit(EngineEvent::RevealEnded);
            }
        }
    }

    fn end_round(&mut self, outcome: RoundOutcome) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        round.clock.stop();
        round.turn.finish(outcome);
        self.scheduler.clear();

        // An open reveal closes with the round; its EndReveal was just cancelled.
        let reveal_closed = std::mem::take(&mut round.revealing);
        if reveal_closed {
            round.board.set_unmatched_face_up(false);
        }

        info!(
            %outcome,
            clicks = round.turn.clicks(),
            matched_pairs = round.turn.matched_pairs(),
            time_left = round.clock.time_left(),
            "round ended"
        );
        if reveal_closed {
            self.emit(EngineEvent::RevealEnded);
        }
        self.emit(EngineEvent::RoundEnded { outcome });
    }

    fn emit(&mut self, event: EngineEvent) {
        self.events.push_back(event);
    }

    // === Events ===

    /// Take every event emitted since the last drain.
    ///
    /// Starting a round discards whatever an earlier round left undrained,
    /// so hosts that only read the batches `advance` returns never need to
    /// call this.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events).into_iter().collect()
    }

    /// Events emitted since the last drain or round start, oldest first.
    #[must_use]
    pub fn pending_events(&self) -> &Vector<EngineEvent> {
        &self.events
    }

    // === Observers ===

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.round.as_ref().map_or(TurnPhase::Idle, |r| r.turn.phase())
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.round.as_ref().is_some_and(|r| !r.turn.phase().is_terminal())
    }

    #[must_use]
    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.round.as_ref().and_then(|r| r.turn.outcome())
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.round.as_ref().map(|r| r.difficulty)
    }

    #[must_use]
    pub fn board(&self) -> Option<&Board> {
        self.round.as_ref().map(|r| &r.board)
    }

    #[must_use]
    pub fn clicks(&self) -> u32 {
        self.round.as_ref().map_or(0, |r| r.turn.clicks())
    }

    #[must_use]
    pub fn matched_pairs(&self) -> u32 {
        self.round.as_ref().map_or(0, |r| r.turn.matched_pairs())
    }

    #[must_use]
    pub fn total_pairs(&self) -> u32 {
        self.round.as_ref().map_or(0, |r| r.turn.total_pairs())
    }

    #[must_use]
    pub fn pairs_left(&self) -> u32 {
        self.round.as_ref().map_or(0, |r| r.turn.pairs_left())
    }

    #[must_use]
    pub fn time_left(&self) -> u32 {
        self.round.as_ref().map_or(0, |r| r.clock.time_left())
    }

    #[must_use]
    pub fn is_low_time(&self) -> bool {
        self.round.as_ref().is_some_and(|r| r.clock.is_low_time())
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.round.as_ref().is_some_and(|r| r.turn.is_locked())
    }

    #[must_use]
    pub fn is_revealing(&self) -> bool {
        self.round.as_ref().is_some_and(|r| r.revealing)
    }

    #[must_use]
    pub fn pending_first(&self) -> Option<CardId> {
        self.round.as_ref().and_then(|r| r.turn.pending_first())
    }

    #[must_use]
    pub fn pending_second(&self) -> Option<CardId> {
        self.round.as_ref().and_then(|r| r.turn.pending_second())
    }

    #[must_use]
    pub fn power_ups_used(&self) -> u32 {
        self.round.as_ref().map_or(0, |r| r.power_up.used())
    }

    #[must_use]
    pub fn power_up_quota(&self) -> u32 {
        self.round.as_ref().map_or(0, |r| r.power_up.quota())
    }

    /// Cards a flip would currently be accepted for.
    #[must_use]
    pub fn flippable_cards(&self) -> Vec<CardId> {
        let Some(round) = self.round.as_ref().filter(|r| !r.revealing) else {
            return Vec::new();
        };
        round
            .board
            .iter()
            .map(|c| c.id())
            .filter(|&id| round.turn.can_flip(&round.board, id))
            .collect()
    }

    /// Time until the next scheduled task fires, if any is queued.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_due_in()
    }

    /// Point-in-time copy of every observable field.
    #[must_use]
    pub fn snapshot(&self) -> RoundSnapshot {
        let cards = self
            .board()
            .map(|b| b.iter().map(CardView::from).collect())
            .unwrap_or_default();

        RoundSnapshot {
            difficulty: self.difficulty(),
            phase: self.phase(),
            clicks: self.clicks(),
            matched_pairs: self.matched_pairs(),
            total_pairs: self.total_pairs(),
            time_left: self.time_left(),
            low_time: self.is_low_time(),
            locked: self.is_locked(),
            revealing: self.is_revealing(),
            pending_first: self.pending_first(),
            pending_second: self.pending_second(),
            outcome: self.outcome(),
            power_ups_used: self.power_ups_used(),
            power_up_quota: self.power_up_quota(),
            cards,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DifficultyConfig;

    fn tokens(names: &[&str]) -> Vec<Token> {
        names.iter().map(|n| Token::with_artwork(*n)).collect()
    }

    /// Easy with two pairs so rounds are short.
    fn small_engine() -> MatchEngine {
        let config = EngineConfig::default()
            .with_difficulty(Difficulty::Easy, DifficultyConfig::new(2, 20, 1));
        MatchEngine::with_seed(config, 42).unwrap()
    }

    fn pair(engine: &MatchEngine, name: &str) -> (CardId, CardId) {
        let ids: Vec<_> = engine
            .board()
            .unwrap()
            .iter()
            .filter(|c| c.token().name() == name)
            .map(|c| c.id())
            .collect();
        (ids[0], ids[1])
    }

    #[test]
    fn test_idle_before_start() {
        let mut engine = small_engine();
        assert_eq!(engine.phase(), TurnPhase::Idle);
        assert_eq!(engine.flip(CardId::new(0)), FlipResult::Ignored);
        assert_eq!(engine.use_power_up(), Err(EngineError::RoundNotActive));
        assert!(engine.snapshot().cards.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig::default()
            .with_difficulty(Difficulty::Hard, DifficultyConfig::new(0, 45, 3));
        assert!(matches!(
            MatchEngine::with_seed(config, 1),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_start_emits_round_started() {
        let mut engine = small_engine();
        engine
            .start_with_tokens(Difficulty::Easy, tokens(&["pikachu", "eevee"]))
            .unwrap();

        assert_eq!(
            engine.drain_events(),
            vec![EngineEvent::RoundStarted {
                difficulty: Difficulty::Easy,
                total_pairs: 2,
                time_left: 20,
            }]
        );
        assert!(engine.pending_events().is_empty());
        assert_eq!(engine.next_deadline(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_extra_tokens_truncated() {
        let mut engine = small_engine();
        engine
            .start_with_tokens(Difficulty::Easy, tokens(&["a", "b", "c", "d"]))
            .unwrap();
        assert_eq!(engine.board().unwrap().len(), 4);
        assert_eq!(engine.total_pairs(), 2);
    }

    #[test]
    fn test_short_tokens_fail() {
        let mut engine = small_engine();
        let result = engine.start_with_tokens(Difficulty::Easy, tokens(&["a"]));
        assert_eq!(
            result,
            Err(EngineError::SupplierFailure(SupplyError::Short { requested: 2, available: 1 }))
        );
        assert_eq!(engine.phase(), TurnPhase::Idle);
    }

    #[test]
    fn test_mismatch_flip_back_after_delay() {
        let mut engine = small_engine();
        engine
            .start_with_tokens(Difficulty::Easy, tokens(&["pikachu", "bulbasaur"]))
            .unwrap();
        let (a, _) = pair(&engine, "pikachu");
        let (c, _) = pair(&engine, "bulbasaur");

        engine.flip(a);
        engine.flip(c);
        assert!(engine.is_locked());

        let events = engine.advance(Duration::from_millis(999));
        assert!(events.is_empty());
        assert!(engine.is_locked());

        let events = engine.advance(Duration::from_millis(1));
        assert!(events.contains(&EngineEvent::PairHidden { first: a, second: c }));
        assert!(!engine.is_locked());
        assert!(!engine.board().unwrap().is_face_up(a));
        assert_eq!(engine.pending_first(), None);
    }

    #[test]
    fn test_reveal_blocks_flips_then_hides() {
        let mut engine = small_engine();
        engine
            .start_with_tokens(Difficulty::Easy, tokens(&["pikachu", "bulbasaur"]))
            .unwrap();

        engine.use_power_up().unwrap();
        assert!(engine.is_revealing());
        assert_eq!(engine.board().unwrap().face_up_unmatched().count(), 4);
        assert_eq!(engine.flip(CardId::new(0)), FlipResult::Ignored);
        assert!(engine.flippable_cards().is_empty());
        assert_eq!(engine.clicks(), 0);

        engine.advance(Duration::from_millis(1500));
        assert!(!engine.is_revealing());
        assert_eq!(engine.board().unwrap().face_up_unmatched().count(), 0);
        assert_eq!(engine.flippable_cards().len(), 4);
    }

    #[test]
    fn test_second_reveal_restarts_window() {
        let config = EngineConfig::default()
            .with_difficulty(Difficulty::Medium, DifficultyConfig::new(2, 20, 2));
        let mut engine = MatchEngine::with_seed(config, 1).unwrap();
        engine
            .start_with_tokens(Difficulty::Medium, tokens(&["a", "b"]))
            .unwrap();

        engine.use_power_up().unwrap();
        engine.advance(Duration::from_millis(1000));
        engine.use_power_up().unwrap();
        engine.advance(Duration::from_millis(1000));
        assert!(engine.is_revealing());
        engine.advance(Duration::from_millis(500));
        assert!(!engine.is_revealing());
        assert_eq!(engine.power_ups_used(), 2);
    }

    #[test]
    fn test_power_up_after_round_end_rejected() {
        let mut engine = small_engine();
        engine
            .start_with_tokens(Difficulty::Easy, tokens(&["a", "b"]))
            .unwrap();
        engine.advance(Duration::from_secs(20));
        assert_eq!(engine.outcome(), Some(RoundOutcome::Lost));
        assert_eq!(engine.use_power_up(), Err(EngineError::RoundNotActive));
    }

    #[test]
    fn test_expiry_closes_open_reveal() {
        let config = EngineConfig::default()
            .with_difficulty(Difficulty::Easy, DifficultyConfig::new(2, 1, 1));
        let mut engine = MatchEngine::with_seed(config, 5).unwrap();
        engine
            .start_with_tokens(Difficulty::Easy, tokens(&["a", "b"]))
            .unwrap();
        engine.drain_events();

        engine.advance(Duration::from_millis(500));
        engine.use_power_up().unwrap();
        let events = engine.advance(Duration::from_millis(500));

        assert_eq!(
            events.as_slice(),
            &[
                EngineEvent::ClockTicked { time_left: 0 },
                EngineEvent::RevealEnded,
                EngineEvent::RoundEnded { outcome: RoundOutcome::Lost },
            ]
        );
        assert!(!engine.is_revealing());
        assert_eq!(engine.board().unwrap().face_up_unmatched().count(), 0);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut engine = small_engine();
        engine.reset();
        assert!(engine.drain_events().is_empty());

        engine
            .start_with_tokens(Difficulty::Easy, tokens(&["a", "b"]))
            .unwrap();
        engine.reset();
        engine.reset();
        let events = engine.drain_events();
        assert_eq!(events.last(), Some(&EngineEvent::RoundReset));
        assert_eq!(events.iter().filter(|e| **e == EngineEvent::RoundReset).count(), 1);
        assert_eq!(engine.next_deadline(), None);
        assert_eq!(engine.time_left(), 0);
    }
}
