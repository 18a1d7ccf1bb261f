//! Engine-owned timer queue.
//!
//! Every delayed piece of work (clock ticks, mismatch flip-back, reveal end)
//! is a `Task` queued here with a deadline on the engine's virtual
//! timeline. The host moves time forward; the engine pops due tasks in
//! `(deadline, sequence)` order, so two tasks due at the same instant fire
//! in the order they were scheduled.
//!
//! Cancelling is "stop scheduling": removed tasks never fire, and
//! `clear()` drops everything at once on reset or round end.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::CardId;

/// Delayed work the engine knows how to perform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    /// Advance the round clock by one step.
    ClockTick,
    /// Turn a mismatched pair face down and unlock the board.
    FlipBack { first: CardId, second: CardId },
    /// Close a power-up reveal window.
    EndReveal,
}

/// Whole milliseconds in `duration`, clamped to `u64::MAX`.
pub(crate) fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Clone, Debug)]
struct Entry {
    due: u64,
    seq: u64,
    task: Task,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed so the max-heap pops the earliest deadline first.
    fn cmp(&self, other: &Self) -> Ordering {
        (other.due, other.seq).cmp(&(self.due, self.seq))
    }
}

/// Priority queue of delayed tasks on a millisecond timeline.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    now: u64,
    next_seq: u64,
    queue: BinaryHeap<Entry>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position on the timeline, in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now
    }

    /// Number of queued tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queue `task` to fire `delay` after the current time.
    pub fn schedule(&mut self, delay: Duration, task: Task) {
        let due = self.now.saturating_add(saturating_millis(delay));
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Entry { due, seq, task });
    }

    /// Drop every queued task matching `predicate`. Returns how many were dropped.
    pub fn cancel(&mut self, predicate: impl Fn(&Task) -> bool) -> usize {
        let before = self.queue.len();
        self.queue.retain(|e| !predicate(&e.task));
        before - self.queue.len()
    }

    /// Drop every queued task.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Pop the next task due at or before `until`, moving the clock to its deadline.
    ///
    /// Returns `None` once nothing else is due; the caller then finishes the
    /// step with `settle(until)`.
    pub fn pop_due(&mut self, until: u64) -> Option<Task> {
        if self.queue.peek()?.due > until {
            return None;
        }
        let entry = self.queue.pop()?;
        self.now = self.now.max(entry.due);
        Some(entry.task)
    }

    /// Move the clock to `until` once every due task has been handled.
    pub fn settle(&mut self, until: u64) {
        self.now = self.now.max(until);
    }

    /// Milliseconds until the next queued task, if any.
    #[must_use]
    pub fn next_due_in(&self) -> Option<Duration> {
        self.queue
            .peek()
            .map(|e| Duration::from_millis(e.due.saturating_sub(self.now)))
    }
}
