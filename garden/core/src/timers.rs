//! Feedback Timers
//!
//! A small deadline queue for everything time-driven: transient indicators,
//! the penny settle delay, and draft autosave debouncing. The controller never
//! sleeps; the surface calls `tick` every frame and the controller drains
//! whatever has come due.
//!
//! Timers are never cancelled. A timer that fires after its subject has gone
//! away (the user left the mode) is handled as a no-op by whoever receives it.

use std::time::{Duration, Instant};

use crate::entry::WritingMode;

/// What to do when a timer fires
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    /// Clear the vault error with this generation
    ClearVaultError(u64),
    /// Clear the save indicator with this generation
    ClearSaveFeedback(u64),
    /// Draw and reveal the result of the flip with this generation
    RevealPenny(u64),
    /// Write a mode's buffer to its draft key
    FlushDraft(WritingMode),
}

#[derive(Clone, Debug)]
struct Pending {
    at: Instant,
    seq: u64,
    kind: TimerKind,
}

/// Deadline-ordered timer queue
#[derive(Clone, Debug, Default)]
pub struct FeedbackTimers {
    pending: Vec<Pending>,
    next_seq: u64,
}

impl FeedbackTimers {
    /// Empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `kind` once `delay` has passed since `now`
    pub fn schedule(&mut self, kind: TimerKind, now: Instant, delay: Duration) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            at: now + delay,
            seq,
            kind,
        });
    }

    /// Like [`schedule`](Self::schedule), but pushes back an already pending
    /// timer of the same kind instead of adding a second one
    pub fn debounce(&mut self, kind: TimerKind, now: Instant, delay: Duration) {
        self.pending.retain(|p| p.kind != kind);
        self.schedule(kind, now, delay);
    }

    /// Remove and return every timer due at `now`, earliest first
    pub fn due(&mut self, now: Instant) -> Vec<TimerKind> {
        let (mut fired, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.at <= now);
        self.pending = waiting;
        fired.sort_by_key(|p| (p.at, p.seq));
        fired.into_iter().map(|p| p.kind).collect()
    }

    /// Whether a timer of this kind is waiting
    #[must_use]
    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|p| p.kind == kind)
    }

    /// Earliest deadline, if any timer is waiting
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.at).min()
    }

    /// Number of waiting timers
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is waiting
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
