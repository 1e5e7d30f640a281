//! Keyed debounce window for deferred writes.
//!
//! DESIGN
//! ======
//! Edits are merged per key into a pending map. Every new edit pushes the
//! deadline out to `now + window`, so a batch is released only once input
//! has been quiet for a full window. Releasing a batch empties the pending
//! map *before* the caller issues any I/O: edits that arrive while a batch
//! is in flight open a fresh window instead of joining the in-flight batch.
//!
//! The window is an explicit state machine:
//!
//! ```text
//!            push                     take_due / take_now
//!   Idle ──────────▶ Accumulating ───────────────────────▶ Flushing
//!    ▲                  ▲    │ push (deadline moves)          │
//!    │                  └────┘                                │
//!    │                  ▲          push while in flight       │
//!    │                  └─────────────────────────────────────┤
//!    └────────────────────────────── flush_finished ──────────┘
//! ```
//!
//! The debouncer never sleeps or spawns; the owner decides when to look at
//! the clock. Time comes from `tokio::time::Instant` so tests can pause it.

#[cfg(test)]
#[path = "debounce_test.rs"]
mod debounce_test;

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::time::Instant;

/// Merge a newer edit for the same key into an older one.
pub trait Coalesce {
    fn coalesce(&mut self, newer: Self);
}

/// Observable phase of a debounce window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// Nothing pending, nothing in flight.
    Idle,
    /// Edits are pending and waiting for the deadline. A batch may also be
    /// in flight from an earlier window.
    Accumulating,
    /// A released batch is in flight and nothing new is pending.
    Flushing,
}

/// Pending edits keyed by `K`, released together after a quiet period.
#[derive(Debug)]
pub struct Debouncer<K, V> {
    window: Duration,
    pending: HashMap<K, V>,
    deadline: Option<Instant>,
    in_flight: usize,
}

impl<K, V> Debouncer<K, V>
where
    K: Eq + Hash,
    V: Coalesce,
{
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self { window, pending: HashMap::new(), deadline: None, in_flight: 0 }
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    #[must_use]
    pub fn state(&self) -> WindowState {
        if !self.pending.is_empty() {
            WindowState::Accumulating
        } else if self.in_flight > 0 {
            WindowState::Flushing
        } else {
            WindowState::Idle
        }
    }

    /// When the pending batch becomes due, if anything is pending.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub fn pending(&self) -> &HashMap<K, V> {
        &self.pending
    }

    /// Record an edit and restart the window.
    pub fn push(&mut self, key: K, value: V, now: Instant) {
        match self.pending.get_mut(&key) {
            Some(existing) => existing.coalesce(value),
            None => {
                self.pending.insert(key, value);
            }
        }
        self.deadline = Some(now + self.window);
    }

    /// Edit a pending entry in place; the entry is dropped when `keep`
    /// returns `false`. The deadline is left alone unless the map empties.
    pub fn amend(&mut self, key: &K, edit: impl FnOnce(&mut V) -> bool) {
        let Some(value) = self.pending.get_mut(key) else {
            return;
        };
        if !edit(value) {
            self.pending.remove(key);
        }
        if self.pending.is_empty() {
            self.deadline = None;
        }
    }

    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Release the pending batch if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<HashMap<K, V>> {
        if self.is_due(now) { self.take_now() } else { None }
    }

    /// Release the pending batch regardless of the deadline.
    pub fn take_now(&mut self) -> Option<HashMap<K, V>> {
        if self.pending.is_empty() {
            return None;
        }
        self.deadline = None;
        self.in_flight += 1;
        Some(std::mem::take(&mut self.pending))
    }

    /// Mark one released batch as settled (success or failure).
    pub fn flush_finished(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }
}
