//! Session history and pool rollback
//!
//! The history is a bounded log of recent answers, newest first. It is
//! transient per-session state and never persisted with the store.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::RollbackConfig;
use crate::store::ItemStore;

// ============================================================================
// HISTORY
// ============================================================================

/// One answered item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub question: String,
    pub correct: bool,
    pub answered_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(question: impl Into<String>, correct: bool) -> Self {
        Self {
            question: question.into(),
            correct,
            answered_at: Utc::now(),
        }
    }
}

/// Bounded recent-answer log, newest first
#[derive(Debug, Clone)]
pub struct SessionHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl SessionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record an answer, evicting the oldest past capacity
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn correct_count(&self) -> usize {
        self.entries.iter().filter(|e| e.correct).count()
    }

    /// Whether `question` was answered within the window
    pub fn contains(&self, question: &str) -> bool {
        self.entries.iter().any(|e| e.question == question)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// ============================================================================
// ROLLBACK
// ============================================================================

/// Shrink the pool after a bad run.
///
/// Fires when the history is full and holds fewer than `history_min`
/// correct answers. The history is cleared and the active pool loses its
/// most recently unlocked `incorrect_step` items, never going below
/// `mask_min`. Returns how many items left the pool.
pub(crate) fn apply_rollback(
    store: &mut ItemStore,
    history: &mut SessionHistory,
    config: &RollbackConfig,
    incorrect_step: usize,
) -> usize {
    if !history.is_full() || history.correct_count() >= config.history_min {
        return 0;
    }

    let correct = history.correct_count();
    history.clear();

    let active = store.active_count();
    let target = active.saturating_sub(incorrect_step).max(config.mask_min);
    if target >= active {
        info!(correct, active, "Bad run detected, pool already at its floor");
        return 0;
    }

    store.shrink_active(target);
    info!(
        correct,
        from = active,
        to = target,
        "Bad run detected, rolling back active pool"
    );
    active - target
}
