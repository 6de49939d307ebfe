//! Scheduler Module
//!
//! Adaptive selection over the item store:
//! - Mastery updates per answer event (streaks, confusable resets,
//!   compression, progressive unlock)
//! - Optional rollback of the pool after a bad run
//! - Bucket weighting and weighted draws with no immediate repeats

mod mastery;
mod rollback;
mod sampling;
mod session;
mod weighting;

pub use rollback::{HistoryEntry, SessionHistory};
pub use sampling::marginal_probabilities;
pub use session::{AnswerEvent, Draw, NextQuestion, Session};
pub use weighting::{Bucket, BucketReport, WEIGHT_TOLERANCE, WeightTable};

use serde::Serialize;
use tracing::debug;

use crate::config::{ConfigError, SchedulerConfig};
use crate::store::{ItemStore, StoreError};

// ============================================================================
// ERROR TYPES
// ============================================================================

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// Store state is corrupted (lookup miss, duplicate)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    /// Non-empty store without any active item
    #[error("No active items to draw from")]
    EmptyPool,
    /// Nothing to draw: the store has no items
    #[error("Item store is empty")]
    EmptyStore,
    /// Weight vector failed its precondition check
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),
}

// ============================================================================
// UPDATE OUTCOME
// ============================================================================

/// What one answer event changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub question: String,
    pub correct: bool,
    /// Streak of the answered item after the update
    pub consec: u32,
    /// Other items reset because their answer matched the response
    pub confused: Vec<String>,
    /// Items unlocked by pool expansion
    pub unlocked: usize,
    /// Items masked out by rollback
    pub rolled_back: usize,
}

// ============================================================================
// SCHEDULER
// ============================================================================

/// Configured scheduling policy. Holds no per-learner state; that lives in
/// [`Session`].
#[derive(Debug, Clone)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    /// Create a scheduler, refusing an invalid configuration
    pub fn new(config: SchedulerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Fresh session sized for this scheduler's history
    pub fn new_session(&self) -> Session {
        Session::new(self.config.effective_history_cap())
    }

    /// Fresh session with a deterministic random source
    pub fn seeded_session(&self, seed: u64) -> Session {
        Session::with_seed(self.config.effective_history_cap(), seed)
    }

    /// Apply one answer for `question`.
    ///
    /// `response` is `None` for a correct answer, otherwise the literal
    /// wrong response. The store is left consistent whether or not this
    /// returns an error: a lookup miss fails before anything is touched.
    pub fn apply_answer(
        &self,
        store: &mut ItemStore,
        session: &mut Session,
        question: &str,
        response: Option<&str>,
    ) -> Result<UpdateOutcome, SchedulerError> {
        let pos = store.position(question)?;
        let required = self.config.required_streak;

        let mut outcome = UpdateOutcome {
            question: question.to_string(),
            correct: response.is_none(),
            ..Default::default()
        };

        match response {
            None => {
                mastery::record_correct(store, pos);
                mastery::compress_streaks(store, required);
                outcome.unlocked = mastery::expand_pool(store, required, self.config.correct_step);
            }
            Some(response) => {
                outcome.confused = mastery::record_incorrect(store, pos, response);
            }
        }
        outcome.consec = store.items()[pos].consec;

        session
            .history
            .push(HistoryEntry::new(question, outcome.correct));
        if let Some(policy) = &self.config.rollback {
            outcome.rolled_back = rollback::apply_rollback(
                store,
                &mut session.history,
                policy,
                self.config.incorrect_step(),
            );
        }
        session.previous = Some(question.to_string());

        debug!(
            question,
            correct = outcome.correct,
            consec = outcome.consec,
            confused = outcome.confused.len(),
            unlocked = outcome.unlocked,
            rolled_back = outcome.rolled_back,
            "Answer applied"
        );
        Ok(outcome)
    }

    /// Weights over the active pool, minus the previous item when that
    /// leaves at least one candidate
    pub fn weights(&self, store: &ItemStore, session: &Session) -> Result<WeightTable, SchedulerError> {
        if store.is_empty() {
            return Err(SchedulerError::EmptyStore);
        }
        let mut candidates = store.active_positions();
        if candidates.is_empty() {
            return Err(SchedulerError::EmptyPool);
        }
        if let Some(previous) = session.previous() {
            let without: Vec<usize> = candidates
                .iter()
                .copied()
                .filter(|&pos| store.items()[pos].question != previous)
                .collect();
            if !without.is_empty() {
                candidates = without;
            }
        }
        WeightTable::build(store, &candidates, &self.config, &session.history)
    }

    /// Draw the next item to present
    pub fn draw(&self, store: &ItemStore, session: &mut Session) -> Result<Draw, SchedulerError> {
        let table = self.weights(store, session)?;
        let position = sampling::draw(&table, self.config.strategy, &mut session.rng);
        let item = store.items()[position].clone();

        let stats = store.stats(self.config.required_streak);
        debug!(
            question = %item.question,
            consec = item.consec,
            mastered = stats.mastered_ratio(),
            active = stats.active,
            active_share = stats.active_ratio(),
            "Drew next item"
        );

        Ok(Draw {
            position,
            probability: table.probability(position),
            report: table.report(),
            item,
        })
    }
}
