//! Per-learner session state and the answer-event wire types

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::rollback::SessionHistory;
use super::weighting::BucketReport;
use crate::store::Item;

// ============================================================================
// ANSWER EVENT
// ============================================================================

/// Input event from the front end.
///
/// `previous` absent means the session just started and nothing is
/// updated. `response` absent means the previous item was answered
/// correctly; otherwise it holds the literal wrong response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEvent {
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
}

impl AnswerEvent {
    /// First draw of a session
    pub fn start() -> Self {
        Self::default()
    }

    pub fn correct(previous: impl Into<String>) -> Self {
        Self {
            previous: Some(previous.into()),
            response: None,
        }
    }

    pub fn incorrect(previous: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            previous: Some(previous.into()),
            response: Some(response.into()),
        }
    }
}

// ============================================================================
// DRAW OUTPUT
// ============================================================================

/// Result of one draw
#[derive(Debug, Clone)]
pub struct Draw {
    /// Store position of the drawn item
    pub position: usize,
    pub item: Item,
    /// Probability the drawn item had
    pub probability: f64,
    pub report: Vec<BucketReport>,
}

/// Output sent back to the front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextQuestion {
    pub question: String,
    pub answer: String,
    pub consec: u32,
    pub weights: Vec<BucketReport>,
}

impl From<Draw> for NextQuestion {
    fn from(draw: Draw) -> Self {
        Self {
            question: draw.item.question,
            answer: draw.item.answer,
            consec: draw.item.consec,
            weights: draw.report,
        }
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// State owned by one learner: previous-item marker, recent history and
/// the random source. Not persisted; a restart begins a fresh session.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) previous: Option<String>,
    pub(crate) history: SessionHistory,
    pub(crate) rng: ChaCha8Rng,
}

impl Session {
    /// Session seeded from OS entropy
    pub fn new(history_cap: usize) -> Self {
        Self {
            previous: None,
            history: SessionHistory::new(history_cap),
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Session with a fixed seed (for testing and replays)
    pub fn with_seed(history_cap: usize, seed: u64) -> Self {
        Self {
            previous: None,
            history: SessionHistory::new(history_cap),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Question answered most recently, if any
    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    /// Drop the previous-item marker and history, keeping the random source
    pub fn reset(&mut self) {
        self.previous = None;
        self.history.clear();
    }
}
