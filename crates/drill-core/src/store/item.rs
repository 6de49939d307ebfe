//! Item - one question/answer pair with its scheduling state

use serde::{Deserialize, Serialize};

// ============================================================================
// MASTERY LEVEL
// ============================================================================

/// Derived view of an item's streak relative to the mastery threshold.
///
/// | Level      | Condition                  |
/// |------------|----------------------------|
/// | Struggling | `consec < required`        |
/// | Mastering  | `consec == required`       |
/// | Graduated  | `consec > required`        |
///
/// After streak compression every mastered item sits at
/// `required + rank`, so anything above `required` has held its streak
/// through at least one renumbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasteryLevel {
    Struggling,
    Mastering,
    Graduated,
}

impl MasteryLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MasteryLevel::Struggling => "struggling",
            MasteryLevel::Mastering => "mastering",
            MasteryLevel::Graduated => "graduated",
        }
    }
}

impl std::fmt::Display for MasteryLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ITEM
// ============================================================================

/// A question/answer scheduling unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier, never duplicated across a store
    pub question: String,
    /// Expected response (not required to be unique)
    pub answer: String,
    /// Consecutive correct answers since the last reset
    pub consec: u32,
    /// Whether the item is eligible for selection
    pub mask: bool,
}

impl Item {
    /// New item with no streak, outside the active pool
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            consec: 0,
            mask: false,
        }
    }

    /// Builder-style helper to set the streak
    pub fn with_consec(mut self, consec: u32) -> Self {
        self.consec = consec;
        self
    }

    /// Builder-style helper to set pool membership
    pub fn with_mask(mut self, mask: bool) -> Self {
        self.mask = mask;
        self
    }

    /// Whether the streak meets the mastery threshold
    #[inline]
    pub fn is_mastered(&self, required_streak: u32) -> bool {
        self.consec >= required_streak
    }

    pub fn level(&self, required_streak: u32) -> MasteryLevel {
        match self.consec.cmp(&required_streak) {
            std::cmp::Ordering::Less => MasteryLevel::Struggling,
            std::cmp::Ordering::Equal => MasteryLevel::Mastering,
            std::cmp::Ordering::Greater => MasteryLevel::Graduated,
        }
    }
}
