//! Scheduler configuration
//!
//! Process-wide policy knobs, fixed at startup. A config that fails
//! [`SchedulerConfig::validate`] never reaches request handling.

use serde::{Deserialize, Serialize};

// ============================================================================
// DEFAULTS
// ============================================================================

/// Geometric rate between adjacent streak buckets
pub const DEFAULT_WEIGHT_RATE: f64 = 1.5;

/// Items unlocked per pool expansion
pub const DEFAULT_CORRECT_STEP: usize = 5;

/// Streak at which an item counts as mastered
pub const DEFAULT_REQUIRED_STREAK: u32 = 3;

/// Answers kept in the session history
pub const DEFAULT_HISTORY_CAP: usize = 10;

/// Minimum correct answers in a full history before rollback
pub const DEFAULT_HISTORY_MIN: usize = 7;

/// Smallest pool a rollback may shrink to
pub const DEFAULT_MASK_MIN: usize = 10;

/// Combined probability share for recently seen items
pub const DEFAULT_HISTORY_PENALTY: f64 = 0.1;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Invalid configuration
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("weight_rate must be finite and greater than 1, got {0}")]
    WeightRate(f64),
    #[error("{0} must be greater than 0")]
    Zero(&'static str),
    #[error("history_min ({min}) cannot exceed history_cap ({cap})")]
    HistoryMin { min: usize, cap: usize },
    #[error("history_penalty must lie strictly between 0 and 0.5, got {0}")]
    HistoryPenalty(f64),
}

// ============================================================================
// STRATEGIES
// ============================================================================

/// How a draw is taken from the bucket weights.
///
/// Both give every item the same marginal probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingStrategy {
    /// Draw a bucket, then an item uniformly within it
    #[default]
    TwoStage,
    /// Draw straight from the per-item weight array
    Direct,
}

impl std::str::FromStr for SamplingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "two_stage" => Ok(SamplingStrategy::TwoStage),
            "direct" => Ok(SamplingStrategy::Direct),
            other => Err(format!("unknown sampling strategy '{}'", other)),
        }
    }
}

/// How per-item weights are derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightingMode {
    /// Geometric weights per streak bucket
    #[default]
    Bucketed,
    /// Recently seen items share `history_penalty`, the rest share the remainder
    RecencyPenalty,
}

impl std::str::FromStr for WeightingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "bucketed" => Ok(WeightingMode::Bucketed),
            "recency_penalty" | "recency" => Ok(WeightingMode::RecencyPenalty),
            other => Err(format!("unknown weighting mode '{}'", other)),
        }
    }
}

// ============================================================================
// ROLLBACK
// ============================================================================

/// Circuit breaker that shrinks the pool after a bad run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackConfig {
    /// Answers kept in the history
    pub history_cap: usize,
    /// A full history with fewer correct answers than this triggers rollback
    pub history_min: usize,
    /// Floor for the active pool size
    pub mask_min: usize,
}

impl Default for RollbackConfig {
    fn default() -> Self {
        Self {
            history_cap: DEFAULT_HISTORY_CAP,
            history_min: DEFAULT_HISTORY_MIN,
            mask_min: DEFAULT_MASK_MIN,
        }
    }
}

// ============================================================================
// SCHEDULER CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfig {
    pub weight_rate: f64,
    pub correct_step: usize,
    pub required_streak: u32,
    pub strategy: SamplingStrategy,
    pub weighting: WeightingMode,
    /// History length used for recency weighting when rollback is off
    pub history_cap: usize,
    pub history_penalty: f64,
    /// `None` disables pool rollback
    pub rollback: Option<RollbackConfig>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            weight_rate: DEFAULT_WEIGHT_RATE,
            correct_step: DEFAULT_CORRECT_STEP,
            required_streak: DEFAULT_REQUIRED_STREAK,
            strategy: SamplingStrategy::default(),
            weighting: WeightingMode::default(),
            history_cap: DEFAULT_HISTORY_CAP,
            history_penalty: DEFAULT_HISTORY_PENALTY,
            rollback: None,
        }
    }
}

impl SchedulerConfig {
    /// Pool shrink on rollback: three expansion batches
    pub fn incorrect_step(&self) -> usize {
        3 * self.correct_step
    }

    /// Capacity of the session history
    pub fn effective_history_cap(&self) -> usize {
        self.rollback
            .map(|r| r.history_cap)
            .unwrap_or(self.history_cap)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.weight_rate.is_finite() || self.weight_rate <= 1.0 {
            return Err(ConfigError::WeightRate(self.weight_rate));
        }
        if self.correct_step == 0 {
            return Err(ConfigError::Zero("correct_step"));
        }
        if self.required_streak == 0 {
            return Err(ConfigError::Zero("required_streak"));
        }
        if self.history_cap == 0 {
            return Err(ConfigError::Zero("history_cap"));
        }
        if self.weighting == WeightingMode::RecencyPenalty
            && !(self.history_penalty > 0.0 && self.history_penalty < 0.5)
        {
            return Err(ConfigError::HistoryPenalty(self.history_penalty));
        }
        if let Some(rollback) = &self.rollback {
            if rollback.history_cap == 0 {
                return Err(ConfigError::Zero("history_cap"));
            }
            if rollback.mask_min == 0 {
                return Err(ConfigError::Zero("mask_min"));
            }
            if rollback.history_min > rollback.history_cap {
                return Err(ConfigError::HistoryMin {
                    min: rollback.history_min,
                    cap: rollback.history_cap,
                });
            }
        }
        Ok(())
    }
}
