//! Command-line options shared by both binaries
//!
//! Every knob has an environment fallback so the server can be configured
//! from a unit file or container without flags.

use std::path::PathBuf;

use clap::Args;
use directories::ProjectDirs;

use drill_core::config::{
    DEFAULT_CORRECT_STEP, DEFAULT_HISTORY_CAP, DEFAULT_HISTORY_MIN, DEFAULT_HISTORY_PENALTY,
    DEFAULT_MASK_MIN, DEFAULT_REQUIRED_STREAK, DEFAULT_WEIGHT_RATE,
};
use drill_core::{RollbackConfig, SamplingStrategy, SchedulerConfig, WeightingMode};

/// Table file name used when only a data directory is given
pub const DEFAULT_TABLE: &str = "items.csv";

/// Scheduler policy knobs
#[derive(Debug, Clone, Args)]
pub struct SchedulerArgs {
    /// Geometric rate between streak buckets (must be > 1)
    #[arg(long, env = "DRILL_WEIGHT_RATE", default_value_t = DEFAULT_WEIGHT_RATE)]
    pub weight_rate: f64,

    /// Items unlocked once the active pool is mastered
    #[arg(long, env = "DRILL_CORRECT_STEP", default_value_t = DEFAULT_CORRECT_STEP)]
    pub correct_step: usize,

    /// Streak at which an item counts as mastered
    #[arg(long, env = "DRILL_REQUIRED_STREAK", default_value_t = DEFAULT_REQUIRED_STREAK)]
    pub required_streak: u32,

    /// Sampling strategy: two-stage or direct
    #[arg(long, env = "DRILL_STRATEGY", default_value = "two-stage")]
    pub strategy: SamplingStrategy,

    /// Weighting mode: bucketed or recency-penalty
    #[arg(long, env = "DRILL_WEIGHTING", default_value = "bucketed")]
    pub weighting: WeightingMode,

    /// Shrink the active pool after a bad run
    #[arg(long, env = "DRILL_ROLLBACK")]
    pub rollback: bool,

    /// Answers kept in the session history
    #[arg(long, env = "DRILL_HISTORY_CAP", default_value_t = DEFAULT_HISTORY_CAP)]
    pub history_cap: usize,

    /// Correct answers a full history needs to avoid rollback
    #[arg(long, env = "DRILL_HISTORY_MIN", default_value_t = DEFAULT_HISTORY_MIN)]
    pub history_min: usize,

    /// Smallest pool a rollback may leave
    #[arg(long, env = "DRILL_MASK_MIN", default_value_t = DEFAULT_MASK_MIN)]
    pub mask_min: usize,

    /// Combined share of recently seen items in recency-penalty mode
    #[arg(long, env = "DRILL_HISTORY_PENALTY", default_value_t = DEFAULT_HISTORY_PENALTY)]
    pub history_penalty: f64,
}

impl SchedulerArgs {
    /// Unvalidated config; `Scheduler::new` rejects bad values
    pub fn to_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            weight_rate: self.weight_rate,
            correct_step: self.correct_step,
            required_streak: self.required_streak,
            strategy: self.strategy,
            weighting: self.weighting,
            history_cap: self.history_cap,
            history_penalty: self.history_penalty,
            rollback: self.rollback.then_some(RollbackConfig {
                history_cap: self.history_cap,
                history_min: self.history_min,
                mask_min: self.mask_min,
            }),
        }
    }
}

/// Location of the item table
#[derive(Debug, Clone, Args)]
pub struct DataArgs {
    /// Directory holding item tables (defaults to the platform data dir)
    #[arg(long, env = "DRILL_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Item table file; `.db`/`.sqlite` selects SQLite, anything else CSV.
    /// Relative paths resolve against the data directory.
    #[arg(long, env = "DRILL_TABLE", default_value = DEFAULT_TABLE)]
    pub table: PathBuf,
}

impl DataArgs {
    pub fn data_dir(&self) -> anyhow::Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let proj_dirs = ProjectDirs::from("com", "drill", "drill")
            .ok_or_else(|| anyhow::anyhow!("Could not determine a data directory; pass --data-dir"))?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Full path of the item table
    pub fn table_path(&self) -> anyhow::Result<PathBuf> {
        if self.table.is_absolute() {
            return Ok(self.table.clone());
        }
        Ok(self.data_dir()?.join(&self.table))
    }
}
