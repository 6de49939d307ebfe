//! # Drill Core
//!
//! Adaptive question scheduler for a single learner drilling a bank of
//! question/answer pairs.
//!
//! - **Item Store**: ordered items with a streak counter (`consec`) and pool
//!   membership (`mask`)
//! - **Mastery updates**: streak increments, confusable resets, streak
//!   compression and progressive unlock of new material
//! - **Rollback**: a bounded answer history that shrinks the active pool
//!   after a sustained bad run
//! - **Weighting**: geometric bucket weights favouring less-mastered items,
//!   drawn either in two stages or directly from per-item weights
//! - **Persistence**: CSV item table (atomic replace) or SQLite
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use drill_core::{AnswerEvent, CsvStorage, DrillEngine, SchedulerConfig};
//!
//! let storage = CsvStorage::new("data/jp.csv");
//! let mut engine = DrillEngine::new(Box::new(storage), SchedulerConfig::default())?;
//!
//! // First question of the session
//! let next = engine.next(AnswerEvent::start())?;
//!
//! // Answered correctly
//! let next = engine.next(AnswerEvent::correct(&next.question))?;
//!
//! // Answered wrong with a literal response
//! let next = engine.next(AnswerEvent::incorrect(&next.question, "ka"))?;
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod bank;
pub mod config;
pub mod engine;
pub mod scheduler;
pub mod storage;
pub mod store;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use bank::{Bank, BankEntry, BankError, DEFAULT_INITIAL_UNLOCK};
pub use config::{ConfigError, RollbackConfig, SamplingStrategy, SchedulerConfig, WeightingMode};
pub use engine::{DrillEngine, EngineError};
pub use scheduler::{
    AnswerEvent, BucketReport, Draw, HistoryEntry, NextQuestion, Scheduler, SchedulerError,
    Session, SessionHistory, UpdateOutcome,
};
pub use storage::{CsvStorage, Persistence, SqliteStorage, StorageError, open_storage};
pub use store::{Item, ItemStore, MasteryLevel, StoreError, StoreStats};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        AnswerEvent, DrillEngine, Item, ItemStore, NextQuestion, Persistence, Scheduler,
        SchedulerConfig, Session,
    };
}
