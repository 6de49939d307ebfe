//! Drill engine
//!
//! Binds one persisted item table, one scheduler and one learner session,
//! and runs the request cycle: load, update, save, draw. The table is
//! saved only after an update completes, and the session only advances
//! once that save succeeds, so a failed request leaves both the last good
//! snapshot and the session as they were.

use tracing::{info, warn};

use crate::config::{ConfigError, SchedulerConfig};
use crate::scheduler::{AnswerEvent, NextQuestion, Scheduler, SchedulerError, Session, UpdateOutcome};
use crate::storage::{Persistence, StorageError};
use crate::store::StoreStats;

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

pub struct DrillEngine {
    persistence: Box<dyn Persistence>,
    scheduler: Scheduler,
    session: Session,
    last_update: Option<UpdateOutcome>,
}

impl DrillEngine {
    /// Engine with an entropy-seeded session
    pub fn new(persistence: Box<dyn Persistence>, config: SchedulerConfig) -> Result<Self, EngineError> {
        let scheduler = Scheduler::new(config)?;
        let session = scheduler.new_session();
        Ok(Self::with_parts(persistence, scheduler, session))
    }

    /// Engine with a deterministic session
    pub fn with_seed(
        persistence: Box<dyn Persistence>,
        config: SchedulerConfig,
        seed: u64,
    ) -> Result<Self, EngineError> {
        let scheduler = Scheduler::new(config)?;
        let session = scheduler.seeded_session(seed);
        Ok(Self::with_parts(persistence, scheduler, session))
    }

    pub fn with_parts(persistence: Box<dyn Persistence>, scheduler: Scheduler, session: Session) -> Self {
        info!(storage = %persistence.describe(), "Drill engine ready");
        Self {
            persistence,
            scheduler,
            session,
            last_update: None,
        }
    }

    /// Process one answer event and draw the next question
    pub fn next(&mut self, event: AnswerEvent) -> Result<NextQuestion, EngineError> {
        let mut store = self.persistence.load()?;

        if let Some(previous) = event.previous.as_deref() {
            // Session changes are committed only once the table is saved
            let mut session = self.session.clone();
            let outcome = self
                .scheduler
                .apply_answer(&mut store, &mut session, previous, event.response.as_deref())
                .inspect_err(|e| warn!(previous, "Answer rejected: {}", e))?;
            self.persistence
                .save(&store)
                .inspect_err(|e| warn!(previous, "Save failed, answer dropped: {}", e))?;
            self.session = session;
            self.last_update = Some(outcome);
        }

        let draw = self.scheduler.draw(&store, &mut self.session)?;
        Ok(draw.into())
    }

    /// Counts over the persisted store
    pub fn stats(&self) -> Result<StoreStats, EngineError> {
        let store = self.persistence.load()?;
        Ok(store.stats(self.scheduler.config().required_streak))
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Outcome of the most recent answer event
    pub fn last_update(&self) -> Option<&UpdateOutcome> {
        self.last_update.as_ref()
    }

    pub fn storage_description(&self) -> String {
        self.persistence.describe()
    }
}
