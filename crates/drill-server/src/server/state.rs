//! Server shared state

use std::sync::Arc;

use drill_core::DrillEngine;
use tokio::sync::Mutex;

/// Shared application state.
///
/// One engine for the single learner; the mutex serialises answer events so
/// no two read-modify-write cycles interleave on the item table.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Mutex<DrillEngine>>,
}

impl AppState {
    pub fn new(engine: DrillEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }
}
