//! Storage Module
//!
//! Durable item tables:
//! - CSV file (`question,answer,consec,mask`), replaced atomically on save
//! - SQLite database with versioned migrations
//!
//! Either the full old table or the full new one is observed after a
//! crash; there are no partial-row writes.

mod csv_table;
mod migrations;
mod sqlite;

use std::path::Path;

pub use csv_table::CsvStorage;
pub use migrations::MIGRATIONS;
pub use sqlite::SqliteStorage;

use crate::store::{ItemStore, StoreError};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// CSV encoding or decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Persisted table is corrupted
    #[error("Corrupt store: {0}")]
    Store(#[from] StoreError),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

// ============================================================================
// PERSISTENCE
// ============================================================================

/// Loads and saves the whole item table.
///
/// `load` rejects the entire table on any null or malformed value.
/// `save` overwrites the table in one atomic step.
pub trait Persistence: Send + Sync {
    fn load(&self) -> Result<ItemStore>;

    fn save(&self, store: &ItemStore) -> Result<()>;

    /// Human-readable location for logs
    fn describe(&self) -> String;
}

/// Pick a backend from the file extension: `.db`, `.sqlite` and `.sqlite3`
/// open SQLite, anything else is treated as CSV.
pub fn open_storage(path: impl AsRef<Path>) -> Result<Box<dyn Persistence>> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match ext.as_deref() {
        Some("db") | Some("sqlite") | Some("sqlite3") => {
            Ok(Box::new(SqliteStorage::new(path)?))
        }
        _ => Ok(Box::new(CsvStorage::new(path))),
    }
}
