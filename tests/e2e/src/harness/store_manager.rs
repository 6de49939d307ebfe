//! Test Store Manager
//!
//! Provides isolated item tables for testing:
//! - Temporary CSV or SQLite tables that are cleaned up on drop
//! - Pre-seeded tables
//! - Snapshots and restoration
//! - Engines bound to the managed table

use std::path::{Path, PathBuf};

use drill_core::{
    DrillEngine, Item, ItemStore, Persistence, Scheduler, SchedulerConfig, StoreStats,
    open_storage,
};
use tempfile::TempDir;

/// Which backend a managed table uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Csv,
    Sqlite,
}

impl Backend {
    fn file_name(self) -> &'static str {
        match self {
            Backend::Csv => "test_items.csv",
            Backend::Sqlite => "test_items.db",
        }
    }
}

/// Manager for test item tables
///
/// Each test gets its own table so tests never interfere. The temporary
/// directory is removed when the manager is dropped.
///
/// # Example
///
/// ```rust,ignore
/// let mut table = TestStoreManager::new_temp();
/// table.seed(TestDataFactory::scenario_store());
///
/// let mut engine = table.engine(SchedulerConfig::default(), 42);
/// let next = engine.next(AnswerEvent::start())?;
/// ```
pub struct TestStoreManager {
    /// The storage backend
    pub storage: Box<dyn Persistence>,
    /// Temporary directory (kept alive to prevent premature deletion)
    _temp_dir: Option<TempDir>,
    path: PathBuf,
    snapshot: Option<ItemStore>,
}

impl TestStoreManager {
    /// CSV table in a temporary directory
    pub fn new_temp() -> Self {
        Self::new_temp_with(Backend::Csv)
    }

    /// SQLite table in a temporary directory
    pub fn new_temp_sqlite() -> Self {
        Self::new_temp_with(Backend::Sqlite)
    }

    pub fn new_temp_with(backend: Backend) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(backend.file_name());
        let storage = open_storage(&path).expect("Failed to open test storage");
        let manager = Self {
            storage,
            _temp_dir: Some(temp_dir),
            path,
            snapshot: None,
        };
        manager.seed(ItemStore::new());
        manager
    }

    /// Table at a specific path; NOT deleted on drop
    pub fn new_at_path(path: PathBuf) -> Self {
        let storage = open_storage(&path).expect("Failed to open test storage");
        Self {
            storage,
            _temp_dir: None,
            path,
            snapshot: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw bytes of the table file
    pub fn raw(&self) -> Vec<u8> {
        std::fs::read(&self.path).expect("Failed to read table file")
    }

    pub fn load(&self) -> ItemStore {
        self.storage.load().expect("Failed to load test table")
    }

    pub fn is_empty(&self) -> bool {
        self.storage.load().map(|s| s.is_empty()).unwrap_or(true)
    }

    pub fn item_count(&self) -> usize {
        self.storage.load().map(|s| s.len()).unwrap_or(0)
    }

    pub fn stats(&self, required_streak: u32) -> StoreStats {
        self.load().stats(required_streak)
    }

    pub fn item(&self, question: &str) -> Item {
        self.load()
            .lookup(question)
            .cloned()
            .unwrap_or_else(|e| panic!("{}", e))
    }

    // ========================================================================
    // SEEDING METHODS
    // ========================================================================

    /// Replace the table contents
    pub fn seed(&self, store: ItemStore) {
        self.storage.save(&store).expect("Failed to seed test table");
    }

    /// Seed `count` numbered items with the first `active` in play
    pub fn seed_numbered(&self, count: usize, active: usize) -> Vec<String> {
        let store = crate::mocks::TestDataFactory::numbered_store(count, active);
        let questions = store.iter().map(|i| i.question.clone()).collect();
        self.seed(store);
        questions
    }

    // ========================================================================
    // ENGINES
    // ========================================================================

    /// Seeded engine over this table, with its own backend handle
    pub fn engine(&self, config: SchedulerConfig, seed: u64) -> DrillEngine {
        let storage = open_storage(&self.path).expect("Failed to open test storage");
        DrillEngine::with_seed(storage, config, seed).expect("Invalid test config")
    }

    pub fn scheduler(config: SchedulerConfig) -> Scheduler {
        Scheduler::new(config).expect("Invalid test config")
    }

    // ========================================================================
    // SNAPSHOT/RESTORE
    // ========================================================================

    pub fn take_snapshot(&mut self) {
        self.snapshot = Some(self.load());
    }

    /// Write the last snapshot back; false when none was taken
    pub fn restore_snapshot(&mut self) -> bool {
        match self.snapshot.take() {
            Some(store) => {
                self.seed(store);
                true
            }
            None => false,
        }
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    // ========================================================================
    // CLEANUP
    // ========================================================================

    pub fn clear(&self) {
        self.seed(ItemStore::new());
    }

    /// Corrupt the table file with arbitrary content
    pub fn overwrite_raw(&self, content: &str) {
        std::fs::write(&self.path, content).expect("Failed to overwrite table file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_table_creation() {
        let table = TestStoreManager::new_temp();
        assert!(table.is_empty());
        assert!(table.path().exists());

        let table = TestStoreManager::new_temp_sqlite();
        assert!(table.is_empty());
        assert!(table.path().exists());
    }

    #[test]
    fn test_seed_numbered() {
        let table = TestStoreManager::new_temp();
        let questions = table.seed_numbered(12, 4);
        assert_eq!(questions.len(), 12);
        assert_eq!(table.item_count(), 12);
        assert_eq!(table.stats(3).active, 4);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut table = TestStoreManager::new_temp();
        table.seed_numbered(5, 5);

        table.take_snapshot();
        assert!(table.has_snapshot());

        table.clear();
        assert!(table.is_empty());

        assert!(table.restore_snapshot());
        assert_eq!(table.item_count(), 5);
        assert!(!table.restore_snapshot());
    }
}
