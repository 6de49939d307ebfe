//! SQLite Storage Implementation
//!
//! One `items` table ordered by `position`; saves replace the table inside
//! a single transaction.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{Connection, params};
use tracing::debug;

use super::{Persistence, Result, StorageError};
use crate::store::{Item, ItemStore, StoreError};

/// SQLite-backed store
pub struct SqliteStorage {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl SqliteStorage {
    /// Apply PRAGMAs to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = FULL;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }

    /// Open (or create) the database at `path` and migrate it
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;

        // Restrict database file permissions to owner-only on Unix
        #[cfg(unix)]
        if path.exists() {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&path, perms);
        }

        Self::configure_connection(&conn)?;
        super::migrations::apply_migrations(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Init("Database lock poisoned".to_string()))
    }
}

fn corrupt(row: usize, column: &'static str, reason: impl Into<String>) -> StoreError {
    StoreError::CorruptState {
        row,
        column,
        reason: reason.into(),
    }
}

impl Persistence for SqliteStorage {
    fn load(&self) -> Result<ItemStore> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT question, answer, consec, mask FROM items ORDER BY position")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<i64>>(2)?,
                row.get::<_, Option<i64>>(3)?,
            ))
        })?;

        let mut items = Vec::new();
        for (i, row) in rows.enumerate() {
            let (question, answer, consec, mask) = row?;
            let row = i + 1;
            let question = question.ok_or_else(|| corrupt(row, "question", "null value"))?;
            let answer = answer.ok_or_else(|| corrupt(row, "answer", "null value"))?;
            let consec = consec.ok_or_else(|| corrupt(row, "consec", "null value"))?;
            let consec = u32::try_from(consec)
                .map_err(|_| corrupt(row, "consec", format!("out of range: {}", consec)))?;
            let mask = match mask {
                Some(0) => false,
                Some(1) => true,
                Some(other) => return Err(corrupt(row, "mask", format!("not a boolean: {}", other)).into()),
                None => return Err(corrupt(row, "mask", "null value").into()),
            };
            items.push(Item {
                question,
                answer,
                consec,
                mask,
            });
        }

        let store = ItemStore::from_items(items)?;
        debug!(path = %self.path.display(), items = store.len(), "Loaded item table");
        Ok(store)
    }

    fn save(&self, store: &ItemStore) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM items", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO items (position, question, answer, consec, mask) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (pos, item) in store.iter().enumerate() {
                stmt.execute(params![
                    pos as i64,
                    item.question,
                    item.answer,
                    item.consec as i64,
                    item.mask as i64
                ])?;
            }
        }
        tx.commit()?;
        debug!(path = %self.path.display(), items = store.len(), "Saved item table");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}
