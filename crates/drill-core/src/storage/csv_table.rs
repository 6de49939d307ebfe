//! CSV item table
//!
//! Layout: header `question,answer,consec,mask`, one row per item in store
//! order, booleans as `True`/`False`.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::{Persistence, Result, StorageError};
use crate::store::{Item, ItemStore, StoreError};

const HEADER: [&str; 4] = ["question", "answer", "consec", "mask"];

/// CSV-file backed store
#[derive(Debug, Clone)]
pub struct CsvStorage {
    path: PathBuf,
}

impl CsvStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// Empty cells and `NaN` count as nulls
fn non_null<'a>(value: &'a str, row: usize, column: &'static str) -> std::result::Result<&'a str, StoreError> {
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        return Err(StoreError::CorruptState {
            row,
            column,
            reason: "null value".to_string(),
        });
    }
    Ok(value)
}

fn parse_consec(value: &str, row: usize) -> std::result::Result<u32, StoreError> {
    let value = non_null(value, row, "consec")?;
    if let Ok(n) = value.parse::<u32>() {
        return Ok(n);
    }
    // Float-typed columns write whole numbers as `3.0`
    match value.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => Ok(f as u32),
        _ => Err(StoreError::CorruptState {
            row,
            column: "consec",
            reason: format!("not a non-negative integer: {}", value),
        }),
    }
}

fn parse_mask(value: &str, row: usize) -> std::result::Result<bool, StoreError> {
    match non_null(value, row, "mask")? {
        "True" | "true" | "TRUE" | "1" => Ok(true),
        "False" | "false" | "FALSE" | "0" => Ok(false),
        other => Err(StoreError::CorruptState {
            row,
            column: "mask",
            reason: format!("not a boolean: {}", other),
        }),
    }
}

fn mask_str(mask: bool) -> &'static str {
    if mask { "True" } else { "False" }
}

impl CsvStorage {
    fn read_items(&self) -> Result<Vec<Item>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        let mut columns = [0usize; 4];
        for (slot, name) in columns.iter_mut().zip(HEADER) {
            *slot = headers
                .iter()
                .position(|h| h == name)
                .ok_or(StoreError::MissingColumn(name))?;
        }
        let [q_col, a_col, c_col, m_col] = columns;

        let mut items = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let row = i + 1;
            let field = |col: usize| record.get(col).unwrap_or("");
            items.push(Item {
                question: non_null(field(q_col), row, "question")?.to_string(),
                answer: non_null(field(a_col), row, "answer")?.to_string(),
                consec: parse_consec(field(c_col), row)?,
                mask: parse_mask(field(m_col), row)?,
            });
        }
        Ok(items)
    }
}

impl Persistence for CsvStorage {
    fn load(&self) -> Result<ItemStore> {
        let items = self.read_items()?;
        let store = ItemStore::from_items(items)?;
        debug!(path = %self.path.display(), items = store.len(), "Loaded item table");
        Ok(store)
    }

    fn save(&self, store: &ItemStore) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = csv::WriterBuilder::new()
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(tmp.as_file_mut());
            writer.write_record(HEADER)?;
            for item in store.iter() {
                let consec = item.consec.to_string();
                writer.write_record([
                    item.question.as_str(),
                    item.answer.as_str(),
                    consec.as_str(),
                    mask_str(item.mask),
                ])?;
            }
            writer.flush()?;
        }
        tmp.as_file_mut().flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .map_err(|e| StorageError::Io(e.error))?;

        debug!(path = %self.path.display(), items = store.len(), "Saved item table");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}
