//! Question banks
//!
//! A bank is an ordered list of question/answer pairs produced by an
//! external builder. Merging a bank appends only unseen questions, so a
//! grown bank can be re-imported without touching existing progress.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::store::{Item, ItemStore, StoreError};

/// Items unlocked when a store is first created from a bank
pub const DEFAULT_INITIAL_UNLOCK: usize = 10;

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid bank JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The bank lists a question twice
    #[error("Duplicate question in bank: {0}")]
    DuplicateQuestion(String),
    #[error("Empty {field} in bank entry {index}")]
    EmptyField { index: usize, field: &'static str },
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// One question/answer pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankEntry {
    pub question: String,
    pub answer: String,
}

impl BankEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Validated ordered bank with unique questions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bank {
    entries: Vec<BankEntry>,
}

impl Bank {
    pub fn new(entries: Vec<BankEntry>) -> Result<Self, BankError> {
        {
            let mut seen = std::collections::HashSet::with_capacity(entries.len());
            for (index, entry) in entries.iter().enumerate() {
                if entry.question.is_empty() {
                    return Err(BankError::EmptyField { index, field: "question" });
                }
                if entry.answer.is_empty() {
                    return Err(BankError::EmptyField { index, field: "answer" });
                }
                if !seen.insert(entry.question.as_str()) {
                    return Err(BankError::DuplicateQuestion(entry.question.clone()));
                }
            }
        }
        Ok(Self { entries })
    }

    /// Parse a JSON array of `{question, answer}` objects
    pub fn from_json(json: &str) -> Result<Self, BankError> {
        let entries: Vec<BankEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Bank drilling both directions: each pair is followed by its reverse
    pub fn bidirectional(&self) -> Result<Self, BankError> {
        let entries = self
            .entries
            .iter()
            .flat_map(|e| [e.clone(), BankEntry::new(&e.answer, &e.question)])
            .collect();
        Self::new(entries)
    }

    pub fn entries(&self) -> &[BankEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fresh store with the first `initial_unlock` items in play
    pub fn into_store(self, initial_unlock: usize) -> Result<ItemStore, BankError> {
        let mut store = ItemStore::new();
        store.merge_bank(&self)?;
        store.unlock_prefix(initial_unlock);
        Ok(store)
    }
}

impl ItemStore {
    /// Append bank entries whose question is not in the store yet.
    ///
    /// New items start with no streak and outside the pool. Returns the
    /// questions that were added, in bank order.
    pub fn merge_bank(&mut self, bank: &Bank) -> Result<Vec<String>, StoreError> {
        let mut added = Vec::new();
        for entry in bank.entries() {
            if self.contains(&entry.question) {
                continue;
            }
            self.push(Item::new(&entry.question, &entry.answer))?;
            added.push(entry.question.clone());
        }
        if !added.is_empty() {
            info!(added = added.len(), total = self.len(), "Merged question bank");
        }
        Ok(added)
    }
}
