//! Ordered item table with a question index

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::item::Item;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Corrupted store state. Always fatal for the request that hit it.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Two rows share a question identifier
    #[error("Duplicate question: {0}")]
    DuplicateQuestion(String),
    /// Lookup matched no row
    #[error("Question not found: {0}")]
    NotFound(String),
    /// A cell is empty, NaN or unparseable
    #[error("Corrupt state at row {row}, column '{column}': {reason}")]
    CorruptState {
        row: usize,
        column: &'static str,
        reason: String,
    },
    /// A required column is absent from the persisted table
    #[error("Missing column: {0}")]
    MissingColumn(&'static str),
}

// ============================================================================
// STATS
// ============================================================================

/// Snapshot counts over the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total: usize,
    pub active: usize,
    /// Active items at or above the mastery threshold
    pub mastered_active: usize,
    /// Active item count per streak value
    pub levels: BTreeMap<u32, usize>,
}

impl StoreStats {
    /// Fraction of the active pool that meets the threshold
    pub fn mastered_ratio(&self) -> f64 {
        if self.active == 0 {
            0.0
        } else {
            self.mastered_active as f64 / self.active as f64
        }
    }

    /// Fraction of the whole store that is in play
    pub fn active_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.active as f64 / self.total as f64
        }
    }
}

// ============================================================================
// ITEM STORE
// ============================================================================

/// The full ordered collection of items.
///
/// Question identifiers are unique at all times; every constructor and
/// insert path checks it, so the index never disagrees with the rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemStore {
    items: Vec<Item>,
    index: HashMap<String, usize>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from rows in order, rejecting duplicate questions
    pub fn from_items(items: Vec<Item>) -> Result<Self, StoreError> {
        let mut store = Self {
            items: Vec::with_capacity(items.len()),
            index: HashMap::with_capacity(items.len()),
        };
        for item in items {
            store.push(item)?;
        }
        Ok(store)
    }

    /// Append an item at the end of the store order
    pub fn push(&mut self, item: Item) -> Result<(), StoreError> {
        if self.index.contains_key(&item.question) {
            return Err(StoreError::DuplicateQuestion(item.question));
        }
        self.index.insert(item.question.clone(), self.items.len());
        self.items.push(item);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn contains(&self, question: &str) -> bool {
        self.index.contains_key(question)
    }

    /// Position of the unique row for `question`
    pub fn position(&self, question: &str) -> Result<usize, StoreError> {
        self.index
            .get(question)
            .copied()
            .ok_or_else(|| StoreError::NotFound(question.to_string()))
    }

    /// The unique row for `question`; a miss is corrupted state, not a normal miss
    pub fn lookup(&self, question: &str) -> Result<&Item, StoreError> {
        let pos = self.position(question)?;
        Ok(&self.items[pos])
    }

    /// Mutable rows for the scheduler. Questions must not be edited through this.
    pub(crate) fn items_mut(&mut self) -> &mut [Item] {
        &mut self.items
    }

    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|i| i.mask).count()
    }

    /// Positions of masked-in items in store order
    pub fn active_positions(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, i)| i.mask)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Mask in the first `count` rows (clamped to the store size).
    /// Rows already masked in elsewhere stay masked in.
    pub fn unlock_prefix(&mut self, count: usize) {
        let end = count.min(self.items.len());
        for item in &mut self.items[..end] {
            item.mask = true;
        }
    }

    /// Mask in the next `count` masked-out rows in store order.
    /// Returns how many rows were unlocked.
    pub fn unlock_next(&mut self, count: usize) -> usize {
        let mut unlocked = 0;
        for item in self.items.iter_mut().filter(|i| !i.mask).take(count) {
            item.mask = true;
            unlocked += 1;
        }
        unlocked
    }

    /// Keep only the first `keep` masked-in rows in play
    pub fn shrink_active(&mut self, keep: usize) {
        let mut seen = 0;
        for item in self.items.iter_mut().filter(|i| i.mask) {
            if seen >= keep {
                item.mask = false;
            }
            seen += 1;
        }
    }

    pub fn stats(&self, required_streak: u32) -> StoreStats {
        let mut levels = BTreeMap::new();
        let mut active = 0;
        let mut mastered_active = 0;
        for item in self.items.iter().filter(|i| i.mask) {
            active += 1;
            if item.is_mastered(required_streak) {
                mastered_active += 1;
            }
            *levels.entry(item.consec).or_insert(0) += 1;
        }
        StoreStats {
            total: self.items.len(),
            active,
            mastered_active,
            levels,
        }
    }
}
