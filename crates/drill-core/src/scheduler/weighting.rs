//! Weighting over the active pool
//!
//! Candidates are grouped into buckets by streak value. Walking from the
//! lowest streak up, each bucket weighs `1 / weight_rate` times the previous
//! one, so the least-mastered bucket gets the largest share. Items in a
//! bucket split its weight equally.
//!
//! In recency mode the per-item weights come from the session history
//! instead, and bucket weights are the sums of their members.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::SchedulerError;
use super::rollback::SessionHistory;
use crate::config::{SchedulerConfig, WeightingMode};
use crate::store::ItemStore;

/// Allowed drift of a weight vector's sum from 1
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

// ============================================================================
// TYPES
// ============================================================================

/// Candidates sharing one streak value
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub consec: u32,
    /// Store positions of the members, in store order
    pub members: Vec<usize>,
    /// Share of the bucket; buckets sum to 1
    pub weight: f64,
}

/// Per-bucket summary returned with every draw.
///
/// `weight` and `size` are each normalised to sum to 1 over the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketReport {
    pub consec: u32,
    pub weight: f64,
    pub size: f64,
}

/// Weights computed for one draw
#[derive(Debug, Clone)]
pub struct WeightTable {
    /// Buckets ordered by descending streak
    pub buckets: Vec<Bucket>,
    /// `(position, probability)` per candidate, aligned with bucket order
    pub items: Vec<(usize, f64)>,
    /// Members of a bucket all carry the same weight
    pub uniform_within_buckets: bool,
}

impl WeightTable {
    /// Build weights for `candidates` (store positions, non-empty)
    pub fn build(
        store: &ItemStore,
        candidates: &[usize],
        config: &SchedulerConfig,
        history: &SessionHistory,
    ) -> Result<Self, SchedulerError> {
        if candidates.is_empty() {
            return Err(SchedulerError::EmptyPool);
        }

        let mut grouped: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for &pos in candidates {
            grouped.entry(store.items()[pos].consec).or_default().push(pos);
        }

        // Lowest streak starts at 1 and each step up divides by the rate, so
        // long pools underflow toward 0 instead of overflowing.
        let mut buckets: Vec<Bucket> = Vec::with_capacity(grouped.len());
        let mut weight = 1.0;
        for (consec, members) in grouped {
            buckets.push(Bucket {
                consec,
                members,
                weight,
            });
            weight /= config.weight_rate;
        }
        buckets.reverse();
        let total: f64 = buckets.iter().map(|b| b.weight).sum();
        for bucket in &mut buckets {
            bucket.weight /= total;
        }

        let table = match config.weighting {
            WeightingMode::Bucketed => {
                let items = buckets
                    .iter()
                    .flat_map(|b| {
                        let share = b.weight / b.members.len() as f64;
                        b.members.iter().map(move |&pos| (pos, share))
                    })
                    .collect();
                WeightTable {
                    buckets,
                    items,
                    uniform_within_buckets: true,
                }
            }
            WeightingMode::RecencyPenalty => {
                recency_table(store, buckets, config.history_penalty, history)
            }
        };

        table.validate()?;
        Ok(table)
    }

    /// Per-item weights must be finite, non-negative and sum to 1
    fn validate(&self) -> Result<(), SchedulerError> {
        if let Some((pos, w)) = self.items.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(SchedulerError::InvalidWeights(format!(
                "weight {} at position {}",
                w, pos
            )));
        }
        let sum: f64 = self.items.iter().map(|(_, w)| w).sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(SchedulerError::InvalidWeights(format!(
                "weights sum to {}",
                sum
            )));
        }
        Ok(())
    }

    /// Probability of a given store position, 0 if it is not a candidate
    pub fn probability(&self, pos: usize) -> f64 {
        self.items
            .iter()
            .find(|(p, _)| *p == pos)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }

    /// Member weights of one bucket, aligned with `bucket.members`
    pub(crate) fn member_weights(&self, bucket: usize) -> Vec<f64> {
        self.buckets[bucket]
            .members
            .iter()
            .map(|&pos| self.probability(pos))
            .collect()
    }

    /// Per-bucket report with weights and sizes normalised
    pub fn report(&self) -> Vec<BucketReport> {
        let count: usize = self.buckets.iter().map(|b| b.members.len()).sum();
        let weight_total: f64 = self.buckets.iter().map(|b| b.weight).sum();
        self.buckets
            .iter()
            .map(|b| BucketReport {
                consec: b.consec,
                weight: b.weight / weight_total,
                size: b.members.len() as f64 / count as f64,
            })
            .collect()
    }
}

/// Recently seen candidates share `penalty`, the rest share `1 - penalty`,
/// each group split evenly. Falls back to uniform when either group is empty.
fn recency_table(
    store: &ItemStore,
    mut buckets: Vec<Bucket>,
    penalty: f64,
    history: &SessionHistory,
) -> WeightTable {
    let candidates: Vec<usize> = buckets.iter().flat_map(|b| b.members.iter().copied()).collect();
    let recent: Vec<bool> = candidates
        .iter()
        .map(|&pos| history.contains(&store.items()[pos].question))
        .collect();
    let n_recent = recent.iter().filter(|&&r| r).count();
    let n_fresh = candidates.len() - n_recent;

    let items: Vec<(usize, f64)> = if n_recent == 0 || n_fresh == 0 {
        let share = 1.0 / candidates.len() as f64;
        candidates.iter().map(|&pos| (pos, share)).collect()
    } else {
        let recent_share = penalty / n_recent as f64;
        let fresh_share = (1.0 - penalty) / n_fresh as f64;
        candidates
            .iter()
            .zip(&recent)
            .map(|(&pos, &r)| (pos, if r { recent_share } else { fresh_share }))
            .collect()
    };

    let mut offset = 0;
    let mut uniform = true;
    for bucket in &mut buckets {
        let slice = &items[offset..offset + bucket.members.len()];
        bucket.weight = slice.iter().map(|(_, w)| w).sum();
        uniform &= slice.windows(2).all(|w| w[0].1 == w[1].1);
        offset += bucket.members.len();
    }

    WeightTable {
        buckets,
        items,
        uniform_within_buckets: uniform,
    }
}
