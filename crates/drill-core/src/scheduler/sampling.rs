//! Weighted draws
//!
//! Every draw is a cumulative-distribution lookup against one uniform
//! sample from the session's random source.

use rand::Rng;

use super::weighting::WeightTable;
use crate::config::SamplingStrategy;

/// Index into `weights` drawn proportionally to the weights
pub(crate) fn cumulative_draw<R: Rng + ?Sized>(rng: &mut R, weights: &[f64]) -> usize {
    let total: f64 = weights.iter().sum();
    let target = rng.r#gen::<f64>() * total;
    let mut acc = 0.0;
    for (i, w) in weights.iter().enumerate() {
        acc += w;
        if target < acc {
            return i;
        }
    }
    // Rounding can leave `target` at the very top; take the last live index
    weights.iter().rposition(|&w| w > 0.0).unwrap_or(0)
}

/// Pick a bucket by its weight, then a member within it
fn draw_two_stage<R: Rng + ?Sized>(table: &WeightTable, rng: &mut R) -> usize {
    let bucket_weights: Vec<f64> = table.buckets.iter().map(|b| b.weight).collect();
    let b = cumulative_draw(rng, &bucket_weights);
    let members = &table.buckets[b].members;
    if table.uniform_within_buckets {
        members[rng.gen_range(0..members.len())]
    } else {
        members[cumulative_draw(rng, &table.member_weights(b))]
    }
}

/// Pick straight from the per-item weights
fn draw_direct<R: Rng + ?Sized>(table: &WeightTable, rng: &mut R) -> usize {
    let weights: Vec<f64> = table.items.iter().map(|(_, w)| *w).collect();
    table.items[cumulative_draw(rng, &weights)].0
}

/// Draw one store position from the table
pub(crate) fn draw<R: Rng + ?Sized>(
    table: &WeightTable,
    strategy: SamplingStrategy,
    rng: &mut R,
) -> usize {
    match strategy {
        SamplingStrategy::TwoStage => draw_two_stage(table, rng),
        SamplingStrategy::Direct => draw_direct(table, rng),
    }
}

/// Marginal probability of each candidate under `strategy`
pub fn marginal_probabilities(table: &WeightTable, strategy: SamplingStrategy) -> Vec<(usize, f64)> {
    match strategy {
        SamplingStrategy::Direct => table.items.clone(),
        SamplingStrategy::TwoStage => table
            .buckets
            .iter()
            .enumerate()
            .flat_map(|(b, bucket)| {
                let member_weights = table.member_weights(b);
                let member_total: f64 = member_weights.iter().sum();
                let n = bucket.members.len() as f64;
                let uniform = table.uniform_within_buckets;
                bucket
                    .members
                    .iter()
                    .zip(member_weights)
                    .map(move |(&pos, w)| {
                        let within = if uniform { 1.0 / n } else { w / member_total };
                        (pos, bucket.weight * within)
                    })
                    .collect::<Vec<_>>()
            })
            .collect(),
    }
}
