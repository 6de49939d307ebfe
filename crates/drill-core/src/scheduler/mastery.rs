//! Mastery update rules
//!
//! Applied once per answer event:
//! - Correct: the answered item's streak grows by one, mastered streaks are
//!   compressed and the pool may expand
//! - Incorrect: the answered item and every active item whose answer equals
//!   the literal response lose their streak

use tracing::{debug, info};

use crate::store::ItemStore;

/// Increment the streak of the item at `pos`
pub(crate) fn record_correct(store: &mut ItemStore, pos: usize) -> u32 {
    let item = &mut store.items_mut()[pos];
    item.consec = item.consec.saturating_add(1);
    item.consec
}

/// Reset the answered item and its confusables.
///
/// Returns the questions of the other items that were reset.
pub(crate) fn record_incorrect(store: &mut ItemStore, pos: usize, response: &str) -> Vec<String> {
    let mut confused = Vec::new();
    for (i, item) in store.items_mut().iter_mut().enumerate() {
        if i == pos {
            item.consec = 0;
        } else if item.mask && item.answer == response {
            debug!(question = %item.question, consec = item.consec, "Confusable reset");
            item.consec = 0;
            confused.push(item.question.clone());
        }
    }
    confused
}

/// Renumber every streak at or above `required` to `required + rank`,
/// where `rank` is the position of its value among the distinct mastered
/// values in ascending order. Keeps the mastered levels dense and small.
pub(crate) fn compress_streaks(store: &mut ItemStore, required: u32) {
    let mut levels: Vec<u32> = store
        .iter()
        .filter(|i| i.consec >= required)
        .map(|i| i.consec)
        .collect();
    if levels.is_empty() {
        return;
    }
    levels.sort_unstable();
    levels.dedup();

    for item in store.items_mut().iter_mut().filter(|i| i.consec >= required) {
        let rank = levels.partition_point(|&level| level < item.consec);
        item.consec = required + rank as u32;
    }
}

/// Unlock the next `step` items once every active item is mastered.
///
/// Returns how many items entered the pool.
pub(crate) fn expand_pool(store: &mut ItemStore, required: u32, step: usize) -> usize {
    let active = store.active_count();
    if active == store.len() {
        return 0;
    }
    let all_mastered = store
        .iter()
        .filter(|i| i.mask)
        .all(|i| i.is_mastered(required));
    if !all_mastered {
        return 0;
    }

    let unlocked = store.unlock_next(step);
    info!(
        unlocked,
        active = active + unlocked,
        total = store.len(),
        "Active pool mastered, unlocking new items"
    );
    unlocked
}
