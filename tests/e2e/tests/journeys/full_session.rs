//! Journey: a full session over a kana table
//!
//! A learner starts from a freshly imported bank and keeps answering until
//! the whole table is in play.

use drill_core::{AnswerEvent, DEFAULT_INITIAL_UNLOCK, SchedulerConfig};
use drill_e2e_tests::{TestDataFactory, TestStoreManager};

#[test]
fn test_perfect_learner_unlocks_whole_table() {
    let table = TestStoreManager::new_temp();
    let bank = TestDataFactory::kana_bank();
    let total = bank.len();
    table.seed(bank.into_store(DEFAULT_INITIAL_UNLOCK).unwrap());

    let config = SchedulerConfig::default();
    let required = config.required_streak;
    let mut engine = table.engine(config, 42);

    let mut next = engine.next(AnswerEvent::start()).unwrap();
    let mut active_seen = vec![table.stats(required).active];
    for _ in 0..3000 {
        let previous = next.question.clone();
        next = engine.next(AnswerEvent::correct(&previous)).unwrap();
        assert_ne!(next.question, previous, "item repeated immediately");
        assert!(table.item(&next.question).mask, "drew an inactive item");

        let active = table.stats(required).active;
        assert!(active >= *active_seen.last().unwrap(), "pool shrank without rollback");
        if active != *active_seen.last().unwrap() {
            active_seen.push(active);
        }
        if active == total && table.stats(required).mastered_active == total {
            break;
        }
    }

    // 10, 15, 20, 25, 30
    assert_eq!(active_seen, vec![10, 15, 20, 25, 30]);
    let stats = table.stats(required);
    assert_eq!(stats.active, total);
    assert_eq!(stats.mastered_active, total);
}

#[test]
fn test_weights_report_tracks_progress() {
    let table = TestStoreManager::new_temp();
    table.seed(TestDataFactory::kana_store(6));
    let mut engine = table.engine(SchedulerConfig::default(), 7);

    let first = engine.next(AnswerEvent::start()).unwrap();
    assert_eq!(first.weights.len(), 1);
    assert_eq!(first.weights[0].consec, 0);
    assert!((first.weights[0].size - 1.0).abs() < 1e-12);

    let second = engine.next(AnswerEvent::correct(&first.question)).unwrap();
    // The answered item now sits alone in a higher bucket, but it is
    // excluded from this draw
    assert_eq!(second.weights.len(), 1);

    let third = engine.next(AnswerEvent::correct(&second.question)).unwrap();
    let consecs: Vec<u32> = third.weights.iter().map(|w| w.consec).collect();
    assert_eq!(consecs, vec![1, 0]);
    assert!(third.weights[1].weight > third.weights[0].weight);
    let sizes: f64 = third.weights.iter().map(|w| w.size).sum();
    assert!((sizes - 1.0).abs() < 1e-12);
}
