//! Journey: mastery updates and progressive unlock
//!
//! Streak growth, compression, confusable resets and pool expansion as
//! observed through the persisted table.

use drill_core::{AnswerEvent, SchedulerConfig};
use drill_e2e_tests::{TestDataFactory, TestStoreManager};

fn config(correct_step: usize) -> SchedulerConfig {
    SchedulerConfig {
        correct_step,
        required_streak: 3,
        ..Default::default()
    }
}

#[test]
fn test_streak_compression_then_expansion() {
    let table = TestStoreManager::new_temp();
    let scenario = TestDataFactory::scenario_store();
    table.seed(scenario.store);
    let mut engine = table.engine(config(5), 1);

    engine.next(AnswerEvent::start()).unwrap();
    for _ in 0..3 {
        engine.next(AnswerEvent::correct("Q1")).unwrap();
    }
    // Q1 is the only mastered item, so compression holds it at the threshold
    assert_eq!(table.item("Q1").consec, 3);
    assert_eq!(table.item("Q2").consec, 0);
    assert!(!table.item("Q3").mask, "Q2 is not mastered yet");

    engine.next(AnswerEvent::correct("Q2")).unwrap();
    engine.next(AnswerEvent::correct("Q2")).unwrap();
    assert!(!table.item("Q3").mask);
    engine.next(AnswerEvent::correct("Q2")).unwrap();

    // Pool grows by min(step, remaining)
    assert!(table.item("Q3").mask);
    assert_eq!(table.stats(3).active, 3);
    assert_eq!(engine.last_update().unwrap().unlocked, 1);
}

#[test]
fn test_compression_keeps_levels_dense() {
    let table = TestStoreManager::new_temp();
    table.seed(TestDataFactory::mastered_pool(6, 4, 3));
    let mut engine = table.engine(config(2), 3);

    // q0/q2 at 3, q1/q3 at 4; pushing q1 to 5 leaves levels {3, 4, 5}
    engine.next(AnswerEvent::correct("q1")).unwrap();
    let store = table.load();
    let mut levels: Vec<u32> = store.iter().filter(|i| i.consec >= 3).map(|i| i.consec).collect();
    levels.sort_unstable();
    levels.dedup();
    assert_eq!(levels, vec![3, 4, 5]);
}

#[test]
fn test_expansion_size_for_many_pools() {
    for (total, active, step) in [(10, 3, 2), (10, 9, 5), (8, 7, 1), (20, 5, 15), (6, 5, 3)] {
        let table = TestStoreManager::new_temp();
        table.seed(TestDataFactory::mastered_pool(total, active, 3));
        let mut engine = table.engine(config(step), 5);

        engine.next(AnswerEvent::correct("q0")).unwrap();
        assert_eq!(
            table.stats(3).active,
            (active + step).min(total),
            "total {} active {} step {}",
            total,
            active,
            step
        );
    }
}

#[test]
fn test_full_pool_never_expands() {
    let table = TestStoreManager::new_temp();
    table.seed(TestDataFactory::mastered_pool(4, 4, 3));
    let mut engine = table.engine(config(2), 5);
    engine.next(AnswerEvent::correct("q0")).unwrap();
    assert_eq!(table.stats(3).active, 4);
    assert_eq!(engine.last_update().unwrap().unlocked, 0);
}

#[test]
fn test_mistake_blocks_expansion() {
    let table = TestStoreManager::new_temp();
    table.seed(TestDataFactory::mastered_pool(10, 4, 3));
    let mut engine = table.engine(config(2), 5);

    engine.next(AnswerEvent::incorrect("q0", "nonsense")).unwrap();
    assert_eq!(table.item("q0").consec, 0);
    assert_eq!(table.stats(3).active, 4);
}

#[test]
fn test_confusable_reset() {
    let table = TestStoreManager::new_temp();
    let scenario = TestDataFactory::confusable_scenario();
    let response = scenario.metadata["wrong_response"].clone();
    table.seed(scenario.store);
    let mut engine = table.engine(config(2), 5);

    engine.next(AnswerEvent::incorrect("A", response)).unwrap();
    assert_eq!(table.item("A").consec, 0);
    assert_eq!(table.item("B").consec, 0);
    assert_eq!(table.item("C").consec, 1);
    // Locked items keep their state even when the answer matches
    assert_eq!(table.item("D").consec, 3);
    assert_eq!(engine.last_update().unwrap().confused, vec!["B".to_string()]);
}

#[test]
fn test_kana_twins_confused() {
    let table = TestStoreManager::new_temp();
    let mut store = TestDataFactory::kana_store(14);
    // Give き a streak, then answer か with き's romaji
    store = drill_core::ItemStore::from_items(
        store
            .iter()
            .cloned()
            .map(|i| if i.answer == "ki" { i.with_consec(2) } else { i })
            .collect(),
    )
    .unwrap();
    table.seed(store);
    let mut engine = table.engine(config(2), 5);

    engine.next(AnswerEvent::incorrect("か", "ki")).unwrap();
    assert_eq!(table.item("き").consec, 0);
    assert_eq!(table.item("キ").consec, 0);
}

#[test]
fn test_no_immediate_repeat_with_mixed_answers() {
    let table = TestStoreManager::new_temp();
    table.seed(TestDataFactory::kana_store(8));
    let mut engine = table.engine(config(2), 99);

    let mut next = engine.next(AnswerEvent::start()).unwrap();
    for step in 0..500 {
        let previous = next.question.clone();
        let event = if step % 3 == 0 {
            AnswerEvent::incorrect(&previous, "wrong")
        } else {
            AnswerEvent::correct(&previous)
        };
        next = engine.next(event).unwrap();
        assert_ne!(next.question, previous);
    }
}
