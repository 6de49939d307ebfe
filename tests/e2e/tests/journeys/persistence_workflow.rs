//! Journey: persistence across requests and restarts
//!
//! The table on disk is the only state that outlives a request. These
//! journeys check it round-trips exactly, that failed requests leave it
//! alone, and that both backends behave the same.

use drill_core::{AnswerEvent, Bank, DEFAULT_INITIAL_UNLOCK, EngineError, SchedulerConfig};
use drill_e2e_tests::{Backend, TestDataFactory, TestStoreManager};

#[test]
fn test_reload_without_events_is_byte_identical() {
    let table = TestStoreManager::new_temp();
    table.seed(TestDataFactory::kana_store(10));
    let before = table.raw();

    for _ in 0..3 {
        let store = table.load();
        table.seed(store);
        assert_eq!(table.raw(), before);
    }
}

#[test]
fn test_first_draw_leaves_table_untouched() {
    let table = TestStoreManager::new_temp();
    table.seed(TestDataFactory::kana_store(10));
    let before = table.raw();

    let mut engine = table.engine(SchedulerConfig::default(), 4);
    engine.next(AnswerEvent::start()).unwrap();
    assert_eq!(table.raw(), before);
}

#[test]
fn test_failed_request_keeps_last_snapshot() {
    let mut table = TestStoreManager::new_temp();
    table.seed(TestDataFactory::kana_store(10));
    table.take_snapshot();
    let before = table.raw();

    let mut engine = table.engine(SchedulerConfig::default(), 4);
    let err = engine.next(AnswerEvent::correct("not in the table")).unwrap_err();
    assert!(matches!(err, EngineError::Scheduler(_)));
    assert_eq!(table.raw(), before);

    // The engine keeps working after a rejected event
    engine.next(AnswerEvent::correct("あ")).unwrap();
    assert_eq!(table.item("あ").consec, 1);

    assert!(table.restore_snapshot());
    assert_eq!(table.raw(), before);
}

#[test]
fn test_corrupt_table_rejected_whole() {
    let table = TestStoreManager::new_temp();
    table.overwrite_raw("question,answer,consec,mask\nあ,a,1,True\nい,i,NaN,True\n");
    let before = table.raw();

    let mut engine = table.engine(SchedulerConfig::default(), 4);
    let err = engine.next(AnswerEvent::correct("あ")).unwrap_err();
    assert!(matches!(err, EngineError::Storage(_)));
    assert_eq!(table.raw(), before);
}

#[test]
fn test_restart_resumes_from_disk() {
    let table = TestStoreManager::new_temp();
    table.seed(TestDataFactory::scenario_store().store);

    {
        let mut engine = table.engine(SchedulerConfig::default(), 1);
        engine.next(AnswerEvent::correct("Q2")).unwrap();
        engine.next(AnswerEvent::correct("Q2")).unwrap();
    }

    // New process: no previous marker, state comes from the table
    let mut engine = table.engine(SchedulerConfig::default(), 2);
    assert!(engine.session().previous().is_none());
    assert_eq!(engine.stats().unwrap().levels.get(&2), Some(&2));
    engine.next(AnswerEvent::start()).unwrap();
    engine.next(AnswerEvent::correct("Q2")).unwrap();
    assert_eq!(table.item("Q2").consec, 3);
}

#[test]
fn test_backends_produce_same_session() {
    let csv = TestStoreManager::new_temp_with(Backend::Csv);
    let sqlite = TestStoreManager::new_temp_with(Backend::Sqlite);
    for table in [&csv, &sqlite] {
        table.seed(TestDataFactory::kana_store(10));
    }

    let mut csv_engine = csv.engine(SchedulerConfig::default(), 1234);
    let mut sqlite_engine = sqlite.engine(SchedulerConfig::default(), 1234);

    let mut a = csv_engine.next(AnswerEvent::start()).unwrap();
    let mut b = sqlite_engine.next(AnswerEvent::start()).unwrap();
    for step in 0..200 {
        assert_eq!(a, b, "diverged at step {}", step);
        let event = if step % 4 == 0 {
            AnswerEvent::incorrect(&a.question, "ka")
        } else {
            AnswerEvent::correct(&a.question)
        };
        a = csv_engine.next(event.clone()).unwrap();
        b = sqlite_engine.next(event).unwrap();
    }
    assert_eq!(csv.load(), sqlite.load());
}

#[test]
fn test_import_then_grow_bank() {
    let table = TestStoreManager::new_temp();
    let dir = tempfile::tempdir().unwrap();
    let bank_path = dir.path().join("bank.json");

    std::fs::write(&bank_path, TestDataFactory::bank_json(15)).unwrap();
    let bank = Bank::from_path(&bank_path).unwrap();
    table.seed(bank.into_store(DEFAULT_INITIAL_UNLOCK).unwrap());
    assert_eq!(table.stats(3).active, 10);

    let mut engine = table.engine(SchedulerConfig::default(), 8);
    engine.next(AnswerEvent::correct("q3")).unwrap();

    // The builder grows the bank; progress on known items survives
    std::fs::write(&bank_path, TestDataFactory::bank_json(20)).unwrap();
    let bank = Bank::from_path(&bank_path).unwrap();
    let mut store = table.load();
    let added = store.merge_bank(&bank).unwrap();
    assert_eq!(added.len(), 5);
    table.seed(store);

    assert_eq!(table.item_count(), 20);
    assert_eq!(table.item("q3").consec, 1);
    assert!(!table.item("q19").mask);
    assert_eq!(table.stats(3).active, 10);
}

#[test]
fn test_bidirectional_bank_import() {
    let table = TestStoreManager::new_temp_sqlite();
    let bank = Bank::from_json(
        r#"[{"question": "falo", "answer": "I speak"}, {"question": "falas", "answer": "you speak"}]"#,
    )
    .unwrap()
    .bidirectional()
    .unwrap();
    table.seed(bank.into_store(3).unwrap());

    let store = table.load();
    let order: Vec<&str> = store.iter().map(|i| i.question.as_str()).collect();
    assert_eq!(order, vec!["falo", "I speak", "falas", "you speak"]);
    assert_eq!(store.active_count(), 3);
}
