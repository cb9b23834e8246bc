use application::attempt_service::DailyAttemptTracker;
use application::progress_service::ProgressTracker;
use chrono::NaiveDate;
use domain::attempt_policy::{attempts_key, completion_key, AttemptStatus, LockReason};
use domain::error::AttemptError;
use domain::models::PerformanceLevel;
use domain::storage::KeyValueStore;
use infrastructure::memory_store::MemoryStore;
use std::sync::Arc;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

#[test]
fn third_attempt_is_locked_without_increment() {
    let store = Arc::new(MemoryStore::new());
    let tracker = DailyAttemptTracker::new(store.clone(), "Grammar");

    assert_eq!(tracker.record_attempt(day(19)).unwrap(), 1);
    assert_eq!(tracker.record_attempt(day(19)).unwrap(), 2);
    let before = store.get(&attempts_key("grammar", day(19))).unwrap();

    let err = tracker.record_attempt(day(19)).unwrap_err();

    assert!(matches!(err, AttemptError::Locked(LockReason::AttemptsExhausted)));
    assert_eq!(store.get(&attempts_key("grammar", day(19))).unwrap(), before);
    assert_eq!(
        tracker.status(day(19)).unwrap(),
        AttemptStatus::Locked(LockReason::AttemptsExhausted)
    );
}

#[test]
fn completion_locks_the_rest_of_the_day() {
    let tracker = DailyAttemptTracker::new(Arc::new(MemoryStore::new()), "quiz");
    tracker.record_attempt(day(19)).unwrap();
    tracker.mark_completed(day(19)).unwrap();

    assert!(matches!(
        tracker.record_attempt(day(19)),
        Err(AttemptError::Locked(LockReason::CompletedToday))
    ));
    assert_eq!(
        tracker.status(day(20)).unwrap(),
        AttemptStatus::Open { attempts: 0, remaining: 2 }
    );
}

#[test]
fn a_new_day_clears_yesterday() {
    let store = Arc::new(MemoryStore::new());
    let tracker = DailyAttemptTracker::new(store.clone(), "grammar");
    tracker.record_attempt(day(18)).unwrap();
    tracker.mark_completed(day(18)).unwrap();
    assert_eq!(store.len(), 2);

    assert!(!tracker.status(day(19)).unwrap().is_locked());

    assert_eq!(store.get(&attempts_key("grammar", day(18))).unwrap(), None);
    assert_eq!(store.get(&completion_key("grammar", day(18))).unwrap(), None);
}

#[test]
fn attempt_keys_use_the_calendar_day_label() {
    let store = Arc::new(MemoryStore::new());
    DailyAttemptTracker::new(store.clone(), "grammar")
        .record_attempt(day(19))
        .unwrap();

    let raw = store.get("grammar-attempts-Mon Oct 19 2026").unwrap().unwrap();
    let record: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(record["attempts"], 1);
}

#[test]
fn progress_is_clamped_per_subject() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let tracker = ProgressTracker::new(store.clone());

    assert_eq!(tracker.update_progress("fractions", 0.75, Some("mathematics")).unwrap(), 0.75);
    assert_eq!(tracker.update_progress("fractions", 0.5, Some("mathematics")).unwrap(), 1.0);
    assert_eq!(tracker.update_progress("fractions", -2.0, None).unwrap(), 0.0);

    let scores = tracker.progress();
    assert_eq!(scores["eduChat:progress:mathematics:fractions"], 1.0);
    assert_eq!(scores["eduChat:progress:general:fractions"], 0.0);

    store.set("eduChat:progress", "garbage").unwrap();
    assert!(tracker.progress().is_empty());
}

#[test]
fn performance_levels_are_stored_by_subject_name() {
    let tracker = ProgressTracker::new(Arc::new(MemoryStore::new()));
    assert_eq!(tracker.performance_for("Physics"), None);

    tracker.set_performance("Physics", PerformanceLevel::Weak).unwrap();
    tracker.set_performance("History", PerformanceLevel::Good).unwrap();

    assert_eq!(tracker.performance_for("Physics"), Some(PerformanceLevel::Weak));
    assert_eq!(tracker.performance_for("History"), Some(PerformanceLevel::Good));
}
