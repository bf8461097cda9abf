//! Session Teardown Integration Tests
//!
//! Verifies weak and forced disposal semantics, bounded retry behavior and
//! the exception tables across full sessions.

use std::sync::Arc;
use std::time::{Duration, Instant};

use core_types::{HandleKind, NotesError};
use notes_model::Session;
use recycler::mock::MockApi;
use recycler::{FactoryConfig, NativeApi, NotesFactory};

fn quick_config() -> FactoryConfig {
    FactoryConfig {
        dispose_retries: 3,
        dispose_interval_ms: 2,
        ..FactoryConfig::default()
    }
}

/// Test: weak disposal reclaims dropped wrappers only and terminates within
/// its retry bound when live wrappers remain
#[test]
fn test_weak_disposal_bounded_and_partial() {
    let api = Arc::new(MockApi::new());
    let session = Session::connect(api.clone(), quick_config()).unwrap();
    let held = session.database("held.nsf").unwrap();
    let dropped = session.database("dropped.nsf").unwrap();
    drop(dropped);

    let start = Instant::now();
    let report = session.dispose(false);

    // Terminates within retries * interval, generously padded.
    assert!(start.elapsed() < Duration::from_secs(1));
    // The dropped database went; the held one and the session stayed.
    assert_eq!(report.undisposed, 2);
    assert_eq!(api.outstanding(), 2);

    // The survivor is still fully usable.
    assert!(held.document().is_ok());
}

/// Test: forced disposal empties cache and queue for a mixed population of
/// live and already-dropped wrappers
#[test]
fn test_forced_disposal_completeness() {
    let api = Arc::new(MockApi::new());
    let session = Session::connect(api.clone(), FactoryConfig::default()).unwrap();

    let db = session.database("mail.nsf").unwrap();
    let view = db.view("($Inbox)").unwrap();
    let doc = db.document().unwrap();
    drop(view); // dangling: queued but not yet drained

    let report = session.dispose(true);
    assert_eq!(report.undisposed, 0);
    assert!(session.factory().cache().is_empty());
    assert!(session.factory().queue().is_empty());
    assert_eq!(api.outstanding(), 0);

    // Survivors the application still holds are dead to use, by its own
    // doing.
    assert!(matches!(
        doc.item("Subject").unwrap_err(),
        NotesError::Recycled(_)
    ));
    assert!(matches!(db.document().unwrap_err(), NotesError::Recycled(_)));
}

/// Test: never-release kinds survive any number of enqueue/drain cycles
/// without a native release call
#[test]
fn test_exception_kinds_skip_release_across_cycles() {
    let api = Arc::new(MockApi::new());
    let factory = NotesFactory::new(api.clone(), FactoryConfig::default());
    let s_handle = api.create(None, HandleKind::Session, "").unwrap();
    let session = factory.instance(None, s_handle);

    for _ in 0..5 {
        let item_handle = api.create(Some(s_handle), HandleKind::Item, "Body").unwrap();
        let item = factory.instance(Some(Arc::clone(&session)), item_handle);
        drop(item);
        factory.drain();
        assert!(api.is_live(item_handle));
    }
    assert!(api
        .release_order()
        .iter()
        .all(|h| h.kind != HandleKind::Item));
    assert_eq!(factory.stats().skipped(), 5);
}

/// Test: draining an empty queue repeatedly is a no-op
#[test]
fn test_idempotent_drain() {
    let api = Arc::new(MockApi::new());
    let factory = NotesFactory::new(api.clone(), FactoryConfig::default());
    for _ in 0..3 {
        assert_eq!(factory.drain(), 0);
    }
    let report = factory.dispose(false);
    assert_eq!(report.undisposed, 0);
}

/// Test: an orphaned date/time value is skipped, not an error, and the
/// session still tears down cleanly
#[test]
fn test_orphaned_date_time_does_not_poison_disposal() {
    let api = Arc::new(MockApi::new());
    let factory = NotesFactory::new(api.clone(), FactoryConfig::default());

    // Created outside any session context: no parent, no session link.
    let orphan_handle = api.create(None, HandleKind::DateTime, "").unwrap();
    let orphan = factory.instance(None, orphan_handle);
    let s_handle = api.create(None, HandleKind::Session, "").unwrap();
    let _session = factory.instance(None, s_handle);

    drop(orphan);
    let report = factory.dispose(true);

    assert_eq!(report.undisposed, 0);
    // The orphan could not be released; everything else went.
    assert!(api.is_live(orphan_handle));
    assert!(!api.is_live(s_handle));
    assert!(factory.stats().skipped() >= 1);
    assert_eq!(factory.stats().failed(), 0);
}

/// Test: pre-R5 runtimes never see a release call but teardown still
/// completes normally
#[test]
fn test_noop_strategy_on_old_runtime() {
    let api = Arc::new(MockApi::with_version(4, 6));
    let session = Session::connect(api.clone(), FactoryConfig::default()).unwrap();
    let db = session.database("mail.nsf").unwrap();
    drop(db);

    let report = session.dispose(true);
    assert_eq!(report.undisposed, 0);
    assert!(api.release_order().is_empty());
    // Handles stay live in the mock; the old runtime reclaims them itself
    // at session end.
    assert_eq!(api.outstanding(), 2);
}
