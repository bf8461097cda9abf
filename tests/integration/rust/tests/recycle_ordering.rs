//! Recycle Ordering Integration Tests
//!
//! Verifies that queue drains release leaf handles strictly before their
//! containers, for arbitrary enqueue interleavings, and that the release
//! order the native layer sees respects containment end to end.

use std::sync::Arc;

use core_types::{HandleKind, NativeHandle};
use recycler::mock::MockApi;
use recycler::{FactoryConfig, NativeApi, NotesFactory, PendingRecycle, RecycleQueue};

/// Test: a session, two documents, an item and a view enqueued in that
/// order dequeue as item, documents, view, session
#[test]
fn test_mixed_kind_dequeue_order() {
    let queue = RecycleQueue::new();
    let entry = |id, kind| PendingRecycle::new(NativeHandle::new(id, kind), None);

    queue.enqueue(entry(1, HandleKind::Session));
    queue.enqueue(entry(2, HandleKind::Document));
    queue.enqueue(entry(3, HandleKind::Document));
    queue.enqueue(entry(4, HandleKind::Item));
    queue.enqueue(entry(5, HandleKind::View));

    assert_eq!(queue.dequeue().unwrap().handle.id, 4);
    let docs: Vec<u64> = (0..2).map(|_| queue.dequeue().unwrap().handle.id).collect();
    assert!(docs.contains(&2) && docs.contains(&3));
    assert_eq!(queue.dequeue().unwrap().handle.id, 5);
    assert_eq!(queue.dequeue().unwrap().handle.id, 1);
    assert!(queue.dequeue().is_none());
}

/// Test: every enqueue permutation of four mixed kinds drains leaf-first
#[test]
fn test_all_enqueue_permutations_drain_in_priority_order() {
    let kinds = [
        HandleKind::Item,
        HandleKind::Document,
        HandleKind::View,
        HandleKind::Session,
    ];

    // Heap's algorithm over the four indices.
    let mut order = [0usize, 1, 2, 3];
    let mut stack = [0usize; 4];
    let mut permutations = vec![order];
    let mut i = 1;
    while i < 4 {
        if stack[i] < i {
            if i % 2 == 0 {
                order.swap(0, i);
            } else {
                order.swap(stack[i], i);
            }
            permutations.push(order);
            stack[i] += 1;
            i = 1;
        } else {
            stack[i] = 0;
            i += 1;
        }
    }
    assert_eq!(permutations.len(), 24);

    for permutation in permutations {
        let queue = RecycleQueue::new();
        for &index in &permutation {
            let handle = NativeHandle::new(index as u64 + 1, kinds[index]);
            queue.enqueue(PendingRecycle::new(handle, None));
        }

        let mut last_bucket = 0;
        while let Some(entry) = queue.dequeue() {
            let bucket = entry.handle.kind.recycle_bucket();
            assert!(
                bucket >= last_bucket,
                "bucket order violated for permutation {:?}",
                permutation
            );
            last_bucket = bucket;
        }
    }
}

/// Test: the release order the native layer sees respects containment even
/// when containers are dropped before their contents
#[test]
fn test_native_release_order_respects_containment() {
    let api = Arc::new(MockApi::new());
    let factory = NotesFactory::new(api.clone(), FactoryConfig::default());

    let s_handle = api.create(None, HandleKind::Session, "").unwrap();
    let session = factory.instance(None, s_handle);
    let db_handle = api
        .create(Some(s_handle), HandleKind::Database, "mail.nsf")
        .unwrap();
    let db = factory.instance(Some(Arc::clone(&session)), db_handle);
    let doc_handle = api.create(Some(db_handle), HandleKind::Document, "").unwrap();
    let doc = factory.instance(Some(Arc::clone(&db)), doc_handle);
    let entry_handle = api
        .create(Some(db_handle), HandleKind::ViewEntry, "")
        .unwrap();
    let entry = factory.instance(Some(Arc::clone(&db)), entry_handle);

    // Container wrappers dropped first; parent back-references keep their
    // proxies alive until the leaves go.
    drop(db);
    drop(session);
    drop(doc);
    drop(entry);
    factory.drain();

    let order = api.release_order();
    assert_eq!(order.len(), 4);
    let position = |h: NativeHandle| order.iter().position(|o| *o == h).unwrap();
    assert!(position(entry_handle) < position(db_handle));
    assert!(position(doc_handle) < position(db_handle));
    assert!(position(db_handle) < position(s_handle));
    assert_eq!(api.outstanding(), 0);

    // The mock rejects out-of-order releases outright, so a full order
    // vector doubles as proof no release failed.
    assert_eq!(factory.stats().failed(), 0);
}
