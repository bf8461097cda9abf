//! Priority-bucketed queue of native handles awaiting release.
//!
//! Wrapper drops may run on any thread, so the drop path pushes into a
//! lock-free inbox and never blocks. Dequeue moves inbox entries into
//! per-kind buckets and drains the buckets in fixed priority order: leaf
//! kinds (items, date/times) first, the session strictly last. Releasing
//! leaf handles before their containers mirrors native containment without
//! tracking explicit dependencies.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam::queue::SegQueue;
use parking_lot::Mutex;

use core_types::{NativeHandle, BUCKET_COUNT};

/// A native handle queued for deferred release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRecycle {
    /// The handle awaiting release
    pub handle: NativeHandle,
    /// Owning-session link, required to release date/time kinds
    pub session: Option<NativeHandle>,
}

impl PendingRecycle {
    /// Creates a queue entry for `handle` with an optional session link.
    pub fn new(handle: NativeHandle, session: Option<NativeHandle>) -> Self {
        PendingRecycle { handle, session }
    }
}

/// Queue of handles pending release, drained in kind-priority order.
pub struct RecycleQueue {
    /// Lock-free inbox fed by wrapper drops on arbitrary threads
    inbox: SegQueue<PendingRecycle>,
    /// Priority buckets, index = `HandleKind::recycle_bucket()`
    buckets: Mutex<[VecDeque<PendingRecycle>; BUCKET_COUNT]>,
    /// Fast emptiness check; avoids taking the bucket lock on the hot path
    pending: AtomicUsize,
}

impl Default for RecycleQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl RecycleQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        RecycleQueue {
            inbox: SegQueue::new(),
            buckets: Mutex::new(std::array::from_fn(|_| VecDeque::new())),
            pending: AtomicUsize::new(0),
        }
    }

    /// Queues a handle for deferred release. O(1), never blocks.
    ///
    /// Safe to call from drop glue on any thread.
    pub fn enqueue(&self, entry: PendingRecycle) {
        self.pending.fetch_add(1, Ordering::Release);
        self.inbox.push(entry);
        tracing::trace!("queued {} for recycling (pending: {})", entry.handle, self.len());
    }

    /// Removes and returns one entry, preferring leaf-kind buckets.
    ///
    /// Returns `None` when all buckets are empty. A session handle is only
    /// returned once every other bucket has been drained.
    pub fn dequeue(&self) -> Option<PendingRecycle> {
        // Fast path: nothing pending anywhere.
        if self.pending.load(Ordering::Acquire) == 0 {
            return None;
        }

        let mut buckets = self.buckets.lock();

        // Classify everything that arrived since the last dequeue.
        while let Some(entry) = self.inbox.pop() {
            buckets[entry.handle.kind.recycle_bucket()].push_back(entry);
        }

        for bucket in buckets.iter_mut() {
            if let Some(entry) = bucket.pop_front() {
                self.pending.fetch_sub(1, Ordering::Release);
                return Some(entry);
            }
        }
        None
    }

    /// Returns the number of entries awaiting release.
    ///
    /// Advisory only: concurrent enqueues may be mid-flight.
    pub fn len(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Returns true if no entries are pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for RecycleQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecycleQueue")
            .field("pending", &self.len())
            .finish()
    }
}
