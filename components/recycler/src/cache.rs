//! Weak-reference identity cache mapping native handles to wrappers.
//!
//! The cache guarantees at most one live wrapper per native handle: repeated
//! lookups reuse the existing wrapper instead of allocating a duplicate
//! native object. Entries hold only weak references, so the cache never
//! extends a wrapper's lifetime; a cleared weak reference is a miss, not a
//! stale hit. No native calls happen here, this is pure bookkeeping.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use core_types::NativeHandle;

use crate::proxy::ProxyObject;

/// Handle-identity to wrapper map with weak values.
#[derive(Default)]
pub struct IdentityCache {
    entries: Mutex<HashMap<NativeHandle, Weak<ProxyObject>>>,
}

impl IdentityCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        IdentityCache {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Looks up the wrapper for `handle`.
    ///
    /// A cleared weak reference counts as a miss and the dead entry is
    /// removed on the spot.
    pub fn get(&self, handle: NativeHandle) -> Option<Arc<ProxyObject>> {
        let mut entries = self.entries.lock();
        match entries.get(&handle).map(Weak::upgrade) {
            Some(Some(obj)) => Some(obj),
            Some(None) => {
                entries.remove(&handle);
                None
            }
            None => None,
        }
    }

    /// Inserts or replaces the entry for `handle`.
    pub fn put(&self, handle: NativeHandle, wrapper: &Arc<ProxyObject>) {
        self.entries.lock().insert(handle, Arc::downgrade(wrapper));
    }

    /// Removes the entry for `handle`. A no-op when absent.
    pub fn remove(&self, handle: NativeHandle) {
        self.entries.lock().remove(&handle);
    }

    /// Removes the entry for `handle` only if it still refers to `wrapper`.
    ///
    /// Drop glue uses this: a fresh wrapper may already have replaced the
    /// entry, and the late drop of the old one must not evict it.
    pub(crate) fn remove_entry_for(&self, handle: NativeHandle, wrapper: *const ProxyObject) {
        let mut entries = self.entries.lock();
        if let Some(weak) = entries.get(&handle) {
            if std::ptr::eq(weak.as_ptr(), wrapper) {
                entries.remove(&handle);
            }
        }
    }

    /// Returns the number of entries, dead ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if the cache holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Returns strong references to every wrapper still alive.
    ///
    /// Used for diagnostics and for forced shutdown, which must reach
    /// wrappers the application still references.
    pub fn live(&self) -> Vec<Arc<ProxyObject>> {
        self.entries
            .lock()
            .values()
            .filter_map(Weak::upgrade)
            .collect()
    }

    /// Drops entries whose wrapper has been freed.
    ///
    /// # Returns
    ///
    /// The number of dead entries removed.
    pub fn prune(&self) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, weak| weak.strong_count() > 0);
        before - entries.len()
    }

    /// Removes every entry, live or dead.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl std::fmt::Debug for IdentityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityCache")
            .field("entries", &self.len())
            .finish()
    }
}
