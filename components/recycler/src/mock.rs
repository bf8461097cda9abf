//! In-memory stand-in for the native runtime, used throughout the tests.
//!
//! Tracks which handles are live, records the order of release calls, and
//! enforces the native containment rule: a container cannot be released
//! while releasable handles it contains are still live. Kinds the engine
//! never releases (items, embedded objects) are reclaimed implicitly with
//! their container, as the real runtime does.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use core_types::{HandleKind, NativeHandle, NotesError, RuntimeVersion};

use crate::api::NativeApi;

/// Test double for [`NativeApi`].
pub struct MockApi {
    version: RuntimeVersion,
    next_id: AtomicU64,
    /// Live handles: id -> (kind, parent id)
    live: Mutex<HashMap<u64, (HandleKind, Option<u64>)>>,
    /// Handles in the order the release call accepted them
    release_order: Mutex<Vec<NativeHandle>>,
    /// Ids whose next release fails (consumed on use)
    fail_release: Mutex<HashSet<u64>>,
    /// Names for which create reports "not found"
    denied: Mutex<HashSet<String>>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApi {
    /// Creates a mock reporting a modern runtime (6.5).
    pub fn new() -> Self {
        Self::with_version(6, 5)
    }

    /// Creates a mock reporting the given runtime version.
    pub fn with_version(major: u16, minor: u16) -> Self {
        MockApi {
            version: RuntimeVersion::new(major, minor),
            next_id: AtomicU64::new(0),
            live: Mutex::new(HashMap::new()),
            release_order: Mutex::new(Vec::new()),
            fail_release: Mutex::new(HashSet::new()),
            denied: Mutex::new(HashSet::new()),
        }
    }

    /// Number of handles created but not yet released.
    pub fn outstanding(&self) -> usize {
        self.live.lock().len()
    }

    /// Returns true if `handle` has not been released.
    pub fn is_live(&self, handle: NativeHandle) -> bool {
        self.live.lock().contains_key(&handle.id)
    }

    /// The handles accepted by the release call, in call order.
    pub fn release_order(&self) -> Vec<NativeHandle> {
        self.release_order.lock().clone()
    }

    /// Makes the next release of `handle` fail.
    pub fn fail_release_of(&self, handle: NativeHandle) {
        self.fail_release.lock().insert(handle.id);
    }

    /// Makes create calls for `name` report "not found".
    pub fn deny(&self, name: &str) {
        self.denied.lock().insert(name.to_string());
    }

    /// Removes non-releasable descendants of `id` from the live set.
    ///
    /// Mirrors the native runtime reclaiming items and embedded objects
    /// together with their container.
    fn reclaim_managed_children(live: &mut HashMap<u64, (HandleKind, Option<u64>)>, id: u64) {
        let children: Vec<u64> = live
            .iter()
            .filter(|(_, (kind, parent))| *parent == Some(id) && !kind.is_releasable())
            .map(|(child, _)| *child)
            .collect();
        for child in children {
            live.remove(&child);
            Self::reclaim_managed_children(live, child);
        }
    }
}

impl NativeApi for MockApi {
    fn version(&self) -> RuntimeVersion {
        self.version
    }

    fn create(
        &self,
        parent: Option<NativeHandle>,
        kind: HandleKind,
        name: &str,
    ) -> Result<NativeHandle, NotesError> {
        if self.denied.lock().contains(name) {
            return Err(NotesError::NotFound(name.to_string()));
        }
        if let Some(parent) = parent {
            if !self.is_live(parent) {
                return Err(NotesError::native(parent, "parent handle is not live"));
            }
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.live.lock().insert(id, (kind, parent.map(|p| p.id)));
        Ok(NativeHandle::new(id, kind))
    }

    fn release(&self, handle: NativeHandle) -> Result<(), NotesError> {
        if self.fail_release.lock().remove(&handle.id) {
            return Err(NotesError::native(handle, "injected release failure"));
        }

        let mut live = self.live.lock();
        if !live.contains_key(&handle.id) {
            return Err(NotesError::native(handle, "invalid or already released handle"));
        }
        // Containment rule: releasable children must go first.
        if live
            .values()
            .any(|(kind, parent)| *parent == Some(handle.id) && kind.is_releasable())
        {
            return Err(NotesError::native(handle, "contained handles still outstanding"));
        }

        Self::reclaim_managed_children(&mut live, handle.id);
        live.remove(&handle.id);
        self.release_order.lock().push(handle);
        Ok(())
    }
}
