//! Base wrapper behavior shared by every data-access proxy.
//!
//! A `ProxyObject` represents one native handle to the rest of the binding.
//! It registers in the factory's identity cache at construction and, when
//! the last reference to it is dropped, removes its cache entry and queues
//! its handle for deferred release. Release is never performed synchronously
//! from drop glue: drops may run on arbitrary threads where native calls are
//! not safe, so the handle goes to the recycle queue instead.
//!
//! Lifecycle per wrapper: Active (handle usable) -> PendingRecycle (detached,
//! handle queued) -> Recycled (handle released by a queue drain). Detachment
//! happens either in drop or during forced disposal; whichever comes first
//! wins, the handle is enqueued exactly once.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use core_types::{HandleKind, NativeHandle, NotesError};

use crate::factory::NotesFactory;
use crate::queue::PendingRecycle;

/// Language-side object representing one native handle.
pub struct ProxyObject {
    /// Owning factory; keeps the cache and queue alive past the last wrapper
    factory: Arc<NotesFactory>,
    /// Enclosing wrapper, used only to locate the owning session
    parent: Option<Arc<ProxyObject>>,
    /// The wrapped native handle
    handle: NativeHandle,
    /// Set once recycling has been requested; the handle must not be used after
    detached: AtomicBool,
}

impl ProxyObject {
    pub(crate) fn new(
        factory: Arc<NotesFactory>,
        parent: Option<Arc<ProxyObject>>,
        handle: NativeHandle,
    ) -> Self {
        ProxyObject {
            factory,
            parent,
            handle,
            detached: AtomicBool::new(false),
        }
    }

    /// Returns the kind of the wrapped handle.
    pub fn kind(&self) -> HandleKind {
        self.handle.kind
    }

    /// Returns the wrapped native handle.
    ///
    /// Intended for proxy implementations, not application code. Fails with
    /// `Recycled` once recycling has been requested, which is how misuse
    /// after a forced disposal surfaces.
    pub fn handle(&self) -> Result<NativeHandle, NotesError> {
        if self.detached.load(Ordering::Acquire) {
            Err(NotesError::Recycled(self.handle))
        } else {
            Ok(self.handle)
        }
    }

    /// Returns the enclosing wrapper, if any.
    pub fn parent(&self) -> Option<&Arc<ProxyObject>> {
        self.parent.as_ref()
    }

    /// Returns the factory that owns this wrapper's bookkeeping.
    pub fn factory(&self) -> &Arc<NotesFactory> {
        &self.factory
    }

    /// Returns true once recycling has been requested for this wrapper.
    pub fn is_recycled(&self) -> bool {
        self.detached.load(Ordering::Acquire)
    }

    /// Walks the parent chain to the owning session's handle.
    ///
    /// A session is its own link. Returns `None` for wrappers created
    /// outside a session context (possible for date/time values), which the
    /// recycler treats as unreleasable.
    pub fn session_link(&self) -> Option<NativeHandle> {
        if self.handle.kind == HandleKind::Session {
            return Some(self.handle);
        }
        let mut current = self.parent.clone();
        while let Some(wrapper) = current {
            if wrapper.handle.kind == HandleKind::Session {
                return Some(wrapper.handle);
            }
            current = wrapper.parent.clone();
        }
        None
    }

    /// Marks this wrapper detached and yields its handle, exactly once.
    ///
    /// The first caller (drop glue or forced disposal) gets the handle and
    /// is responsible for queueing it; later callers get `None`.
    pub(crate) fn detach(&self) -> Option<NativeHandle> {
        if self.detached.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(self.handle)
        }
    }
}

impl Drop for ProxyObject {
    fn drop(&mut self) {
        self.factory
            .cache()
            .remove_entry_for(self.handle, self as *const ProxyObject);
        if let Some(handle) = self.detach() {
            let session = self.session_link();
            self.factory
                .recycle_later(PendingRecycle::new(handle, session));
        }
    }
}

impl fmt::Display for ProxyObject {
    /// Renders the handle identity, e.g. `Document(#12)`.
    ///
    /// Works from the copied identity alone, so the form stays stable after
    /// the native object is gone.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.handle)
    }
}

impl fmt::Debug for ProxyObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyObject")
            .field("handle", &self.handle)
            .field("detached", &self.is_recycled())
            .finish()
    }
}
