//! Recycler strategies: how one queued handle gets released.
//!
//! The strategy dispatches on handle kind to the one correct release call,
//! or deliberately skips kinds that must never be released. Which strategy
//! applies is decided once per factory from the native runtime version.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use core_types::NotesError;

use crate::api::NativeApi;
use crate::queue::PendingRecycle;

/// Outcome of a recycle attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Released {
    /// The native release call was made
    Released,
    /// The entry was deliberately not released (exception table or no-op
    /// strategy)
    Skipped,
}

/// Performs the correct release call for one queued handle.
pub trait RecycleStrategy: Send + Sync {
    /// Releases `entry`'s handle, or skips it per the exception tables.
    ///
    /// # Returns
    ///
    /// Whether a native release actually happened. An `Err` means the
    /// native release call itself failed; callers log it and continue
    /// draining, a failed release never aborts the rest of the queue.
    fn recycle(&self, entry: &PendingRecycle) -> Result<Released, NotesError>;
}

/// Strategy for runtimes with an explicit per-object release call (R5+).
pub struct ExplicitRecycler {
    api: Arc<dyn NativeApi>,
    /// Guards the orphaned date/time diagnostic: logged once, not per entry
    orphan_logged: AtomicBool,
}

impl ExplicitRecycler {
    /// Creates a strategy releasing through `api`.
    pub fn new(api: Arc<dyn NativeApi>) -> Self {
        ExplicitRecycler {
            api,
            orphan_logged: AtomicBool::new(false),
        }
    }
}

impl RecycleStrategy for ExplicitRecycler {
    fn recycle(&self, entry: &PendingRecycle) -> Result<Released, NotesError> {
        let handle = entry.handle;

        // Items and embedded objects are managed by their container in the
        // native layer; releasing them explicitly causes errors.
        if !handle.kind.is_releasable() {
            tracing::trace!("skipping release of {} (kind is never released)", handle);
            return Ok(Released::Skipped);
        }

        // Date/time handles without an owning session cannot be released at
        // all. Known native-layer defect, reported once to avoid flooding
        // the log with one line per value.
        if handle.kind.needs_session_link() && entry.session.is_none() {
            if !self.orphan_logged.swap(true, Ordering::Relaxed) {
                let reason = NotesError::MissingSessionLink {
                    kind: handle.kind,
                    id: handle.id,
                };
                tracing::error!(
                    "cannot release: {}; further occurrences will not be logged",
                    reason
                );
            }
            return Ok(Released::Skipped);
        }

        self.api.release(handle)?;
        Ok(Released::Released)
    }
}

/// Strategy for runtimes without an explicit release call.
///
/// Everything is skipped; the native layer reclaims its objects when the
/// session ends.
pub struct NoopRecycler;

impl RecycleStrategy for NoopRecycler {
    fn recycle(&self, entry: &PendingRecycle) -> Result<Released, NotesError> {
        tracing::trace!("runtime reclaims {} at session end", entry.handle);
        Ok(Released::Skipped)
    }
}

/// Selects the strategy matching the native runtime's version.
///
/// Called once per factory; the choice never changes for the factory's
/// lifetime.
pub fn select_strategy(api: &Arc<dyn NativeApi>) -> Box<dyn RecycleStrategy> {
    let version = api.version();
    if version.supports_explicit_recycle() {
        tracing::debug!("runtime {} supports explicit release", version);
        Box::new(ExplicitRecycler::new(Arc::clone(api)))
    } else {
        tracing::debug!("runtime {} predates explicit release, recycling disabled", version);
        Box::new(NoopRecycler)
    }
}
