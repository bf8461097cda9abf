//! Error types shared across the binding.
//!
//! Release failures inside the recycling engine are logged and swallowed
//! there (a failed release must never abort a queue drain); these types
//! surface at the public wrapper API, where native calls fail for ordinary
//! reasons or because a wrapper outlived a forced disposal.

use thiserror::Error;

use crate::handle::{HandleKind, NativeHandle};

/// Error raised by the binding or translated from the native layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotesError {
    /// A native call failed.
    #[error("native call failed for {kind}(#{id}): {reason}")]
    Native {
        /// Kind of the handle the call was made against
        kind: HandleKind,
        /// Native identity of that handle
        id: u64,
        /// Reason reported by the native layer
        reason: String,
    },

    /// A wrapper was used after its handle had been detached or released.
    ///
    /// This happens when application code holds a wrapper across a forced
    /// disposal and then invokes a method on it; the application caused it
    /// by not releasing its references first.
    #[error("{0} has already been recycled")]
    Recycled(NativeHandle),

    /// A date/time handle has no owning session and cannot be released.
    #[error("{kind}(#{id}) has no owning session")]
    MissingSessionLink {
        /// Kind of the orphaned handle
        kind: HandleKind,
        /// Native identity of that handle
        id: u64,
    },

    /// A named child object does not exist in its container.
    #[error("object not found: {0}")]
    NotFound(String),
}

impl NotesError {
    /// Builds a `Native` error for a failed call against `handle`.
    pub fn native(handle: NativeHandle, reason: impl Into<String>) -> Self {
        NotesError::Native {
            kind: handle.kind,
            id: handle.id,
            reason: reason.into(),
        }
    }
}
