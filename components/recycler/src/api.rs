//! Upstream boundary: the opaque native resource API.
//!
//! The engine needs exactly three things from the native runtime: its
//! version (for strategy selection), one create-handle operation per entity
//! type, and one release operation per handle. Everything else the binding
//! does with a handle happens in the data-access proxies and is invisible
//! here.

use core_types::{HandleKind, NativeHandle, NotesError, RuntimeVersion};

/// Interface to the backing native runtime.
///
/// Implementations must be callable from any thread holding a reference;
/// the engine's queue drains may run from whichever thread last dropped a
/// wrapper.
pub trait NativeApi: Send + Sync {
    /// Returns the version the native runtime reports.
    fn version(&self) -> RuntimeVersion;

    /// Creates (or looks up) a native object and returns its handle.
    ///
    /// # Arguments
    ///
    /// * `parent` - Containing handle, absent only for sessions
    /// * `kind` - Kind of object to create
    /// * `name` - Name or selector within the container (may be empty)
    fn create(
        &self,
        parent: Option<NativeHandle>,
        kind: HandleKind,
        name: &str,
    ) -> Result<NativeHandle, NotesError>;

    /// Releases a native handle back to the runtime.
    ///
    /// The engine tolerates failures here: a failed release is logged and
    /// draining continues. Using the handle after a successful release is
    /// undefined behavior in the native layer.
    fn release(&self, handle: NativeHandle) -> Result<(), NotesError>;
}
