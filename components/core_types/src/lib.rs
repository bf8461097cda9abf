//! Core Types - Handle identities and error types for the Domingo binding
//!
//! This component provides:
//! - Native handle identities and the closed set of handle kinds
//! - Recycle-priority and release-exception tables derived from the
//!   native containment hierarchy
//! - Runtime version detection for recycler strategy selection
//! - Error types shared across components

pub mod error;
pub mod handle;
pub mod version;

// Re-export main types
pub use error::NotesError;
pub use handle::{HandleKind, NativeHandle, BUCKET_COUNT};
pub use version::RuntimeVersion;
