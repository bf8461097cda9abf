//! Integration test suite for the Domingo lifecycle engine
//!
//! This crate provides integration tests that verify the identity cache,
//! recycle queue, factory and data-access wrappers work together correctly
//! across component boundaries.

/// Re-export components for test convenience
pub mod components {
    pub use core_types;
    pub use notes_model;
    pub use recycler;
}
