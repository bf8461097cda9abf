//! Notes Model - Data-access wrappers over the lifecycle engine
//!
//! Thin typed wrappers for the native object model (session, database,
//! view, document, item, date/time). Each wrapper is a newtype over the
//! engine's `ProxyObject`: construction goes through the factory's identity
//! cache, every method runs the factory's pre-call hook before touching its
//! native handle, and release happens through the recycle queue when the
//! wrapper is dropped.

pub mod database;
pub mod document;
pub mod session;
pub mod view;

// Re-export main types
pub use database::Database;
pub use document::{DateTime, Document, Item};
pub use session::Session;
pub use view::{View, ViewEntry};
