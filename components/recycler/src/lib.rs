//! Recycler - Native-object lifecycle engine
//!
//! The backing native runtime hands out handles that must be released
//! explicitly, in containment order, to avoid resource exhaustion and
//! crashes. This component provides:
//! - A weak-reference identity cache so one native handle maps to at most
//!   one live wrapper
//! - A priority-bucketed recycle queue that releases leaf handles first and
//!   the session last
//! - Drop-driven deferred recycling of wrapper objects
//! - A factory that triggers proactive recycling before every native call
//!   and staged (weak or forced) disposal at session teardown

pub mod api;
pub mod cache;
pub mod factory;
pub mod mock;
pub mod proxy;
pub mod queue;
pub mod strategy;

// Re-export main types
pub use api::NativeApi;
pub use cache::IdentityCache;
pub use factory::{DisposeReport, FactoryConfig, NotesFactory, RecycleStats};
pub use proxy::ProxyObject;
pub use queue::{PendingRecycle, RecycleQueue};
pub use strategy::{select_strategy, ExplicitRecycler, NoopRecycler, RecycleStrategy, Released};
