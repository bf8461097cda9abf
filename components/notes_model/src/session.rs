//! Top-level connection to the native runtime.

use std::sync::Arc;

use core_types::{HandleKind, NotesError};
use recycler::{DisposeReport, FactoryConfig, NativeApi, NotesFactory, ProxyObject};

use crate::database::Database;
use crate::document::DateTime;

/// A connection to the native runtime, owner of the lifecycle factory.
///
/// All other wrappers descend from a session; disposing the session (or
/// letting the last wrapper go out of scope with `dispose_on_drop` set)
/// releases every outstanding native handle in containment order.
#[derive(Debug)]
pub struct Session {
    obj: Arc<ProxyObject>,
}

impl Session {
    /// Opens a session against `api`.
    ///
    /// Builds the factory (which fixes the recycler strategy for this
    /// session's lifetime), creates the native session handle and registers
    /// the root wrapper.
    pub fn connect(api: Arc<dyn NativeApi>, config: FactoryConfig) -> Result<Self, NotesError> {
        let factory = NotesFactory::new(api, config);
        let handle = factory.api().create(None, HandleKind::Session, "")?;
        let obj = factory.instance(None, handle);
        tracing::info!("connected {}", obj);
        Ok(Session { obj })
    }

    /// Opens the database at `path`.
    pub fn database(&self, path: &str) -> Result<Database, NotesError> {
        let factory = self.obj.factory();
        factory.preprocess();
        let parent = self.obj.handle()?;
        let handle = factory
            .api()
            .create(Some(parent), HandleKind::Database, path)?;
        Ok(Database::from_parts(
            factory.instance(Some(Arc::clone(&self.obj)), handle),
        ))
    }

    /// Creates a date/time value owned by this session.
    pub fn create_date_time(&self, value: &str) -> Result<DateTime, NotesError> {
        let factory = self.obj.factory();
        factory.preprocess();
        let parent = self.obj.handle()?;
        let handle = factory
            .api()
            .create(Some(parent), HandleKind::DateTime, value)?;
        Ok(DateTime::from_parts(
            factory.instance(Some(Arc::clone(&self.obj)), handle),
        ))
    }

    /// Tears this session down.
    ///
    /// With `force` false only wrappers already dropped by the application
    /// are reclaimed; with `force` true every outstanding wrapper is
    /// detached and released, and later use of one fails with `Recycled`.
    pub fn dispose(&self, force: bool) -> DisposeReport {
        self.obj.factory().dispose(force)
    }

    /// Returns the lifecycle factory owning this session's bookkeeping.
    pub fn factory(&self) -> &Arc<NotesFactory> {
        self.obj.factory()
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.obj)
    }
}
