//! Wrapper for a single NSF database.

use std::sync::Arc;

use core_types::{HandleKind, NotesError};
use recycler::ProxyObject;

use crate::document::Document;
use crate::view::View;

/// An open database inside a session.
#[derive(Debug)]
pub struct Database {
    obj: Arc<ProxyObject>,
}

impl Database {
    pub(crate) fn from_parts(obj: Arc<ProxyObject>) -> Self {
        Database { obj }
    }

    /// Opens the view named `name`.
    pub fn view(&self, name: &str) -> Result<View, NotesError> {
        let factory = self.obj.factory();
        factory.preprocess();
        let parent = self.obj.handle()?;
        let handle = factory.api().create(Some(parent), HandleKind::View, name)?;
        Ok(View::from_parts(
            factory.instance(Some(Arc::clone(&self.obj)), handle),
        ))
    }

    /// Creates a new, empty document in this database.
    pub fn document(&self) -> Result<Document, NotesError> {
        let factory = self.obj.factory();
        factory.preprocess();
        let parent = self.obj.handle()?;
        let handle = factory
            .api()
            .create(Some(parent), HandleKind::Document, "")?;
        Ok(Document::from_parts(
            factory.instance(Some(Arc::clone(&self.obj)), handle),
        ))
    }
}

impl std::fmt::Display for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.obj)
    }
}
