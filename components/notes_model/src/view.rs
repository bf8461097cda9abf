//! Wrappers for views and view entries.

use std::sync::Arc;

use core_types::{HandleKind, NotesError};
use recycler::ProxyObject;

/// A sorted index over the documents of a database.
#[derive(Debug)]
pub struct View {
    obj: Arc<ProxyObject>,
}

impl View {
    pub(crate) fn from_parts(obj: Arc<ProxyObject>) -> Self {
        View { obj }
    }

    /// Returns the first entry of the view.
    pub fn first_entry(&self) -> Result<ViewEntry, NotesError> {
        let factory = self.obj.factory();
        factory.preprocess();
        let parent = self.obj.handle()?;
        let handle = factory
            .api()
            .create(Some(parent), HandleKind::ViewEntry, "")?;
        Ok(ViewEntry {
            obj: factory.instance(Some(Arc::clone(&self.obj)), handle),
        })
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.obj)
    }
}

/// One row of a view.
#[derive(Debug)]
pub struct ViewEntry {
    obj: Arc<ProxyObject>,
}

impl std::fmt::Display for ViewEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.obj)
    }
}
