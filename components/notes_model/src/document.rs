//! Wrappers for documents, their items and date/time values.

use std::sync::Arc;

use core_types::{HandleKind, NotesError};
use recycler::ProxyObject;

/// A note (data record) in a database.
#[derive(Debug)]
pub struct Document {
    obj: Arc<ProxyObject>,
}

impl Document {
    pub(crate) fn from_parts(obj: Arc<ProxyObject>) -> Self {
        Document { obj }
    }

    /// Returns the item named `name` of this document.
    pub fn item(&self, name: &str) -> Result<Item, NotesError> {
        let factory = self.obj.factory();
        factory.preprocess();
        let parent = self.obj.handle()?;
        let handle = factory.api().create(Some(parent), HandleKind::Item, name)?;
        Ok(Item {
            obj: factory.instance(Some(Arc::clone(&self.obj)), handle),
        })
    }

    /// Returns the creation date of this document.
    pub fn created(&self) -> Result<DateTime, NotesError> {
        let factory = self.obj.factory();
        factory.preprocess();
        let parent = self.obj.handle()?;
        let handle = factory
            .api()
            .create(Some(parent), HandleKind::DateTime, "")?;
        Ok(DateTime::from_parts(
            factory.instance(Some(Arc::clone(&self.obj)), handle),
        ))
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.obj)
    }
}

/// A field of a document.
///
/// Item handles are managed by their document in the native layer; the
/// engine never releases them explicitly.
#[derive(Debug)]
pub struct Item {
    obj: Arc<ProxyObject>,
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.obj)
    }
}

/// A date/time value.
///
/// Release requires the owning session; values created outside a session
/// context cannot be released at all (native defect, logged once).
#[derive(Debug)]
pub struct DateTime {
    obj: Arc<ProxyObject>,
}

impl DateTime {
    pub(crate) fn from_parts(obj: Arc<ProxyObject>) -> Self {
        DateTime { obj }
    }
}

impl std::fmt::Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.obj)
    }
}
