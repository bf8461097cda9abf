//! Native handle identities and kind classification.
//!
//! The backing Notes runtime hands out opaque handles for every object it
//! owns (sessions, databases, views, documents, items, ...). Handles form a
//! containment hierarchy: a session owns databases, a database owns views
//! and documents, a document owns items. Releasing a container while a
//! contained handle is still outstanding is unsafe in the native layer, so
//! release is ordered by kind: leaf kinds first, the session last.

use std::fmt;

/// Number of recycle-priority buckets.
///
/// Buckets are drained in ascending order; bucket 0 holds the most numerous
/// leaf kinds and the session sits alone in the last bucket.
pub const BUCKET_COUNT: usize = 7;

/// The closed set of native object kinds wrapped by the binding.
///
/// Classification happens once, when a handle is created; everything the
/// recycling engine needs to know about a kind (drain priority, whether the
/// native release call applies, whether release requires an owning session)
/// is a lookup on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// Field of a document; lifetime is managed by its document natively
    Item,
    /// Attachment or OLE object embedded in a rich-text item
    EmbeddedObject,
    /// Date/time value; releasable only through its owning session
    DateTime,
    /// Date/time interval; releasable only through its owning session
    DateRange,
    /// Row of a view or collection
    ViewEntry,
    /// Note (data record) in a database
    Document,
    /// Result set of a search or selection
    DocumentCollection,
    /// Sorted index over documents
    View,
    /// Design note describing document layout
    Form,
    /// Server- or client-side program attached to a database
    Agent,
    /// A single NSF database
    Database,
    /// Top-level connection to the native runtime
    Session,
}

impl HandleKind {
    /// Returns the recycle-priority bucket for this kind.
    ///
    /// Lower buckets are drained first. The ordering mirrors native
    /// containment: items before documents, documents before collections
    /// and views, databases next to last, the session strictly last.
    pub fn recycle_bucket(self) -> usize {
        match self {
            HandleKind::Item
            | HandleKind::EmbeddedObject
            | HandleKind::DateTime
            | HandleKind::DateRange => 0,
            HandleKind::ViewEntry => 1,
            HandleKind::Document => 2,
            HandleKind::DocumentCollection => 3,
            HandleKind::View | HandleKind::Form | HandleKind::Agent => 4,
            HandleKind::Database => 5,
            HandleKind::Session => 6,
        }
    }

    /// Returns true if handles of this kind may be passed to the native
    /// release call.
    ///
    /// Items and embedded objects are deliberately never released: the
    /// native layer manages their lifetime through the enclosing document,
    /// and releasing them explicitly causes errors. This is a documented
    /// exception table, not an omission.
    pub fn is_releasable(self) -> bool {
        !matches!(self, HandleKind::Item | HandleKind::EmbeddedObject)
    }

    /// Returns true if releasing a handle of this kind requires a valid
    /// owning-session link.
    ///
    /// Date/time handles created outside a session context cannot be
    /// released at all (a known native-layer defect).
    pub fn needs_session_link(self) -> bool {
        matches!(self, HandleKind::DateTime | HandleKind::DateRange)
    }
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Opaque identifier for a resource owned by the native runtime.
///
/// A handle is valid until explicitly released; using it afterwards is
/// undefined behavior in the native layer. The pair (id, kind) is the
/// identity-cache key, so two lookups of the same native object must
/// produce equal handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle {
    /// Identity assigned by the native runtime
    pub id: u64,
    /// Kind classification, fixed at creation
    pub kind: HandleKind,
}

impl NativeHandle {
    /// Creates a handle from a raw native identity and its kind.
    pub fn new(id: u64, kind: HandleKind) -> Self {
        NativeHandle { id, kind }
    }
}

impl fmt::Display for NativeHandle {
    /// Renders `Kind(#id)`.
    ///
    /// Works from the copied identity alone, so diagnostics keep a stable
    /// form even after the native object has been released.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(#{})", self.kind, self.id)
    }
}
