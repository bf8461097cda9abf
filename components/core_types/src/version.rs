//! Native runtime version detection.
//!
//! The recycler strategy is selected once per factory from the version the
//! native runtime reports: releases before R5 have no explicit release call,
//! so deferred recycling degrades to a no-op there.

use std::fmt;

/// Version reported by the backing native runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RuntimeVersion {
    /// Major release number (e.g. 5 for R5)
    pub major: u16,
    /// Minor release number
    pub minor: u16,
}

impl RuntimeVersion {
    /// Creates a version from major and minor release numbers.
    pub fn new(major: u16, minor: u16) -> Self {
        RuntimeVersion { major, minor }
    }

    /// Returns true if this runtime supports the explicit release call.
    ///
    /// R5 introduced per-object release; older runtimes reclaim everything
    /// at session teardown only.
    pub fn supports_explicit_recycle(&self) -> bool {
        self.major >= 5
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
