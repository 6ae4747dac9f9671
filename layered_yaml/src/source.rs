//! Configuration sources fed to the merge engine.

use std::sync::Arc;

use crate::expand::escape_variables;

/// One input document with its diagnostic label.
///
/// Priority is positional: sources later in a list override earlier ones.
/// A raw source is escaped before merging so that its `${...}` text
/// survives variable expansion verbatim.
#[derive(Clone, Debug)]
pub(crate) struct Source {
    origin: String,
    bytes: Arc<[u8]>,
    raw: bool,
}

impl Source {
    pub(crate) fn new(origin: impl Into<String>, bytes: impl Into<Arc<[u8]>>, raw: bool) -> Self {
        Self {
            origin: origin.into(),
            bytes: bytes.into(),
            raw,
        }
    }

    pub(crate) fn origin(&self) -> &str {
        &self.origin
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Apply escaping if this source is raw. The result is never raw, so
    /// protecting an already protected source is a cheap clone.
    pub(crate) fn protect(&self) -> Self {
        if !self.raw {
            return self.clone();
        }
        Self {
            origin: self.origin.clone(),
            bytes: escape_variables(&self.bytes).into(),
            raw: false,
        }
    }
}
