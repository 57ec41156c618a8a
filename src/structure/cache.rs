//! Version-stamped caching with partial invalidation.
//!
//! The analyzer keeps two of these: one for the frontmatter boundary, one
//! for the diagram declaration. A cache is a plain `(last_version, value)`
//! pair; the diff-based validity check is a standalone function so the
//! invalidation logic is testable on its own.

use tracing::warn;

use crate::document::{Document, DocumentVersion};

/// A cached value stamped with the document version it was computed from.
///
/// Created empty (no version) at analyzer construction; mutated only by
/// the analyzer in response to version changes; never freed.
#[derive(Debug)]
pub struct VersionedCache<V, T> {
    version: Option<V>,
    value: T,
}

impl<V, T> VersionedCache<V, T> {
    pub fn new(value: T) -> Self {
        Self {
            version: None,
            value,
        }
    }

    /// Version the value was last computed at, if any.
    pub fn version(&self) -> Option<&V> {
        self.version.as_ref()
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Store a freshly computed value.
    pub fn stamp(&mut self, version: V, value: T) {
        self.version = Some(version);
        self.value = value;
    }

    /// Advance the stamp without recomputing: the value is known to still
    /// hold at `version`.
    pub fn advance(&mut self, version: V) {
        self.version = Some(version);
    }
}

/// Whether no edit between `older` and `newer` touched lines
/// `1..=region_end`.
///
/// Each edit's offset is mapped to a line in the current document; an edit
/// at or before `region_end` invalidates. A failed diff counts as changed:
/// correctness over the performance win of cache reuse.
pub fn region_unchanged<D>(
    doc: &D,
    older: &D::Version,
    newer: &D::Version,
    region_end: usize,
) -> bool
where
    D: Document + ?Sized,
{
    let deltas = match newer.changes_between(older) {
        Ok(deltas) => deltas,
        Err(err) => {
            warn!(error = %err, "version diff failed, treating region as changed");
            return false;
        }
    };
    for delta in deltas {
        let probe = delta.offset.min(doc.len());
        let line = doc
            .line_at_offset(probe)
            .map(|(number, _)| number)
            .unwrap_or(1);
        if line <= region_end {
            return false;
        }
    }
    true
}
