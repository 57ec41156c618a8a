//! Text-buffer collaborator contract.
//!
//! The diagmark core never implements the mutable buffer itself; a host
//! editor provides one behind the [`Document`] trait. The contract covers
//! line/offset addressing, read access, mutation, batch (undo-step)
//! bracketing, and a comparable version token with change-diff enumeration.
//!
//! [`MemoryDocument`] is a straightforward in-memory implementation used by
//! the test suite and available to embedders without an editor buffer.

mod memory;

use std::cmp::Ordering;

use text_size::{TextRange, TextSize};
use thiserror::Error;

use crate::base::LineSpan;

pub use memory::{MemoryDocument, MemoryVersion};

/// Errors raised at the public boundary of document mutations.
///
/// Precondition violations (out-of-range lines, inverted ranges) are
/// programmer errors surfaced explicitly rather than recovered from.
#[derive(Debug, Error)]
pub enum EditError {
    /// Offset lies beyond the end of the document.
    #[error("offset {offset} is beyond document end ({len})")]
    OffsetOutOfBounds { offset: u32, len: u32 },

    /// Offset or range splits a multi-byte character.
    #[error("offset {0} is not a character boundary")]
    NotCharBoundary(u32),

    /// Line number out of range (lines are 1-based).
    #[error("line {line} is out of range (document has {count} lines)")]
    LineOutOfRange { line: usize, count: usize },

    /// End of a line range precedes its beginning, or a line number is 0.
    #[error("invalid line range {begin}..={end}")]
    InvalidRange { begin: usize, end: usize },

    /// Version bookkeeping failed.
    #[error(transparent)]
    Version(#[from] VersionError),
}

/// Errors raised while diffing two version tokens.
#[derive(Debug, Error)]
pub enum VersionError {
    /// The two tokens were issued by different documents.
    #[error("versions belong to different documents")]
    DifferentDocuments,

    /// The change log no longer reaches back to the older version.
    #[error("change history no longer covers version {0}")]
    HistoryTruncated(u64),
}

/// One edit in a version diff: at `offset`, `removed` bytes were replaced
/// by `inserted` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeDelta {
    pub offset: TextSize,
    pub removed: TextSize,
    pub inserted: TextSize,
}

/// An opaque, comparable marker identifying a specific edit-state of a
/// document, supporting diff enumeration between two states.
///
/// Tokens must be cheap to clone; the structure analyzer stores one per
/// cache and clones it on every refresh.
pub trait DocumentVersion: Clone {
    /// Whether both tokens were issued by the same document instance.
    fn same_document(&self, other: &Self) -> bool;

    /// Relative age: `Equal` means the two tokens denote the identical
    /// edit-state, `Less` means `self` is older than `other`.
    fn compare_age(&self, other: &Self) -> Ordering;

    /// Enumerate the edits applied between `older` and `self`, in order.
    fn changes_between(&self, older: &Self) -> Result<Vec<ChangeDelta>, VersionError>;
}

/// Addressable, line/offset-indexed mutable text.
///
/// Line numbers are 1-based throughout (editor convention). [`LineSpan`]s
/// exclude line terminators.
pub trait Document {
    type Version: DocumentVersion;

    /// Total length in bytes.
    fn len(&self) -> TextSize;

    fn is_empty(&self) -> bool {
        self.len() == TextSize::new(0)
    }

    /// Number of lines; an empty document has one (empty) line.
    fn line_count(&self) -> usize;

    /// Span of line `number` (1-based), or `None` if out of range.
    fn line(&self, number: usize) -> Option<LineSpan>;

    /// Line containing `offset`, with its 1-based number.
    fn line_at_offset(&self, offset: TextSize) -> Option<(usize, LineSpan)>;

    /// Text of the given range.
    ///
    /// Panics if the range is out of bounds or splits a character.
    fn text(&self, range: TextRange) -> String;

    /// Character starting at `offset`, if any.
    fn char_at(&self, offset: TextSize) -> Option<char>;

    /// Content of line `number`, terminator excluded.
    fn line_text(&self, number: usize) -> Option<String> {
        self.line(number).map(|span| self.text(span.range()))
    }

    fn insert(&mut self, offset: TextSize, text: &str) -> Result<(), EditError>;

    fn remove(&mut self, range: TextRange) -> Result<(), EditError>;

    fn replace(&mut self, range: TextRange, text: &str) -> Result<(), EditError>;

    /// Open a logical mutation batch. Batches nest; the outermost pair
    /// delimits one undo step.
    fn begin_update(&mut self);

    /// Close the current batch. Must be called on every exit path of a
    /// batch, success or failure; there is no separate rollback call.
    fn end_update(&mut self);

    /// Revert the most recent closed batch. Returns false if there is
    /// nothing to undo.
    fn undo(&mut self) -> bool;

    /// Current version token (cheap clone).
    fn version(&self) -> Self::Version;
}

/// Run `f` inside a `begin_update`/`end_update` pair.
///
/// The end marker is signalled on both exit paths; if `f` failed after
/// mutating the document, the partial batch is reverted through the undo
/// stack so the buffer is never left inconsistent.
pub fn with_update<D, T>(
    doc: &mut D,
    f: impl FnOnce(&mut D) -> Result<T, EditError>,
) -> Result<T, EditError>
where
    D: Document + ?Sized,
{
    let before = doc.version();
    doc.begin_update();
    let result = f(doc);
    doc.end_update();
    if result.is_err() && before.compare_age(&doc.version()) != Ordering::Equal {
        doc.undo();
    }
    result
}
