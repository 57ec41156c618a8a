//! In-memory reference implementation of the [`Document`] contract.
//!
//! String-backed, with an eagerly rebuilt line index, monotone version
//! numbers, a shared change log backing `changes_between`, and an undo
//! stack of reverse edits recorded per batch. Intended for tests and for
//! embedders without an editor buffer; a real host editor supplies its own
//! implementation over its rope or gap buffer.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use text_size::{TextRange, TextSize};

use crate::base::LineSpan;

use super::{ChangeDelta, Document, DocumentVersion, EditError, VersionError};

static NEXT_DOC_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy)]
struct LogEntry {
    /// Version number the document reached after this edit.
    number: u64,
    delta: ChangeDelta,
}

/// A recorded inverse of one edit: remove `remove` bytes at `offset`,
/// then insert `insert` there.
#[derive(Debug, Clone)]
struct ReverseEdit {
    offset: TextSize,
    remove: TextSize,
    insert: String,
}

/// Version token for [`MemoryDocument`]: document identity, a monotone
/// edit counter, and a handle on the shared change log.
#[derive(Debug, Clone)]
pub struct MemoryVersion {
    doc_id: u64,
    number: u64,
    log: Rc<RefCell<Vec<LogEntry>>>,
}

impl DocumentVersion for MemoryVersion {
    fn same_document(&self, other: &Self) -> bool {
        self.doc_id == other.doc_id
    }

    fn compare_age(&self, other: &Self) -> Ordering {
        self.number.cmp(&other.number)
    }

    fn changes_between(&self, older: &Self) -> Result<Vec<ChangeDelta>, VersionError> {
        if !self.same_document(older) {
            return Err(VersionError::DifferentDocuments);
        }
        let (lo, hi) = if older.number <= self.number {
            (older.number, self.number)
        } else {
            (self.number, older.number)
        };
        let log = self.log.borrow();
        if let Some(first) = log.first() {
            if lo + 1 < first.number {
                return Err(VersionError::HistoryTruncated(lo));
            }
        }
        Ok(log
            .iter()
            .filter(|entry| entry.number > lo && entry.number <= hi)
            .map(|entry| entry.delta)
            .collect())
    }
}

/// Simple string-backed [`Document`].
#[derive(Debug)]
pub struct MemoryDocument {
    text: String,
    /// Byte offset of each line start; always holds at least offset 0.
    line_starts: Vec<TextSize>,
    doc_id: u64,
    version: u64,
    log: Rc<RefCell<Vec<LogEntry>>>,
    undo_stack: Vec<Vec<ReverseEdit>>,
    open_batch: Vec<ReverseEdit>,
    batch_depth: u32,
    undoing: bool,
}

impl MemoryDocument {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut doc = Self {
            text,
            line_starts: Vec::new(),
            doc_id: NEXT_DOC_ID.fetch_add(1, AtomicOrdering::Relaxed),
            version: 0,
            log: Rc::new(RefCell::new(Vec::new())),
            undo_stack: Vec::new(),
            open_batch: Vec::new(),
            batch_depth: 0,
            undoing: false,
        };
        doc.rebuild_line_starts();
        doc
    }

    /// The whole document text.
    pub fn text_all(&self) -> &str {
        &self.text
    }

    fn rebuild_line_starts(&mut self) {
        self.line_starts.clear();
        self.line_starts.push(TextSize::new(0));
        for (i, b) in self.text.bytes().enumerate() {
            if b == b'\n' {
                self.line_starts.push(TextSize::new(i as u32 + 1));
            }
        }
    }

    fn check_offset(&self, offset: TextSize) -> Result<usize, EditError> {
        let off = usize::from(offset);
        if off > self.text.len() {
            return Err(EditError::OffsetOutOfBounds {
                offset: offset.into(),
                len: self.text.len() as u32,
            });
        }
        if !self.text.is_char_boundary(off) {
            return Err(EditError::NotCharBoundary(offset.into()));
        }
        Ok(off)
    }

    /// Apply one edit: replace `start..end` with `insert`, recording the
    /// change delta and (unless undoing) the reverse edit.
    fn splice(&mut self, start: usize, end: usize, insert: &str) {
        let removed_text = self.text[start..end].to_string();
        self.text.replace_range(start..end, insert);
        self.version += 1;
        self.log.borrow_mut().push(LogEntry {
            number: self.version,
            delta: ChangeDelta {
                offset: TextSize::new(start as u32),
                removed: TextSize::of(removed_text.as_str()),
                inserted: TextSize::of(insert),
            },
        });
        self.rebuild_line_starts();

        if !self.undoing {
            let reverse = ReverseEdit {
                offset: TextSize::new(start as u32),
                remove: TextSize::of(insert),
                insert: removed_text,
            };
            if self.batch_depth > 0 {
                self.open_batch.push(reverse);
            } else {
                self.undo_stack.push(vec![reverse]);
            }
        }
    }
}

impl From<&str> for MemoryDocument {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl Document for MemoryDocument {
    type Version = MemoryVersion;

    fn len(&self) -> TextSize {
        TextSize::of(self.text.as_str())
    }

    fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn line(&self, number: usize) -> Option<LineSpan> {
        if number == 0 || number > self.line_starts.len() {
            return None;
        }
        let start = self.line_starts[number - 1];
        let end_with_terminator = self
            .line_starts
            .get(number)
            .copied()
            .unwrap_or_else(|| self.len());
        let mut end = end_with_terminator;
        let bytes = self.text.as_bytes();
        // Step back over "\n" or "\r\n" when a following line exists.
        if number < self.line_starts.len() {
            let term = usize::from(end_with_terminator);
            if term >= 1 && bytes[term - 1] == b'\n' {
                end -= TextSize::new(1);
                if term >= 2 && bytes[term - 2] == b'\r' {
                    end -= TextSize::new(1);
                }
            }
        }
        Some(LineSpan::new(start, end - start))
    }

    fn line_at_offset(&self, offset: TextSize) -> Option<(usize, LineSpan)> {
        if offset > self.len() {
            return None;
        }
        let number = self.line_starts.partition_point(|start| *start <= offset);
        let span = self.line(number)?;
        Some((number, span))
    }

    fn text(&self, range: TextRange) -> String {
        self.text[usize::from(range.start())..usize::from(range.end())].to_string()
    }

    fn char_at(&self, offset: TextSize) -> Option<char> {
        self.text
            .get(usize::from(offset)..)
            .and_then(|s| s.chars().next())
    }

    fn insert(&mut self, offset: TextSize, text: &str) -> Result<(), EditError> {
        let off = self.check_offset(offset)?;
        self.splice(off, off, text);
        Ok(())
    }

    fn remove(&mut self, range: TextRange) -> Result<(), EditError> {
        let start = self.check_offset(range.start())?;
        let end = self.check_offset(range.end())?;
        self.splice(start, end, "");
        Ok(())
    }

    fn replace(&mut self, range: TextRange, text: &str) -> Result<(), EditError> {
        let start = self.check_offset(range.start())?;
        let end = self.check_offset(range.end())?;
        self.splice(start, end, text);
        Ok(())
    }

    fn begin_update(&mut self) {
        self.batch_depth += 1;
    }

    fn end_update(&mut self) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 && !self.open_batch.is_empty() {
            let batch = std::mem::take(&mut self.open_batch);
            self.undo_stack.push(batch);
        }
    }

    fn undo(&mut self) -> bool {
        let Some(batch) = self.undo_stack.pop() else {
            return false;
        };
        self.undoing = true;
        for edit in batch.iter().rev() {
            let start = usize::from(edit.offset);
            let end = start + usize::from(edit.remove);
            self.splice(start, end, &edit.insert);
        }
        self.undoing = false;
        true
    }

    fn version(&self) -> MemoryVersion {
        MemoryVersion {
            doc_id: self.doc_id,
            number: self.version,
            log: Rc::clone(&self.log),
        }
    }
}
