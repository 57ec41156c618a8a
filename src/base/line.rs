use text_size::{TextRange, TextSize};

/// A line's extent in the buffer: byte offset of its first character and
/// its length excluding the line terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineSpan {
    pub offset: TextSize,
    pub length: TextSize,
}

impl LineSpan {
    pub fn new(offset: TextSize, length: TextSize) -> Self {
        Self { offset, length }
    }

    /// Offset one past the last character of the line (before the terminator).
    pub fn end(&self) -> TextSize {
        self.offset + self.length
    }

    /// The line's content as a byte range, terminator excluded.
    pub fn range(&self) -> TextRange {
        TextRange::at(self.offset, self.length)
    }

    pub fn is_empty(&self) -> bool {
        self.length == TextSize::new(0)
    }
}
