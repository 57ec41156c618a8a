//! Line-comment toggling.
//!
//! Commenting is context-aware: frontmatter lines take the YAML `#` token,
//! diagram lines take `%%`, and delimiter or blank lines are skipped.
//! Uncommenting is deliberately permissive: it strips whichever known token
//! it finds, regardless of context, so stale comments never get stuck.
//! Each call is one undo step; a failed call leaves the document untouched.

use text_size::{TextRange, TextSize};

use crate::document::{Document, EditError, with_update};
use crate::structure::{DIAGRAM_COMMENT, DocumentContext, StructureAnalyzer};

/// Comment every non-blank, non-delimiter line in `begin..=end`, adding
/// exactly one layer even to lines that are already commented.
pub fn comment_selection<D: Document>(
    doc: &mut D,
    analyzer: &mut StructureAnalyzer<D>,
    begin: usize,
    end: usize,
) -> Result<(), EditError> {
    check_range(doc, begin, end)?;
    let bounds = analyzer.frontmatter_bounds(doc);
    with_update(doc, |doc| {
        for number in begin..=end {
            let span = doc.line(number).ok_or(EditError::LineOutOfRange {
                line: number,
                count: doc.line_count(),
            })?;
            let text = doc.text(span.range());
            if text.trim().is_empty() {
                continue;
            }
            let context = bounds.context_of(number);
            match context {
                DocumentContext::FrontmatterStart | DocumentContext::FrontmatterEnd => continue,
                _ => doc.insert(span.offset, context.line_comment_token())?,
            }
        }
        Ok(())
    })
}

/// Remove one comment layer from every line in `begin..=end`.
///
/// The first token of `%%` then `#` found after leading whitespace is
/// removed; `%%%%` becomes `%%`, not the empty string.
pub fn uncomment_selection<D: Document>(
    doc: &mut D,
    begin: usize,
    end: usize,
) -> Result<(), EditError> {
    check_range(doc, begin, end)?;
    with_update(doc, |doc| {
        for number in begin..=end {
            let span = doc.line(number).ok_or(EditError::LineOutOfRange {
                line: number,
                count: doc.line_count(),
            })?;
            let text = doc.text(span.range());
            let trimmed = text.trim_start();
            let leading = text.len() - trimmed.len();
            let token_len = if trimmed.starts_with(DIAGRAM_COMMENT) {
                DIAGRAM_COMMENT.len()
            } else if trimmed.starts_with('#') {
                1
            } else {
                continue;
            };
            let start = span.offset + TextSize::new(leading as u32);
            doc.remove(TextRange::at(start, TextSize::new(token_len as u32)))?;
        }
        Ok(())
    })
}

fn check_range<D: Document>(doc: &D, begin: usize, end: usize) -> Result<(), EditError> {
    if begin == 0 || end < begin {
        return Err(EditError::InvalidRange { begin, end });
    }
    let count = doc.line_count();
    if end > count {
        return Err(EditError::LineOutOfRange { line: end, count });
    }
    Ok(())
}
