//! Incremental document-structure analysis.
//!
//! [`StructureAnalyzer`] answers two questions about a live document:
//! "what is line N?" (frontmatter delimiter/content vs. diagram content)
//! and "which diagram dialect is this?". Both answers come from
//! version-stamped caches so that steady-state edits cost amortized O(1);
//! a cache is only rebuilt when the edit diff actually touches the lines
//! it depends on.

pub mod cache;
pub mod diagram;

use std::cmp::Ordering;

use tracing::{debug, trace};

use crate::document::{Document, DocumentVersion};

pub use cache::{VersionedCache, region_unchanged};
pub use diagram::{
    DiagramDeclaration, DiagramType, first_word, is_declaration_line, normalize_declaration,
    parse_declaration_keyword,
};

/// Frontmatter delimiters are only recognized within this many leading lines.
pub const FRONTMATTER_SCAN_LIMIT: usize = 100;

/// A frontmatter delimiter line contains exactly this, after trimming.
pub const FRONTMATTER_DELIMITER: &str = "---";

/// Prefix of a diagram comment line.
pub const DIAGRAM_COMMENT: &str = "%%";

/// Structural classification of a single line. Derived on demand from the
/// frontmatter boundary, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentContext {
    /// The opening `---` delimiter line.
    FrontmatterStart,
    /// A line inside the frontmatter block.
    Frontmatter,
    /// The closing `---` delimiter line.
    FrontmatterEnd,
    /// Anything else: diagram content.
    Diagram,
}

impl DocumentContext {
    pub fn is_frontmatter(&self) -> bool {
        !matches!(self, DocumentContext::Diagram)
    }

    /// The line-comment token for this context: `#` inside frontmatter
    /// (YAML), `%%` in the diagram body.
    pub fn line_comment_token(&self) -> &'static str {
        match self {
            DocumentContext::Diagram => DIAGRAM_COMMENT,
            _ => "#",
        }
    }
}

/// The frontmatter boundary: 1-based delimiter line numbers.
///
/// `start == None` means no frontmatter; `end == None` with a start means
/// the block is unclosed, in which case every line from the opening
/// delimiter to the end of the document classifies as frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrontmatterBoundary {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl FrontmatterBoundary {
    pub fn is_none(&self) -> bool {
        self.start.is_none()
    }

    /// Classify `line` against this boundary.
    pub fn context_of(&self, line: usize) -> DocumentContext {
        match (self.start, self.end) {
            (None, _) => DocumentContext::Diagram,
            (Some(start), _) if line == start => DocumentContext::FrontmatterStart,
            (Some(_), Some(end)) if line == end => DocumentContext::FrontmatterEnd,
            (Some(start), Some(end)) if line > start && line < end => DocumentContext::Frontmatter,
            (Some(start), None) if line > start => DocumentContext::Frontmatter,
            _ => DocumentContext::Diagram,
        }
    }

    /// First line on which a diagram declaration may appear.
    pub fn body_start(&self) -> usize {
        match self.end {
            Some(end) => end + 1,
            None => 1,
        }
        .max(1)
    }
}

/// Incremental analyzer bound to one document.
///
/// Holds two independent version-gated caches: the frontmatter boundary
/// and the diagram declaration. Both are private, created empty, and
/// refreshed lazily on each query.
pub struct StructureAnalyzer<D: Document> {
    frontmatter: VersionedCache<D::Version, FrontmatterBoundary>,
    declaration: VersionedCache<D::Version, Option<DiagramDeclaration>>,
}

impl<D: Document> Default for StructureAnalyzer<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Document> StructureAnalyzer<D> {
    pub fn new() -> Self {
        Self {
            frontmatter: VersionedCache::new(FrontmatterBoundary::default()),
            declaration: VersionedCache::new(None),
        }
    }

    /// Classify a line as frontmatter delimiter/content or diagram content.
    ///
    /// O(1) with a warm cache. Panics if `line` is 0: line numbers are
    /// 1-based.
    pub fn line_context(&mut self, doc: &D, line: usize) -> DocumentContext {
        assert!(line >= 1, "line numbers are 1-based");
        self.frontmatter_bounds(doc).context_of(line)
    }

    /// The current frontmatter boundary, refreshing the cache as needed.
    pub fn frontmatter_bounds(&mut self, doc: &D) -> FrontmatterBoundary {
        let current = doc.version();
        let rescan = match self.frontmatter.version() {
            None => true,
            Some(prev) if !prev.same_document(&current) => true,
            Some(prev) if prev.compare_age(&current) == Ordering::Equal => {
                trace!("frontmatter cache hit (identical version)");
                false
            }
            Some(prev) => {
                let region_end = self
                    .frontmatter
                    .value()
                    .end
                    .unwrap_or_else(|| doc.line_count().min(FRONTMATTER_SCAN_LIMIT));
                if region_unchanged(doc, prev, &current, region_end) {
                    trace!(region_end, "frontmatter cache still valid, advancing stamp");
                    self.frontmatter.advance(current.clone());
                    false
                } else {
                    true
                }
            }
        };
        if rescan {
            self.rescan_frontmatter(doc, current);
        }
        *self.frontmatter.value()
    }

    fn rescan_frontmatter(&mut self, doc: &D, version: D::Version) {
        let mut bounds = FrontmatterBoundary::default();
        let limit = doc.line_count().min(FRONTMATTER_SCAN_LIMIT);
        for number in 1..=limit {
            let Some(text) = doc.line_text(number) else {
                break;
            };
            if text.trim() == FRONTMATTER_DELIMITER {
                if bounds.start.is_none() {
                    bounds.start = Some(number);
                } else {
                    // At most two delimiters are ever significant.
                    bounds.end = Some(number);
                    break;
                }
            }
        }
        debug!(start = ?bounds.start, end = ?bounds.end, "frontmatter rescan");
        self.frontmatter.stamp(version, bounds);
    }

    /// The diagram dialect declared by the document.
    pub fn diagram_type(&mut self, doc: &D) -> DiagramType {
        let bounds = self.frontmatter_bounds(doc);
        let current = doc.version();
        let search_start = bounds.body_start();

        // Identical version: the cached answer is exact.
        if let Some(prev) = self.declaration.version() {
            if prev.same_document(&current) && prev.compare_age(&current) == Ordering::Equal {
                return self
                    .declaration
                    .value()
                    .as_ref()
                    .map(|decl| decl.diagram_type)
                    .unwrap_or(DiagramType::Unknown);
            }
        }

        // Fast path: the cached declaration line may still be the
        // declaration; re-read and re-normalize just that line.
        if let Some(decl) = self.declaration.value().clone() {
            if decl.line >= search_start && decl.line <= doc.line_count() {
                if let Some(text) = doc.line_text(decl.line) {
                    if is_declaration_line(&text) && normalize_declaration(&text) == decl.normalized
                    {
                        trace!(line = decl.line, "declaration cache hit");
                        self.declaration.advance(current);
                        return decl.diagram_type;
                    }
                }
            }
        }

        // Slow path: scan forward for the first significant line.
        let mut found = None;
        for number in search_start..=doc.line_count() {
            let Some(text) = doc.line_text(number) else {
                break;
            };
            if is_declaration_line(&text) {
                found = Some((number, text));
                break;
            }
        }
        let Some((line, text)) = found else {
            debug!("no diagram declaration found");
            self.declaration.stamp(current, None);
            return DiagramType::Unknown;
        };

        let normalized = normalize_declaration(&text);
        // Unchanged normalized text means the declaration merely moved;
        // reuse the previous parse.
        let diagram_type = match self.declaration.value() {
            Some(prev) if prev.normalized == normalized => prev.diagram_type,
            _ => parse_declaration_keyword(first_word(&normalized)),
        };
        debug!(line, %normalized, ?diagram_type, "declaration rescan");
        self.declaration.stamp(
            current,
            Some(DiagramDeclaration {
                line,
                normalized,
                diagram_type,
            }),
        );
        diagram_type
    }

    /// 1-based line number of the diagram declaration, if any. Refreshes
    /// both caches.
    pub fn declaration_line(&mut self, doc: &D) -> Option<usize> {
        self.diagram_type(doc);
        self.declaration.value().as_ref().map(|decl| decl.line)
    }
}
