//! Context-aware indentation.
//!
//! Desired indentation is computed per line from the structural context:
//! frontmatter content follows YAML block-key rules, diagram content
//! follows the dialect's block-opener vocabulary, and delimiter lines are
//! pinned to column 0. Batch calls fetch the frontmatter boundary and
//! dialect once and run a single YAML colon-spacing pass over the
//! frontmatter region.

use std::sync::LazyLock;

use text_size::{TextRange, TextSize};

use crate::document::{Document, EditError, with_update};
use crate::structure::{
    DIAGRAM_COMMENT, DiagramType, DocumentContext, FrontmatterBoundary, StructureAnalyzer,
    first_word,
};

/// Indentation strings for pure unit runs are precomputed up to this depth.
const MAX_CACHED_LEVELS: usize = 20;

/// The configured indentation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentUnit {
    Tabs,
    Spaces(u8),
}

impl Default for IndentUnit {
    fn default() -> Self {
        IndentUnit::Spaces(4)
    }
}

impl IndentUnit {
    /// Number of spaces removed when dedenting space-indented text.
    fn space_width(&self) -> usize {
        match self {
            IndentUnit::Tabs => 4,
            IndentUnit::Spaces(width) => *width as usize,
        }
    }

    fn push_onto(&self, out: &mut String) {
        match self {
            IndentUnit::Tabs => out.push('\t'),
            IndentUnit::Spaces(width) => {
                for _ in 0..*width {
                    out.push(' ');
                }
            }
        }
    }
}

/// Precomputed indentation strings for pure-tab, pure-2-space, and
/// pure-4-space runs. Arbitrary or mixed indentation falls back to an
/// allocation.
struct IndentStrings {
    tabs: Vec<String>,
    two: Vec<String>,
    four: Vec<String>,
}

static INDENT_STRINGS: LazyLock<IndentStrings> = LazyLock::new(|| IndentStrings {
    tabs: (0..=MAX_CACHED_LEVELS).map(|n| "\t".repeat(n)).collect(),
    two: (0..=MAX_CACHED_LEVELS).map(|n| " ".repeat(2 * n)).collect(),
    four: (0..=MAX_CACHED_LEVELS).map(|n| " ".repeat(4 * n)).collect(),
});

impl IndentStrings {
    fn lookup(&self, unit: IndentUnit, levels: usize) -> Option<&str> {
        if levels > MAX_CACHED_LEVELS {
            return None;
        }
        match unit {
            IndentUnit::Tabs => Some(self.tabs[levels].as_str()),
            IndentUnit::Spaces(2) => Some(self.two[levels].as_str()),
            IndentUnit::Spaces(4) => Some(self.four[levels].as_str()),
            IndentUnit::Spaces(_) => None,
        }
    }
}

/// Computes and applies per-line indentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndentationEngine {
    unit: IndentUnit,
}

impl IndentationEngine {
    pub fn new(unit: IndentUnit) -> Self {
        Self { unit }
    }

    pub fn unit(&self) -> IndentUnit {
        self.unit
    }

    /// Re-indent a single line. Equivalent to a one-line batch.
    pub fn indent_line<D: Document>(
        &self,
        doc: &mut D,
        analyzer: &mut StructureAnalyzer<D>,
        line: usize,
    ) -> Result<(), EditError> {
        self.indent_lines(doc, analyzer, line, line)
    }

    /// Re-indent lines `begin..=end` as one undo step.
    ///
    /// The frontmatter boundary and dialect are fetched once for the whole
    /// batch, and the YAML colon-spacing pass runs once over the
    /// frontmatter content region. On failure the partial batch is undone.
    pub fn indent_lines<D: Document>(
        &self,
        doc: &mut D,
        analyzer: &mut StructureAnalyzer<D>,
        begin: usize,
        end: usize,
    ) -> Result<(), EditError> {
        if begin == 0 || end < begin {
            return Err(EditError::InvalidRange { begin, end });
        }
        let count = doc.line_count();
        if end > count {
            return Err(EditError::LineOutOfRange { line: end, count });
        }

        let bounds = analyzer.frontmatter_bounds(doc);
        let diagram = analyzer.diagram_type(doc);
        let declaration = analyzer.declaration_line(doc);

        with_update(doc, |doc| {
            normalize_yaml_spacing(doc, bounds)?;
            for line in begin..=end {
                self.reindent(doc, bounds, diagram, declaration, line)?;
            }
            Ok(())
        })
    }

    fn reindent<D: Document>(
        &self,
        doc: &mut D,
        bounds: FrontmatterBoundary,
        diagram: DiagramType,
        declaration: Option<usize>,
        line: usize,
    ) -> Result<(), EditError> {
        let span = doc.line(line).ok_or(EditError::LineOutOfRange {
            line,
            count: doc.line_count(),
        })?;
        let text = doc.text(span.range());
        let desired = self.desired_indentation(doc, bounds, diagram, declaration, line, &text);
        let current = leading_whitespace(&text);
        if current == desired {
            return Ok(());
        }
        let ws_range = TextRange::at(span.offset, TextSize::new(current.len() as u32));
        doc.replace(ws_range, &desired)
    }

    fn desired_indentation<D: Document>(
        &self,
        doc: &D,
        bounds: FrontmatterBoundary,
        diagram: DiagramType,
        declaration: Option<usize>,
        line: usize,
        text: &str,
    ) -> String {
        let mut indent = match bounds.context_of(line) {
            // Delimiters always sit at column 0.
            DocumentContext::FrontmatterStart | DocumentContext::FrontmatterEnd => String::new(),
            DocumentContext::Frontmatter => self.frontmatter_indent(doc, bounds, line),
            DocumentContext::Diagram => {
                self.diagram_indent(doc, bounds, diagram, declaration, line)
            }
        };
        if dedents(diagram, text.trim()) {
            self.dedent_once(&mut indent);
        }
        indent
    }

    /// Indentation for a frontmatter content line: anchored on the nearest
    /// non-blank line above it, so siblings separated by blank lines
    /// inherit from the last real sibling instead of resetting.
    fn frontmatter_indent<D: Document>(
        &self,
        doc: &D,
        bounds: FrontmatterBoundary,
        line: usize,
    ) -> String {
        let Some(start) = bounds.start else {
            return String::new();
        };
        let mut number = line - 1;
        while number > start {
            if let Some(text) = doc.line_text(number) {
                if !text.trim().is_empty() {
                    let anchor_indent = leading_whitespace(&text);
                    if is_yaml_block_key(&text) {
                        return self.grown(anchor_indent);
                    }
                    return anchor_indent.to_string();
                }
            }
            number -= 1;
        }
        // Anchor is the opening delimiter: one unit in.
        self.level_string(1)
    }

    fn diagram_indent<D: Document>(
        &self,
        doc: &D,
        bounds: FrontmatterBoundary,
        diagram: DiagramType,
        declaration: Option<usize>,
        line: usize,
    ) -> String {
        if line == 1 {
            return String::new();
        }
        let prev_number = line - 1;
        if bounds.context_of(prev_number) != DocumentContext::Diagram {
            // First line after the frontmatter block.
            return String::new();
        }
        let Some(prev) = doc.line_text(prev_number) else {
            return String::new();
        };
        let prev_indent = leading_whitespace(&prev);
        let prev_trimmed = prev.trim();
        if prev_trimmed.is_empty() || prev_trimmed.starts_with(DIAGRAM_COMMENT) {
            return prev_indent.to_string();
        }
        if declaration == Some(prev_number) {
            return self.grown(prev_indent);
        }
        if diagram.is_indentation_based() {
            // User-controlled hierarchy: never auto-deepen.
            return prev_indent.to_string();
        }
        if opens_block(diagram, prev_trimmed) {
            return self.grown(prev_indent);
        }
        prev_indent.to_string()
    }

    /// `base` plus one indentation unit.
    fn grown(&self, base: &str) -> String {
        if let Some(levels) = self.unit_levels(base) {
            if let Some(cached) = INDENT_STRINGS.lookup(self.unit, levels + 1) {
                return cached.to_string();
            }
        }
        let mut out = String::with_capacity(base.len() + 4);
        out.push_str(base);
        self.unit.push_onto(&mut out);
        out
    }

    fn level_string(&self, levels: usize) -> String {
        if let Some(cached) = INDENT_STRINGS.lookup(self.unit, levels) {
            return cached.to_string();
        }
        let mut out = String::new();
        for _ in 0..levels {
            self.unit.push_onto(&mut out);
        }
        out
    }

    /// Number of whole units `ws` consists of, when it is a pure run.
    fn unit_levels(&self, ws: &str) -> Option<usize> {
        match self.unit {
            IndentUnit::Tabs => ws.bytes().all(|b| b == b'\t').then_some(ws.len()),
            IndentUnit::Spaces(width) => {
                let width = width as usize;
                (width > 0 && ws.bytes().all(|b| b == b' ') && ws.len() % width == 0)
                    .then(|| ws.len() / width)
            }
        }
    }

    /// Remove one unit from the end of `indent`, clamping at zero.
    fn dedent_once(&self, indent: &mut String) {
        if indent.ends_with('\t') {
            indent.pop();
            return;
        }
        let mut removed = 0;
        while removed < self.unit.space_width() && indent.ends_with(' ') {
            indent.pop();
            removed += 1;
        }
    }
}

/// Whether the current line pulls itself back by one unit.
fn dedents(diagram: DiagramType, trimmed: &str) -> bool {
    if trimmed == "}" {
        return true;
    }
    let word = first_word(trimmed);
    if word == "end" {
        return true;
    }
    diagram == DiagramType::Sequence && (word == "else" || word == "and")
}

const SEQUENCE_OPENERS: &[&str] = &[
    "loop", "alt", "else", "opt", "par", "and", "critical", "break", "rect",
];

const REQUIREMENT_OPENERS: &[&str] = &[
    "requirement",
    "functionalRequirement",
    "performanceRequirement",
    "interfaceRequirement",
    "physicalRequirement",
    "designConstraint",
    "element",
];

const C4_BOUNDARY_OPENERS: &[&str] = &[
    "Enterprise_Boundary",
    "System_Boundary",
    "Container_Boundary",
    "Boundary",
];

/// Whether `prev` (a trimmed previous line) opens a block in the given
/// dialect, i.e. the next line should sit one unit deeper.
fn opens_block(diagram: DiagramType, prev: &str) -> bool {
    let word = first_word(prev);
    match diagram {
        DiagramType::Flowchart | DiagramType::FlowchartElk | DiagramType::Graph => {
            word == "subgraph"
        }
        DiagramType::Sequence => SEQUENCE_OPENERS.contains(&word),
        DiagramType::State | DiagramType::StateV2 => word == "state" && prev.ends_with('{'),
        DiagramType::Class | DiagramType::ClassV2 => {
            (word == "class" || word == "namespace") && prev.ends_with('{')
        }
        DiagramType::Block => word.starts_with("block:"),
        DiagramType::Gantt | DiagramType::UserJourney | DiagramType::Timeline => word == "section",
        DiagramType::ArchitectureBeta => word == "group",
        DiagramType::C4Context
        | DiagramType::C4Container
        | DiagramType::C4Component
        | DiagramType::C4Dynamic
        | DiagramType::C4Deployment => {
            let keyword = word.split('(').next().unwrap_or(word);
            C4_BOUNDARY_OPENERS.contains(&keyword)
        }
        DiagramType::Requirement => REQUIREMENT_OPENERS.contains(&word),
        DiagramType::EntityRelationship => prev.ends_with('{') && is_er_identifier(word),
        _ => false,
    }
}

/// ER entity names: letter or underscore first, then letters, digits,
/// underscore, or hyphen.
fn is_er_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// YAML block keys end with `:` (an optional `- ` list marker before,
/// nothing but an optional `#` comment after).
fn is_yaml_block_key(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.starts_with('#') {
        return false;
    }
    let content = trimmed.strip_prefix("- ").unwrap_or(trimmed);
    let Some(colon) = content.find(':') else {
        return false;
    };
    let rest = content[colon + 1..].trim_start();
    rest.is_empty() || rest.starts_with('#')
}

fn leading_whitespace(text: &str) -> &str {
    &text[..text.len() - text.trim_start().len()]
}

/// Minimal YAML colon-spacing fix, confined to the frontmatter content
/// region: insert one space after the first `:` of a `key:value` line.
/// Comments and already-spaced lines are left alone. Processed from the
/// last line backward so in-place insertions keep unprocessed offsets
/// valid.
fn normalize_yaml_spacing<D: Document>(
    doc: &mut D,
    bounds: FrontmatterBoundary,
) -> Result<(), EditError> {
    let (Some(start), Some(end)) = (bounds.start, bounds.end) else {
        return Ok(());
    };
    for number in (start + 1..end).rev() {
        let Some(span) = doc.line(number) else {
            continue;
        };
        let text = doc.text(span.range());
        let trimmed = text.trim_start();
        if trimmed.starts_with('#') || trimmed.starts_with(DIAGRAM_COMMENT) {
            continue;
        }
        let leading = text.len() - trimmed.len();
        let (content, skipped) = match trimmed.strip_prefix("- ") {
            Some(rest) => (rest, leading + 2),
            None => (trimmed, leading),
        };
        let Some(colon) = content.find(':') else {
            continue;
        };
        if let Some(next) = content.as_bytes().get(colon + 1) {
            if !next.is_ascii_whitespace() {
                let at = span.offset + TextSize::new((skipped + colon + 1) as u32);
                doc.insert(at, " ")?;
            }
        }
    }
    Ok(())
}
