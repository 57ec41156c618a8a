//! # diagmark-base
//!
//! Core library for diagram-markup documents: incremental structure
//! analysis, context-aware indentation, comment toggling, and identifier
//! scanning for autocomplete.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide        → editing features (indentation, commenting, token scanning)
//!   ↓
//! structure  → frontmatter boundary + diagram-dialect analysis, cached
//!   ↓
//! document   → text-buffer collaborator traits, reference implementation
//!   ↓
//! base       → primitives (LineSpan, string interning)
//! ```
//!
//! The library never owns the text buffer: everything above `document`
//! works against the [`Document`] trait, which a host editor implements
//! over its own buffer. [`MemoryDocument`] is a simple in-memory
//! implementation used by the test suite and by embedders that have no
//! editor of their own.

// ============================================================================
// MODULES (dependency order: base → document → structure → ide)
// ============================================================================

/// Foundation types: LineSpan, string interning
pub mod base;

/// Text-buffer collaborator contract and in-memory reference implementation
pub mod document;

/// Structure analysis: frontmatter boundary, diagram dialect, versioned caches
pub mod structure;

/// Editing features: indentation, comment toggling, identifier scanning
pub mod ide;

// Re-export foundation and contract types
pub use base::{IStr, Interner, LineSpan};
pub use document::{
    ChangeDelta, Document, DocumentVersion, EditError, MemoryDocument, VersionError,
};
pub use ide::{
    IndentUnit, IndentationEngine, comment_selection, scan_identifiers, uncomment_selection,
};
pub use structure::{DiagramType, DocumentContext, FrontmatterBoundary, StructureAnalyzer};
