//! Editing features built on the structure analyzer.
//!
//! Indentation, comment toggling, and identifier scanning. Everything here
//! is a synchronous call on the thread owning the document; batch
//! operations bracket their mutations in one undo step and roll back on
//! failure.

pub mod comment;
pub mod indent;
pub mod scanner;

pub use comment::{comment_selection, uncomment_selection};
pub use indent::{IndentUnit, IndentationEngine};
pub use scanner::scan_identifiers;
