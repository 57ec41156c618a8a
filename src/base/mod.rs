//! Foundation types for the diagmark core.
//!
//! This module provides fundamental types used throughout the library:
//! - [`LineSpan`] - a line's extent in the buffer (byte offsets)
//! - [`Interner`], [`IStr`] - string interning for scanned identifiers
//!
//! This module has NO dependencies on other diagmark modules.

mod intern;
mod line;

pub use intern::{IStr, Interner};
pub use line::LineSpan;

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
