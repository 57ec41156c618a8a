//! String interner for identifiers collected during autocomplete scans.
//!
//! Uses `Rc<str>` for cheap cloning (reference count increment instead of
//! allocation). The pool deduplicates strings so identical identifiers seen
//! across many scans share one allocation.
//!
//! The pool is caller-owned and passed explicitly into the scanner: its
//! lifetime and thread ownership are visible at the call site instead of
//! hiding behind ambient static state.

use std::rc::Rc;

use rustc_hash::FxHashSet;

/// An interned string - cheap to clone (just an Rc increment).
pub type IStr = Rc<str>;

/// String interning pool that deduplicates identifiers.
///
/// Interning a string returns an `Rc<str>` that can be cheaply cloned.
/// If the same string is interned multiple times, the same `Rc` is returned.
#[derive(Debug, Default, Clone)]
pub struct Interner {
    strings: FxHashSet<Rc<str>>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning a cheap-to-clone reference.
    ///
    /// If the string was already interned, returns the existing `Rc`.
    pub fn intern(&mut self, s: &str) -> IStr {
        if let Some(existing) = self.strings.get(s) {
            Rc::clone(existing)
        } else {
            let rc: Rc<str> = Rc::from(s);
            self.strings.insert(Rc::clone(&rc));
            rc
        }
    }

    /// Get an interned string if it exists, without creating it.
    pub fn get(&self, s: &str) -> Option<IStr> {
        self.strings.get(s).cloned()
    }

    /// Number of unique strings interned.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns true if no strings have been interned.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Drop all interned strings.
    pub fn clear(&mut self) {
        self.strings.clear();
    }
}
