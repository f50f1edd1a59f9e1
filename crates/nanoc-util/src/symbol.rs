//! String interning.
//!
//! Identifiers flow through every stage of the pipeline (lexer → parser →
//! semantic analysis → TAC), and the semantic pass mints a fresh name for
//! every declaration. Interning means a [`Symbol`] is a cheap `Copy` key
//! instead of a heap-allocated `String` being cloned at each stage.

use std::cell::RefCell;
use std::collections::HashMap;

/// An interned string.
///
/// Two symbols compare equal iff their underlying strings are equal, so
/// `Symbol` can be hashed and compared in `O(1)` instead of comparing bytes.
///
/// # Examples
///
/// ```
/// use nanoc_util::Symbol;
///
/// let a = Symbol::intern("counter");
/// let b = Symbol::intern("counter");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "counter");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(u32);

struct Interner {
    strings: Vec<&'static str>,
    indices: HashMap<&'static str, u32>,
}

impl Interner {
    fn new() -> Self {
        Self {
            strings: Vec::new(),
            indices: HashMap::new(),
        }
    }

    fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&idx) = self.indices.get(s) {
            return Symbol(idx);
        }
        // Compilation is a one-shot, short-lived process, so we leak the
        // string rather than manage an arena lifetime through every stage.
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let idx = self.strings.len() as u32;
        self.strings.push(leaked);
        self.indices.insert(leaked, idx);
        Symbol(idx)
    }

    fn resolve(&self, sym: Symbol) -> &'static str {
        self.strings[sym.0 as usize]
    }
}

thread_local! {
    static INTERNER: RefCell<Interner> = RefCell::new(Interner::new());
}

impl Symbol {
    /// Interns `s`, returning the symbol for it. Interning the same string
    /// twice returns the same symbol.
    pub fn intern(s: &str) -> Self {
        INTERNER.with(|i| i.borrow_mut().intern(s))
    }

    /// Returns the underlying string.
    pub fn as_str(self) -> &'static str {
        INTERNER.with(|i| i.borrow().resolve(self))
    }
}

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_string_interns_to_same_symbol() {
        assert_eq!(Symbol::intern("foo"), Symbol::intern("foo"));
    }

    #[test]
    fn distinct_strings_intern_distinctly() {
        assert_ne!(Symbol::intern("foo_a"), Symbol::intern("foo_b"));
    }

    #[test]
    fn round_trips_through_as_str() {
        assert_eq!(Symbol::intern("round_trip").as_str(), "round_trip");
    }
}
