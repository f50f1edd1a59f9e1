//! Scope tracking for name resolution.
//!
//! Scopes form a stack of "ribs" — one per block, plus one per loop body so
//! `break`/`continue` validity can be answered by asking "is there a loop
//! rib anywhere below me on the stack", the same question nested blocks
//! answer for variable lookup. A single mutable "current loop" field would
//! forget the outer loop the moment an inner one starts resolving.

use nanoc_util::Symbol;
use std::collections::HashMap;

pub(crate) enum RibKind {
    Block,
    /// Carries the loop's own label so `break`/`continue` can be resolved
    /// to the label of the innermost enclosing loop, not just to "yes,
    /// there is one".
    Loop(Symbol),
}

pub(crate) struct Rib {
    bindings: HashMap<Symbol, Symbol>,
    kind: RibKind,
}

pub(crate) struct Scopes {
    ribs: Vec<Rib>,
}

impl Scopes {
    pub(crate) fn new() -> Self {
        Self {
            ribs: vec![Rib {
                bindings: HashMap::new(),
                kind: RibKind::Block,
            }],
        }
    }

    pub(crate) fn push(&mut self, kind: RibKind) {
        self.ribs.push(Rib {
            bindings: HashMap::new(),
            kind,
        });
    }

    pub(crate) fn pop(&mut self) {
        self.ribs.pop();
    }

    /// Binds `name` to `unique` in the current rib. Returns `false` if
    /// `name` was already declared in this same rib (shadowing an outer
    /// rib's binding is fine; redeclaring in the same one is not).
    pub(crate) fn declare(&mut self, name: Symbol, unique: Symbol) -> bool {
        let top = self.ribs.last_mut().expect("scope stack is never empty");
        if top.bindings.contains_key(&name) {
            false
        } else {
            top.bindings.insert(name, unique);
            true
        }
    }

    /// Resolves `name` to the unique identifier it was declared under,
    /// searching from the innermost rib outward.
    pub(crate) fn resolve(&self, name: Symbol) -> Option<Symbol> {
        self.ribs
            .iter()
            .rev()
            .find_map(|rib| rib.bindings.get(&name).copied())
    }

    /// Whether a loop rib exists anywhere on the current stack.
    pub(crate) fn in_loop(&self) -> bool {
        self.innermost_loop_label().is_some()
    }

    /// The label of the nearest enclosing loop, searching from the
    /// innermost rib outward. `None` means `break`/`continue` here would
    /// have nothing to target.
    pub(crate) fn innermost_loop_label(&self) -> Option<Symbol> {
        self.ribs.iter().rev().find_map(|rib| match rib.kind {
            RibKind::Loop(label) => Some(label),
            RibKind::Block => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_declaration_shadows_outer() {
        let mut scopes = Scopes::new();
        let x = Symbol::intern("x");
        scopes.declare(x, Symbol::intern("x.0"));
        scopes.push(RibKind::Block);
        scopes.declare(x, Symbol::intern("x.1"));
        assert_eq!(scopes.resolve(x), Some(Symbol::intern("x.1")));
        scopes.pop();
        assert_eq!(scopes.resolve(x), Some(Symbol::intern("x.0")));
    }

    #[test]
    fn redeclaring_in_the_same_rib_is_rejected() {
        let mut scopes = Scopes::new();
        let y = Symbol::intern("y");
        assert!(scopes.declare(y, Symbol::intern("y.0")));
        assert!(!scopes.declare(y, Symbol::intern("y.1")));
    }

    #[test]
    fn loop_visibility_survives_nested_blocks() {
        let mut scopes = Scopes::new();
        assert!(!scopes.in_loop());
        scopes.push(RibKind::Loop(Symbol::intern("loop.0")));
        scopes.push(RibKind::Block);
        assert!(scopes.in_loop());
        scopes.pop();
        scopes.pop();
        assert!(!scopes.in_loop());
    }

    #[test]
    fn innermost_loop_label_is_the_nearest_one() {
        let mut scopes = Scopes::new();
        scopes.push(RibKind::Loop(Symbol::intern("loop.0")));
        scopes.push(RibKind::Loop(Symbol::intern("loop.1")));
        assert_eq!(scopes.innermost_loop_label(), Some(Symbol::intern("loop.1")));
        scopes.pop();
        assert_eq!(scopes.innermost_loop_label(), Some(Symbol::intern("loop.0")));
    }
}
