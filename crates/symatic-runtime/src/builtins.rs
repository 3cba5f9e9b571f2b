//! The builtin dispatch interface.
//!
//! Concrete builtin bodies live outside the kernel. The evaluator only needs
//! this lookup surface: given a symbol, an optional native implementation
//! plus its attribute set, invoked when no user rule matched. Registries are
//! plain owned data handed to the evaluator, with optional parent chaining
//! for scoped extension; there is no import-time singleton.

use std::collections::HashMap;
use std::sync::Arc;

use symatic_core::{Attrs, Element, Expr, Symbol};

use crate::error::Result;
use crate::eval::Evaluator;

/// A native implementation: receives the argument-evaluated, normalized
/// expression and the evaluator (for re-entrant evaluation). Errors are
/// caught at the dispatch boundary, not propagated.
pub type NativeFn = fn(&mut Evaluator<'_>, &Expr) -> Result<Element>;

#[derive(Clone, Copy)]
pub struct Builtin {
    pub apply: NativeFn,
    pub attrs: Attrs,
}

#[derive(Default)]
pub struct BuiltinRegistry {
    map: HashMap<Symbol, Builtin>,
    parent: Option<Arc<BuiltinRegistry>>,
}

impl BuiltinRegistry {
    pub fn new() -> BuiltinRegistry {
        BuiltinRegistry::default()
    }

    /// A registry that extends (and can shadow) `parent`.
    pub fn with_parent(parent: Arc<BuiltinRegistry>) -> BuiltinRegistry {
        BuiltinRegistry {
            map: HashMap::new(),
            parent: Some(parent),
        }
    }

    pub fn register(&mut self, name: &str, apply: NativeFn, attrs: Attrs) {
        self.map.insert(Symbol::new(name), Builtin { apply, attrs });
    }

    /// The native implementation for a symbol, checking local entries before
    /// the parent chain.
    pub fn lookup(&self, sym: Symbol) -> Option<Builtin> {
        if let Some(b) = self.map.get(&sym) {
            return Some(*b);
        }
        self.parent.as_deref().and_then(|p| p.lookup(sym))
    }

    pub fn contains(&self, sym: Symbol) -> bool {
        self.lookup(sym).is_some()
    }

    /// Attributes registered for a native head; empty for unknown symbols.
    pub fn attributes(&self, sym: Symbol) -> Attrs {
        self.lookup(sym).map(|b| b.attrs).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forty_two(_ev: &mut Evaluator<'_>, _expr: &Expr) -> Result<Element> {
        Ok(Element::Int(42))
    }

    fn seven(_ev: &mut Evaluator<'_>, _expr: &Expr) -> Result<Element> {
        Ok(Element::Int(7))
    }

    #[test]
    fn lookup_walks_parent_chain_and_shadows() {
        let mut base = BuiltinRegistry::new();
        base.register("f", forty_two, Attrs::LISTABLE);
        base.register("g", forty_two, Attrs::empty());

        let mut scoped = BuiltinRegistry::with_parent(Arc::new(base));
        scoped.register("f", seven, Attrs::empty());

        let f = Symbol::new("f");
        let g = Symbol::new("g");
        assert!(scoped.contains(g));
        assert_eq!(scoped.attributes(f), Attrs::empty());
        assert_eq!(scoped.attributes(g), Attrs::empty());
        assert!(scoped.lookup(Symbol::new("h")).is_none());
    }
}
