//! Per-symbol definition storage: the seven value categories consulted
//! during rule dispatch.

use std::collections::HashMap;

use symatic_core::Symbol;

use crate::rule::RuleSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefKind {
    /// `x -> value`: the symbol itself rewrites.
    Own,
    /// `f[args] -> value`: ordinary function definitions.
    Down,
    /// `g[.. f ..] -> value`: definitions attached to an argument's symbol.
    Up,
    /// `f[a][b] -> value`: definitions on a curried head's root symbol.
    Sub,
    /// Numeric-approximation rewrites, consulted only under `N`.
    N,
    /// Defaults supplied for absent `Optional` arguments.
    Default,
    /// Output-form rewrites.
    Format,
}

impl DefKind {
    pub const ALL: [DefKind; 7] = [
        DefKind::Own,
        DefKind::Down,
        DefKind::Up,
        DefKind::Sub,
        DefKind::N,
        DefKind::Default,
        DefKind::Format,
    ];
}

#[derive(Debug, Default)]
pub struct DefinitionStore {
    own: HashMap<Symbol, RuleSet>,
    down: HashMap<Symbol, RuleSet>,
    up: HashMap<Symbol, RuleSet>,
    sub: HashMap<Symbol, RuleSet>,
    n: HashMap<Symbol, RuleSet>,
    default: HashMap<Symbol, RuleSet>,
    format: HashMap<Symbol, RuleSet>,
}

impl DefinitionStore {
    pub fn new() -> DefinitionStore {
        DefinitionStore::default()
    }

    fn map(&self, kind: DefKind) -> &HashMap<Symbol, RuleSet> {
        match kind {
            DefKind::Own => &self.own,
            DefKind::Down => &self.down,
            DefKind::Up => &self.up,
            DefKind::Sub => &self.sub,
            DefKind::N => &self.n,
            DefKind::Default => &self.default,
            DefKind::Format => &self.format,
        }
    }

    fn map_mut(&mut self, kind: DefKind) -> &mut HashMap<Symbol, RuleSet> {
        match kind {
            DefKind::Own => &mut self.own,
            DefKind::Down => &mut self.down,
            DefKind::Up => &mut self.up,
            DefKind::Sub => &mut self.sub,
            DefKind::N => &mut self.n,
            DefKind::Default => &mut self.default,
            DefKind::Format => &mut self.format,
        }
    }

    pub fn rules(&self, kind: DefKind, sym: Symbol) -> Option<&RuleSet> {
        self.map(kind).get(&sym)
    }

    pub fn rules_mut(&mut self, kind: DefKind, sym: Symbol) -> &mut RuleSet {
        self.map_mut(kind).entry(sym).or_default()
    }

    /// Drop one category for a symbol.
    pub fn clear(&mut self, kind: DefKind, sym: Symbol) {
        self.map_mut(kind).remove(&sym);
    }

    /// Drop every category for a symbol.
    pub fn clear_symbol(&mut self, sym: Symbol) {
        for kind in DefKind::ALL {
            self.clear(kind, sym);
        }
    }

    /// Symbols that have at least one definition in `kind`.
    pub fn symbols(&self, kind: DefKind) -> impl Iterator<Item = Symbol> + '_ {
        self.map(kind).keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;
    use symatic_core::Element;

    #[test]
    fn categories_are_independent() {
        let f = Symbol::new("f");
        let mut store = DefinitionStore::new();
        store
            .rules_mut(DefKind::Down, f)
            .push(Rule::immediate(Element::symbol("a"), 1.into()));
        assert!(store.rules(DefKind::Down, f).is_some());
        assert!(store.rules(DefKind::Up, f).is_none());

        store.clear(DefKind::Down, f);
        assert!(store.rules(DefKind::Down, f).is_none());
    }

    #[test]
    fn clear_symbol_sweeps_all_categories() {
        let f = Symbol::new("f");
        let mut store = DefinitionStore::new();
        for kind in DefKind::ALL {
            store
                .rules_mut(kind, f)
                .push(Rule::immediate(Element::symbol("a"), 1.into()));
        }
        store.clear_symbol(f);
        for kind in DefKind::ALL {
            assert!(store.rules(kind, f).is_none());
        }
    }
}
