//! Evaluation contexts: per-symbol attributes and the seven value categories,
//! with optional chaining to a parent context for fallback lookup.
//!
//! A context owns its maps and is mutated only through the definition API
//! below. Parents are shared read-only; definition operations always land in
//! the local context. Sharing one context across concurrent evaluators
//! requires the caller to serialize writers; read-only evaluation against a
//! context that is not being redefined is safe.

use std::collections::HashMap;
use std::sync::Arc;

use symatic_core::{Attrs, Element, Symbol};
use symatic_rewrite::{DefKind, DefinitionStore, Rule, RuleSet};

use crate::error::{EvalError, Result};

#[derive(Debug, Default)]
pub struct EvaluationContext {
    name: String,
    parent: Option<Arc<EvaluationContext>>,
    attributes: HashMap<Symbol, Attrs>,
    store: DefinitionStore,
}

impl EvaluationContext {
    pub fn new(name: &str) -> EvaluationContext {
        EvaluationContext {
            name: name.to_string(),
            ..EvaluationContext::default()
        }
    }

    /// A nested scope that falls back to `parent` for anything not defined
    /// locally.
    pub fn with_parent(name: &str, parent: Arc<EvaluationContext>) -> EvaluationContext {
        EvaluationContext {
            name: name.to_string(),
            parent: Some(parent),
            ..EvaluationContext::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // --- attributes ---

    /// Attributes of a symbol, walking the parent chain when the symbol has
    /// no local entry.
    pub fn attributes_of(&self, sym: Symbol) -> Attrs {
        if let Some(attrs) = self.attributes.get(&sym) {
            return *attrs;
        }
        match &self.parent {
            Some(p) => p.attributes_of(sym),
            None => Attrs::empty(),
        }
    }

    pub fn has_attribute(&self, sym: Symbol, attr: Attrs) -> bool {
        self.attributes_of(sym).contains(attr)
    }

    /// Replace a symbol's attribute set. Refused while the symbol is locked.
    pub fn set_attributes(&mut self, sym: Symbol, attrs: Attrs) -> Result<()> {
        if self.attributes_of(sym).contains(Attrs::LOCKED) {
            return Err(EvalError::Protected(sym));
        }
        self.attributes.insert(sym, attrs);
        Ok(())
    }

    /// Add attributes to a symbol's existing set.
    pub fn add_attributes(&mut self, sym: Symbol, attrs: Attrs) -> Result<()> {
        let merged = self.attributes_of(sym) | attrs;
        self.set_attributes(sym, merged)
    }

    /// Drop a symbol's local attribute entry. Refused while locked.
    pub fn clear_attributes(&mut self, sym: Symbol) -> Result<()> {
        if self.attributes_of(sym).contains(Attrs::LOCKED) {
            return Err(EvalError::Protected(sym));
        }
        self.attributes.remove(&sym);
        Ok(())
    }

    // --- definitions ---

    /// Rules of one category for a symbol, walking the parent chain when the
    /// symbol has no local entry.
    pub fn rules(&self, kind: DefKind, sym: Symbol) -> Option<&RuleSet> {
        if let Some(rs) = self.store.rules(kind, sym) {
            return Some(rs);
        }
        self.parent.as_deref().and_then(|p| p.rules(kind, sym))
    }

    /// Attach a rule to a symbol's value category. This is the only way
    /// definitions enter a context; the protection flags guard it.
    pub fn define(&mut self, kind: DefKind, sym: Symbol, rule: Rule) -> Result<()> {
        self.check_writable(sym)?;
        self.store.rules_mut(kind, sym).push(rule);
        Ok(())
    }

    /// Clear one category for a symbol, or every category when `kind` is
    /// `None`.
    pub fn clear_values(&mut self, sym: Symbol, kind: Option<DefKind>) -> Result<()> {
        self.check_writable(sym)?;
        match kind {
            Some(k) => self.store.clear(k, sym),
            None => self.store.clear_symbol(sym),
        }
        Ok(())
    }

    /// Register the value supplied for an absent `Optional` argument of
    /// `sym`. Stored as a DefaultValues rule so the category stays uniform
    /// with the other six.
    pub fn set_default_value(&mut self, sym: Symbol, value: Element) -> Result<()> {
        self.check_writable(sym)?;
        let rules = self.store.rules_mut(DefKind::Default, sym);
        rules.clear();
        rules.push(Rule::immediate(Element::Sym(sym), value));
        Ok(())
    }

    /// The default supplied for absent `Optional` arguments of `sym`.
    pub fn default_value(&self, sym: Symbol) -> Option<Element> {
        self.rules(DefKind::Default, sym)
            .and_then(|rs| rs.iter().next())
            .map(|r| r.rhs.clone())
    }

    /// Definitions on a protected symbol are refused; the protection must be
    /// removed first.
    fn check_writable(&self, sym: Symbol) -> Result<()> {
        if self
            .attributes_of(sym)
            .intersects(Attrs::PROTECTED | Attrs::LOCKED)
        {
            return Err(EvalError::Protected(sym));
        }
        Ok(())
    }
}

// Convenience wrappers matching the definition API surface: one per rule
// category that dispatch consults.

pub fn define_own_value(ctx: &mut EvaluationContext, sym: Symbol, rule: Rule) -> Result<()> {
    ctx.define(DefKind::Own, sym, rule)
}

pub fn define_down_value(ctx: &mut EvaluationContext, sym: Symbol, rule: Rule) -> Result<()> {
    ctx.define(DefKind::Down, sym, rule)
}

pub fn define_up_value(ctx: &mut EvaluationContext, sym: Symbol, rule: Rule) -> Result<()> {
    ctx.define(DefKind::Up, sym, rule)
}

pub fn define_sub_value(ctx: &mut EvaluationContext, sym: Symbol, rule: Rule) -> Result<()> {
    ctx.define(DefKind::Sub, sym, rule)
}

pub fn define_n_value(ctx: &mut EvaluationContext, sym: Symbol, rule: Rule) -> Result<()> {
    ctx.define(DefKind::N, sym, rule)
}

pub fn define_format_value(ctx: &mut EvaluationContext, sym: Symbol, rule: Rule) -> Result<()> {
    ctx.define(DefKind::Format, sym, rule)
}
