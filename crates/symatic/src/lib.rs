//! A term-rewriting kernel for a Wolfram-Language-style symbolic computation
//! language: immutable expression trees rewritten to normal form by matching
//! patterns against sub-expressions and substituting bound values, under the
//! attribute-driven standard evaluation procedure.
//!
//! The workspace splits into three layers, re-exported here:
//! - `symatic-core`: interned symbols, the `Element` tree, attributes;
//! - `symatic-rewrite`: bindings, pattern constructs, the backtracking
//!   matcher, rules, and per-symbol definition storage;
//! - `symatic-runtime`: evaluation contexts, the builtin dispatch interface,
//!   and the evaluator.
//!
//! [`Kernel`] bundles a global context and a builtin registry behind one
//! evaluate entry point:
//!
//! ```
//! use symatic::{Element, Kernel, Rule, Symbol};
//! use symatic::pattern::named_blank;
//!
//! let mut kernel = Kernel::new();
//! let f = Symbol::new("f");
//! let x = Symbol::new("x");
//! kernel
//!     .context_mut()
//!     .define(
//!         symatic::DefKind::Down,
//!         f,
//!         Rule::delayed(
//!             Element::call(f, vec![named_blank(x)]),
//!             Element::list(vec![x.into(), x.into()]),
//!         ),
//!     )
//!     .unwrap();
//! let out = kernel.evaluate(Element::call(f, vec![7.into()])).unwrap();
//! assert_eq!(out, Element::list(vec![7.into(), 7.into()]));
//! ```

pub use symatic_core::{
    canonical_cmp, format_element, gensym, heads, reset_interner, Attrs, CoreError, Element, Expr,
    Symbol,
};
pub use symatic_rewrite::pattern;
pub use symatic_rewrite::{
    match_expr, match_sequence, match_with, replace_all, replace_repeated, substitute,
    BindingConflict, Bindings, DefKind, MatchHooks, MatchResult, NoHooks, Rule, RuleKind, RuleSet,
};
pub use symatic_runtime::{
    evaluate, Builtin, BuiltinRegistry, EvalError, EvaluationContext, Evaluator, Limits, NativeFn,
};

/// A ready-to-use kernel: one global evaluation context plus a builtin
/// registry. Construction is purely programmatic; builtin bodies come from
/// the host through [`BuiltinRegistry`].
pub struct Kernel {
    context: EvaluationContext,
    builtins: BuiltinRegistry,
    limits: Limits,
}

impl Default for Kernel {
    fn default() -> Kernel {
        Kernel::new()
    }
}

impl Kernel {
    pub fn new() -> Kernel {
        Kernel {
            context: EvaluationContext::new("Global"),
            builtins: BuiltinRegistry::new(),
            limits: Limits::default(),
        }
    }

    pub fn with_builtins(builtins: BuiltinRegistry) -> Kernel {
        Kernel {
            context: EvaluationContext::new("Global"),
            builtins,
            limits: Limits::default(),
        }
    }

    pub fn set_limits(&mut self, limits: Limits) {
        self.limits = limits;
    }

    pub fn context(&self) -> &EvaluationContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut EvaluationContext {
        &mut self.context
    }

    pub fn builtins(&self) -> &BuiltinRegistry {
        &self.builtins
    }

    pub fn builtins_mut(&mut self) -> &mut BuiltinRegistry {
        &mut self.builtins
    }

    /// Evaluate `expr` to a stable expression against this kernel's context.
    pub fn evaluate(&mut self, expr: Element) -> Result<Element, EvalError> {
        Evaluator::new(&mut self.context, &self.builtins)
            .with_limits(self.limits)
            .run(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symatic_rewrite::pattern::named_blank;

    #[test]
    fn kernel_evaluates_with_definitions() {
        let mut kernel = Kernel::new();
        let f = Symbol::new("f");
        kernel
            .context_mut()
            .define(
                DefKind::Down,
                f,
                Rule::delayed(
                    Element::call(f, vec![named_blank(Symbol::new("x"))]),
                    Element::symbol("x"),
                ),
            )
            .unwrap();
        let out = kernel.evaluate(Element::call(f, vec![5.into()])).unwrap();
        assert_eq!(out, Element::Int(5));
    }

    #[test]
    fn kernel_limits_apply() {
        let mut kernel = Kernel::new();
        kernel.set_limits(Limits {
            recursion: 8,
            iteration: 4,
        });
        let f = Symbol::new("f");
        kernel
            .context_mut()
            .define(
                DefKind::Down,
                f,
                Rule::delayed(
                    Element::call(f, vec![named_blank(Symbol::new("x"))]),
                    Element::call(f, vec![Element::symbol("x")]),
                ),
            )
            .unwrap();
        let out = kernel.evaluate(Element::call(f, vec![1.into()]));
        assert_eq!(out, Err(EvalError::IterationLimit { limit: 4 }));
    }
}
