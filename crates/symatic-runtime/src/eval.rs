//! The standard evaluation procedure.
//!
//! One `Evaluator` drives one top-level evaluation: it borrows the context
//! and the builtin registry, carries the recursion/iteration counters, and
//! runs the fixed attribute-driven pipeline — head evaluation, hold-aware
//! argument evaluation, sequence splicing, Flat/Orderless normalization,
//! Listable threading, then layered rule dispatch to a fixed point.

use symatic_core::{heads, Attrs, Element, Expr, Symbol};
use symatic_rewrite::rule::apply_rule_with;
use symatic_rewrite::{substitute, Bindings, DefKind, MatchHooks, Rule, RuleSet};

use crate::builtins::BuiltinRegistry;
use crate::context::EvaluationContext;
use crate::error::{EvalError, Result};
use crate::transforms::{canonical_sort, flatten_nested, splice_sequences, thread_listable};

/// Resource ceilings for one top-level evaluation call. Hitting either is
/// fatal to that call; nothing is retried.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub recursion: usize,
    pub iteration: usize,
}

impl Default for Limits {
    fn default() -> Limits {
        Limits {
            recursion: 256,
            iteration: 1000,
        }
    }
}

pub struct Evaluator<'a> {
    context: &'a mut EvaluationContext,
    builtins: &'a BuiltinRegistry,
    limits: Limits,
    depth: usize,
    iterations: usize,
    numeric_mode: bool,
}

/// Evaluate `expr` against `context` with default limits and the given
/// builtin registry.
pub fn evaluate(
    expr: Element,
    context: &mut EvaluationContext,
    builtins: &BuiltinRegistry,
) -> Result<Element> {
    Evaluator::new(context, builtins).run(expr)
}

// Outcome of one pass of the pipeline over a compound expression.
enum Step {
    Stable(Element),
    Rewritten(Element),
}

impl<'a> Evaluator<'a> {
    pub fn new(context: &'a mut EvaluationContext, builtins: &'a BuiltinRegistry) -> Evaluator<'a> {
        Evaluator {
            context,
            builtins,
            limits: Limits::default(),
            depth: 0,
            iterations: 0,
            numeric_mode: false,
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Evaluator<'a> {
        self.limits = limits;
        self
    }

    pub fn context(&mut self) -> &mut EvaluationContext {
        self.context
    }

    pub fn builtins(&self) -> &BuiltinRegistry {
        self.builtins
    }

    /// NValues are consulted only while this is set; the `N` collaborator
    /// flips it around approximation passes.
    pub fn set_numeric_mode(&mut self, on: bool) {
        self.numeric_mode = on;
    }

    pub fn numeric_mode(&self) -> bool {
        self.numeric_mode
    }

    /// Evaluate to a stable expression, resetting the iteration budget. This
    /// is the top-level entry point; builtins re-entering evaluation use
    /// [`Evaluator::eval`] so the counters keep accumulating.
    pub fn run(&mut self, expr: Element) -> Result<Element> {
        self.iterations = 0;
        self.eval(expr)
    }

    pub fn eval(&mut self, expr: Element) -> Result<Element> {
        self.depth += 1;
        if self.depth > self.limits.recursion {
            self.depth -= 1;
            return Err(EvalError::RecursionLimit {
                limit: self.limits.recursion,
            });
        }
        let out = self.eval_element(expr);
        self.depth -= 1;
        out
    }

    fn eval_element(&mut self, mut expr: Element) -> Result<Element> {
        loop {
            let next = match expr {
                Element::Sym(s) => match self.apply_values(DefKind::Own, s, &Element::Sym(s)) {
                    Some(n) => n,
                    None => return Ok(Element::Sym(s)),
                },
                Element::Expr(x) => match self.eval_expr_once(x)? {
                    Step::Stable(e) => return Ok(e),
                    Step::Rewritten(n) => n,
                },
                atom => return Ok(atom),
            };
            self.iterations += 1;
            if self.iterations > self.limits.iteration {
                return Err(EvalError::IterationLimit {
                    limit: self.limits.iteration,
                });
            }
            expr = next;
        }
    }

    // One pass of steps 2-8 over a compound expression. `Rewritten` sends the
    // result back to step 0 via the caller's loop.
    fn eval_expr_once(&mut self, x: Expr) -> Result<Step> {
        // head evaluation, unless the effective attributes hold completely
        let x = if self.effective_attrs(&x).holds_completely() {
            x
        } else {
            let head = self.eval(x.head().clone())?;
            if head != *x.head() {
                x.with_head(head)?
            } else {
                x
            }
        };

        // effective attributes of the (possibly rewritten) head
        let attrs = self.effective_attrs(&x);

        // hold-aware argument evaluation; rebuild only on change
        let mut changed = false;
        let mut tail = Vec::with_capacity(x.len());
        for (i, arg) in x.tail().iter().enumerate() {
            let held = attrs.holds_all()
                || (attrs.contains(Attrs::HOLD_FIRST) && i == 0)
                || (attrs.contains(Attrs::HOLD_REST) && i > 0);
            if held {
                tail.push(arg.clone());
            } else {
                let v = self.eval(arg.clone())?;
                if v != *arg {
                    changed = true;
                }
                tail.push(v);
            }
        }

        // sequence splicing
        if !attrs.intersects(Attrs::SEQUENCE_HOLD | Attrs::HOLD_ALL_COMPLETE) {
            let spliced = splice_sequences(tail.clone());
            if spliced != tail {
                changed = true;
                tail = spliced;
            }
        }

        // structural normalization
        if attrs.contains(Attrs::FLAT) {
            if let Some(h) = x.head_symbol() {
                let flat = flatten_nested(h, tail.clone());
                if flat != tail {
                    changed = true;
                    tail = flat;
                }
            }
        }
        if attrs.contains(Attrs::ORDERLESS) {
            let before = tail.clone();
            canonical_sort(&mut tail);
            if tail != before {
                changed = true;
            }
        }

        let x = if changed { x.with_tail(tail) } else { x };

        // Listable threading evaluates its result and returns early,
        // bypassing rule dispatch for this call.
        if attrs.contains(Attrs::LISTABLE) {
            if let Some(threaded) = thread_listable(&x) {
                return Ok(Step::Stable(self.eval(threaded)?));
            }
        }

        if attrs.contains(Attrs::ONE_IDENTITY) && x.len() == 1 {
            return Ok(Step::Stable(x.tail()[0].clone()));
        }

        self.dispatch(x, attrs)
    }

    // Layered rule dispatch, strict priority order, first success wins.
    fn dispatch(&mut self, x: Expr, attrs: Attrs) -> Result<Step> {
        // The matcher reads structural flags off the expression itself, so
        // the dispatched subject carries the effective attributes; they are
        // invisible to structural equality.
        let subject = Element::Expr(x.with_attrs(x.attrs() | attrs));

        // UpValues of symbol-headed arguments, left to right. HoldAllComplete
        // suppresses them.
        if !attrs.holds_completely() {
            for arg in x.tail() {
                let sym = match arg {
                    Element::Sym(s) => Some(*s),
                    Element::Expr(e) => e.head_symbol(),
                    _ => None,
                };
                if let Some(s) = sym {
                    if let Some(out) = self.apply_values(DefKind::Up, s, &subject) {
                        return Ok(Step::Rewritten(out));
                    }
                }
            }
        }

        // DownValues of the head symbol
        if let Some(h) = x.head_symbol() {
            if let Some(out) = self.apply_values(DefKind::Down, h, &subject) {
                return Ok(Step::Rewritten(out));
            }
        }

        // SubValues of the curried head's root symbol
        if x.head_symbol().is_none() {
            if let Some(root) = x.root_symbol() {
                if let Some(out) = self.apply_values(DefKind::Sub, root, &subject) {
                    return Ok(Step::Rewritten(out));
                }
            }
        }

        // NValues, only in numeric-approximation mode
        if self.numeric_mode {
            if let Some(h) = x.head_symbol() {
                if let Some(out) = self.apply_values(DefKind::N, h, &subject) {
                    return Ok(Step::Rewritten(out));
                }
            }
        }

        // Builtin dispatch, last. A failing builtin degrades to the
        // argument-evaluated expression so the kernel stays live.
        if let Some(h) = x.head_symbol() {
            if let Some(builtin) = self.builtins.lookup(h) {
                match (builtin.apply)(self, &x) {
                    Ok(out) if out != subject => return Ok(Step::Rewritten(out)),
                    Ok(_) | Err(_) => {}
                }
            }
        }

        Ok(Step::Stable(Element::Expr(x)))
    }

    // First matching rule of a category. The replacement is substituted but
    // not evaluated here; every rewrite goes back through step 0 in the
    // caller's loop, which is where the iteration budget is charged.
    fn apply_values(&mut self, kind: DefKind, sym: Symbol, subject: &Element) -> Option<Element> {
        let rules: RuleSet = match self.context.rules(kind, sym) {
            Some(rs) => rs.clone(),
            None => return None,
        };
        for rule in rules.iter() {
            if let Some((out, _binds)) = apply_rule_with(self, rule, subject) {
                return Some(out);
            }
        }
        None
    }

    fn effective_attrs(&self, x: &Expr) -> Attrs {
        let mut attrs = x.attrs();
        if let Some(h) = x.head_symbol() {
            attrs |= self.context.attributes_of(h);
            attrs |= self.builtins.attributes(h);
        }
        attrs
    }
}

/// Apply one rule explicitly: `(result, matched)`. An immediate rule's
/// substituted replacement is evaluated before returning; a delayed rule's is
/// handed back for the caller to re-evaluate.
pub fn apply_rule(ev: &mut Evaluator<'_>, rule: &Rule, expr: &Element) -> Result<(Element, bool)> {
    match apply_rule_with(ev, rule, expr) {
        None => Ok((expr.clone(), false)),
        Some((out, _binds)) => {
            if rule.is_delayed() {
                Ok((out, true))
            } else {
                Ok((ev.eval(out)?, true))
            }
        }
    }
}

/// Try rules in dispatch order (descending priority, list order as
/// tie-break); the first successful rewrite wins, otherwise the expression
/// comes back unchanged.
pub fn try_rules<'r>(
    ev: &mut Evaluator<'_>,
    rules: impl IntoIterator<Item = &'r Rule>,
    expr: &Element,
) -> Result<(Element, bool)> {
    for rule in rules {
        let (out, matched) = apply_rule(ev, rule, expr)?;
        if matched {
            return Ok((out, true));
        }
    }
    Ok((expr.clone(), false))
}

fn is_logical_true(e: &Element) -> bool {
    matches!(e, Element::Bool(true)) || e.as_symbol() == Some(*heads::TRUE)
}

// The evaluator is the matcher's window back into evaluation: pattern tests
// and conditions run through it, and Optional defaults come from the
// context's DefaultValues. A condition whose evaluation fails counts as
// unmet rather than aborting the match.
impl MatchHooks for Evaluator<'_> {
    fn eval_test(&mut self, test: &Element, matched: &Element) -> bool {
        let call = match Expr::new(test.clone(), vec![matched.clone()]) {
            Ok(e) => e,
            Err(_) => return false,
        };
        matches!(self.eval(Element::Expr(call)), Ok(out) if is_logical_true(&out))
    }

    fn eval_cond(&mut self, cond: &Element, binds: &Bindings) -> bool {
        let substituted = substitute(cond, binds);
        matches!(self.eval(substituted), Ok(out) if is_logical_true(&out))
    }

    fn default_for(&mut self, head: Symbol) -> Option<Element> {
        self.context.default_value(head)
    }
}
