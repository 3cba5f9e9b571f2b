//! Rewrite rules and ordered rule sets.

use serde::{Deserialize, Serialize};

use symatic_core::Element;

use crate::bindings::Bindings;
use crate::matcher::{match_with, substitute, MatchHooks};

/// Immediate rules (`->`) have their replacement evaluated as part of
/// application; delayed rules (`:>`) substitute only and leave re-evaluation
/// to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleKind {
    Immediate,
    Delayed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub lhs: Element,
    pub rhs: Element,
    pub kind: RuleKind,
    pub condition: Option<Element>,
    pub priority: i32,
}

impl Rule {
    pub fn immediate(lhs: Element, rhs: Element) -> Rule {
        Rule {
            lhs,
            rhs,
            kind: RuleKind::Immediate,
            condition: None,
            priority: 0,
        }
    }

    pub fn delayed(lhs: Element, rhs: Element) -> Rule {
        Rule {
            lhs,
            rhs,
            kind: RuleKind::Delayed,
            condition: None,
            priority: 0,
        }
    }

    pub fn with_condition(mut self, condition: Element) -> Rule {
        self.condition = Some(condition);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Rule {
        self.priority = priority;
        self
    }

    pub fn is_delayed(&self) -> bool {
        self.kind == RuleKind::Delayed
    }
}

/// Rules kept in dispatch order: descending priority, stable insertion order
/// as tie-break. Iterating a `RuleSet` visits rules in the order they are
/// tried.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet(Vec<Rule>);

impl RuleSet {
    pub fn new() -> RuleSet {
        RuleSet(Vec::new())
    }

    /// Insert keeping dispatch order; a new rule goes after existing rules of
    /// the same priority.
    pub fn push(&mut self, rule: Rule) {
        let at = self
            .0
            .iter()
            .position(|r| r.priority < rule.priority)
            .unwrap_or(self.0.len());
        self.0.insert(at, rule);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Try a single rule. On a match, checks the rule's condition (with bindings
/// substituted) through the hooks, then returns the substituted replacement
/// and the bindings that produced it. Evaluating an immediate rule's result
/// is the caller's job; this layer never evaluates.
pub fn apply_rule_with(
    hooks: &mut dyn MatchHooks,
    rule: &Rule,
    expr: &Element,
) -> Option<(Element, Bindings)> {
    let result = match_with(hooks, &rule.lhs, expr, Bindings::new());
    if !result.success {
        return None;
    }
    if let Some(cond) = &rule.condition {
        if !hooks.eval_cond(cond, &result.bindings) {
            return None;
        }
    }
    let replaced = substitute(&rule.rhs, &result.bindings);
    Some((replaced, result.bindings))
}

/// Try rules in dispatch order; first success wins. `None` means no rule
/// applied and the expression stands unchanged.
pub fn try_rules_with<'a>(
    hooks: &mut dyn MatchHooks,
    rules: impl IntoIterator<Item = &'a Rule>,
    expr: &Element,
) -> Option<(Element, &'a Rule)> {
    for rule in rules {
        if let Some((out, _)) = apply_rule_with(hooks, rule, expr) {
            return Some((out, rule));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::NoHooks;
    use crate::pattern::named_blank;
    use symatic_core::Symbol;

    fn call(h: &str, tail: Vec<Element>) -> Element {
        Element::call(Symbol::new(h), tail)
    }

    #[test]
    fn priority_orders_dispatch() {
        let mut rs = RuleSet::new();
        rs.push(Rule::immediate(Element::symbol("a"), 1.into()));
        rs.push(Rule::immediate(Element::symbol("a"), 2.into()).with_priority(10));
        rs.push(Rule::immediate(Element::symbol("a"), 3.into()));

        let priorities: Vec<i32> = rs.iter().map(|r| r.priority).collect();
        assert_eq!(priorities, vec![10, 0, 0]);

        let (out, _) = try_rules_with(&mut NoHooks, rs.iter(), &Element::symbol("a")).unwrap();
        assert_eq!(out, Element::Int(2));
    }

    #[test]
    fn equal_priority_keeps_insertion_order() {
        let mut rs = RuleSet::new();
        rs.push(Rule::immediate(Element::symbol("a"), 1.into()));
        rs.push(Rule::immediate(Element::symbol("a"), 2.into()));
        let (out, _) = try_rules_with(&mut NoHooks, rs.iter(), &Element::symbol("a")).unwrap();
        assert_eq!(out, Element::Int(1));
    }

    #[test]
    fn apply_rule_substitutes_bindings() {
        let x = Symbol::new("x");
        let rule = Rule::delayed(
            call("f", vec![named_blank(x)]),
            call("g", vec![x.into(), x.into()]),
        );
        let (out, binds) =
            apply_rule_with(&mut NoHooks, &rule, &call("f", vec![7.into()])).unwrap();
        assert_eq!(out, call("g", vec![7.into(), 7.into()]));
        assert_eq!(binds.get(x), Some(&Element::Int(7)));
    }

    #[test]
    fn no_match_leaves_expression_alone() {
        let rule = Rule::immediate(call("f", vec![named_blank(Symbol::new("x"))]), 0.into());
        assert!(apply_rule_with(&mut NoHooks, &rule, &call("g", vec![1.into()])).is_none());
    }
}
