//! Rewrite drivers for explicit rule application outside the evaluator loop.
//!
//! `replace_all` is a single top-down pass: at each node the rules are tried
//! in order and the first match rewrites that node without further descent
//! into the replacement. `replace_repeated` iterates `replace_all` to a fixed
//! point under an iteration ceiling.

use symatic_core::{heads, Element};

use crate::matcher::MatchHooks;
use crate::rule::{try_rules_with, Rule};

/// One top-down pass of `rules` over `expr`.
pub fn replace_all(hooks: &mut dyn MatchHooks, expr: &Element, rules: &[Rule]) -> Element {
    if let Some((out, _)) = try_rules_with(hooks, rules.iter(), expr) {
        return out;
    }
    match expr {
        Element::Expr(x) => {
            let head = replace_all(hooks, x.head(), rules);
            let mut tail = Vec::with_capacity(x.len());
            for arg in x.tail() {
                let replaced = replace_all(hooks, arg, rules);
                if let Element::Expr(rx) = &replaced {
                    if rx.head_symbol() == Some(*heads::SEQUENCE) {
                        tail.extend(rx.tail().iter().cloned());
                        continue;
                    }
                }
                tail.push(replaced);
            }
            let head = if head.is_valid_head() {
                head
            } else {
                x.head().clone()
            };
            match symatic_core::Expr::new(head, tail) {
                Ok(e) => Element::Expr(e.with_attrs(x.attrs())),
                Err(_) => expr.clone(),
            }
        }
        other => other.clone(),
    }
}

/// Iterate `replace_all` until nothing changes or `limit` passes are spent.
/// Returns the last result either way; hitting the ceiling is not an error
/// here, since explicit rewriting is caller-driven.
pub fn replace_repeated(
    hooks: &mut dyn MatchHooks,
    expr: &Element,
    rules: &[Rule],
    limit: usize,
) -> Element {
    let mut current = expr.clone();
    for _ in 0..limit {
        let next = replace_all(hooks, &current, rules);
        if next == current {
            return current;
        }
        current = next;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::NoHooks;
    use crate::pattern::named_blank;
    use crate::rule::Rule;
    use symatic_core::Symbol;

    fn call(h: &str, tail: Vec<Element>) -> Element {
        Element::call(Symbol::new(h), tail)
    }

    #[test]
    fn replace_all_rewrites_each_subtree_once() {
        let x = Symbol::new("x");
        let rules = [Rule::delayed(call("f", vec![named_blank(x)]), x.into())];
        let target = Element::list(vec![call("f", vec![1.into()]), call("f", vec![2.into()])]);
        let out = replace_all(&mut NoHooks, &target, &rules);
        assert_eq!(out, Element::list(vec![1.into(), 2.into()]));
    }

    #[test]
    fn replace_all_splices_sequence_results() {
        let xs = Symbol::new("xs");
        let rules = [Rule::delayed(
            call(
                "f",
                vec![crate::pattern::pattern(
                    xs,
                    crate::pattern::blank_sequence(None),
                )],
            ),
            xs.into(),
        )];
        let target = call("g", vec![call("f", vec![1.into(), 2.into()]), 9.into()]);
        let out = replace_all(&mut NoHooks, &target, &rules);
        assert_eq!(out, call("g", vec![1.into(), 2.into(), 9.into()]));
    }

    #[test]
    fn replace_repeated_reaches_fixed_point() {
        let rules = [
            Rule::immediate(Element::symbol("a"), Element::symbol("b")),
            Rule::immediate(Element::symbol("b"), Element::symbol("c")),
        ];
        let out = replace_repeated(&mut NoHooks, &Element::symbol("a"), &rules, 64);
        assert_eq!(out, Element::symbol("c"));
    }

    #[test]
    fn replace_repeated_stops_at_limit() {
        // a -> f[a] grows forever; the ceiling bounds the number of passes.
        let rules = [Rule::delayed(
            Element::symbol("a"),
            call("f", vec![Element::symbol("a")]),
        )];
        let out = replace_repeated(&mut NoHooks, &Element::symbol("a"), &rules, 3);
        let expected = call("f", vec![call("f", vec![call("f", vec![Element::symbol("a")])])]);
        assert_eq!(out, expected);
    }
}
