//! The backtracking pattern matcher.
//!
//! Mismatch is the expected branch of every probe here, so it is a value
//! (`MatchResult` with `success == false`), never an error. Binding conflicts
//! raised while extending a partial match are likewise consumed as plain
//! mismatches.

use symatic_core::{heads, Attrs, Element, Expr, Symbol};

use crate::bindings::Bindings;
use crate::pattern::{
    as_optional, as_repeated, as_sequence_pattern, blank_matches_head, min_arguments,
    pattern_inner, pattern_name,
};

/// Evaluation hooks the matcher calls out through. The evaluator implements
/// this; matching in isolation uses [`NoHooks`], which accepts the structural
/// match without running tests or conditions.
pub trait MatchHooks {
    /// `PatternTest`: must `test[matched]` evaluate to logical true?
    fn eval_test(&mut self, test: &Element, matched: &Element) -> bool {
        let _ = (test, matched);
        true
    }

    /// `Condition`: must `cond`, with `binds` substituted in, evaluate to
    /// logical true?
    fn eval_cond(&mut self, cond: &Element, binds: &Bindings) -> bool {
        let _ = (cond, binds);
        true
    }

    /// Fallback default for a one-argument `Optional` under head `head`
    /// (the head's DefaultValues entry, when the evaluator is driving).
    fn default_for(&mut self, head: Symbol) -> Option<Element> {
        let _ = head;
        None
    }
}

/// Hook-free matching: structural only.
pub struct NoHooks;

impl MatchHooks for NoHooks {}

/// Outcome of a match attempt. Failure is a value, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub success: bool,
    pub bindings: Bindings,
}

impl MatchResult {
    pub fn matched(bindings: Bindings) -> MatchResult {
        MatchResult {
            success: true,
            bindings,
        }
    }

    pub fn failure() -> MatchResult {
        MatchResult {
            success: false,
            bindings: Bindings::new(),
        }
    }
}

/// Match `pattern` against `expr` with no evaluation hooks.
pub fn match_expr(pattern: &Element, expr: &Element) -> MatchResult {
    match_with(&mut NoHooks, pattern, expr, Bindings::new())
}

/// Match `pattern` against `expr`, extending `binds`.
pub fn match_with(
    hooks: &mut dyn MatchHooks,
    pattern: &Element,
    expr: &Element,
    binds: Bindings,
) -> MatchResult {
    match match_impl(hooks, pattern, expr, &binds) {
        Some(b) => MatchResult::matched(b),
        None => MatchResult::failure(),
    }
}

/// Match an argument-list of patterns against an argument-list of elements
/// with no enclosing expression (so no Orderless reordering).
pub fn match_sequence(patterns: &[Element], elements: &[Element]) -> MatchResult {
    match match_sequence_impl(
        &mut NoHooks,
        None,
        patterns,
        elements,
        &Bindings::new(),
        false,
    ) {
        Some(b) => MatchResult::matched(b),
        None => MatchResult::failure(),
    }
}

// Dispatch on pattern shape, in fixed priority order: HoldPattern, Verbatim,
// Blank, Pattern, Condition, Alternatives, PatternTest, Except, then literal
// atoms/symbols, then compound structure.
fn match_impl(
    hooks: &mut dyn MatchHooks,
    pattern: &Element,
    expr: &Element,
    binds: &Bindings,
) -> Option<Bindings> {
    if let Element::Expr(p) = pattern {
        if let Some(h) = p.head_symbol() {
            if h == *heads::HOLD_PATTERN && p.len() == 1 {
                return match_impl(hooks, &p.tail()[0], expr, binds);
            }
            if h == *heads::VERBATIM {
                let lit = p.tail().first()?;
                return (lit == expr).then(|| binds.clone());
            }
            if h == *heads::BLANK {
                return blank_matches_head(p, expr).then(|| binds.clone());
            }
            if h == *heads::PATTERN && p.len() == 2 {
                let name = pattern_name(pattern)?;
                let inner = pattern_inner(pattern)?;
                let b = match_impl(hooks, inner, expr, binds)?;
                return b.bind(name, expr.clone()).ok();
            }
            if h == *heads::CONDITION && p.len() == 2 {
                let b = match_impl(hooks, &p.tail()[0], expr, binds)?;
                return hooks.eval_cond(&p.tail()[1], &b).then_some(b);
            }
            if h == *heads::ALTERNATIVES {
                for alt in p.tail() {
                    if let Some(b) = match_impl(hooks, alt, expr, binds) {
                        return Some(b);
                    }
                }
                return None;
            }
            if h == *heads::PATTERN_TEST && p.len() == 2 {
                let b = match_impl(hooks, &p.tail()[0], expr, binds)?;
                return hooks.eval_test(&p.tail()[1], expr).then_some(b);
            }
            if h == *heads::EXCEPT && !p.is_empty() {
                if match_impl(hooks, &p.tail()[0], expr, binds).is_some() {
                    return None;
                }
                if let Some(alt) = p.tail().get(1) {
                    return match_impl(hooks, alt, expr, binds);
                }
                return Some(binds.clone());
            }
        }
    }

    match (pattern, expr) {
        (Element::Expr(p), Element::Expr(e)) => {
            let head_binds = match_impl(hooks, p.head(), e.head(), binds)?;
            // Structural flags are read off the subject expression itself;
            // the evaluator stamps effective attributes onto the expression
            // it dispatches, and attrs are invisible to structural equality.
            let orderless = e.attrs().contains(Attrs::ORDERLESS);
            match_sequence_impl(
                hooks,
                e.head_symbol(),
                p.tail(),
                e.tail(),
                &head_binds,
                orderless,
            )
        }
        (Element::Expr(_), _) => None,
        _ => (pattern == expr).then(|| binds.clone()),
    }
}

fn min_required(patterns: &[Element]) -> usize {
    patterns.iter().map(min_arguments).sum()
}

// Argument-list matching. A leading sequence blank tries candidate run
// lengths ascending from its minimum; the first length for which the entire
// remaining match succeeds wins. Under Orderless the leading pattern is tried
// against every remaining element, retrying the next candidate when the rest
// of the match fails.
fn match_sequence_impl(
    hooks: &mut dyn MatchHooks,
    head: Option<Symbol>,
    patterns: &[Element],
    elements: &[Element],
    binds: &Bindings,
    orderless: bool,
) -> Option<Bindings> {
    let Some((pat, rest)) = patterns.split_first() else {
        return elements.is_empty().then(|| binds.clone());
    };

    if let Some(seq) = as_sequence_pattern(pat) {
        let rem_min = min_required(rest);
        if elements.len() < rem_min + seq.min_len {
            return None;
        }
        let max_take = elements.len() - rem_min;
        for k in seq.min_len..=max_take {
            let run = &elements[..k];
            if !run.iter().all(|e| blank_matches_head(seq.blank, e)) {
                continue;
            }
            let local = match seq.name {
                Some(name) => match binds.bind(name, Element::sequence(run.to_vec())) {
                    Ok(b) => b,
                    Err(_) => continue,
                },
                None => binds.clone(),
            };
            if let Some(out) =
                match_sequence_impl(hooks, head, rest, &elements[k..], &local, orderless)
            {
                return Some(out);
            }
        }
        return None;
    }

    if let Some((unit, min_run)) = as_repeated(pat) {
        let rem_min = min_required(rest);
        if elements.len() < rem_min + min_run {
            return None;
        }
        let max_take = elements.len() - rem_min;
        'runs: for k in min_run..=max_take {
            let mut local = binds.clone();
            for e in &elements[..k] {
                match match_impl(hooks, unit, e, &local) {
                    Some(b) => local = b,
                    None => continue 'runs,
                }
            }
            if let Some(out) =
                match_sequence_impl(hooks, head, rest, &elements[k..], &local, orderless)
            {
                return Some(out);
            }
        }
        return None;
    }

    if let Some((inner, default)) = as_optional(pat) {
        if let Some((first, others)) = elements.split_first() {
            if let Some(b) = match_impl(hooks, inner, first, binds) {
                if let Some(out) = match_sequence_impl(hooks, head, rest, others, &b, orderless) {
                    return Some(out);
                }
            }
        }
        // Absent argument: supply the explicit default, or the head's
        // registered default, binding it to the inner pattern's name.
        let fallback = default
            .cloned()
            .or_else(|| head.and_then(|h| hooks.default_for(h)));
        let local = match (pattern_name(inner), fallback) {
            (Some(name), Some(value)) => match binds.bind(name, value) {
                Ok(b) => b,
                Err(_) => return None,
            },
            _ => binds.clone(),
        };
        return match_sequence_impl(hooks, head, rest, elements, &local, orderless);
    }

    if orderless {
        for (i, candidate) in elements.iter().enumerate() {
            if let Some(b) = match_impl(hooks, pat, candidate, binds) {
                let mut remaining = elements.to_vec();
                remaining.remove(i);
                if let Some(out) =
                    match_sequence_impl(hooks, head, rest, &remaining, &b, orderless)
                {
                    return Some(out);
                }
            }
        }
        return None;
    }

    let (first, others) = elements.split_first()?;
    let b = match_impl(hooks, pat, first, binds)?;
    match_sequence_impl(hooks, head, rest, others, &b, orderless)
}

/// Substitute bound pattern variables into `expr`.
///
/// Pure, non-evaluating tree transform. A `Sequence[...]` produced by a
/// sequence-bound variable in argument position is spliced into the parent
/// argument list. A binding that would put an atom in head position is
/// skipped; heads stay symbols or expressions.
pub fn substitute(expr: &Element, binds: &Bindings) -> Element {
    if binds.is_empty() {
        return expr.clone();
    }
    subst_impl(expr, binds)
}

fn subst_impl(expr: &Element, binds: &Bindings) -> Element {
    match expr {
        Element::Sym(s) => binds.get(*s).cloned().unwrap_or_else(|| expr.clone()),
        Element::Expr(x) => {
            let head = subst_impl(x.head(), binds);
            let head = if head.is_valid_head() {
                head
            } else {
                x.head().clone()
            };
            let mut tail = Vec::with_capacity(x.len());
            for arg in x.tail() {
                let replaced = subst_impl(arg, binds);
                if let Element::Expr(rx) = &replaced {
                    if rx.head_symbol() == Some(*heads::SEQUENCE) {
                        tail.extend(rx.tail().iter().cloned());
                        continue;
                    }
                }
                tail.push(replaced);
            }
            match Expr::new(head, tail) {
                Ok(e) => Element::Expr(e.with_attrs(x.attrs())),
                Err(_) => expr.clone(),
            }
        }
        _ => expr.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{blank, blank_sequence, named_blank, pattern};

    fn sym(s: &str) -> Element {
        Element::symbol(s)
    }

    #[test]
    fn blank_matches_anything_with_empty_bindings() {
        let r = match_expr(&blank(), &Element::Int(42));
        assert!(r.success);
        assert!(r.bindings.is_empty());
    }

    #[test]
    fn head_constrained_blank_rejects_other_heads() {
        let b = crate::pattern::blank_with_head(Symbol::new("Integer"));
        assert!(!match_expr(&b, &"hello".into()).success);
        assert!(match_expr(&b, &7.into()).success);
    }

    #[test]
    fn named_pattern_binds_the_match() {
        let x = Symbol::new("x");
        let r = match_expr(&named_blank(x), &Element::Int(42));
        assert!(r.success);
        assert_eq!(r.bindings.get(x), Some(&Element::Int(42)));
    }

    #[test]
    fn repeated_name_requires_equal_values() {
        let x = Symbol::new("x");
        let pat = Element::call(Symbol::new("f"), vec![named_blank(x), named_blank(x)]);
        let same = Element::call(Symbol::new("f"), vec![1.into(), 1.into()]);
        let diff = Element::call(Symbol::new("f"), vec![1.into(), 2.into()]);
        assert!(match_expr(&pat, &same).success);
        assert!(!match_expr(&pat, &diff).success);
    }

    #[test]
    fn sequence_capture_is_shortest_first() {
        let xs = Symbol::new("xs");
        let pats = [pattern(xs, blank_sequence(None)), blank()];
        let elems = [1.into(), 2.into(), 3.into()];
        let r = match_sequence(&pats, &elems);
        assert!(r.success);
        assert_eq!(
            r.bindings.get(xs),
            Some(&Element::sequence(vec![1.into(), 2.into()]))
        );
    }

    #[test]
    fn substitution_splices_sequences() {
        let x = Symbol::new("x");
        let binds = Bindings::new()
            .bind(x, Element::sequence(vec![1.into(), 2.into()]))
            .unwrap();
        let body = Element::call(Symbol::new("f"), vec![sym("x")]);
        assert_eq!(
            substitute(&body, &binds),
            Element::call(Symbol::new("f"), vec![1.into(), 2.into()])
        );
    }

    #[test]
    fn substitution_does_not_recurse_into_results() {
        let x = Symbol::new("x");
        let binds = Bindings::new().bind(x, sym("y")).unwrap();
        let y_to_z = Bindings::new()
            .bind(Symbol::new("y"), sym("z"))
            .unwrap();
        let once = substitute(&sym("x"), &binds);
        assert_eq!(once, sym("y"));
        // substitution is a single pass; no rule dispatch happens
        assert_eq!(substitute(&once, &y_to_z), sym("z"));
    }
}
