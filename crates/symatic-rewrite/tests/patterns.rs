use symatic_core::{Element, Symbol};
use symatic_rewrite::pattern::{
    alternatives, blank, blank_with_head, except, hold_pattern, named_blank, optional, pattern,
    pattern_test, repeated, repeated_null, verbatim,
};
use symatic_rewrite::{match_expr, Bindings, MatchHooks, NoHooks};

fn sym(s: &str) -> Element {
    Element::symbol(s)
}

fn int(n: i64) -> Element {
    Element::Int(n)
}

fn call(h: &str, tail: Vec<Element>) -> Element {
    Element::call(Symbol::new(h), tail)
}

#[test]
fn alternatives_take_first_matching_branch() {
    let pat = alternatives(vec![sym("a"), sym("b")]);
    assert!(match_expr(&pat, &sym("a")).success);
    assert!(match_expr(&pat, &sym("b")).success);
    assert!(!match_expr(&pat, &sym("c")).success);
}

#[test]
fn alternatives_bind_from_the_branch_that_matched() {
    let x = Symbol::new("x");
    let pat = alternatives(vec![
        call("f", vec![named_blank(x)]),
        call("g", vec![named_blank(x)]),
    ]);
    let r = match_expr(&pat, &call("g", vec![int(5)]));
    assert!(r.success);
    assert_eq!(r.bindings.get(x), Some(&int(5)));
}

#[test]
fn verbatim_suppresses_pattern_semantics() {
    // Verbatim[Blank[]] matches only the literal expression Blank[], not 42.
    let pat = verbatim(blank());
    assert!(!match_expr(&pat, &int(42)).success);
    assert!(match_expr(&pat, &blank()).success);
}

#[test]
fn hold_pattern_is_transparent_to_matching() {
    let x = Symbol::new("x");
    let pat = hold_pattern(named_blank(x));
    let r = match_expr(&pat, &int(3));
    assert!(r.success);
    assert_eq!(r.bindings.get(x), Some(&int(3)));
}

#[test]
fn except_rejects_the_excluded_shape() {
    let pat = except(blank_with_head(Symbol::new("Integer")), None);
    assert!(!match_expr(&pat, &int(1)).success);
    assert!(match_expr(&pat, &sym("a")).success);
}

#[test]
fn except_with_alternative_requires_it() {
    let pat = except(
        blank_with_head(Symbol::new("Integer")),
        Some(blank_with_head(Symbol::new("String"))),
    );
    assert!(match_expr(&pat, &"ok".into()).success);
    assert!(!match_expr(&pat, &sym("a")).success);
    assert!(!match_expr(&pat, &int(1)).success);
}

#[test]
fn repeated_consumes_uniform_runs() {
    // f[Repeated[_Integer]] matches f[1, 2, 3] but not f[] or f[1, "x"]
    let lhs = call("f", vec![repeated(blank_with_head(Symbol::new("Integer")))]);
    assert!(match_expr(&lhs, &call("f", vec![int(1), int(2), int(3)])).success);
    assert!(!match_expr(&lhs, &call("f", vec![])).success);
    assert!(!match_expr(&lhs, &call("f", vec![int(1), "x".into()])).success);
}

#[test]
fn repeated_null_accepts_empty() {
    let lhs = call("h", vec![repeated_null(blank())]);
    assert!(match_expr(&lhs, &call("h", vec![])).success);
    assert!(match_expr(&lhs, &call("h", vec![int(1), int(2)])).success);
}

#[test]
fn optional_with_default_binds_when_absent() {
    let x = Symbol::new("x");
    let y = Symbol::new("y");
    let lhs = call(
        "g",
        vec![named_blank(x), optional(named_blank(y), Some(int(10)))],
    );
    let with_arg = match_expr(&lhs, &call("g", vec![int(1), int(2)]));
    assert!(with_arg.success);
    assert_eq!(with_arg.bindings.get(y), Some(&int(2)));

    let without = match_expr(&lhs, &call("g", vec![int(1)]));
    assert!(without.success);
    assert_eq!(without.bindings.get(y), Some(&int(10)));
}

struct TestHooks;

impl MatchHooks for TestHooks {
    fn eval_test(&mut self, test: &Element, matched: &Element) -> bool {
        // stand-in for an evaluator: EvenQ on integers
        if test.as_symbol() == Some(Symbol::new("EvenQ")) {
            return matches!(matched, Element::Int(n) if n % 2 == 0);
        }
        false
    }

    fn eval_cond(&mut self, cond: &Element, binds: &Bindings) -> bool {
        // recognizes Positive[x] with x bound to an integer
        let Some(x) = cond.as_expr() else { return false };
        if x.head_symbol() != Some(Symbol::new("Positive")) {
            return false;
        }
        let Some(name) = x.tail().first().and_then(Element::as_symbol) else {
            return false;
        };
        matches!(binds.get(name), Some(Element::Int(n)) if *n > 0)
    }
}

#[test]
fn pattern_test_consults_hooks() {
    let pat = pattern_test(blank(), sym("EvenQ"));
    assert!(symatic_rewrite::match_with(&mut TestHooks, &pat, &int(4), Bindings::new()).success);
    assert!(!symatic_rewrite::match_with(&mut TestHooks, &pat, &int(3), Bindings::new()).success);
}

#[test]
fn condition_sees_bindings() {
    let x = Symbol::new("x");
    let pat = symatic_rewrite::pattern::condition(
        named_blank(x),
        call("Positive", vec![sym("x")]),
    );
    assert!(symatic_rewrite::match_with(&mut TestHooks, &pat, &int(2), Bindings::new()).success);
    assert!(
        !symatic_rewrite::match_with(&mut TestHooks, &pat, &int(-2), Bindings::new()).success
    );
}

#[test]
fn pattern_wrapping_a_compound_binds_whole_match() {
    let p = Symbol::new("p");
    let pat = pattern(p, call("f", vec![blank()]));
    let subject = call("f", vec![int(9)]);
    let r = match_expr(&pat, &subject);
    assert!(r.success);
    assert_eq!(r.bindings.get(p), Some(&subject));
}

#[test]
fn no_hooks_matching_stays_structural() {
    // without an evaluator, PatternTest accepts the structural match
    let pat = pattern_test(blank(), sym("EvenQ"));
    assert!(symatic_rewrite::match_with(&mut NoHooks, &pat, &int(3), Bindings::new()).success);
}
