//! Pattern constructs.
//!
//! Every pattern construct is an ordinary expression with a reserved head:
//! `Blank[]`, `Pattern[x, Blank[]]`, `Condition[pat, test]`, and so on. This
//! module provides the constructors and the recognizers/accessors the matcher
//! dispatches on.

use symatic_core::{heads, Element, Expr, Symbol};

// --- constructors ---

/// `Blank[]` — matches any single element.
pub fn blank() -> Element {
    Element::call(*heads::BLANK, vec![])
}

/// `Blank[h]` — matches a single element whose head is `h`.
pub fn blank_with_head(h: Symbol) -> Element {
    Element::call(*heads::BLANK, vec![h.into()])
}

/// `BlankSequence[]` / `BlankSequence[h]` — one or more elements.
pub fn blank_sequence(h: Option<Symbol>) -> Element {
    Element::call(*heads::BLANK_SEQUENCE, h.map(Element::Sym).into_iter().collect())
}

/// `BlankNullSequence[]` / `BlankNullSequence[h]` — zero or more elements.
pub fn blank_null_sequence(h: Option<Symbol>) -> Element {
    Element::call(
        *heads::BLANK_NULL_SEQUENCE,
        h.map(Element::Sym).into_iter().collect(),
    )
}

/// `Pattern[name, inner]` — match `inner`, then bind `name` to the match.
pub fn pattern(name: Symbol, inner: Element) -> Element {
    Element::call(*heads::PATTERN, vec![name.into(), inner])
}

/// `x_` — the everyday named blank.
pub fn named_blank(name: Symbol) -> Element {
    pattern(name, blank())
}

/// `x_h`.
pub fn named_blank_with_head(name: Symbol, h: Symbol) -> Element {
    pattern(name, blank_with_head(h))
}

/// `Condition[pat, test]` — `pat /; test`.
pub fn condition(pat: Element, test: Element) -> Element {
    Element::call(*heads::CONDITION, vec![pat, test])
}

/// `Alternatives[p1, ..., pn]`.
pub fn alternatives(alts: Vec<Element>) -> Element {
    Element::call(*heads::ALTERNATIVES, alts)
}

/// `PatternTest[pat, f]` — `pat?f`.
pub fn pattern_test(pat: Element, test: Element) -> Element {
    Element::call(*heads::PATTERN_TEST, vec![pat, test])
}

/// `Optional[pat]` / `Optional[pat, default]`.
pub fn optional(pat: Element, default: Option<Element>) -> Element {
    let mut tail = vec![pat];
    tail.extend(default);
    Element::call(*heads::OPTIONAL, tail)
}

/// `Repeated[pat]` — `pat..`, one or more.
pub fn repeated(pat: Element) -> Element {
    Element::call(*heads::REPEATED, vec![pat])
}

/// `RepeatedNull[pat]` — `pat...`, zero or more.
pub fn repeated_null(pat: Element) -> Element {
    Element::call(*heads::REPEATED_NULL, vec![pat])
}

/// `Except[excl]` / `Except[excl, alt]`.
pub fn except(excluded: Element, alt: Option<Element>) -> Element {
    let mut tail = vec![excluded];
    tail.extend(alt);
    Element::call(*heads::EXCEPT, tail)
}

/// `Verbatim[x]` — matches only an element structurally equal to `x`.
pub fn verbatim(x: Element) -> Element {
    Element::call(*heads::VERBATIM, vec![x])
}

/// `HoldPattern[p]` — transparent to matching, opaque to evaluation.
pub fn hold_pattern(p: Element) -> Element {
    Element::call(*heads::HOLD_PATTERN, vec![p])
}

// --- recognizers ---

fn expr_with_head(e: &Element, h: Symbol) -> Option<&Expr> {
    match e {
        Element::Expr(x) if x.head_symbol() == Some(h) => Some(x),
        _ => None,
    }
}

pub fn is_blank(e: &Element) -> bool {
    expr_with_head(e, *heads::BLANK).is_some()
}

pub fn is_blank_sequence(e: &Element) -> bool {
    expr_with_head(e, *heads::BLANK_SEQUENCE).is_some()
}

pub fn is_blank_null_sequence(e: &Element) -> bool {
    expr_with_head(e, *heads::BLANK_NULL_SEQUENCE).is_some()
}

/// A blank that can consume a run of elements: `__` or `___`.
pub fn is_sequence_blank(e: &Element) -> bool {
    is_blank_sequence(e) || is_blank_null_sequence(e)
}

pub fn is_pattern(e: &Element) -> bool {
    expr_with_head(e, *heads::PATTERN).is_some()
}

/// The bound name of `Pattern[name, inner]`.
pub fn pattern_name(e: &Element) -> Option<Symbol> {
    let x = expr_with_head(e, *heads::PATTERN)?;
    x.tail().first().and_then(Element::as_symbol)
}

/// The inner pattern of `Pattern[name, inner]`.
pub fn pattern_inner(e: &Element) -> Option<&Element> {
    let x = expr_with_head(e, *heads::PATTERN)?;
    x.tail().get(1)
}

/// The head constraint of any blank, if present: `Blank[Integer]` yields
/// `Integer`.
pub fn blank_head_constraint(x: &Expr) -> Option<Symbol> {
    x.tail().first().and_then(Element::as_symbol)
}

/// Whether `elem`'s head satisfies the constraint of the blank `x`.
pub fn blank_matches_head(x: &Expr, elem: &Element) -> bool {
    match blank_head_constraint(x) {
        None => true,
        Some(constraint) => elem.head_symbol() == Some(constraint),
    }
}

/// Deconstructed leading sequence pattern for argument-list matching: a bare
/// sequence blank or `Pattern[name, sequence blank]`.
pub struct SequencePattern<'a> {
    pub name: Option<Symbol>,
    pub blank: &'a Expr,
    pub min_len: usize,
}

pub fn as_sequence_pattern(e: &Element) -> Option<SequencePattern<'_>> {
    let (name, inner) = if is_pattern(e) {
        (pattern_name(e), pattern_inner(e)?)
    } else {
        (None, e)
    };
    if !is_sequence_blank(inner) {
        return None;
    }
    let blank = inner.as_expr()?;
    let min_len = if is_blank_null_sequence(inner) { 0 } else { 1 };
    Some(SequencePattern {
        name,
        blank,
        min_len,
    })
}

/// `Repeated[p]` / `RepeatedNull[p]`: the unit pattern and minimum run.
pub fn as_repeated(e: &Element) -> Option<(&Element, usize)> {
    if let Some(x) = expr_with_head(e, *heads::REPEATED) {
        return x.tail().first().map(|unit| (unit, 1));
    }
    if let Some(x) = expr_with_head(e, *heads::REPEATED_NULL) {
        return x.tail().first().map(|unit| (unit, 0));
    }
    None
}

/// `Optional[pat]` / `Optional[pat, default]`.
pub fn as_optional(e: &Element) -> Option<(&Element, Option<&Element>)> {
    let x = expr_with_head(e, *heads::OPTIONAL)?;
    x.tail().first().map(|pat| (pat, x.tail().get(1)))
}

/// Minimum number of elements a pattern consumes in an argument list.
pub fn min_arguments(e: &Element) -> usize {
    if let Some(seq) = as_sequence_pattern(e) {
        return seq.min_len;
    }
    if let Some((_, min)) = as_repeated(e) {
        return min;
    }
    if as_optional(e).is_some() {
        return 0;
    }
    1
}
