//! Printed forms and the canonical element ordering.

use std::cmp::Ordering;
use std::fmt;

use crate::element::{Element, Expr};
use crate::symbol::heads;

pub fn format_element(e: &Element) -> String {
    match e {
        Element::Int(n) => n.to_string(),
        Element::Real(f) => {
            if f.fract() == 0.0 && f.is_finite() {
                format!("{f:.1}")
            } else {
                f.to_string()
            }
        }
        Element::Complex { re, im } => format!("Complex[{re}, {im}]"),
        Element::Str(s) => format!("\"{s}\""),
        Element::Bool(b) => if *b { "True" } else { "False" }.to_string(),
        Element::Null => "Null".to_string(),
        Element::Sym(s) => s.name(),
        Element::Expr(x) => format_expr(x),
    }
}

fn format_expr(x: &Expr) -> String {
    let parts: Vec<String> = x.tail().iter().map(format_element).collect();
    if x.head_symbol() == Some(*heads::LIST) {
        format!("{{{}}}", parts.join(", "))
    } else {
        format!("{}[{}]", format_element(x.head()), parts.join(", "))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_element(self))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_expr(self))
    }
}

// Rank groups for Orderless canonicalization: numeric and other atoms first,
// then strings, then symbols, then compound expressions.
fn rank(e: &Element) -> u8 {
    match e {
        Element::Int(_) | Element::Real(_) | Element::Complex { .. } => 0,
        Element::Bool(_) | Element::Null => 1,
        Element::Str(_) => 2,
        Element::Sym(_) => 3,
        Element::Expr(_) => 4,
    }
}

fn numeric_key(e: &Element) -> f64 {
    match e {
        Element::Int(n) => *n as f64,
        Element::Real(f) => *f,
        Element::Complex { re, .. } => *re,
        _ => 0.0,
    }
}

/// Canonical order used when sorting Orderless argument lists: atoms before
/// strings before symbols before expressions; numbers by value; expressions
/// by depth, then leaf count; everything else (and ties) by printed form.
/// Sorting with this comparator is idempotent.
pub fn canonical_cmp(a: &Element, b: &Element) -> Ordering {
    let (ra, rb) = (rank(a), rank(b));
    if ra != rb {
        return ra.cmp(&rb);
    }
    match (a, b) {
        (Element::Sym(x), Element::Sym(y)) => x.name().cmp(&y.name()),
        (Element::Str(x), Element::Str(y)) => x.cmp(y),
        (Element::Expr(_), Element::Expr(_)) => a
            .depth()
            .cmp(&b.depth())
            .then(a.leaf_count().cmp(&b.leaf_count()))
            .then_with(|| format_element(a).cmp(&format_element(b))),
        _ if ra == 0 => numeric_key(a)
            .partial_cmp(&numeric_key(b))
            .unwrap_or(Ordering::Equal)
            .then_with(|| format_element(a).cmp(&format_element(b))),
        _ => format_element(a).cmp(&format_element(b)),
    }
}
