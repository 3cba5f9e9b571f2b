//! Structural normalizations applied between argument evaluation and rule
//! dispatch: sequence splicing, Flat flattening, Orderless canonical sort,
//! and Listable threading.

use symatic_core::{canonical_cmp, heads, Element, Expr, Symbol};

/// Splice top-level `Sequence[...]` arguments into the argument list. An
/// empty sequence vanishes.
pub fn splice_sequences(args: Vec<Element>) -> Vec<Element> {
    if !args.iter().any(is_sequence) {
        return args;
    }
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Element::Expr(x) if x.head_symbol() == Some(*heads::SEQUENCE) => {
                out.extend(x.tail().iter().cloned());
            }
            other => out.push(other),
        }
    }
    out
}

fn is_sequence(e: &Element) -> bool {
    matches!(e, Element::Expr(x) if x.head_symbol() == Some(*heads::SEQUENCE))
}

/// Flatten arguments whose head equals `head` into the surrounding argument
/// list, recursively, so no same-head nesting survives. Idempotent.
pub fn flatten_nested(head: Symbol, args: Vec<Element>) -> Vec<Element> {
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Element::Expr(x) if x.head_symbol() == Some(head) => {
                out.extend(flatten_nested(head, x.tail().to_vec()));
            }
            other => out.push(other),
        }
    }
    out
}

/// Sort into canonical order for Orderless heads. Idempotent: sorting twice
/// equals sorting once.
pub fn canonical_sort(args: &mut [Element]) {
    args.sort_by(canonical_cmp);
}

/// Thread a Listable head over its `List` arguments.
///
/// Returns `None` when no argument is a list, or when the list arguments
/// disagree on length (threading is skipped, not an error). Otherwise builds
/// `List[f[...], ...]` with scalar arguments repeated, preserving the
/// expression's head and local attributes.
pub fn thread_listable(x: &Expr) -> Option<Element> {
    let mut len: Option<usize> = None;
    for arg in x.tail() {
        if let Element::Expr(e) = arg {
            if e.head_symbol() == Some(*heads::LIST) {
                match len {
                    None => len = Some(e.len()),
                    Some(l) if l == e.len() => {}
                    Some(_) => return None,
                }
            }
        }
    }
    let len = len?;

    let mut items = Vec::with_capacity(len);
    for i in 0..len {
        let element_args = x
            .tail()
            .iter()
            .map(|arg| match arg {
                Element::Expr(e) if e.head_symbol() == Some(*heads::LIST) => e.tail()[i].clone(),
                other => other.clone(),
            })
            .collect();
        items.push(Element::Expr(x.with_tail(element_args)));
    }
    Some(Element::list(items))
}
