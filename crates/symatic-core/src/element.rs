//! The expression tree: atoms, symbols, and compound expressions.
//!
//! `Element` is a closed sum type with exactly the shapes the kernel knows
//! about; there is no user extension point. Everything is immutable: all
//! transforms return new values.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::attrs::Attrs;
use crate::error::{CoreError, Result};
use crate::symbol::{heads, Symbol};

/// A node of the expression tree. Atoms are self-evaluating leaves and
/// compare by native value; symbols compare by interned identity; compound
/// expressions compare structurally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Element {
    Int(i64),
    Real(f64),
    Complex { re: f64, im: f64 },
    Str(String),
    Bool(bool),
    Null,
    Sym(Symbol),
    Expr(Expr),
}

/// Compound expression: `(head, tail, attrs)`.
///
/// Structural equality and hashing consider `(head, tail)` only. The local
/// `attrs` set is an evaluation hint layered on top of the head symbol's
/// context attributes and is deliberately excluded from identity; this is a
/// fixed contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expr {
    head: Box<Element>,
    tail: Vec<Element>,
    attrs: Attrs,
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.head == other.head && self.tail == other.tail
    }
}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.head.hash(state);
        self.tail.hash(state);
    }
}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Element::Int(n) => n.hash(state),
            Element::Real(f) => f.to_bits().hash(state),
            Element::Complex { re, im } => {
                re.to_bits().hash(state);
                im.to_bits().hash(state);
            }
            Element::Str(s) => s.hash(state),
            Element::Bool(b) => b.hash(state),
            Element::Null => {}
            Element::Sym(s) => s.hash(state),
            Element::Expr(e) => e.hash(state),
        }
    }
}

impl Expr {
    /// Construct an expression, validating the head. A head that is neither a
    /// symbol nor another expression is malformed and fails immediately.
    pub fn new(head: Element, tail: Vec<Element>) -> Result<Expr> {
        if !head.is_valid_head() {
            return Err(CoreError::Construction(format!(
                "expression head must be a symbol or expression, got {head}"
            )));
        }
        Ok(Expr {
            head: Box::new(head),
            tail,
            attrs: Attrs::empty(),
        })
    }

    /// Construct with a symbol head. Infallible: a symbol is always a valid
    /// head.
    pub fn call(head: Symbol, tail: Vec<Element>) -> Expr {
        Expr {
            head: Box::new(Element::Sym(head)),
            tail,
            attrs: Attrs::empty(),
        }
    }

    /// Curried application: use an expression as the head, `f[a][b]` style.
    pub fn curried(head: Expr, tail: Vec<Element>) -> Expr {
        Expr {
            head: Box::new(Element::Expr(head)),
            tail,
            attrs: Attrs::empty(),
        }
    }

    pub fn head(&self) -> &Element {
        &self.head
    }

    /// The head when it is a plain symbol.
    pub fn head_symbol(&self) -> Option<Symbol> {
        match &*self.head {
            Element::Sym(s) => Some(*s),
            _ => None,
        }
    }

    /// The symbol at the root of a (possibly curried) head chain:
    /// `f[a][b]` yields `f`.
    pub fn root_symbol(&self) -> Option<Symbol> {
        match &*self.head {
            Element::Sym(s) => Some(*s),
            Element::Expr(e) => e.root_symbol(),
            _ => None,
        }
    }

    pub fn tail(&self) -> &[Element] {
        &self.tail
    }

    pub fn attrs(&self) -> Attrs {
        self.attrs
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.tail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tail.is_empty()
    }

    /// Same head and attrs, new tail.
    pub fn with_tail(&self, tail: Vec<Element>) -> Expr {
        Expr {
            head: self.head.clone(),
            tail,
            attrs: self.attrs,
        }
    }

    /// Same tail and attrs, new head. Fails on an invalid head.
    pub fn with_head(&self, head: Element) -> Result<Expr> {
        if !head.is_valid_head() {
            return Err(CoreError::Construction(format!(
                "expression head must be a symbol or expression, got {head}"
            )));
        }
        Ok(Expr {
            head: Box::new(head),
            tail: self.tail.clone(),
            attrs: self.attrs,
        })
    }

    /// Replace the local attribute set.
    pub fn with_attrs(&self, attrs: Attrs) -> Expr {
        Expr {
            head: self.head.clone(),
            tail: self.tail.clone(),
            attrs,
        }
    }

    /// Apply `f` to every argument, keeping head and attrs.
    pub fn map_tail(&self, mut f: impl FnMut(&Element) -> Element) -> Expr {
        self.with_tail(self.tail.iter().map(&mut f).collect())
    }
}

impl Element {
    pub fn symbol(name: &str) -> Element {
        Element::Sym(Symbol::new(name))
    }

    /// `head[tail...]` with a symbol head.
    pub fn call(head: Symbol, tail: Vec<Element>) -> Element {
        Element::Expr(Expr::call(head, tail))
    }

    /// `List[items...]`.
    pub fn list(items: Vec<Element>) -> Element {
        Element::call(*heads::LIST, items)
    }

    /// `Sequence[items...]`.
    pub fn sequence(items: Vec<Element>) -> Element {
        Element::call(*heads::SEQUENCE, items)
    }

    /// Self-evaluating leaf values: everything except symbols and compounds.
    pub fn is_atom(&self) -> bool {
        !matches!(self, Element::Sym(_) | Element::Expr(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Element::Int(_) | Element::Real(_) | Element::Complex { .. }
        )
    }

    /// Whether this element may sit in head position.
    pub fn is_valid_head(&self) -> bool {
        matches!(self, Element::Sym(_) | Element::Expr(_))
    }

    pub fn as_symbol(&self) -> Option<Symbol> {
        match self {
            Element::Sym(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_expr(&self) -> Option<&Expr> {
        match self {
            Element::Expr(e) => Some(e),
            _ => None,
        }
    }

    /// The head symbol of this element: the type head for atoms (`Integer`,
    /// `Real`, `Complex`, `String`; booleans and `Null` are symbols), `Symbol`
    /// for symbols, and the expression head when it is a symbol.
    pub fn head_symbol(&self) -> Option<Symbol> {
        match self {
            Element::Int(_) => Some(*heads::INTEGER),
            Element::Real(_) => Some(*heads::REAL),
            Element::Complex { .. } => Some(*heads::COMPLEX),
            Element::Str(_) => Some(*heads::STRING),
            Element::Bool(_) | Element::Null | Element::Sym(_) => Some(*heads::SYMBOL),
            Element::Expr(e) => e.head_symbol(),
        }
    }

    /// Tree depth: atoms and symbols are 1, an expression is one more than
    /// its deepest part.
    pub fn depth(&self) -> usize {
        match self {
            Element::Expr(e) => {
                let inner = e
                    .tail()
                    .iter()
                    .chain(std::iter::once(e.head()))
                    .map(Element::depth)
                    .max()
                    .unwrap_or(0);
                inner + 1
            }
            _ => 1,
        }
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Element::Expr(e) => {
                e.head().leaf_count() + e.tail().iter().map(Element::leaf_count).sum::<usize>()
            }
            _ => 1,
        }
    }
}

impl From<i64> for Element {
    fn from(n: i64) -> Element {
        Element::Int(n)
    }
}

impl From<f64> for Element {
    fn from(f: f64) -> Element {
        Element::Real(f)
    }
}

impl From<bool> for Element {
    fn from(b: bool) -> Element {
        Element::Bool(b)
    }
}

impl From<&str> for Element {
    fn from(s: &str) -> Element {
        Element::Str(s.to_string())
    }
}

impl From<Symbol> for Element {
    fn from(s: Symbol) -> Element {
        Element::Sym(s)
    }
}

impl From<Expr> for Element {
    fn from(e: Expr) -> Element {
        Element::Expr(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> Element {
        Element::symbol(s)
    }

    #[test]
    fn structural_equality_uses_head_and_tail() {
        let a = Element::call(Symbol::new("Plus"), vec![1.into(), 2.into()]);
        let b = Element::call(Symbol::new("Plus"), vec![1.into(), 2.into()]);
        let c = Element::call(Symbol::new("Plus"), vec![2.into(), 1.into()]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn attrs_do_not_participate_in_equality_or_hash() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let plain = Expr::call(Symbol::new("f"), vec![sym("x")]);
        let flagged = plain.with_attrs(Attrs::FLAT | Attrs::ORDERLESS);
        assert_eq!(plain, flagged);

        let mut h1 = DefaultHasher::new();
        let mut h2 = DefaultHasher::new();
        plain.hash(&mut h1);
        flagged.hash(&mut h2);
        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn atom_head_rejected_at_construction() {
        let err = Expr::new(Element::Int(1), vec![sym("x")]);
        assert!(matches!(err, Err(CoreError::Construction(_))));
    }

    #[test]
    fn curried_root_symbol() {
        let f = Symbol::new("f");
        let inner = Expr::call(f, vec![1.into()]);
        let outer = Expr::curried(inner, vec![2.into()]);
        assert_eq!(outer.root_symbol(), Some(f));
        assert_eq!(outer.head_symbol(), None);
    }

    #[test]
    fn depth_and_leaf_count() {
        let e = Element::call(
            Symbol::new("f"),
            vec![Element::call(Symbol::new("g"), vec![1.into()]), 2.into()],
        );
        assert_eq!(e.depth(), 3);
        assert_eq!(e.leaf_count(), 4); // f, g, 1, 2
    }

    #[test]
    fn atom_heads() {
        assert_eq!(Element::Int(3).head_symbol(), Some(*heads::INTEGER));
        assert_eq!(Element::Real(1.5).head_symbol(), Some(*heads::REAL));
        assert_eq!(Element::from("s").head_symbol(), Some(*heads::STRING));
        assert_eq!(Element::Null.head_symbol(), Some(*heads::SYMBOL));
    }
}
