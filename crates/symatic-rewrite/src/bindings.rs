//! Pattern-variable bindings.
//!
//! A `Bindings` value is the payload of a successful match: an immutable map
//! from pattern variable to matched element. Binding the same name twice to
//! unequal values is a conflict, never a silent overwrite — a later
//! alternative in a backtracking search must not corrupt an earlier partial
//! match.

use std::collections::HashMap;

use thiserror::Error;

use symatic_core::{Element, Symbol};

#[derive(Error, Debug, Clone, PartialEq)]
#[error("cannot bind {name} to {incoming}: already bound to {existing}")]
pub struct BindingConflict {
    pub name: Symbol,
    pub existing: Element,
    pub incoming: Element,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    map: HashMap<Symbol, Element>,
}

impl Bindings {
    pub fn new() -> Bindings {
        Bindings::default()
    }

    /// Bind `name` to `value`, returning the extended bindings. Rebinding to
    /// an equal value is idempotent; rebinding to a different value fails.
    pub fn bind(&self, name: Symbol, value: Element) -> Result<Bindings, BindingConflict> {
        if let Some(existing) = self.map.get(&name) {
            if *existing == value {
                return Ok(self.clone());
            }
            return Err(BindingConflict {
                name,
                existing: existing.clone(),
                incoming: value,
            });
        }
        let mut map = self.map.clone();
        map.insert(name, value);
        Ok(Bindings { map })
    }

    /// Merge with `other`; fails on the first pairwise conflict.
    pub fn merge(&self, other: &Bindings) -> Result<Bindings, BindingConflict> {
        let mut out = self.clone();
        for (name, value) in other.iter() {
            out = out.bind(*name, value.clone())?;
        }
        Ok(out)
    }

    /// Whether `merge` with `other` would succeed.
    pub fn is_compatible(&self, other: &Bindings) -> bool {
        other
            .iter()
            .all(|(name, value)| self.map.get(name).map_or(true, |v| v == value))
    }

    pub fn get(&self, name: Symbol) -> Option<&Element> {
        self.map.get(&name)
    }

    pub fn contains(&self, name: Symbol) -> bool {
        self.map.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Element)> {
        self.map.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Symbol {
        Symbol::new("x")
    }

    #[test]
    fn rebinding_same_value_is_idempotent() {
        let b = Bindings::new().bind(x(), 1.into()).unwrap();
        let b2 = b.bind(x(), 1.into()).unwrap();
        assert_eq!(b, b2);
        assert_eq!(b2.len(), 1);
    }

    #[test]
    fn conflict_carries_both_values() {
        let b = Bindings::new().bind(x(), 1.into()).unwrap();
        let err = b.bind(x(), 2.into()).unwrap_err();
        assert_eq!(err.name, x());
        assert_eq!(err.existing, Element::Int(1));
        assert_eq!(err.incoming, Element::Int(2));
    }

    #[test]
    fn merge_and_compatibility() {
        let y = Symbol::new("y");
        let a = Bindings::new().bind(x(), 1.into()).unwrap();
        let b = Bindings::new().bind(y, 2.into()).unwrap();
        let merged = a.merge(&b).unwrap();
        assert_eq!(merged.len(), 2);
        assert!(a.is_compatible(&b));

        let clash = Bindings::new().bind(x(), 3.into()).unwrap();
        assert!(!a.is_compatible(&clash));
        assert!(a.merge(&clash).is_err());
    }
}
