//! Evaluation attributes.
//!
//! Attributes modify how the evaluator treats an expression: the Hold family
//! gates argument evaluation, Flat/Orderless/Listable drive structural
//! normalization, and the remaining flags are advisory metadata consulted by
//! other subsystems (numeric predicates, redefinition guards). Attributes are
//! pure data; nothing here has side effects.

use crate::error::{CoreError, Result};
use crate::symbol::Symbol;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    pub struct Attrs: u32 {
        const HOLD_FIRST        = 1 << 0;
        const HOLD_REST         = 1 << 1;
        const HOLD_ALL          = 1 << 2;
        const HOLD_ALL_COMPLETE = 1 << 3;
        const SEQUENCE_HOLD     = 1 << 4;
        const FLAT              = 1 << 5;
        const ORDERLESS         = 1 << 6;
        const ONE_IDENTITY      = 1 << 7;
        const LISTABLE          = 1 << 8;
        const NUMERIC_FUNCTION  = 1 << 9;
        const PROTECTED         = 1 << 10;
        const READ_PROTECTED    = 1 << 11;
        const LOCKED            = 1 << 12;
        const CONSTANT          = 1 << 13;
    }
}

impl Default for Attrs {
    fn default() -> Self {
        Attrs::empty()
    }
}

const VOCABULARY: &[(&str, Attrs)] = &[
    ("HoldFirst", Attrs::HOLD_FIRST),
    ("HoldRest", Attrs::HOLD_REST),
    ("HoldAll", Attrs::HOLD_ALL),
    ("HoldAllComplete", Attrs::HOLD_ALL_COMPLETE),
    ("SequenceHold", Attrs::SEQUENCE_HOLD),
    ("Flat", Attrs::FLAT),
    ("Orderless", Attrs::ORDERLESS),
    ("OneIdentity", Attrs::ONE_IDENTITY),
    ("Listable", Attrs::LISTABLE),
    ("NumericFunction", Attrs::NUMERIC_FUNCTION),
    ("Protected", Attrs::PROTECTED),
    ("ReadProtected", Attrs::READ_PROTECTED),
    ("Locked", Attrs::LOCKED),
    ("Constant", Attrs::CONSTANT),
];

impl Attrs {
    /// First argument is held before rule dispatch.
    pub fn holds_first(self) -> bool {
        self.intersects(Attrs::HOLD_FIRST | Attrs::HOLD_ALL | Attrs::HOLD_ALL_COMPLETE)
    }

    /// Arguments after the first are held before rule dispatch.
    pub fn holds_rest(self) -> bool {
        self.intersects(Attrs::HOLD_REST | Attrs::HOLD_ALL | Attrs::HOLD_ALL_COMPLETE)
    }

    /// Every argument is held before rule dispatch.
    pub fn holds_all(self) -> bool {
        self.intersects(Attrs::HOLD_ALL | Attrs::HOLD_ALL_COMPLETE)
    }

    /// Strongest hold: nothing is touched, including the head, sequence
    /// splicing, and UpValues.
    pub fn holds_completely(self) -> bool {
        self.contains(Attrs::HOLD_ALL_COMPLETE)
    }

    /// Map an attribute symbol from the closed vocabulary to its flag.
    /// A symbol outside the vocabulary is an error, never silently dropped.
    pub fn from_symbol(sym: Symbol) -> Result<Attrs> {
        let name = sym.name();
        VOCABULARY
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, a)| *a)
            .ok_or(CoreError::UnknownAttribute(name))
    }

    /// The attribute symbols present in this set.
    pub fn to_symbols(self) -> Vec<Symbol> {
        VOCABULARY
            .iter()
            .filter(|(_, a)| self.contains(*a))
            .map(|(n, _)| Symbol::new(n))
            .collect()
    }
}
