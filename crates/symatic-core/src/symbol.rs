//! Interned symbolic identifiers.
//!
//! Symbols are identified solely by their name string. The process-wide
//! interner maps every name to a `u32` id, so equality and hashing are id
//! comparisons and two symbols with equal names are the same logical entity.
//! Attributes and values never live on the symbol itself; they live in the
//! evaluation context, which lets definitions change without changing symbol
//! identity.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use dashmap::DashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Interned symbol. 4 bytes; copyable; compares by interner id.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Intern `name` and return its symbol.
    ///
    /// Panics if `name` is empty; an empty symbol name is a construction-time
    /// contract violation.
    pub fn new(name: &str) -> Symbol {
        assert!(!name.is_empty(), "symbol name cannot be empty");
        Symbol(interner().intern(name))
    }

    /// The symbol's name string.
    pub fn name(&self) -> String {
        interner()
            .names
            .get(&self.0)
            .map(|entry| entry.value().to_string())
            .unwrap_or_default()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.name())
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        if name.is_empty() {
            return Err(serde::de::Error::custom("symbol name cannot be empty"));
        }
        Ok(Symbol::new(&name))
    }
}

struct Interner {
    ids: DashMap<String, u32>,
    names: DashMap<u32, Box<str>>,
    next: AtomicU32,
}

impl Interner {
    fn seeded() -> Interner {
        let it = Interner {
            ids: DashMap::with_capacity(256),
            names: DashMap::with_capacity(256),
            next: AtomicU32::new(0),
        };
        for name in SYSTEM_SYMBOLS {
            it.intern(name);
        }
        it
    }

    fn intern(&self, name: &str) -> u32 {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        let id = *self
            .ids
            .entry(name.to_string())
            .or_insert_with(|| self.next.fetch_add(1, Ordering::Relaxed));
        self.names.entry(id).or_insert_with(|| name.into());
        id
    }

    fn reset(&self) {
        self.ids.clear();
        self.names.clear();
        self.next.store(0, Ordering::Relaxed);
        for name in SYSTEM_SYMBOLS {
            self.intern(name);
        }
    }
}

static INTERNER: Lazy<Interner> = Lazy::new(Interner::seeded);

fn interner() -> &'static Interner {
    &INTERNER
}

/// Reset the interner to its seeded state. For test isolation only: symbols
/// interned dynamically before the reset become dangling, while the system
/// symbols below keep their ids because the seed order is fixed.
pub fn reset_interner() {
    interner().reset();
    GENSYM_COUNTER.store(1, Ordering::Relaxed);
}

static GENSYM_COUNTER: AtomicU32 = AtomicU32::new(1);

/// Generate a unique symbol with an auto-incrementing suffix, for internal
/// temporaries that must not collide with user names.
pub fn gensym(prefix: &str) -> Symbol {
    let n = GENSYM_COUNTER.fetch_add(1, Ordering::Relaxed);
    Symbol::new(&format!("{prefix}{n}"))
}

/// System symbols interned at startup, in fixed order so their ids survive
/// `reset_interner`.
const SYSTEM_SYMBOLS: &[&str] = &[
    // type heads
    "Symbol", "Integer", "Real", "Complex", "String",
    // structure
    "List", "Sequence", "Rule", "RuleDelayed", "Set", "SetDelayed",
    // pattern heads
    "Pattern", "Blank", "BlankSequence", "BlankNullSequence", "Condition",
    "Alternatives", "PatternTest", "Optional", "Repeated", "RepeatedNull",
    "Except", "Verbatim", "HoldPattern",
    // constants
    "True", "False", "Null", "N", "Default",
    // attributes
    "HoldFirst", "HoldRest", "HoldAll", "HoldAllComplete", "SequenceHold",
    "Flat", "Orderless", "OneIdentity", "Listable", "NumericFunction",
    "Protected", "ReadProtected", "Locked", "Constant",
];

/// Well-known head symbols, interned lazily against the seeded interner.
pub mod heads {
    use once_cell::sync::Lazy;

    use super::Symbol;

    macro_rules! head {
        ($name:ident, $text:literal) => {
            pub static $name: Lazy<Symbol> = Lazy::new(|| Symbol::new($text));
        };
    }

    head!(SYMBOL, "Symbol");
    head!(INTEGER, "Integer");
    head!(REAL, "Real");
    head!(COMPLEX, "Complex");
    head!(STRING, "String");
    head!(LIST, "List");
    head!(SEQUENCE, "Sequence");
    head!(RULE, "Rule");
    head!(RULE_DELAYED, "RuleDelayed");
    head!(PATTERN, "Pattern");
    head!(BLANK, "Blank");
    head!(BLANK_SEQUENCE, "BlankSequence");
    head!(BLANK_NULL_SEQUENCE, "BlankNullSequence");
    head!(CONDITION, "Condition");
    head!(ALTERNATIVES, "Alternatives");
    head!(PATTERN_TEST, "PatternTest");
    head!(OPTIONAL, "Optional");
    head!(REPEATED, "Repeated");
    head!(REPEATED_NULL, "RepeatedNull");
    head!(EXCEPT, "Except");
    head!(VERBATIM, "Verbatim");
    head!(HOLD_PATTERN, "HoldPattern");
    head!(TRUE, "True");
    head!(FALSE, "False");
    head!(NULL, "Null");
}
