pub mod bindings;
pub mod defs;
pub mod engine;
pub mod matcher;
pub mod pattern;
pub mod rule;

pub use bindings::{BindingConflict, Bindings};
pub use defs::{DefKind, DefinitionStore};
pub use engine::{replace_all, replace_repeated};
pub use matcher::{
    match_expr, match_sequence, match_with, substitute, MatchHooks, MatchResult, NoHooks,
};
pub use rule::{apply_rule_with, try_rules_with, Rule, RuleKind, RuleSet};
