pub mod builtins;
pub mod context;
pub mod error;
pub mod eval;
pub mod transforms;

pub use builtins::{Builtin, BuiltinRegistry, NativeFn};
pub use context::{
    define_down_value, define_format_value, define_n_value, define_own_value, define_sub_value,
    define_up_value, EvaluationContext,
};
pub use error::{EvalError, Result};
pub use eval::{apply_rule, evaluate, try_rules, Evaluator, Limits};
