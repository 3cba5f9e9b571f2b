use thiserror::Error;

use symatic_core::{CoreError, Symbol};

pub type Result<T> = std::result::Result<T, EvalError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("recursion depth of {limit} exceeded")]
    RecursionLimit { limit: usize },
    #[error("iteration limit of {limit} exceeded")]
    IterationLimit { limit: usize },
    #[error("symbol {0} is protected")]
    Protected(Symbol),
    #[error("evaluation failed: {0}")]
    Evaluation(String),
}

impl From<CoreError> for EvalError {
    fn from(e: CoreError) -> EvalError {
        EvalError::Evaluation(e.to_string())
    }
}
