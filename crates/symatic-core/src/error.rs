use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("malformed expression: {0}")]
    Construction(String),
    #[error("not an attribute symbol: {0}")]
    UnknownAttribute(String),
}
