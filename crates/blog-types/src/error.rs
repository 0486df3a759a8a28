use thiserror::Error;

/// Errors produced while parsing or validating model values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("invalid id: {0}")]
    InvalidId(String),
}
