//! Errors raised while parsing or validating fundamental types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid token amount: {0}")]
    InvalidAmount(String),

    #[error("invalid governance parameters: {0}")]
    InvalidParams(String),
}
