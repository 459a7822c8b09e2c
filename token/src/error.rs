//! Token-ledger errors.

use agora_types::{Address, TokenAmount};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient balance in {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: Address,
        needed: TokenAmount,
        available: TokenAmount,
    },

    #[error("balance overflow crediting {0}")]
    Overflow(Address),

    #[error("transfer to the zero address")]
    ZeroAddress,

    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}
