//! The ledger trait consumed by the governance engine.

use crate::error::LedgerError;
use agora_types::{Address, TokenAmount, TOKEN_DECIMALS};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Balance lookup and transfer over a fungible token.
///
/// Methods take `&self`; implementations synchronize internally so a ledger
/// can be shared between the engine and other holders of the token.
pub trait TokenLedger: Send + Sync {
    /// Current balance of `account`. Unknown accounts hold zero.
    fn balance_of(&self, account: &Address) -> TokenAmount;

    /// Move `amount` from `from` to `to`.
    ///
    /// Atomic: on error neither balance has changed.
    fn transfer(&self, from: &Address, to: &Address, amount: TokenAmount) -> Result<(), LedgerError>;

    /// Sum of all balances.
    fn total_supply(&self) -> TokenAmount;
}

impl<T: TokenLedger + ?Sized> TokenLedger for Arc<T> {
    fn balance_of(&self, account: &Address) -> TokenAmount {
        (**self).balance_of(account)
    }

    fn transfer(&self, from: &Address, to: &Address, amount: TokenAmount) -> Result<(), LedgerError> {
        (**self).transfer(from, to, amount)
    }

    fn total_supply(&self) -> TokenAmount {
        (**self).total_supply()
    }
}

/// Descriptive token metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
}

impl Default for TokenInfo {
    fn default() -> Self {
        Self {
            name: "DAOToken".to_string(),
            symbol: "DAO".to_string(),
            decimals: TOKEN_DECIMALS,
        }
    }
}
