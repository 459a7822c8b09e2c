//! Thread-safe in-memory token ledger.

use crate::error::LedgerError;
use crate::ledger::{TokenInfo, TokenLedger};
use agora_types::{Address, TokenAmount};
use agora_utils::lock_or_recover;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use tracing::debug;

/// Serializable copy of a ledger's contents. Zero balances are omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub info: TokenInfo,
    pub balances: BTreeMap<Address, TokenAmount>,
}

/// An account-balance token ledger held in memory.
pub struct InMemoryLedger {
    info: TokenInfo,
    balances: Mutex<HashMap<Address, TokenAmount>>,
}

impl InMemoryLedger {
    /// Supply minted to the deployer by default: one million tokens.
    pub const DEFAULT_INITIAL_SUPPLY: TokenAmount = TokenAmount::from_tokens(1_000_000);

    pub fn new(info: TokenInfo) -> Self {
        Self {
            info,
            balances: Mutex::new(HashMap::new()),
        }
    }

    /// Deploy the default token: the whole `supply` is credited to `holder`.
    pub fn with_initial_supply(holder: Address, supply: TokenAmount) -> Self {
        Self::deploy(TokenInfo::default(), holder, supply)
    }

    pub fn deploy(info: TokenInfo, holder: Address, supply: TokenAmount) -> Self {
        let ledger = Self::new(info);
        if !supply.is_zero() {
            lock_or_recover(&ledger.balances, "token balances").insert(holder, supply);
        }
        ledger
    }

    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        let balances = snapshot
            .balances
            .into_iter()
            .filter(|(_, amount)| !amount.is_zero())
            .collect();
        Self {
            info: snapshot.info,
            balances: Mutex::new(balances),
        }
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        let balances = lock_or_recover(&self.balances, "token balances")
            .iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(account, amount)| (*account, *amount))
            .collect();
        LedgerSnapshot {
            info: self.info.clone(),
            balances,
        }
    }

    pub fn info(&self) -> &TokenInfo {
        &self.info
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(TokenInfo::default())
    }
}

impl TokenLedger for InMemoryLedger {
    fn balance_of(&self, account: &Address) -> TokenAmount {
        lock_or_recover(&self.balances, "token balances")
            .get(account)
            .copied()
            .unwrap_or(TokenAmount::ZERO)
    }

    fn transfer(&self, from: &Address, to: &Address, amount: TokenAmount) -> Result<(), LedgerError> {
        if to.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        let mut balances = lock_or_recover(&self.balances, "token balances");
        let available = balances.get(from).copied().unwrap_or(TokenAmount::ZERO);
        let debited = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                account: *from,
                needed: amount,
                available,
            })?;
        if from == to {
            return Ok(());
        }
        let credited = balances
            .get(to)
            .copied()
            .unwrap_or(TokenAmount::ZERO)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow(*to))?;

        // Both new balances are computed before either is written.
        balances.insert(*from, debited);
        balances.insert(*to, credited);
        debug!(%from, %to, %amount, "token transfer");
        Ok(())
    }

    fn total_supply(&self) -> TokenAmount {
        lock_or_recover(&self.balances, "token balances")
            .values()
            .fold(TokenAmount::ZERO, |acc, b| acc.checked_add(*b).unwrap_or(acc))
    }
}
