//! Nullable ledger — an in-memory ledger whose transfers can be made to fail.

use agora_token::{InMemoryLedger, LedgerError, TokenLedger};
use agora_types::{Address, TokenAmount};
use std::sync::atomic::{AtomicBool, Ordering};

/// Wraps an [`InMemoryLedger`]; while failing, every transfer returns
/// [`LedgerError::Unavailable`] and changes nothing. Balance reads always work.
pub struct FailingLedger {
    inner: InMemoryLedger,
    failing: AtomicBool,
}

impl FailingLedger {
    pub fn new(inner: InMemoryLedger) -> Self {
        Self {
            inner,
            failing: AtomicBool::new(false),
        }
    }

    pub fn fail_transfers(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &InMemoryLedger {
        &self.inner
    }
}

impl TokenLedger for FailingLedger {
    fn balance_of(&self, account: &Address) -> TokenAmount {
        self.inner.balance_of(account)
    }

    fn transfer(&self, from: &Address, to: &Address, amount: TokenAmount) -> Result<(), LedgerError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable("transfers disabled".into()));
        }
        self.inner.transfer(from, to, amount)
    }

    fn total_supply(&self) -> TokenAmount {
        self.inner.total_supply()
    }
}
