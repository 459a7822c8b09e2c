//! Thread-safe handle around a [`GovernanceEngine`].
//!
//! All mutations go through one write lock, so create/vote/execute/withdraw
//! are globally serialized and no caller observes a half-applied operation.
//! Queries take the read lock and may run concurrently with each other.

use crate::engine::GovernanceEngine;
use crate::error::GovernanceError;
use crate::event::GovernanceEvent;
use crate::proposal::Proposal;
use agora_token::TokenLedger;
use agora_types::{Address, Clock, ProposalId, TokenAmount};
use agora_utils::{read_or_recover, write_or_recover};
use std::sync::{Arc, RwLock};

pub struct SharedGovernance<L, C> {
    inner: Arc<RwLock<GovernanceEngine<L, C>>>,
}

impl<L, C> Clone for SharedGovernance<L, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L: TokenLedger, C: Clock> SharedGovernance<L, C> {
    pub fn new(engine: GovernanceEngine<L, C>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    pub fn create_proposal(
        &self,
        caller: &Address,
        title: impl Into<String>,
        description: impl Into<String>,
        amount: TokenAmount,
        recipient: Address,
    ) -> Result<ProposalId, GovernanceError> {
        write_or_recover(&self.inner, "governance engine")
            .create_proposal(caller, title, description, amount, recipient)
    }

    pub fn vote(&self, caller: &Address, id: ProposalId, support: bool) -> Result<TokenAmount, GovernanceError> {
        write_or_recover(&self.inner, "governance engine").vote(caller, id, support)
    }

    pub fn execute_proposal(&self, caller: &Address, id: ProposalId) -> Result<(), GovernanceError> {
        write_or_recover(&self.inner, "governance engine").execute_proposal(caller, id)
    }

    pub fn withdraw(&self, caller: &Address, amount: TokenAmount) -> Result<(), GovernanceError> {
        write_or_recover(&self.inner, "governance engine").withdraw(caller, amount)
    }

    /// Snapshot of one proposal.
    pub fn get_proposal(&self, id: ProposalId) -> Result<Proposal, GovernanceError> {
        read_or_recover(&self.inner, "governance engine")
            .get_proposal(id)
            .cloned()
    }

    /// Snapshot of every proposal, taken under a single read lock.
    pub fn get_all_proposals(&self) -> Vec<Proposal> {
        read_or_recover(&self.inner, "governance engine")
            .get_all_proposals()
            .to_vec()
    }

    pub fn owner(&self) -> Address {
        read_or_recover(&self.inner, "governance engine").owner()
    }

    pub fn treasury_balance(&self) -> TokenAmount {
        read_or_recover(&self.inner, "governance engine").treasury_balance()
    }

    pub fn events(&self) -> Vec<GovernanceEvent> {
        read_or_recover(&self.inner, "governance engine")
            .events()
            .to_vec()
    }

    /// Run `f` against a consistent read-only view of the engine.
    pub fn read<R>(&self, f: impl FnOnce(&GovernanceEngine<L, C>) -> R) -> R {
        f(&read_or_recover(&self.inner, "governance engine"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_nullables::NullClock;
    use agora_token::InMemoryLedger;
    use agora_types::GovernanceParams;
    use std::thread;

    fn test_address(n: u8) -> Address {
        Address::new([n; 20])
    }

    #[test]
    fn concurrent_voters_are_all_counted() {
        let owner = test_address(1);
        let ledger = Arc::new(InMemoryLedger::with_initial_supply(
            owner,
            TokenAmount::from_tokens(1_000_000),
        ));
        let voters: Vec<Address> = (10..42).map(test_address).collect();
        for v in &voters {
            ledger
                .transfer(&owner, v, TokenAmount::from_tokens(1000 + u128::from(v.as_bytes()[0])))
                .unwrap();
        }
        let engine = GovernanceEngine::new(
            GovernanceParams::default(),
            owner,
            test_address(0xda),
            Arc::clone(&ledger),
            NullClock::new(0),
        )
        .unwrap();
        let shared = SharedGovernance::new(engine);
        let id = shared
            .create_proposal(&owner, "t", "d", TokenAmount::ZERO, owner)
            .unwrap();

        let handles: Vec<_> = voters
            .iter()
            .map(|v| {
                let shared = shared.clone();
                let v = *v;
                thread::spawn(move || {
                    let support = v.as_bytes()[0] % 2 == 0;
                    // Every thread tries twice; only the first vote may land.
                    let first = shared.vote(&v, id, support);
                    let second = shared.vote(&v, id, support);
                    (first.is_ok(), second.is_err())
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), (true, true));
        }

        let p = shared.get_proposal(id).unwrap();
        assert_eq!(p.voters.len(), voters.len());
        let expected: u128 = voters
            .iter()
            .map(|v| ledger.balance_of(v).raw())
            .sum();
        assert_eq!(p.yes_votes.raw() + p.no_votes.raw(), expected);
        assert_eq!(shared.events().len(), 1 + voters.len());
        assert!(shared.read(|e| e.state().verify().is_ok()));
    }
}
