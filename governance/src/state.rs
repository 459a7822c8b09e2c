//! Persistent governance state: everything the engine owns except its
//! collaborators (ledger, clock, event listeners).

use crate::error::GovernanceError;
use crate::proposal::Proposal;
use agora_types::{Address, GovernanceParams, ProposalId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceState {
    /// Fixed at construction.
    pub params: GovernanceParams,
    /// Admin account allowed to withdraw from the treasury. Fixed at construction.
    pub owner: Address,
    /// The engine's own ledger account; its balance is the treasury.
    pub treasury: Address,
    /// Id the next proposal receives.
    pub next_id: ProposalId,
    /// Append-only; `proposals[i].id == i`.
    pub proposals: Vec<Proposal>,
    /// Proposer → its one in-flight proposal.
    pub active_proposal_of: BTreeMap<Address, ProposalId>,
}

impl GovernanceState {
    pub fn new(params: GovernanceParams, owner: Address, treasury: Address) -> Self {
        Self {
            params,
            owner,
            treasury,
            next_id: ProposalId::FIRST,
            proposals: Vec::new(),
            active_proposal_of: BTreeMap::new(),
        }
    }

    pub fn proposal(&self, id: ProposalId) -> Option<&Proposal> {
        self.proposals.get(id.index())
    }

    pub(crate) fn proposal_mut(&mut self, id: ProposalId) -> Option<&mut Proposal> {
        self.proposals.get_mut(id.index())
    }

    /// Check every structural invariant. Used when resuming from storage.
    pub fn verify(&self) -> Result<(), GovernanceError> {
        let corrupt = |msg: String| Err(GovernanceError::CorruptState(msg));

        self.params.validate()?;
        if self.next_id.index() != self.proposals.len() {
            return corrupt(format!(
                "next id {} does not follow {} proposals",
                self.next_id,
                self.proposals.len()
            ));
        }
        for (index, proposal) in self.proposals.iter().enumerate() {
            let id = proposal.id;
            if id.index() != index {
                return corrupt(format!("proposal {id} stored at position {index}"));
            }
            if proposal.executed && proposal.active {
                return corrupt(format!("proposal {id} is executed but still active"));
            }
            let ballot_voters: BTreeSet<Address> = proposal.ballots.iter().map(|b| b.voter).collect();
            if ballot_voters != proposal.voters || proposal.ballots.len() != proposal.voters.len() {
                return corrupt(format!("proposal {id} has a voter without exactly one ballot"));
            }
            if proposal.recount() != Some((proposal.yes_votes, proposal.no_votes)) {
                return corrupt(format!("proposal {id} tally does not match its ballots"));
            }
            let guard = self.active_proposal_of.get(&proposal.proposer);
            if proposal.active && guard != Some(&id) {
                return corrupt(format!("active proposal {id} is not registered to its proposer"));
            }
        }
        for (proposer, id) in &self.active_proposal_of {
            match self.proposal(*id) {
                Some(p) if p.active && &p.proposer == proposer => {}
                _ => return corrupt(format!("{proposer} is registered to inactive proposal {id}")),
            }
        }
        Ok(())
    }
}
