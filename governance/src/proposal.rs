//! Spending proposals and their lifecycle.

use agora_types::{Address, DeadlineBoundary, ProposalId, Timestamp, TokenAmount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Where a proposal stands at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    /// Window open; votes are accepted.
    Voting,
    /// Window elapsed; anyone may execute.
    AwaitingExecution,
    /// Passed and paid out. Terminal.
    Executed,
    /// Closed without payout (no strict majority). Terminal.
    Rejected,
}

/// One cast ballot. Its weight is fixed at the moment of voting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub voter: Address,
    pub support: bool,
    pub weight: TokenAmount,
    pub cast_at: Timestamp,
}

/// A request to pay `amount` from the treasury to `recipient`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub proposer: Address,
    pub title: String,
    pub description: String,
    /// Requested payout. Not reserved at creation.
    pub amount: TokenAmount,
    pub recipient: Address,
    pub created_at: Timestamp,
    /// `created_at` + voting period.
    pub deadline: Timestamp,
    pub yes_votes: TokenAmount,
    pub no_votes: TokenAmount,
    /// Accounts that have voted. Never holds an account twice.
    pub voters: BTreeSet<Address>,
    /// Ballots in the order they were cast.
    pub ballots: Vec<VoteRecord>,
    /// Set once the payout succeeds; never reset.
    pub executed: bool,
    /// True from creation until the proposal is closed.
    pub active: bool,
}

impl Proposal {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ProposalId,
        proposer: Address,
        title: String,
        description: String,
        amount: TokenAmount,
        recipient: Address,
        created_at: Timestamp,
        deadline: Timestamp,
    ) -> Self {
        Self {
            id,
            proposer,
            title,
            description,
            amount,
            recipient,
            created_at,
            deadline,
            yes_votes: TokenAmount::ZERO,
            no_votes: TokenAmount::ZERO,
            voters: BTreeSet::new(),
            ballots: Vec::new(),
            executed: false,
            active: true,
        }
    }

    pub fn has_voted(&self, account: &Address) -> bool {
        self.voters.contains(account)
    }

    /// Whether the tally is a strict yes majority of cast weight.
    /// A tie, or no votes at all, does not pass.
    pub fn has_majority(&self) -> bool {
        self.yes_votes > self.no_votes
    }

    pub fn total_votes(&self) -> Option<TokenAmount> {
        self.yes_votes.checked_add(self.no_votes)
    }

    pub fn is_closed(&self) -> bool {
        !self.active
    }

    pub fn status(&self, now: Timestamp, boundary: DeadlineBoundary) -> ProposalStatus {
        match (self.active, self.executed) {
            (_, true) => ProposalStatus::Executed,
            (false, false) => ProposalStatus::Rejected,
            (true, false) if boundary.voting_open(self.deadline, now) => ProposalStatus::Voting,
            (true, false) => ProposalStatus::AwaitingExecution,
        }
    }

    /// Seconds of voting left at `now`.
    pub fn remaining_secs(&self, now: Timestamp) -> u64 {
        self.deadline.as_secs().saturating_sub(now.as_secs())
    }

    /// Recompute both tallies from the ballots.
    pub fn recount(&self) -> Option<(TokenAmount, TokenAmount)> {
        self.ballots.iter().try_fold(
            (TokenAmount::ZERO, TokenAmount::ZERO),
            |(yes, no), ballot| {
                if ballot.support {
                    Some((yes.checked_add(ballot.weight)?, no))
                } else {
                    Some((yes, no.checked_add(ballot.weight)?))
                }
            },
        )
    }

    /// Add a ballot to the tally. Fails (changing nothing) on overflow.
    pub(crate) fn record_vote(&mut self, ballot: VoteRecord) -> Result<(), &'static str> {
        if ballot.support {
            self.yes_votes = self
                .yes_votes
                .checked_add(ballot.weight)
                .ok_or("yes tally")?;
        } else {
            self.no_votes = self.no_votes.checked_add(ballot.weight).ok_or("no tally")?;
        }
        self.voters.insert(ballot.voter);
        self.ballots.push(ballot);
        Ok(())
    }
}
