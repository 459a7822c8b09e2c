use agora_token::LedgerError;
use agora_types::{Address, ProposalId, Timestamp, TokenAmount, TypesError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GovernanceError {
    #[error("insufficient stake: {account} holds {balance}, needs {required}")]
    InsufficientStake {
        account: Address,
        balance: TokenAmount,
        required: TokenAmount,
    },

    #[error("{proposer} already has an active proposal ({active})")]
    DuplicateActiveProposal {
        proposer: Address,
        active: ProposalId,
    },

    #[error("proposal {0} not found")]
    NotFound(ProposalId),

    #[error("{voter} has already voted on proposal {id}")]
    DuplicateVote { id: ProposalId, voter: Address },

    #[error("proposal {0} is closed for voting")]
    ProposalClosed(ProposalId),

    #[error("voting period is still ongoing for proposal {id} (deadline {deadline})")]
    VotingOngoing { id: ProposalId, deadline: Timestamp },

    #[error("proposal {id} has not reached majority support: {yes} yes vs {no} no")]
    MajorityNotReached {
        id: ProposalId,
        yes: TokenAmount,
        no: TokenAmount,
    },

    #[error("proposal {0} is already closed")]
    AlreadyClosed(ProposalId),

    #[error("treasury shortfall: need {needed}, have {available}")]
    TreasuryShortfall {
        needed: TokenAmount,
        available: TokenAmount,
    },

    #[error("{0} is not authorized for this operation")]
    Unauthorized(Address),

    #[error("recipient must not be the zero address")]
    ZeroRecipient,

    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    InvalidParams(#[from] TypesError),

    #[error("inconsistent governance state: {0}")]
    CorruptState(String),
}

impl GovernanceError {
    /// Whether the failed operation still committed state.
    ///
    /// Only a failed majority does: the proposal is closed without payout.
    /// Every other error leaves the engine untouched.
    pub fn is_partial_commit(&self) -> bool {
        matches!(self, Self::MajorityNotReached { .. })
    }
}
