//! Governance parameters — fixed when the engine is constructed, never mutated afterward.

use crate::amount::TokenAmount;
use crate::error::TypesError;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// Where the voting deadline instant itself falls.
///
/// Either way, no instant admits both a vote and an execution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineBoundary {
    /// Votes are accepted while `now < deadline`; execution from `now >= deadline`.
    #[default]
    Exclusive,
    /// Votes are accepted while `now <= deadline`; execution from `now > deadline`.
    Inclusive,
}

impl DeadlineBoundary {
    /// Whether a vote cast at `now` lands inside the window ending at `deadline`.
    pub fn voting_open(&self, deadline: Timestamp, now: Timestamp) -> bool {
        match self {
            Self::Exclusive => now < deadline,
            Self::Inclusive => now <= deadline,
        }
    }

    /// Whether execution is legal at `now`.
    pub fn execution_open(&self, deadline: Timestamp, now: Timestamp) -> bool {
        !self.voting_open(deadline, now)
    }
}

/// All parameters of a governance engine instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceParams {
    /// Minimum token balance required to create a proposal.
    /// Default: 1000 tokens.
    pub min_stake_to_propose: TokenAmount,

    /// Minimum token balance required to cast a vote.
    /// Default: 1000 tokens.
    pub min_stake_to_vote: TokenAmount,

    /// Length of the voting window in seconds, measured from creation.
    /// Default: 8 days = 691200 seconds.
    pub voting_period_secs: u64,

    /// Which side of the deadline instant voting falls on.
    #[serde(default)]
    pub deadline_boundary: DeadlineBoundary,
}

impl GovernanceParams {
    /// 8 days.
    pub const DEFAULT_VOTING_PERIOD_SECS: u64 = 8 * 24 * 3600;

    /// Default minimum stake, in whole tokens.
    pub const DEFAULT_MIN_STAKE_TOKENS: u128 = 1000;

    pub fn dao_defaults() -> Self {
        Self {
            min_stake_to_propose: TokenAmount::from_tokens(Self::DEFAULT_MIN_STAKE_TOKENS),
            min_stake_to_vote: TokenAmount::from_tokens(Self::DEFAULT_MIN_STAKE_TOKENS),
            voting_period_secs: Self::DEFAULT_VOTING_PERIOD_SECS,
            deadline_boundary: DeadlineBoundary::Exclusive,
        }
    }

    pub fn validate(&self) -> Result<(), TypesError> {
        if self.voting_period_secs == 0 {
            return Err(TypesError::InvalidParams(
                "voting period must be at least one second".into(),
            ));
        }
        Ok(())
    }

    /// Deadline of a proposal created at `created_at`.
    pub fn deadline_for(&self, created_at: Timestamp) -> Timestamp {
        created_at.saturating_add(self.voting_period_secs)
    }
}

/// Default is the DAO configuration: 1000-token stake, 8-day window, exclusive deadline.
impl Default for GovernanceParams {
    fn default() -> Self {
        Self::dao_defaults()
    }
}
