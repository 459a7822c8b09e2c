//! Token-weighted governance for a shared treasury.
//!
//! Lifecycle: create (stake-gated, one active proposal per proposer) → vote
//! (stake-gated, weight = balance at time of vote, once per account) →
//! execute (after the voting window, strict yes > no majority, payout from
//! the treasury) → closed.
//!
//! The engine owns proposal state only. Balances live in a
//! [`TokenLedger`](agora_token::TokenLedger); time comes from a
//! [`Clock`](agora_types::Clock); observers read [`GovernanceEvent`]s.

pub mod engine;
pub mod error;
pub mod event;
pub mod proposal;
pub mod shared;
pub mod state;

pub use engine::GovernanceEngine;
pub use error::GovernanceError;
pub use event::{EventBus, GovernanceEvent};
pub use proposal::{Proposal, ProposalStatus, VoteRecord};
pub use shared::SharedGovernance;
pub use state::GovernanceState;
