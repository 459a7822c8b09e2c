//! Audit events emitted by the governance engine.
//!
//! Events are append-only records for external observers and indexers. They
//! are not part of engine state: replaying or dropping them never changes a
//! proposal or a balance.

use agora_types::{Address, ProposalId, Timestamp, TokenAmount};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum GovernanceEvent {
    /// A proposal was created.
    NewProposal {
        id: ProposalId,
        proposer: Address,
        amount: TokenAmount,
        recipient: Address,
        deadline: Timestamp,
    },
    /// A weighted vote was cast.
    #[serde(rename = "VoteEvent")]
    VoteCast {
        id: ProposalId,
        voter: Address,
        support: bool,
        weight: TokenAmount,
    },
    /// A proposal passed and its payout was made.
    ProposalExecuted {
        id: ProposalId,
        amount: TokenAmount,
        recipient: Address,
    },
    /// A proposal was closed without payout.
    ProposalRejected {
        id: ProposalId,
        yes_votes: TokenAmount,
        no_votes: TokenAmount,
    },
    /// The owner withdrew from the treasury.
    TreasuryWithdrawal { to: Address, amount: TokenAmount },
}

impl GovernanceEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewProposal { .. } => "NewProposal",
            Self::VoteCast { .. } => "VoteEvent",
            Self::ProposalExecuted { .. } => "ProposalExecuted",
            Self::ProposalRejected { .. } => "ProposalRejected",
            Self::TreasuryWithdrawal { .. } => "TreasuryWithdrawal",
        }
    }

    /// The proposal this event concerns, if any.
    pub fn proposal_id(&self) -> Option<ProposalId> {
        match self {
            Self::NewProposal { id, .. }
            | Self::VoteCast { id, .. }
            | Self::ProposalExecuted { id, .. }
            | Self::ProposalRejected { id, .. } => Some(*id),
            Self::TreasuryWithdrawal { .. } => None,
        }
    }
}

type Listener = Box<dyn Fn(&GovernanceEvent) + Send + Sync>;

/// Append-only event log with synchronous fan-out to listeners.
///
/// Listeners run inline on the emitting thread, while the engine is
/// mid-operation; keep them fast and never call back into the engine.
pub struct EventBus {
    log: Vec<GovernanceEvent>,
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            log: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Resume with a previously recorded log.
    pub fn with_log(log: Vec<GovernanceEvent>) -> Self {
        Self {
            log,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn emit(&mut self, event: GovernanceEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
        self.log.push(event);
    }

    pub fn log(&self) -> &[GovernanceEvent] {
        &self.log
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("log", &self.log.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn withdrawal(n: u128) -> GovernanceEvent {
        GovernanceEvent::TreasuryWithdrawal {
            to: Address::new([1; 20]),
            amount: TokenAmount::new(n),
        }
    }

    #[test]
    fn emit_calls_all_listeners_and_appends() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let c1 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));
        let c2 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        }));

        bus.emit(withdrawal(1));
        bus.emit(withdrawal(2));

        assert_eq!(counter.load(Ordering::SeqCst), 22);
        assert_eq!(bus.log(), &[withdrawal(1), withdrawal(2)]);
    }

    #[test]
    fn with_log_resumes_appending() {
        let mut bus = EventBus::with_log(vec![withdrawal(1)]);
        bus.emit(withdrawal(2));
        assert_eq!(bus.len(), 2);
        assert_eq!(bus.log()[1], withdrawal(2));
    }

    #[test]
    fn events_serialize_with_tag() {
        let json = serde_json::to_value(withdrawal(5)).unwrap();
        assert_eq!(json["event"], "TreasuryWithdrawal");
        assert_eq!(json["amount"], "5");
    }

    #[test]
    fn vote_cast_keeps_its_wire_name() {
        let event = GovernanceEvent::VoteCast {
            id: ProposalId::FIRST,
            voter: Address::new([2; 20]),
            support: true,
            weight: TokenAmount::new(1),
        };
        assert_eq!(event.name(), "VoteEvent");
        assert_eq!(event.proposal_id(), Some(ProposalId::FIRST));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "VoteEvent");
        let back: GovernanceEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
