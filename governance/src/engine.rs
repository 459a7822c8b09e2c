//! Core governance engine — proposal creation, weighted voting, execution
//! and owner withdrawal against a custodied treasury.
//!
//! Every mutating operation takes `&mut self` and an explicit `caller`, runs
//! all of its checks before touching state, and performs the ledger transfer
//! (if any) as the last fallible step. An error therefore leaves the engine
//! exactly as it was, with one exception: a failed majority still closes the
//! proposal (see [`GovernanceError::is_partial_commit`]).

use crate::error::GovernanceError;
use crate::event::{EventBus, GovernanceEvent};
use crate::proposal::{Proposal, VoteRecord};
use crate::state::GovernanceState;
use agora_token::{LedgerError, TokenLedger};
use agora_types::{Address, Clock, GovernanceParams, ProposalId, Timestamp, TokenAmount};
use tracing::{debug, info};

pub struct GovernanceEngine<L, C> {
    state: GovernanceState,
    ledger: L,
    clock: C,
    events: EventBus,
}

impl<L: TokenLedger, C: Clock> GovernanceEngine<L, C> {
    /// Deploy a fresh engine. `treasury` is the engine's own ledger account.
    pub fn new(
        params: GovernanceParams,
        owner: Address,
        treasury: Address,
        ledger: L,
        clock: C,
    ) -> Result<Self, GovernanceError> {
        params.validate()?;
        info!(%owner, %treasury, voting_period_secs = params.voting_period_secs, "governance engine deployed");
        Ok(Self {
            state: GovernanceState::new(params, owner, treasury),
            ledger,
            clock,
            events: EventBus::new(),
        })
    }

    /// Resume from persisted state. The state is verified first.
    pub fn from_state(state: GovernanceState, ledger: L, clock: C) -> Result<Self, GovernanceError> {
        state.verify()?;
        Ok(Self {
            state,
            ledger,
            clock,
            events: EventBus::new(),
        })
    }

    /// Continue a previously recorded event log.
    pub fn with_event_log(mut self, log: Vec<GovernanceEvent>) -> Self {
        self.events = EventBus::with_log(log);
        self
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&GovernanceEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Open a spending proposal. `amount` is requested, not reserved.
    pub fn create_proposal(
        &mut self,
        caller: &Address,
        title: impl Into<String>,
        description: impl Into<String>,
        amount: TokenAmount,
        recipient: Address,
    ) -> Result<ProposalId, GovernanceError> {
        self.reject_treasury_caller(caller)?;
        self.require_stake(caller, self.state.params.min_stake_to_propose)?;
        if let Some(active) = self.state.active_proposal_of.get(caller) {
            return Err(GovernanceError::DuplicateActiveProposal {
                proposer: *caller,
                active: *active,
            });
        }
        if recipient.is_zero() {
            return Err(GovernanceError::ZeroRecipient);
        }
        let id = self.state.next_id;
        let next_id = id.next().ok_or(GovernanceError::Overflow("proposal id"))?;

        let now = self.clock.now();
        let deadline = self.state.params.deadline_for(now);
        let proposal = Proposal::new(
            id,
            *caller,
            title.into(),
            description.into(),
            amount,
            recipient,
            now,
            deadline,
        );

        self.state.proposals.push(proposal);
        self.state.next_id = next_id;
        self.state.active_proposal_of.insert(*caller, id);

        info!(%id, proposer = %caller, %amount, %recipient, %deadline, "proposal created");
        self.events.emit(GovernanceEvent::NewProposal {
            id,
            proposer: *caller,
            amount,
            recipient,
            deadline,
        });
        Ok(id)
    }

    /// Cast a vote weighted by the caller's balance right now.
    ///
    /// Returns the recorded weight. The weight never changes afterward,
    /// whatever happens to the caller's balance.
    pub fn vote(
        &mut self,
        caller: &Address,
        id: ProposalId,
        support: bool,
    ) -> Result<TokenAmount, GovernanceError> {
        let now = self.clock.now();
        let boundary = self.state.params.deadline_boundary;
        let proposal = self.state.proposal(id).ok_or(GovernanceError::NotFound(id))?;
        if !proposal.active || !boundary.voting_open(proposal.deadline, now) {
            return Err(GovernanceError::ProposalClosed(id));
        }
        self.reject_treasury_caller(caller)?;
        let weight = self.require_stake(caller, self.state.params.min_stake_to_vote)?;
        if proposal.has_voted(caller) {
            return Err(GovernanceError::DuplicateVote { id, voter: *caller });
        }

        let proposal = self
            .state
            .proposal_mut(id)
            .ok_or(GovernanceError::NotFound(id))?;
        proposal
            .record_vote(VoteRecord {
                voter: *caller,
                support,
                weight,
                cast_at: now,
            })
            .map_err(GovernanceError::Overflow)?;

        debug!(%id, voter = %caller, support, %weight, "vote cast");
        self.events.emit(GovernanceEvent::VoteCast {
            id,
            voter: *caller,
            support,
            weight,
        });
        Ok(weight)
    }

    /// Close a proposal whose voting window has elapsed.
    ///
    /// Open to any caller. On a strict yes majority the requested amount is
    /// paid from the treasury to the recipient. Otherwise the proposal is
    /// closed without payout and `MajorityNotReached` is returned; the
    /// proposer's slot is freed all the same.
    pub fn execute_proposal(&mut self, caller: &Address, id: ProposalId) -> Result<(), GovernanceError> {
        let now = self.clock.now();
        let boundary = self.state.params.deadline_boundary;
        let proposal = self.state.proposal(id).ok_or(GovernanceError::NotFound(id))?;
        if !proposal.active || proposal.executed {
            return Err(GovernanceError::AlreadyClosed(id));
        }
        if !boundary.execution_open(proposal.deadline, now) {
            return Err(GovernanceError::VotingOngoing {
                id,
                deadline: proposal.deadline,
            });
        }

        if !proposal.has_majority() {
            let (yes, no) = (proposal.yes_votes, proposal.no_votes);
            self.close(id, false)?;
            info!(%id, %yes, %no, executor = %caller, "proposal rejected");
            self.events.emit(GovernanceEvent::ProposalRejected {
                id,
                yes_votes: yes,
                no_votes: no,
            });
            return Err(GovernanceError::MajorityNotReached { id, yes, no });
        }

        let (amount, recipient) = (proposal.amount, proposal.recipient);
        // Last fallible step: nothing has been written yet if this fails.
        self.pay_from_treasury(&recipient, amount)?;
        self.close(id, true)?;

        info!(%id, %amount, %recipient, executor = %caller, "proposal executed");
        self.events.emit(GovernanceEvent::ProposalExecuted {
            id,
            amount,
            recipient,
        });
        Ok(())
    }

    /// Owner-only transfer from the treasury to the owner account.
    pub fn withdraw(&mut self, caller: &Address, amount: TokenAmount) -> Result<(), GovernanceError> {
        if caller != &self.state.owner {
            return Err(GovernanceError::Unauthorized(*caller));
        }
        let owner = self.state.owner;
        self.pay_from_treasury(&owner, amount)?;

        info!(%owner, %amount, "treasury withdrawal");
        self.events.emit(GovernanceEvent::TreasuryWithdrawal { to: owner, amount });
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn get_proposal(&self, id: ProposalId) -> Result<&Proposal, GovernanceError> {
        self.state.proposal(id).ok_or(GovernanceError::NotFound(id))
    }

    /// Every proposal ever created, in id order, closed ones included.
    pub fn get_all_proposals(&self) -> &[Proposal] {
        &self.state.proposals
    }

    pub fn owner(&self) -> Address {
        self.state.owner
    }

    pub fn treasury(&self) -> Address {
        self.state.treasury
    }

    pub fn treasury_balance(&self) -> TokenAmount {
        self.ledger.balance_of(&self.state.treasury)
    }

    pub fn active_proposal_of(&self, proposer: &Address) -> Option<ProposalId> {
        self.state.active_proposal_of.get(proposer).copied()
    }

    pub fn params(&self) -> &GovernanceParams {
        &self.state.params
    }

    pub fn state(&self) -> &GovernanceState {
        &self.state
    }

    pub fn events(&self) -> &[GovernanceEvent] {
        self.events.log()
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    // ── Internals ───────────────────────────────────────────────────────

    /// The treasury is custodied by the engine and never acts as a member.
    fn reject_treasury_caller(&self, caller: &Address) -> Result<(), GovernanceError> {
        if caller == &self.state.treasury {
            return Err(GovernanceError::Unauthorized(*caller));
        }
        Ok(())
    }

    /// Fails unless `account` holds at least `required`; returns the balance.
    fn require_stake(&self, account: &Address, required: TokenAmount) -> Result<TokenAmount, GovernanceError> {
        let balance = self.ledger.balance_of(account);
        if balance < required {
            return Err(GovernanceError::InsufficientStake {
                account: *account,
                balance,
                required,
            });
        }
        Ok(balance)
    }

    fn pay_from_treasury(&self, to: &Address, amount: TokenAmount) -> Result<(), GovernanceError> {
        self.ledger
            .transfer(&self.state.treasury, to, amount)
            .map_err(|e| match e {
                LedgerError::InsufficientBalance { needed, available, .. } => {
                    GovernanceError::TreasuryShortfall { needed, available }
                }
                other => GovernanceError::Ledger(other),
            })
    }

    /// Mark a proposal inactive and free its proposer's slot.
    fn close(&mut self, id: ProposalId, executed: bool) -> Result<(), GovernanceError> {
        let proposal = self
            .state
            .proposal_mut(id)
            .ok_or(GovernanceError::NotFound(id))?;
        proposal.active = false;
        proposal.executed = executed;
        let proposer = proposal.proposer;
        if self.state.active_proposal_of.get(&proposer) == Some(&id) {
            self.state.active_proposal_of.remove(&proposer);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_nullables::{FailingLedger, NullClock};
    use agora_token::InMemoryLedger;
    use agora_types::DeadlineBoundary;
    use std::sync::Arc;

    const PERIOD: u64 = 691_200;

    fn test_address(n: u8) -> Address {
        Address::new([n; 20])
    }

    fn tokens(n: u128) -> TokenAmount {
        TokenAmount::from_tokens(n)
    }

    fn owner() -> Address {
        test_address(1)
    }

    fn treasury() -> Address {
        test_address(0xda)
    }

    struct Fixture {
        ledger: Arc<InMemoryLedger>,
        clock: Arc<NullClock>,
        engine: GovernanceEngine<Arc<InMemoryLedger>, Arc<NullClock>>,
    }

    fn fixture_with(params: GovernanceParams) -> Fixture {
        let ledger = Arc::new(InMemoryLedger::with_initial_supply(owner(), tokens(1_000_000)));
        let clock = Arc::new(NullClock::new(10_000));
        let engine = GovernanceEngine::new(params, owner(), treasury(), Arc::clone(&ledger), Arc::clone(&clock)).unwrap();
        Fixture { ledger, clock, engine }
    }

    fn fixture() -> Fixture {
        fixture_with(GovernanceParams::default())
    }

    impl Fixture {
        fn fund(&self, to: Address, n: u128) {
            self.ledger.transfer(&owner(), &to, tokens(n)).unwrap();
        }

        fn propose(&mut self, proposer: Address, amount: u128) -> Result<ProposalId, GovernanceError> {
            self.engine
                .create_proposal(&proposer, "title", "Description", tokens(amount), owner())
        }
    }

    #[test]
    fn owner_is_set_at_construction() {
        let f = fixture();
        assert_eq!(f.engine.owner(), owner());
        assert_eq!(f.engine.treasury(), treasury());
    }

    #[test]
    fn construction_rejects_invalid_params() {
        let ledger = InMemoryLedger::default();
        let params = GovernanceParams {
            voting_period_secs: 0,
            ..GovernanceParams::default()
        };
        let result = GovernanceEngine::new(params, owner(), treasury(), ledger, NullClock::new(0));
        assert!(matches!(result, Err(GovernanceError::InvalidParams(_))));
    }

    #[test]
    fn create_proposal_records_state_and_emits() {
        let mut f = fixture();
        let addr1 = test_address(2);
        f.fund(addr1, 1100);

        let id = f.propose(addr1, 100).unwrap();
        assert_eq!(id, ProposalId::FIRST);

        let p = f.engine.get_proposal(id).unwrap();
        assert_eq!(p.proposer, addr1);
        assert_eq!(p.amount, tokens(100));
        assert_eq!(p.recipient, owner());
        assert_eq!(p.created_at, Timestamp::new(10_000));
        assert_eq!(p.deadline, Timestamp::new(10_000 + PERIOD));
        assert!(p.active && !p.executed);
        assert_eq!(f.engine.active_proposal_of(&addr1), Some(id));
        assert!(matches!(
            f.engine.events(),
            [GovernanceEvent::NewProposal { id: ProposalId::FIRST, .. }]
        ));
        // No funds move at creation.
        assert_eq!(f.ledger.balance_of(&addr1), tokens(1100));
    }

    #[test]
    fn create_without_stake_fails() {
        let mut f = fixture();
        let err = f.propose(test_address(2), 100).unwrap_err();
        assert!(matches!(err, GovernanceError::InsufficientStake { .. }));
        assert!(f.engine.get_all_proposals().is_empty());
        assert!(f.engine.events().is_empty());
    }

    #[test]
    fn second_active_proposal_is_rejected() {
        let mut f = fixture();
        let first = f.propose(owner(), 100).unwrap();
        let err = f.propose(owner(), 100).unwrap_err();
        assert_eq!(
            err,
            GovernanceError::DuplicateActiveProposal {
                proposer: owner(),
                active: first
            }
        );
        assert_eq!(f.engine.get_all_proposals().len(), 1);
    }

    #[test]
    fn zero_recipient_is_rejected() {
        let mut f = fixture();
        let err = f
            .engine
            .create_proposal(&owner(), "t", "d", tokens(1), Address::ZERO)
            .unwrap_err();
        assert_eq!(err, GovernanceError::ZeroRecipient);
    }

    #[test]
    fn treasury_cannot_propose_with_custodied_funds() {
        let mut f = fixture();
        f.fund(treasury(), 5000);
        assert_eq!(f.propose(treasury(), 100), Err(GovernanceError::Unauthorized(treasury())));
        assert!(f.engine.get_all_proposals().is_empty());
        assert_eq!(f.engine.active_proposal_of(&treasury()), None);
        assert!(f.engine.events().is_empty());
    }

    #[test]
    fn treasury_cannot_vote_with_custodied_funds() {
        let mut f = fixture();
        f.fund(treasury(), 5000);
        let id = f.propose(owner(), 100).unwrap();
        assert_eq!(
            f.engine.vote(&treasury(), id, true),
            Err(GovernanceError::Unauthorized(treasury()))
        );
        let p = f.engine.get_proposal(id).unwrap();
        assert!(p.voters.is_empty());
        assert_eq!(p.yes_votes, TokenAmount::ZERO);
        assert_eq!(f.engine.events().len(), 1);
    }

    #[test]
    fn vote_weight_is_balance_at_time_of_vote() {
        let mut f = fixture();
        let voter = test_address(2);
        let id = f.propose(owner(), 100).unwrap();
        f.fund(voter, 1100);

        let weight = f.engine.vote(&voter, id, true).unwrap();
        assert_eq!(weight, tokens(1100));

        // Later balance changes do not touch the recorded weight.
        f.ledger.transfer(&voter, &test_address(3), tokens(1100)).unwrap();
        let p = f.engine.get_proposal(id).unwrap();
        assert_eq!(p.yes_votes, tokens(1100));
        assert!(p.has_voted(&voter));
        assert!(matches!(
            f.engine.events().last(),
            Some(GovernanceEvent::VoteCast { support: true, .. })
        ));
    }

    #[test]
    fn vote_without_stake_fails() {
        let mut f = fixture();
        let id = f.propose(owner(), 100).unwrap();
        let err = f.engine.vote(&test_address(2), id, true).unwrap_err();
        assert!(matches!(err, GovernanceError::InsufficientStake { .. }));
        assert!(f.engine.get_proposal(id).unwrap().voters.is_empty());
    }

    #[test]
    fn double_vote_is_rejected() {
        let mut f = fixture();
        let id = f.propose(owner(), 100).unwrap();
        f.engine.vote(&owner(), id, true).unwrap();
        let err = f.engine.vote(&owner(), id, false).unwrap_err();
        assert_eq!(err, GovernanceError::DuplicateVote { id, voter: owner() });
        let p = f.engine.get_proposal(id).unwrap();
        assert_eq!(p.no_votes, TokenAmount::ZERO);
        assert_eq!(p.ballots.len(), 1);
    }

    #[test]
    fn vote_on_unknown_proposal_is_not_found() {
        let mut f = fixture();
        let err = f.engine.vote(&owner(), ProposalId::new(7), true).unwrap_err();
        assert_eq!(err, GovernanceError::NotFound(ProposalId::new(7)));
    }

    #[test]
    fn vote_at_deadline_depends_on_boundary() {
        let mut f = fixture();
        let id = f.propose(owner(), 100).unwrap();
        f.clock.advance(PERIOD);
        assert_eq!(
            f.engine.vote(&owner(), id, true),
            Err(GovernanceError::ProposalClosed(id))
        );

        let mut f = fixture_with(GovernanceParams {
            deadline_boundary: DeadlineBoundary::Inclusive,
            ..GovernanceParams::default()
        });
        let id = f.propose(owner(), 100).unwrap();
        f.clock.advance(PERIOD);
        assert!(f.engine.vote(&owner(), id, true).is_ok());
        assert!(matches!(
            f.engine.execute_proposal(&owner(), id),
            Err(GovernanceError::VotingOngoing { .. })
        ));
        f.clock.advance(1);
        assert!(f.engine.execute_proposal(&owner(), id).is_err_and(|e| matches!(e, GovernanceError::TreasuryShortfall { .. })));
    }

    #[test]
    fn execute_before_deadline_is_voting_ongoing() {
        let mut f = fixture();
        let id = f.propose(owner(), 100).unwrap();
        f.engine.vote(&owner(), id, true).unwrap();
        f.clock.advance(PERIOD - 1);
        assert_eq!(
            f.engine.execute_proposal(&owner(), id),
            Err(GovernanceError::VotingOngoing {
                id,
                deadline: Timestamp::new(10_000 + PERIOD)
            })
        );
        assert!(f.engine.get_proposal(id).unwrap().active);
    }

    #[test]
    fn passing_proposal_pays_recipient_and_closes() {
        let mut f = fixture();
        let addr1 = test_address(2);
        let recipient = test_address(3);
        f.fund(treasury(), 100);
        f.fund(addr1, 1100);
        let id = f
            .engine
            .create_proposal(&addr1, "title", "Description", tokens(100), recipient)
            .unwrap();
        f.engine.vote(&addr1, id, true).unwrap();
        f.clock.advance(PERIOD);

        f.engine.execute_proposal(&test_address(4), id).unwrap();

        assert_eq!(f.ledger.balance_of(&recipient), tokens(100));
        assert_eq!(f.engine.treasury_balance(), TokenAmount::ZERO);
        let p = f.engine.get_proposal(id).unwrap();
        assert!(p.executed && !p.active);
        assert_eq!(f.engine.active_proposal_of(&addr1), None);
        assert_eq!(
            f.engine.events().last(),
            Some(&GovernanceEvent::ProposalExecuted {
                id,
                amount: tokens(100),
                recipient
            })
        );

        assert_eq!(
            f.engine.execute_proposal(&addr1, id),
            Err(GovernanceError::AlreadyClosed(id))
        );
        assert_eq!(f.ledger.balance_of(&recipient), tokens(100));
    }

    #[test]
    fn failed_majority_closes_without_payout() {
        let mut f = fixture();
        let proposer = test_address(2);
        f.fund(treasury(), 500);
        f.fund(proposer, 2000);
        let id = f.propose(proposer, 100).unwrap();
        f.engine.vote(&proposer, id, false).unwrap();
        f.clock.advance(PERIOD);

        let err = f.engine.execute_proposal(&proposer, id).unwrap_err();
        assert!(matches!(err, GovernanceError::MajorityNotReached { .. }));
        assert!(err.is_partial_commit());

        let p = f.engine.get_proposal(id).unwrap();
        assert!(!p.active && !p.executed);
        assert_eq!(f.engine.treasury_balance(), tokens(500));
        assert!(matches!(
            f.engine.events().last(),
            Some(GovernanceEvent::ProposalRejected { .. })
        ));

        // The slot is free again.
        let next = f.propose(proposer, 50).unwrap();
        assert_eq!(next, ProposalId::new(1));
        assert_eq!(
            f.engine.execute_proposal(&proposer, id),
            Err(GovernanceError::AlreadyClosed(id))
        );
    }

    #[test]
    fn no_votes_or_tie_does_not_pass() {
        let mut f = fixture();
        let id = f.propose(owner(), 0).unwrap();
        f.clock.advance(PERIOD);
        assert!(matches!(
            f.engine.execute_proposal(&owner(), id),
            Err(GovernanceError::MajorityNotReached { .. })
        ));

        let a = test_address(2);
        let b = test_address(3);
        f.fund(a, 1500);
        f.fund(b, 1500);
        let id = f.propose(a, 0).unwrap();
        f.engine.vote(&a, id, true).unwrap();
        f.engine.vote(&b, id, false).unwrap();
        f.clock.advance(PERIOD);
        assert!(matches!(
            f.engine.execute_proposal(&owner(), id),
            Err(GovernanceError::MajorityNotReached { .. })
        ));
    }

    #[test]
    fn treasury_shortfall_rolls_back_everything() {
        let mut f = fixture();
        f.fund(treasury(), 10);
        let id = f.propose(owner(), 100).unwrap();
        f.engine.vote(&owner(), id, true).unwrap();
        f.clock.advance(PERIOD);
        let events_before = f.engine.events().len();
        let state_before = f.engine.state().clone();

        assert_eq!(
            f.engine.execute_proposal(&owner(), id),
            Err(GovernanceError::TreasuryShortfall {
                needed: tokens(100),
                available: tokens(10)
            })
        );
        assert_eq!(f.engine.state(), &state_before);
        assert_eq!(f.engine.events().len(), events_before);
        assert_eq!(f.engine.treasury_balance(), tokens(10));

        // Topping up the treasury lets the same proposal go through.
        f.fund(treasury(), 90);
        f.engine.execute_proposal(&owner(), id).unwrap();
        assert!(f.engine.get_proposal(id).unwrap().executed);
    }

    #[test]
    fn ledger_failure_is_atomic() {
        let ledger = FailingLedger::new(InMemoryLedger::with_initial_supply(owner(), tokens(10_000)));
        let clock = Arc::new(NullClock::new(0));
        let mut engine =
            GovernanceEngine::new(GovernanceParams::default(), owner(), treasury(), ledger, Arc::clone(&clock)).unwrap();
        let id = engine
            .create_proposal(&owner(), "t", "d", tokens(1), test_address(5))
            .unwrap();
        engine.vote(&owner(), id, true).unwrap();
        clock.advance(PERIOD);
        engine.ledger().fail_transfers(true);

        let before = engine.state().clone();
        assert!(matches!(
            engine.execute_proposal(&owner(), id),
            Err(GovernanceError::Ledger(_))
        ));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn withdraw_is_owner_gated() {
        let mut f = fixture();
        f.fund(treasury(), 100);
        let stranger = test_address(2);

        assert_eq!(
            f.engine.withdraw(&stranger, tokens(100)),
            Err(GovernanceError::Unauthorized(stranger))
        );
        assert_eq!(f.engine.treasury_balance(), tokens(100));

        let owner_before = f.ledger.balance_of(&owner());
        f.engine.withdraw(&owner(), tokens(100)).unwrap();
        assert_eq!(f.engine.treasury_balance(), TokenAmount::ZERO);
        assert_eq!(f.ledger.balance_of(&owner()), owner_before.checked_add(tokens(100)).unwrap());
        assert_eq!(
            f.engine.events().last(),
            Some(&GovernanceEvent::TreasuryWithdrawal {
                to: owner(),
                amount: tokens(100)
            })
        );

        assert!(matches!(
            f.engine.withdraw(&owner(), tokens(1)),
            Err(GovernanceError::TreasuryShortfall { .. })
        ));
    }

    #[test]
    fn queries_cover_closed_proposals() {
        let mut f = fixture();
        let id = f.propose(owner(), 0).unwrap();
        f.clock.advance(PERIOD);
        let _ = f.engine.execute_proposal(&owner(), id);
        f.propose(owner(), 0).unwrap();

        assert_eq!(f.engine.get_all_proposals().len(), 2);
        assert_eq!(f.engine.get_proposal(ProposalId::FIRST).unwrap().id, ProposalId::FIRST);
        assert_eq!(
            f.engine.get_proposal(ProposalId::new(2)).unwrap_err(),
            GovernanceError::NotFound(ProposalId::new(2))
        );
    }

    #[test]
    fn resumes_from_persisted_state() {
        let mut f = fixture();
        let id = f.propose(owner(), 100).unwrap();
        f.engine.vote(&owner(), id, true).unwrap();
        let json = serde_json::to_string(f.engine.state()).unwrap();
        let events = f.engine.events().to_vec();

        let state: GovernanceState = serde_json::from_str(&json).unwrap();
        let mut resumed = GovernanceEngine::from_state(state, Arc::clone(&f.ledger), Arc::clone(&f.clock))
            .unwrap()
            .with_event_log(events);
        assert_eq!(resumed.events().len(), 2);
        assert_eq!(resumed.active_proposal_of(&owner()), Some(id));
        assert!(matches!(
            resumed.vote(&owner(), id, true),
            Err(GovernanceError::DuplicateVote { .. })
        ));
    }

    #[test]
    fn listeners_observe_events() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let mut f = fixture();
        let seen = Arc::new(AtomicUsize::new(0));
        let s = Arc::clone(&seen);
        f.engine.subscribe(Box::new(move |_| {
            s.fetch_add(1, Ordering::SeqCst);
        }));
        let id = f.propose(owner(), 1).unwrap();
        f.engine.vote(&owner(), id, true).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }
}
