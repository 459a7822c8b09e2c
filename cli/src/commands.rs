//! Subcommands: each loads the state file, applies one operation and saves
//! the result when state changed.

use crate::config::AgoraConfig;
use crate::store::StateFile;
use agora_governance::{GovernanceEngine, GovernanceError, Proposal};
use agora_token::{InMemoryLedger, TokenInfo, TokenLedger};
use agora_types::{Address, Clock, ProposalId, SystemClock, Timestamp, TokenAmount};
use agora_utils::format_duration;
use anyhow::{bail, Context};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone, Debug, clap::Subcommand)]
pub enum Command {
    /// Deploy the token and the governance engine into a new state file.
    Init {
        /// Deployer: receives the initial supply and owns the treasury.
        #[arg(long)]
        owner: Address,
        /// Engine's own ledger account (defaults to the config value).
        #[arg(long)]
        treasury: Option<Address>,
        /// Initial supply in whole tokens (defaults to the config value).
        #[arg(long, value_parser = parse_amount)]
        supply: Option<TokenAmount>,
        /// Overwrite an existing state file.
        #[arg(long)]
        force: bool,
    },
    /// Move tokens between two ledger accounts.
    Transfer {
        #[arg(long)]
        from: Address,
        #[arg(long)]
        to: Address,
        #[arg(long, value_parser = parse_amount)]
        amount: TokenAmount,
    },
    /// Print the token balance of an account.
    Balance { account: Address },
    /// Create a spending proposal.
    Propose {
        #[arg(long)]
        from: Address,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_parser = parse_amount)]
        amount: TokenAmount,
        #[arg(long)]
        recipient: Address,
    },
    /// Cast a weighted vote.
    Vote {
        #[arg(long)]
        from: Address,
        #[arg(long)]
        id: u64,
        #[arg(value_enum)]
        choice: Choice,
    },
    /// Execute a proposal whose voting period has ended.
    Execute {
        #[arg(long)]
        from: Address,
        #[arg(long)]
        id: u64,
    },
    /// Owner-only withdrawal from the treasury.
    Withdraw {
        #[arg(long)]
        from: Address,
        #[arg(long, value_parser = parse_amount)]
        amount: TokenAmount,
    },
    /// Show one proposal.
    Show {
        #[arg(long)]
        id: u64,
        #[arg(long)]
        json: bool,
    },
    /// List every proposal ever created.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Print the owner account.
    Owner,
    /// Print the treasury account and balance.
    Treasury,
    /// Print the event log, optionally for one proposal.
    Events {
        #[arg(long)]
        id: Option<u64>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Choice {
    Yes,
    No,
}

fn parse_amount(s: &str) -> Result<TokenAmount, String> {
    TokenAmount::from_decimal_str(s).map_err(|e| e.to_string())
}

/// Either the wall clock or a pinned instant (`--now`).
#[derive(Clone, Copy, Debug)]
pub enum CommandClock {
    System,
    Fixed(Timestamp),
}

impl CommandClock {
    pub fn from_override(now: Option<u64>) -> Self {
        now.map(|secs| Self::Fixed(Timestamp::new(secs)))
            .unwrap_or(Self::System)
    }
}

impl Clock for CommandClock {
    fn now(&self) -> Timestamp {
        match self {
            Self::System => SystemClock.now(),
            Self::Fixed(ts) => *ts,
        }
    }
}

pub type Engine = GovernanceEngine<Arc<InMemoryLedger>, CommandClock>;

/// A loaded state file.
pub struct Session {
    ledger: Arc<InMemoryLedger>,
    engine: Engine,
}

impl Session {
    pub fn open(path: &Path, clock: CommandClock) -> anyhow::Result<Self> {
        let file = StateFile::load(path)?;
        let ledger = Arc::new(InMemoryLedger::from_snapshot(file.ledger));
        let engine = GovernanceEngine::from_state(file.governance, Arc::clone(&ledger), clock)
            .context("state file failed verification")?
            .with_event_log(file.events);
        Ok(Self { ledger, engine })
    }

    pub fn deploy(
        config: &AgoraConfig,
        owner: Address,
        treasury: Address,
        supply: TokenAmount,
        clock: CommandClock,
    ) -> anyhow::Result<Self> {
        let info = TokenInfo {
            name: config.token.name.clone(),
            symbol: config.token.symbol.clone(),
            ..TokenInfo::default()
        };
        let ledger = Arc::new(InMemoryLedger::deploy(info, owner, supply));
        let engine = GovernanceEngine::new(
            config.governance_params()?,
            owner,
            treasury,
            Arc::clone(&ledger),
            clock,
        )?;
        Ok(Self { ledger, engine })
    }

    pub fn to_state_file(&self) -> StateFile {
        StateFile {
            version: StateFile::VERSION,
            ledger: self.ledger.snapshot(),
            governance: self.engine.state().clone(),
            events: self.engine.events().to_vec(),
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        self.to_state_file().save(path)
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn ledger(&self) -> &InMemoryLedger {
        &self.ledger
    }
}

/// Run one command against the state file at `path`. Returns the text to print.
pub fn run(command: &Command, config: &AgoraConfig, path: &Path, clock: CommandClock) -> anyhow::Result<String> {
    if let Command::Init {
        owner,
        treasury,
        supply,
        force,
    } = command
    {
        if path.exists() && !force {
            bail!("state file {} already exists (use --force to overwrite)", path.display());
        }
        let supply = match supply {
            Some(s) => *s,
            None => config.initial_supply()?,
        };
        let treasury = treasury.unwrap_or(config.treasury);
        let session = Session::deploy(config, *owner, treasury, supply, clock)?;
        session.save(path)?;
        info!(state_file = %path.display(), %owner, %treasury, %supply, "deployed");
        return Ok(format!(
            "deployed {} ({}) supply {supply} to {owner}\nowner {owner}\ntreasury {treasury}",
            session.ledger().info().name,
            session.ledger().info().symbol,
        ));
    }

    let mut session = Session::open(path, clock)?;
    let outcome = apply(&mut session, command);
    match &outcome {
        Ok(Applied { mutated: true, .. }) => session.save(path)?,
        Err(e) => {
            if let Some(gov) = e.downcast_ref::<GovernanceError>() {
                if gov.is_partial_commit() {
                    session.save(path)?;
                }
                warn!(error = %gov, "operation rejected");
            }
        }
        Ok(_) => {}
    }
    outcome.map(|applied| applied.output)
}

struct Applied {
    output: String,
    mutated: bool,
}

impl Applied {
    fn changed(output: String) -> Self {
        Self { output, mutated: true }
    }

    fn read(output: String) -> Self {
        Self { output, mutated: false }
    }
}

fn apply(session: &mut Session, command: &Command) -> anyhow::Result<Applied> {
    let now = session.engine.now();
    match command {
        Command::Init { .. } => bail!("init is handled before a state file is opened"),
        Command::Transfer { from, to, amount } => {
            if *from == session.engine.treasury() {
                bail!("treasury {from} pays out only through execute or withdraw");
            }
            session.ledger.transfer(from, to, *amount)?;
            Ok(Applied::changed(format!("transferred {amount} from {from} to {to}")))
        }
        Command::Balance { account } => Ok(Applied::read(format!(
            "{} {}",
            session.ledger.balance_of(account),
            session.ledger.info().symbol
        ))),
        Command::Propose {
            from,
            title,
            description,
            amount,
            recipient,
        } => {
            let id = session
                .engine
                .create_proposal(from, title.as_str(), description.as_str(), *amount, *recipient)?;
            let deadline = session.engine.get_proposal(id)?.deadline;
            Ok(Applied::changed(format!("created proposal {id}, voting ends at {deadline}")))
        }
        Command::Vote { from, id, choice } => {
            let id = ProposalId::new(*id);
            let weight = session.engine.vote(from, id, *choice == Choice::Yes)?;
            Ok(Applied::changed(format!(
                "voted {} on proposal {id} with weight {weight}",
                if *choice == Choice::Yes { "yes" } else { "no" }
            )))
        }
        Command::Execute { from, id } => {
            let id = ProposalId::new(*id);
            session.engine.execute_proposal(from, id)?;
            let p = session.engine.get_proposal(id)?;
            Ok(Applied::changed(format!(
                "executed proposal {id}: paid {} to {}",
                p.amount, p.recipient
            )))
        }
        Command::Withdraw { from, amount } => {
            session.engine.withdraw(from, *amount)?;
            Ok(Applied::changed(format!("withdrew {amount} to {from}")))
        }
        Command::Show { id, json } => {
            let p = session.engine.get_proposal(ProposalId::new(*id))?;
            let output = if *json {
                serde_json::to_string_pretty(p)?
            } else {
                describe(p, session, now)
            };
            Ok(Applied::read(output))
        }
        Command::List { json } => {
            let all = session.engine.get_all_proposals();
            let output = if *json {
                serde_json::to_string_pretty(all)?
            } else if all.is_empty() {
                "no proposals".to_string()
            } else {
                all.iter()
                    .map(|p| summarize(p, session, now))
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            Ok(Applied::read(output))
        }
        Command::Owner => Ok(Applied::read(session.engine.owner().to_string())),
        Command::Treasury => Ok(Applied::read(format!(
            "{} holds {}",
            session.engine.treasury(),
            session.engine.treasury_balance()
        ))),
        Command::Events { id } => {
            let filter = id.map(ProposalId::new);
            let lines: Vec<String> = session
                .engine
                .events()
                .iter()
                .filter(|e| filter.is_none() || e.proposal_id() == filter)
                .map(serde_json::to_string)
                .collect::<Result<_, _>>()?;
            Ok(Applied::read(lines.join("\n")))
        }
    }
}

fn summarize(p: &Proposal, session: &Session, now: Timestamp) -> String {
    let status = p.status(now, session.engine.params().deadline_boundary);
    format!(
        "{} {:?} \"{}\" {} -> {} (yes {} / no {})",
        p.id, status, p.title, p.amount, p.recipient, p.yes_votes, p.no_votes
    )
}

fn describe(p: &Proposal, session: &Session, now: Timestamp) -> String {
    let mut out = summarize(p, session, now);
    let _ = write!(out, "\nproposer {}\n{}", p.proposer, p.description);
    let remaining = p.remaining_secs(now);
    if !p.is_closed() && remaining > 0 {
        let _ = write!(out, "\nvoting closes in {}", format_duration(remaining));
    }
    for b in &p.ballots {
        let _ = write!(
            out,
            "\n  {} {} weight {}",
            b.voter,
            if b.support { "yes" } else { "no" },
            b.weight
        );
    }
    out
}
