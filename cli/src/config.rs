//! CLI configuration with TOML file support.

use agora_types::{Address, DeadlineBoundary, GovernanceParams, TokenAmount};
use agora_utils::LogFormat;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the `agora` command line.
///
/// Loaded from a TOML file via [`AgoraConfig::from_toml_file`]; flags and
/// `AGORA_*` environment variables override individual values.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgoraConfig {
    /// JSON file holding ledger balances, governance state and the event log.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// The engine's own ledger account, used when deploying.
    #[serde(default = "default_treasury")]
    pub treasury: Address,

    #[serde(default)]
    pub token: TokenSection,

    #[serde(default)]
    pub governance: GovernanceSection,
}

/// Token deployment settings. Amounts are whole-token decimals (`"1000000"`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenSection {
    #[serde(default = "default_token_name")]
    pub name: String,
    #[serde(default = "default_token_symbol")]
    pub symbol: String,
    #[serde(default = "default_initial_supply")]
    pub initial_supply: String,
}

/// Governance parameters. Stakes are whole-token decimals (`"1000"`, `"0.5"`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GovernanceSection {
    #[serde(default = "default_min_stake")]
    pub min_stake_to_propose: String,
    #[serde(default = "default_min_stake")]
    pub min_stake_to_vote: String,
    #[serde(default = "default_voting_period_secs")]
    pub voting_period_secs: u64,
    #[serde(default)]
    pub deadline_boundary: DeadlineBoundary,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_state_file() -> PathBuf {
    PathBuf::from("./agora_state.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_treasury() -> Address {
    Address::new([0xda; 20])
}

fn default_token_name() -> String {
    "DAOToken".to_string()
}

fn default_token_symbol() -> String {
    "DAO".to_string()
}

fn default_initial_supply() -> String {
    "1000000".to_string()
}

fn default_min_stake() -> String {
    GovernanceParams::DEFAULT_MIN_STAKE_TOKENS.to_string()
}

fn default_voting_period_secs() -> u64 {
    GovernanceParams::DEFAULT_VOTING_PERIOD_SECS
}

impl Default for TokenSection {
    fn default() -> Self {
        Self {
            name: default_token_name(),
            symbol: default_token_symbol(),
            initial_supply: default_initial_supply(),
        }
    }
}

impl Default for GovernanceSection {
    fn default() -> Self {
        Self {
            min_stake_to_propose: default_min_stake(),
            min_stake_to_vote: default_min_stake(),
            voting_period_secs: default_voting_period_secs(),
            deadline_boundary: DeadlineBoundary::default(),
        }
    }
}

impl Default for AgoraConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            treasury: default_treasury(),
            token: TokenSection::default(),
            governance: GovernanceSection::default(),
        }
    }
}

impl AgoraConfig {
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn initial_supply(&self) -> anyhow::Result<TokenAmount> {
        TokenAmount::from_decimal_str(&self.token.initial_supply).context("token.initial_supply")
    }

    /// Governance parameters, validated.
    pub fn governance_params(&self) -> anyhow::Result<GovernanceParams> {
        let g = &self.governance;
        let params = GovernanceParams {
            min_stake_to_propose: TokenAmount::from_decimal_str(&g.min_stake_to_propose)
                .context("governance.min_stake_to_propose")?,
            min_stake_to_vote: TokenAmount::from_decimal_str(&g.min_stake_to_vote)
                .context("governance.min_stake_to_vote")?,
            voting_period_secs: g.voting_period_secs,
            deadline_boundary: g.deadline_boundary,
        };
        params.validate()?;
        Ok(params)
    }
}
