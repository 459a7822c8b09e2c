//! The JSON state file: token balances, governance state and event log.

use agora_governance::{GovernanceEvent, GovernanceState};
use agora_token::LedgerSnapshot;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFile {
    pub version: u32,
    pub ledger: LedgerSnapshot,
    pub governance: GovernanceState,
    #[serde(default)]
    pub events: Vec<GovernanceEvent>,
}

impl StateFile {
    pub const VERSION: u32 = 1;

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading state file {} (run `agora init` first?)", path.display()))?;
        let state: Self = serde_json::from_str(&contents)
            .with_context(|| format!("parsing state file {}", path.display()))?;
        if state.version != Self::VERSION {
            bail!(
                "state file {} has version {}, expected {}",
                path.display(),
                state.version,
                Self::VERSION
            );
        }
        Ok(state)
    }

    /// Write via a sibling temp file and rename, so a crash never leaves a
    /// half-written state file behind.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        fs::write(&tmp, json).with_context(|| format!("writing {}", Path::new(&tmp).display()))?;
        fs::rename(&tmp, path).with_context(|| format!("replacing state file {}", path.display()))?;
        Ok(())
    }
}
