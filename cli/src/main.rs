//! Agora command line: deploy a token-weighted DAO into a local state file
//! and drive its governance from the shell.

use agora_cli::{run, AgoraConfig, Command, CommandClock};
use agora_utils::{init_logging, LogFormat};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agora", about = "Token-weighted DAO governance")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "AGORA_CONFIG")]
    config: Option<PathBuf>,

    /// State file holding balances, proposals and events.
    #[arg(long, env = "AGORA_STATE_FILE")]
    state: Option<PathBuf>,

    /// Pin the clock to this unix timestamp (seconds).
    #[arg(long, env = "AGORA_NOW")]
    now: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "AGORA_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "AGORA_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AgoraConfig::from_toml_file(path)?,
        None => AgoraConfig::default(),
    };
    if let Some(state) = cli.state {
        config.state_file = state;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    init_logging(config.log_format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::debug!(config = %path.display(), "loaded config file");
    }

    let clock = CommandClock::from_override(cli.now);
    let output = run(&cli.command, &config, &config.state_file, clock)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
