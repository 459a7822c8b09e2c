//! Library half of the `agora` command line: configuration, the JSON state
//! file and the subcommand implementations.

pub mod commands;
pub mod config;
pub mod store;

pub use commands::{run, Choice, Command, CommandClock, Session};
pub use config::AgoraConfig;
pub use store::StateFile;
