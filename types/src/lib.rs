//! Fundamental types for the Agora governance engine.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account addresses, token amounts, timestamps and clocks, proposal ids,
//! and the governance parameters fixed at engine construction.

pub mod address;
pub mod amount;
pub mod error;
pub mod id;
pub mod params;
pub mod time;

pub use address::Address;
pub use amount::{TokenAmount, TOKEN_DECIMALS, TOKEN_UNIT};
pub use error::TypesError;
pub use id::ProposalId;
pub use params::{DeadlineBoundary, GovernanceParams};
pub use time::{Clock, SystemClock, Timestamp};
