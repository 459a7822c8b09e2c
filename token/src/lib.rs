//! Token ledger capability.
//!
//! The governance engine never stores balances itself. It sees the token
//! through [`TokenLedger`]: a balance lookup for any account and a transfer
//! it can invoke on its own custodied balance (the treasury).
//!
//! [`InMemoryLedger`] is the in-process implementation used by the CLI and
//! the test suites.

pub mod error;
pub mod ledger;
pub mod memory;

pub use error::LedgerError;
pub use ledger::{TokenInfo, TokenLedger};
pub use memory::{InMemoryLedger, LedgerSnapshot};
