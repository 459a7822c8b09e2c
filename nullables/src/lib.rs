//! Nullable infrastructure for deterministic testing.
//!
//! Everything the governance engine depends on from outside (time, the token
//! ledger, event observers) sits behind a trait or callback. This crate
//! provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod events;
pub mod ledger;

pub use clock::NullClock;
pub use events::EventRecorder;
pub use ledger::FailingLedger;
