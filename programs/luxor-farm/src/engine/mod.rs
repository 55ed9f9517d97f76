//! Reward-accounting core.
//!
//! Everything here is generic over the [`FarmStore`] record store and the
//! token collaborators, so the same code runs inside the program (against
//! PDA accounts and token vaults) and in memory (tests, client simulation).
//! Heights are passed in explicitly; nothing reads the clock.

pub mod checkpoint;
pub use checkpoint::*;

pub mod ledger;
pub use ledger::*;

pub mod operation;
pub use operation::*;

pub mod oracle;
pub use oracle::*;

pub mod query;
pub use query::*;

pub mod registry;
pub use registry::*;

pub mod rewards;
pub use rewards::*;

pub mod store;
pub use store::*;

pub mod yield_schedule;
pub use yield_schedule::*;
