//! quorum-based decision engine for tenderhub bids.
//!
//! responsible users of the deciding organization approve or reject a bid.
//! a single rejection is final. once approvals reach the quorum the bid is
//! approved and its tender closes. the engine is pure: it computes verdicts
//! from counters and membership, and the caller persists them.

#![warn(missing_docs)]

pub mod engine;
pub mod error;

pub use engine::{MAX_QUORUM, QuorumEngine, QuorumPolicy, QuorumState, Verdict};
pub use error::{Error, Result};
