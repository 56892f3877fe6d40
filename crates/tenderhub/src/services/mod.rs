//! business services: resolve the actor, check rights, delegate to the store.

pub mod access;
pub mod bids;
pub mod error;
pub mod tenders;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use error::{Result, ServiceError};
