//! core types for tenderhub - a procurement tenders and bids service.
//!
//! this crate provides the fundamental data structures used throughout tenderhub:
//! - [`Tender`] and [`Bid`]: the versioned entities
//! - [`Review`]: feedback attached to a bid
//! - [`User`] and [`Organization`]: the identity and membership tables
//! - [`Config`]: application configuration

mod bid;
mod config;
mod decision;
mod error;
mod ids;
mod macros;
mod organization;
mod review;
mod tender;
pub mod text;
mod user;
mod versioned;

pub use bid::{AuthorType, Bid, BidAttrs, BidAuthor, BidPatch, BidStatus};
pub use config::{Config, DatabaseConfig};
pub use decision::{Decision, DecisionCounters};
pub use error::Error;
pub use ids::{BidId, OrganizationId, ReviewId, TenderId, UserId};
pub use organization::{Organization, OrganizationType};
pub use review::Review;
pub use tender::{ServiceType, Tender, TenderAttrs, TenderPatch, TenderStatus};
pub use user::{MAX_USERNAME_LEN, User};
pub use versioned::{INITIAL_VERSION, Versioned};

/// result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;
