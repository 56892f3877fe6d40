//! error types for tenderhub-types

use thiserror::Error;

/// errors that can occur in tenderhub-types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// tender status is not one of Created, Published, Closed
    #[error("not allowed tender status: {0}")]
    InvalidTenderStatus(String),

    /// service type is not one of Construction, Delivery, Manufacture
    #[error("not allowed service type: {0}")]
    InvalidServiceType(String),

    /// bid status is not one of Created, Published, Canceled
    #[error("not allowed bid status: {0}")]
    InvalidBidStatus(String),

    /// author type is not one of User, Organization
    #[error("not allowed author type: {0}")]
    InvalidAuthorType(String),

    /// decision is not one of Approved, Rejected
    #[error("not allowed decision: {0}")]
    InvalidDecision(String),

    /// organization type is not one of IE, LLC, JSC
    #[error("not allowed organization type: {0}")]
    InvalidOrganizationType(String),

    /// required text field is empty
    #[error("{field} cannot be empty")]
    EmptyField {
        /// name of the offending field
        field: &'static str,
    },

    /// text field exceeds its maximum length
    #[error("{field} too long (max {max} characters)")]
    FieldTooLong {
        /// name of the offending field
        field: &'static str,
        /// maximum allowed length in characters
        max: usize,
    },

    /// configuration error
    #[error("configuration error: {0}")]
    Config(String),
}
