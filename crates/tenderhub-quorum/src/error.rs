//! error types for tenderhub-quorum.

use tenderhub_types::OrganizationId;
use thiserror::Error;

/// errors that can occur while evaluating a decision.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// a rejection was already recorded; the bid is final.
    #[error("bid is already rejected")]
    AlreadyRejected,

    /// approvals already reached the quorum; the bid is final.
    #[error("bid is already approved")]
    AlreadyApproved,

    /// the bid author represents no organization.
    #[error("bid author is not responsible for any organization")]
    NoOrganization,

    /// the deciding organization has no responsible users.
    #[error("organization {0} has no responsible users")]
    NoResponsibleUsers(OrganizationId),
}

/// result type for tenderhub-quorum operations.
pub type Result<T> = std::result::Result<T, Error>;
