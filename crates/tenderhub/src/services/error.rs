//! service error taxonomy.
//!
//! every failure a service can report falls into one of these kinds. the
//! http layer maps each kind to a status code; raw database errors never
//! leave this module unwrapped.

use thiserror::Error;

/// errors returned by tender and bid services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// tender, bid or history version absent.
    #[error("{0}")]
    NotFound(String),

    /// username empty or unknown.
    #[error("user does not exist")]
    UserNotFound,

    /// acting user does not represent the relevant organization.
    #[error("user is not organization responsible")]
    UserIsNotOrgResponsible,

    /// malformed or disallowed input.
    #[error("{0}")]
    InvalidInput(String),

    /// the entity changed concurrently.
    #[error("{0}")]
    Conflict(String),

    /// the store failed.
    #[error("persistence failure: {0}")]
    Persistence(#[source] tenderhub_db::Error),
}

impl ServiceError {
    /// shorthand for [`ServiceError::NotFound`].
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// shorthand for [`ServiceError::InvalidInput`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<tenderhub_db::Error> for ServiceError {
    fn from(err: tenderhub_db::Error) -> Self {
        use tenderhub_db::Error as DbError;
        match err {
            DbError::NotFound(msg) => ServiceError::NotFound(format!("{msg} not found")),
            DbError::AlreadyExists(_) => {
                ServiceError::InvalidInput("name is already taken".to_string())
            }
            DbError::Conflict(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Persistence(other),
        }
    }
}

impl From<tenderhub_types::Error> for ServiceError {
    fn from(err: tenderhub_types::Error) -> Self {
        ServiceError::InvalidInput(err.to_string())
    }
}

impl From<tenderhub_quorum::Error> for ServiceError {
    fn from(err: tenderhub_quorum::Error) -> Self {
        use tenderhub_quorum::Error as QuorumError;
        match err {
            QuorumError::AlreadyRejected | QuorumError::AlreadyApproved => {
                ServiceError::InvalidInput(err.to_string())
            }
            QuorumError::NoOrganization | QuorumError::NoResponsibleUsers(_) => {
                ServiceError::UserIsNotOrgResponsible
            }
        }
    }
}

/// result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
