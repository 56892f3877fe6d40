//! employees: the users that act on tenders and bids.
//!
//! users are seeded from the cli; the service itself only looks them up by
//! username or id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// maximum length for a username.
pub const MAX_USERNAME_LEN: usize = 50;

/// an employee known to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// unique identifier.
    pub id: UserId,

    /// login name, unique across all users.
    pub username: String,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    /// when the user was created.
    pub created_at: DateTime<Utc>,

    /// when the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// create a new user with the given username.
    pub fn new(username: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new_v4(),
            username,
            first_name: None,
            last_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// returns "first last", falling back to the username.
    pub fn display(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.to_string(),
            (None, None) => self.username.clone(),
        }
    }
}
