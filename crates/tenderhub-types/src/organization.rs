//! organizations and their responsible users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::OrganizationId;
use crate::macros::string_enum;

string_enum!(
    /// legal form of an organization.
    #[allow(clippy::upper_case_acronyms)]
    OrganizationType, InvalidOrganizationType {
        /// individual entrepreneur.
        IE,
        /// limited liability company.
        LLC,
        /// joint-stock company.
        JSC,
    }
);

/// an organization that publishes tenders or authors bids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub description: Option<String>,
    pub org_type: OrganizationType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    pub fn new(name: String, org_type: OrganizationType) -> Self {
        let now = Utc::now();
        Self {
            id: OrganizationId::new_v4(),
            name,
            description: None,
            org_type,
            created_at: now,
            updated_at: now,
        }
    }
}
