//! bids: offers submitted against a tender by a user or an organization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::macros::string_enum;
use crate::text::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN, check_max_len, check_required};
use crate::versioned::{INITIAL_VERSION, Versioned};
use crate::{BidId, Error, OrganizationId, TenderId, UserId};

string_enum!(
    /// lifecycle status of a bid.
    BidStatus, InvalidBidStatus {
        Created,
        Published,
        Canceled,
    }
);

string_enum!(
    /// who authored a bid.
    AuthorType, InvalidAuthorType {
        User,
        Organization,
    }
);

/// author of a bid together with its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BidAuthor {
    User(UserId),
    Organization(OrganizationId),
}

impl BidAuthor {
    /// build an author from its type tag and raw id.
    pub fn from_parts(author_type: AuthorType, id: uuid::Uuid) -> Self {
        match author_type {
            AuthorType::User => BidAuthor::User(UserId(id)),
            AuthorType::Organization => BidAuthor::Organization(OrganizationId(id)),
        }
    }

    pub fn author_type(&self) -> AuthorType {
        match self {
            BidAuthor::User(_) => AuthorType::User,
            BidAuthor::Organization(_) => AuthorType::Organization,
        }
    }

    /// the raw author id regardless of type.
    pub fn id(&self) -> uuid::Uuid {
        match self {
            BidAuthor::User(id) => id.0,
            BidAuthor::Organization(id) => id.0,
        }
    }
}

/// the versioned attribute set of a bid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidAttrs {
    pub name: String,
    pub description: String,
    pub status: BidStatus,
    pub tender_id: TenderId,
    pub author: BidAuthor,
}

impl BidAttrs {
    /// validate text length limits.
    pub fn validate(&self) -> Result<(), Error> {
        check_required("name", &self.name, MAX_NAME_LEN)?;
        check_max_len("description", &self.description, MAX_DESCRIPTION_LEN)
    }
}

/// a bid at a specific version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub id: BidId,
    pub attrs: BidAttrs,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

impl Bid {
    /// create a new bid at version 1 with status `Created`.
    pub fn new(name: String, description: String, tender_id: TenderId, author: BidAuthor) -> Self {
        Self {
            id: BidId::new_v4(),
            attrs: BidAttrs {
                name,
                description,
                status: BidStatus::Created,
                tender_id,
                author,
            },
            version: INITIAL_VERSION,
            created_at: Utc::now(),
        }
    }

    pub fn status(&self) -> BidStatus {
        self.attrs.status
    }

    pub fn tender_id(&self) -> TenderId {
        self.attrs.tender_id
    }

    pub fn author(&self) -> BidAuthor {
        self.attrs.author
    }
}

impl Versioned for Bid {
    type Id = BidId;
    type Attrs = BidAttrs;
    const KIND: &'static str = "bid";

    fn id(&self) -> BidId {
        self.id
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn attrs(&self) -> &BidAttrs {
        &self.attrs
    }

    fn revise(&self, attrs: BidAttrs) -> Self {
        Self {
            id: self.id,
            attrs,
            version: self.version + 1,
            created_at: self.created_at,
        }
    }
}

/// partial edit of a bid. `None` leaves the attribute unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BidPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl BidPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }

    pub fn apply(self, mut attrs: BidAttrs) -> BidAttrs {
        if let Some(name) = self.name {
            attrs.name = name;
        }
        if let Some(description) = self.description {
            attrs.description = description;
        }
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_from_parts() {
        let raw = uuid::Uuid::new_v4();
        let author = BidAuthor::from_parts(AuthorType::Organization, raw);
        assert_eq!(author, BidAuthor::Organization(OrganizationId(raw)));
        assert_eq!(author.author_type(), AuthorType::Organization);
        assert_eq!(author.id(), raw);
    }

    #[test]
    fn test_revise_bumps_version_only() {
        let bid = Bid::new(
            "Offer".into(),
            "Cheap and fast".into(),
            TenderId::new_v4(),
            BidAuthor::User(UserId::new_v4()),
        );
        let mut attrs = bid.attrs.clone();
        attrs.status = BidStatus::Canceled;

        let next = bid.revise(attrs);
        assert_eq!(next.id, bid.id);
        assert_eq!(next.version, bid.version + 1);
        assert_eq!(next.created_at, bid.created_at);
        assert_eq!(next.status(), BidStatus::Canceled);
        assert_eq!(next.tender_id(), bid.tender_id());
    }

    #[test]
    fn test_empty_patch() {
        assert!(BidPatch::default().is_empty());
        assert!(
            !BidPatch {
                name: Some("x".into()),
                ..Default::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn test_bid_status_rejects_unknown() {
        assert_eq!(
            "Rejected".parse::<BidStatus>(),
            Err(Error::InvalidBidStatus("Rejected".into()))
        );
        assert_eq!("User".parse::<AuthorType>(), Ok(AuthorType::User));
    }
}
