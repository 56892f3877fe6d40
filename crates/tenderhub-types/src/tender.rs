//! tenders: procurement requests published by an organization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::macros::string_enum;
use crate::text::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN, check_max_len, check_required};
use crate::versioned::{INITIAL_VERSION, Versioned};
use crate::{Error, OrganizationId, TenderId, UserId};

string_enum!(
    /// lifecycle status of a tender.
    TenderStatus, InvalidTenderStatus {
        /// freshly created, visible only to the organization.
        Created,
        /// visible to everyone and open for bids.
        Published,
        /// no longer accepting bids.
        Closed,
    }
);

string_enum!(
    /// kind of service a tender asks for.
    ServiceType, InvalidServiceType {
        Construction,
        Delivery,
        Manufacture,
    }
);

/// the versioned attribute set of a tender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenderAttrs {
    pub name: String,
    pub description: String,
    pub service_type: ServiceType,
    pub status: TenderStatus,
    pub organization_id: OrganizationId,
}

impl TenderAttrs {
    /// validate text length limits.
    pub fn validate(&self) -> Result<(), Error> {
        check_required("name", &self.name, MAX_NAME_LEN)?;
        check_max_len("description", &self.description, MAX_DESCRIPTION_LEN)
    }
}

/// a tender at a specific version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tender {
    pub id: TenderId,
    pub attrs: TenderAttrs,
    /// user who created the tender. not part of the archived attributes.
    pub creator_id: Option<UserId>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

impl Tender {
    /// create a new tender at version 1 with status `Created`.
    pub fn new(
        name: String,
        description: String,
        service_type: ServiceType,
        organization_id: OrganizationId,
        creator_id: UserId,
    ) -> Self {
        Self {
            id: TenderId::new_v4(),
            attrs: TenderAttrs {
                name,
                description,
                service_type,
                status: TenderStatus::Created,
                organization_id,
            },
            creator_id: Some(creator_id),
            version: INITIAL_VERSION,
            created_at: Utc::now(),
        }
    }

    pub fn status(&self) -> TenderStatus {
        self.attrs.status
    }

    pub fn is_published(&self) -> bool {
        self.attrs.status == TenderStatus::Published
    }
}

impl Versioned for Tender {
    type Id = TenderId;
    type Attrs = TenderAttrs;
    const KIND: &'static str = "tender";

    fn id(&self) -> TenderId {
        self.id
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn attrs(&self) -> &TenderAttrs {
        &self.attrs
    }

    fn revise(&self, attrs: TenderAttrs) -> Self {
        Self {
            id: self.id,
            attrs,
            creator_id: self.creator_id,
            version: self.version + 1,
            created_at: self.created_at,
        }
    }
}

/// partial edit of a tender. `None` leaves the attribute unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenderPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub service_type: Option<ServiceType>,
}

impl TenderPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.service_type.is_none()
    }

    /// apply the patch on top of `attrs`.
    pub fn apply(self, mut attrs: TenderAttrs) -> TenderAttrs {
        if let Some(name) = self.name {
            attrs.name = name;
        }
        if let Some(description) = self.description {
            attrs.description = description;
        }
        if let Some(service_type) = self.service_type {
            attrs.service_type = service_type;
        }
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tender {
        Tender::new(
            "Road repair".into(),
            "Fix the bridge road".into(),
            ServiceType::Construction,
            OrganizationId::new_v4(),
            UserId::new_v4(),
        )
    }

    #[test]
    fn test_new_tender_starts_created_at_version_one() {
        let tender = sample();
        assert_eq!(tender.version, 1);
        assert_eq!(tender.status(), TenderStatus::Created);
    }

    #[test]
    fn test_revise_keeps_identity_and_bumps_version() {
        let tender = sample();
        let mut attrs = tender.attrs.clone();
        attrs.status = TenderStatus::Published;

        let next = tender.revise(attrs);
        assert_eq!(next.id, tender.id);
        assert_eq!(next.created_at, tender.created_at);
        assert_eq!(next.creator_id, tender.creator_id);
        assert_eq!(next.version, 2);
        assert!(next.is_published());
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let tender = sample();
        let patch = TenderPatch {
            description: Some("Resurface".into()),
            ..Default::default()
        };
        let attrs = patch.apply(tender.attrs.clone());
        assert_eq!(attrs.name, tender.attrs.name);
        assert_eq!(attrs.description, "Resurface");
        assert_eq!(attrs.service_type, ServiceType::Construction);
    }

    #[test]
    fn test_status_parsing_is_case_sensitive() {
        assert_eq!("Closed".parse::<TenderStatus>(), Ok(TenderStatus::Closed));
        assert_eq!(
            "closed".parse::<TenderStatus>(),
            Err(Error::InvalidTenderStatus("closed".into()))
        );
        assert!("Repair".parse::<ServiceType>().is_err());
    }

    #[test]
    fn test_enums_serialize_by_variant_name() {
        let json = serde_json::to_string(&ServiceType::Manufacture).unwrap();
        assert_eq!(json, "\"Manufacture\"");
    }
}
