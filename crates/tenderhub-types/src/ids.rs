//! opaque identifiers for tenderhub entities.
//!
//! every identifier wraps a uuid. they are distinct types so a bid id can
//! never be passed where a tender id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// generate a fresh random identifier.
            pub fn new_v4() -> Self {
                Self(Uuid::new_v4())
            }

            /// get the raw uuid value.
            pub fn as_uuid(self) -> Uuid {
                self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

uuid_id!(
    /// unique identifier for a tender.
    TenderId
);

uuid_id!(
    /// unique identifier for a bid.
    BidId
);

uuid_id!(
    /// unique identifier for a review left on a bid.
    ReviewId
);

uuid_id!(
    /// unique identifier for a user (employee).
    UserId
);

uuid_id!(
    /// unique identifier for an organization.
    OrganizationId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_parse_and_display() {
        let raw = "550e8400-e29b-41d4-a716-446655440000";
        let id: TenderId = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw);
        assert!("not-a-uuid".parse::<BidId>().is_err());
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = OrganizationId(Uuid::nil());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
    }

    #[test]
    fn test_ids_order_by_uuid() {
        let low = OrganizationId(Uuid::from_u128(1));
        let high = OrganizationId(Uuid::from_u128(2));
        assert!(low < high);
    }
}
