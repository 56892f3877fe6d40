//! listing filters and offset/limit paging.

use sea_orm::QuerySelect;

use tenderhub_types::{BidAuthor, OrganizationId, ServiceType, TenderId, UserId};

/// offset/limit window over an ordered listing.
///
/// non-positive values mean "no skip" and "no limit" respectively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    /// rows to skip.
    pub offset: i64,
    /// maximum rows to return.
    pub limit: i64,
}

impl Page {
    /// a window of at most `limit` rows after skipping `offset`.
    pub fn new(offset: i64, limit: i64) -> Self {
        Self { offset, limit }
    }

    /// every row.
    pub fn all() -> Self {
        Self::default()
    }

    pub(crate) fn apply<Q: QuerySelect>(self, mut query: Q) -> Q {
        if self.offset > 0 {
            query = query.offset(self.offset as u64);
        }
        if self.limit > 0 {
            query = query.limit(self.limit as u64);
        } else if self.offset > 0 {
            // sqlite only accepts OFFSET after a LIMIT
            query = query.limit(i64::MAX as u64);
        }
        query
    }
}

/// conjunction of predicates over tenders. `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenderFilter {
    /// only tenders of this service type.
    pub service_type: Option<ServiceType>,
    /// only tenders owned by one of these organizations. an empty set
    /// matches nothing.
    pub organization_ids: Option<Vec<OrganizationId>>,
    /// only tenders created by this user.
    pub creator_id: Option<UserId>,
}

/// conjunction of predicates over bids. `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BidFilter {
    /// only bids on this tender.
    pub tender_id: Option<TenderId>,
    /// only bids by this author.
    pub author: Option<BidAuthor>,
}
