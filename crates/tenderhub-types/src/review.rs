//! reviews: immutable feedback notes attached to a bid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::text::{MAX_REVIEW_LEN, check_required};
use crate::{BidId, Error, ReviewId};

/// a review left on a bid. append-only, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub bid_id: BidId,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// create a review, validating the feedback text.
    pub fn new(bid_id: BidId, description: String) -> Result<Self, Error> {
        check_required("bidFeedback", &description, MAX_REVIEW_LEN)?;
        Ok(Self {
            id: ReviewId::new_v4(),
            bid_id,
            description,
            created_at: Utc::now(),
        })
    }
}
