//! http handlers for the tenderhub api.

mod bids;
mod error;
mod extract;
mod health;
mod tenders;

pub use bids::{BidResponse, ReviewResponse, router as bids_router};
pub use error::{ApiError, ResultExt};
pub use extract::{ApiPath, ApiQuery, JsonBody};
pub use health::{health, ping};
pub use tenders::{TenderResponse, router as tenders_router};
