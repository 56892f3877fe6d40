//! bid service: submission, edits, decisions, feedback and rollback.
//!
//! every operation on an existing bid is gated by write rights on the
//! tender the bid belongs to.

use tracing::{debug, info};

use tenderhub_db::{BidFilter, Change, Database, Page};
use tenderhub_quorum::QuorumEngine;
use tenderhub_types::{
    Bid, BidAttrs, BidAuthor, BidId, BidPatch, BidStatus, Decision, Review, TenderId,
    text::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN, check_max_len, check_required},
};

use super::access;
use super::error::{Result, ServiceError};

/// input for [`create`].
#[derive(Debug, Clone)]
pub struct NewBid {
    /// display name.
    pub name: String,
    /// free-text description.
    pub description: String,
    /// tender the bid is placed on.
    pub tender_id: TenderId,
    /// submitting user or organization.
    pub author: BidAuthor,
}

/// submit a bid against an existing tender.
pub async fn create<D: Database>(db: &D, req: NewBid) -> Result<Bid> {
    check_required("description", &req.description, MAX_DESCRIPTION_LEN)?;

    access::load_tender(db, req.tender_id).await?;
    ensure_author_exists(db, req.author).await?;

    let bid = Bid::new(req.name, req.description, req.tender_id, req.author);
    bid.attrs.validate()?;

    let bid = db.create_bid(&bid).await?;
    info!(
        bid_id = %bid.id,
        tender_id = %bid.tender_id(),
        author_type = %bid.author().author_type(),
        "bid created"
    );
    Ok(bid)
}

async fn ensure_author_exists<D: Database>(db: &D, author: BidAuthor) -> Result<()> {
    let exists = match author {
        BidAuthor::User(id) => db.get_user(id).await?.is_some(),
        BidAuthor::Organization(id) => db.get_organization(id).await?.is_some(),
    };
    if exists {
        Ok(())
    } else {
        Err(ServiceError::UserNotFound)
    }
}

/// bids authored by `username` personally.
pub async fn list_mine<D: Database>(db: &D, username: &str, page: Page) -> Result<Vec<Bid>> {
    let user = access::resolve_user(db, username).await?;
    let filter = BidFilter {
        author: Some(BidAuthor::User(user.id)),
        ..Default::default()
    };
    Ok(db.list_bids(&filter, page).await?)
}

/// bids on a tender, visible to its organization's representatives.
pub async fn list_for_tender<D: Database>(
    db: &D,
    tender_id: TenderId,
    username: &str,
    page: Page,
) -> Result<Vec<Bid>> {
    access::can_write(db, tender_id, username).await?;
    let filter = BidFilter {
        tender_id: Some(tender_id),
        ..Default::default()
    };
    let bids = db.list_bids(&filter, page).await?;
    debug!(tender_id = %tender_id, count = bids.len(), "listing bids");
    Ok(bids)
}

/// load a bid and check write rights on its tender.
async fn writable_bid<D: Database>(db: &D, id: BidId, username: &str) -> Result<Bid> {
    let bid = access::load_bid(db, id).await?;
    access::can_write(db, bid.tender_id(), username).await?;
    Ok(bid)
}

/// current status of a bid.
pub async fn status<D: Database>(db: &D, id: BidId, username: &str) -> Result<BidStatus> {
    Ok(writable_bid(db, id, username).await?.status())
}

/// set the status of a bid.
pub async fn set_status<D: Database>(
    db: &D,
    id: BidId,
    status: BidStatus,
    username: &str,
) -> Result<Bid> {
    writable_bid(db, id, username).await?;

    let bid = db
        .mutate_bid(
            id,
            Change::apply(move |mut attrs: BidAttrs| {
                attrs.status = status;
                attrs
            }),
        )
        .await?;
    info!(bid_id = %id, %status, version = bid.version, "bid status updated");
    Ok(bid)
}

/// apply a partial edit. an empty patch is rejected.
pub async fn edit<D: Database>(db: &D, id: BidId, patch: BidPatch, username: &str) -> Result<Bid> {
    if patch.is_empty() {
        return Err(ServiceError::invalid("nothing to edit"));
    }
    if let Some(name) = &patch.name {
        check_required("name", name, MAX_NAME_LEN)?;
    }
    if let Some(description) = &patch.description {
        check_max_len("description", description, MAX_DESCRIPTION_LEN)?;
    }

    writable_bid(db, id, username).await?;

    let bid = db
        .mutate_bid(id, Change::apply(move |attrs: BidAttrs| patch.apply(attrs)))
        .await?;
    info!(bid_id = %id, version = bid.version, "bid edited");
    Ok(bid)
}

/// restore the attributes archived at `version` as a new version.
pub async fn rollback<D: Database>(db: &D, id: BidId, version: i32, username: &str) -> Result<Bid> {
    writable_bid(db, id, username).await?;
    Ok(db.rollback_bid(id, version).await?)
}

/// record an approval or rejection and close the tender once the quorum
/// is reached.
pub async fn submit_decision<D: Database>(
    db: &D,
    engine: &QuorumEngine,
    id: BidId,
    decision: Decision,
    username: &str,
) -> Result<Bid> {
    let bid = writable_bid(db, id, username).await?;

    let author = bid.author();
    let memberships = match author {
        BidAuthor::User(user_id) => db.list_organizations_for_user(user_id).await?,
        BidAuthor::Organization(_) => Vec::new(),
    };
    let org_id = engine.deciding_organization(author, &memberships)?;
    let responsible = db.list_responsible_users(org_id).await?;
    let quorum = engine.quorum(org_id, responsible.len())?;

    let counters = db
        .get_decision_counters(id)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("bid {id} not found")))?;
    let verdict = engine.evaluate(counters, quorum, decision)?;

    let closed = db
        .record_decision(
            id,
            counters,
            verdict.counters,
            verdict.closes_tender.then_some(bid.tender_id()),
        )
        .await?;

    info!(
        bid_id = %id,
        %decision,
        quorum,
        approvals = verdict.counters.approvals,
        tender_closed = closed.is_some(),
        "decision submitted"
    );
    Ok(bid)
}

/// attach a review to a bid.
pub async fn feedback<D: Database>(
    db: &D,
    id: BidId,
    text: String,
    username: &str,
) -> Result<Bid> {
    let review = Review::new(id, text)?;
    let bid = writable_bid(db, id, username).await?;

    let review = db.create_review(&review).await?;
    info!(bid_id = %id, review_id = %review.id, "feedback left");
    Ok(bid)
}

/// reviews on the tender's bids authored by `author_username`.
pub async fn reviews<D: Database>(
    db: &D,
    tender_id: TenderId,
    author_username: &str,
    requester_username: &str,
    page: Page,
) -> Result<Vec<Review>> {
    access::can_write(db, tender_id, requester_username).await?;
    let author = access::resolve_user(db, author_username).await?;
    Ok(db.list_reviews(tender_id, author.id, page).await?)
}
