//! access control predicates.
//!
//! a user may write to a tender (and to every bid attached to it) when they
//! are responsible for the tender's organization. published tenders are
//! readable by anyone.

use tracing::warn;

use tenderhub_db::Database;
use tenderhub_types::{Bid, BidId, OrganizationId, Tender, TenderId, User};

use super::error::{Result, ServiceError};

/// look up the acting user. an empty or unknown username is `UserNotFound`.
pub async fn resolve_user<D: Database>(db: &D, username: &str) -> Result<User> {
    if username.is_empty() {
        return Err(ServiceError::UserNotFound);
    }
    db.get_user_by_name(username)
        .await?
        .ok_or(ServiceError::UserNotFound)
}

/// load a tender or fail with `NotFound`.
pub async fn load_tender<D: Database>(db: &D, id: TenderId) -> Result<Tender> {
    db.get_tender(id)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("tender {id} not found")))
}

/// load a bid or fail with `NotFound`.
pub async fn load_bid<D: Database>(db: &D, id: BidId) -> Result<Bid> {
    db.get_bid(id)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("bid {id} not found")))
}

/// check that `username` may modify tender `tender_id` and return the tender.
pub async fn can_write<D: Database>(db: &D, tender_id: TenderId, username: &str) -> Result<Tender> {
    let tender = load_tender(db, tender_id).await?;
    ensure_responsible(db, &tender, username).await?;
    Ok(tender)
}

/// check that `username` may read tender `tender_id` and return the tender.
///
/// published tenders are public; anything else needs write rights.
pub async fn can_read<D: Database>(db: &D, tender_id: TenderId, username: &str) -> Result<Tender> {
    let tender = load_tender(db, tender_id).await?;
    if !tender.is_published() {
        ensure_responsible(db, &tender, username).await?;
    }
    Ok(tender)
}

/// check that `user` represents organization `org_id`.
pub async fn ensure_member<D: Database>(db: &D, org_id: OrganizationId, user: &User) -> Result<()> {
    let orgs = db.list_organizations_for_user(user.id).await?;
    if orgs.contains(&org_id) {
        return Ok(());
    }
    warn!(
        user = %user.username,
        organization_id = %org_id,
        "user is not responsible for organization"
    );
    Err(ServiceError::UserIsNotOrgResponsible)
}

async fn ensure_responsible<D: Database>(db: &D, tender: &Tender, username: &str) -> Result<()> {
    let user = resolve_user(db, username).await?;
    let responsible = db
        .list_responsible_users(tender.attrs.organization_id)
        .await?;
    if responsible.contains(&user.id) {
        return Ok(());
    }
    warn!(
        user = %user.username,
        tender_id = %tender.id,
        "access to tender denied"
    );
    Err(ServiceError::UserIsNotOrgResponsible)
}
