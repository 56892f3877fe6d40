//! versioned store: live rows plus an append-only history table.
//!
//! every change to a tender or bid runs through [`mutate_in`]: the current
//! row is archived at its version, new attributes are computed (from a
//! closure or from an archived snapshot), and the live row is written back
//! with `version + 1` under an expected-version guard.

use std::future::Future;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use tracing::{debug, info};

use tenderhub_types::{Bid, BidAttrs, Tender, TenderAttrs, Versioned};

use crate::entity::{bid, bid_history, tender, tender_history};
use crate::{Error, Result};

/// how the next attribute set of a versioned entity is produced.
pub enum Change<A> {
    /// derive the new attributes from the current ones.
    Apply(Box<dyn FnOnce(A) -> A + Send>),
    /// copy the attributes archived at the given version.
    Restore(i32),
}

impl<A> Change<A> {
    /// wrap a closure as an [`Change::Apply`].
    pub fn apply(f: impl FnOnce(A) -> A + Send + 'static) -> Self {
        Change::Apply(Box::new(f))
    }
}

impl<A> std::fmt::Debug for Change<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Apply(_) => f.write_str("Apply(..)"),
            Change::Restore(version) => f.debug_tuple("Restore").field(version).finish(),
        }
    }
}

/// a superseded attribute set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision<A> {
    /// version the attributes were live at.
    pub version: i32,
    /// the archived attributes.
    pub attrs: A,
    /// when the version was superseded.
    pub archived_at: DateTime<Utc>,
}

/// table mapping for a versioned entity.
pub(crate) trait VersionedTable: Versioned + Send + Sync {
    /// load the live row.
    fn find<C: ConnectionTrait>(
        conn: &C,
        id: Self::Id,
    ) -> impl Future<Output = Result<Option<Self>>> + Send;

    /// insert a history record of `current` at its version.
    fn archive<C: ConnectionTrait>(
        conn: &C,
        current: &Self,
    ) -> impl Future<Output = Result<()>> + Send;

    /// load the history record `(id, version)`.
    fn snapshot<C: ConnectionTrait>(
        conn: &C,
        id: Self::Id,
        version: i32,
    ) -> impl Future<Output = Result<Option<Self::Attrs>>> + Send;

    /// all history records, oldest first.
    fn history<C: ConnectionTrait>(
        conn: &C,
        id: Self::Id,
    ) -> impl Future<Output = Result<Vec<Revision<Self::Attrs>>>> + Send;

    /// write `next` over the live row if it is still at `expected`.
    /// returns the number of rows updated.
    fn store<C: ConnectionTrait>(
        conn: &C,
        next: &Self,
        expected: i32,
    ) -> impl Future<Output = Result<u64>> + Send;
}

/// apply `change` to entity `id` inside an open transaction.
pub(crate) async fn mutate_in<E, C>(conn: &C, id: E::Id, change: Change<E::Attrs>) -> Result<E>
where
    E: VersionedTable,
    C: ConnectionTrait,
{
    let current = E::find(conn, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("{} {}", E::KIND, id)))?;

    E::archive(conn, &current).await.map_err(|e| match e {
        Error::AlreadyExists(_) => Error::Conflict(format!(
            "{} {} version {} already archived",
            E::KIND,
            id,
            current.version()
        )),
        other => other,
    })?;

    let attrs = match change {
        Change::Apply(f) => f(current.attrs().clone()),
        Change::Restore(version) => {
            // the live version has no history record yet, nor does anything after it
            if version >= current.version() {
                return Err(Error::NotFound(format!(
                    "{} {} version {}",
                    E::KIND,
                    id,
                    version
                )));
            }
            E::snapshot(conn, id, version).await?.ok_or_else(|| {
                Error::NotFound(format!("{} {} version {}", E::KIND, id, version))
            })?
        }
    };

    let next = current.revise(attrs);
    let updated = E::store(conn, &next, current.version()).await?;
    if updated == 0 {
        return Err(Error::Conflict(format!(
            "{} {} changed since version {}",
            E::KIND,
            id,
            current.version()
        )));
    }

    debug!(kind = E::KIND, id = %id, version = next.version(), "versioned entity updated");
    Ok(next)
}

/// apply `change` to entity `id` in its own transaction.
pub(crate) async fn mutate<E>(
    conn: &DatabaseConnection,
    id: E::Id,
    change: Change<E::Attrs>,
) -> Result<E>
where
    E: VersionedTable,
{
    let restore = match &change {
        Change::Restore(version) => Some(*version),
        Change::Apply(_) => None,
    };

    let txn = conn.begin().await?;
    // dropping the transaction without commit rolls it back
    let next = mutate_in::<E, _>(&txn, id, change).await?;
    txn.commit().await?;

    match restore {
        Some(target) => info!(
            kind = E::KIND,
            id = %id,
            rollback_to = target,
            version = next.version(),
            "rolled back"
        ),
        None => info!(kind = E::KIND, id = %id, version = next.version(), "updated"),
    }
    Ok(next)
}

impl VersionedTable for Tender {
    async fn find<C: ConnectionTrait>(conn: &C, id: Self::Id) -> Result<Option<Self>> {
        tender::Entity::find_by_id(id.0)
            .one(conn)
            .await?
            .map(Tender::try_from)
            .transpose()
    }

    async fn archive<C: ConnectionTrait>(conn: &C, current: &Self) -> Result<()> {
        let model: tender_history::ActiveModel = current.into();
        tender_history::Entity::insert(model)
            .exec_without_returning(conn)
            .await?;
        Ok(())
    }

    async fn snapshot<C: ConnectionTrait>(
        conn: &C,
        id: Self::Id,
        version: i32,
    ) -> Result<Option<TenderAttrs>> {
        tender_history::Entity::find_by_id((id.0, version))
            .one(conn)
            .await?
            .map(|model| model.attrs())
            .transpose()
    }

    async fn history<C: ConnectionTrait>(
        conn: &C,
        id: Self::Id,
    ) -> Result<Vec<Revision<TenderAttrs>>> {
        tender_history::Entity::find()
            .filter(tender_history::Column::Id.eq(id.0))
            .order_by_asc(tender_history::Column::Version)
            .all(conn)
            .await?
            .into_iter()
            .map(|model| {
                Ok(Revision {
                    version: model.version,
                    attrs: model.attrs()?,
                    archived_at: model.archived_at,
                })
            })
            .collect()
    }

    async fn store<C: ConnectionTrait>(conn: &C, next: &Self, expected: i32) -> Result<u64> {
        let attrs = &next.attrs;
        let result = tender::Entity::update_many()
            .col_expr(tender::Column::Name, Expr::value(attrs.name.clone()))
            .col_expr(
                tender::Column::Description,
                Expr::value(attrs.description.clone()),
            )
            .col_expr(
                tender::Column::ServiceType,
                Expr::value(attrs.service_type.to_string()),
            )
            .col_expr(tender::Column::Status, Expr::value(attrs.status.to_string()))
            .col_expr(
                tender::Column::OrganizationId,
                Expr::value(attrs.organization_id.0),
            )
            .col_expr(tender::Column::Version, Expr::value(next.version))
            .filter(tender::Column::Id.eq(next.id.0))
            .filter(tender::Column::Version.eq(expected))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }
}

impl VersionedTable for Bid {
    async fn find<C: ConnectionTrait>(conn: &C, id: Self::Id) -> Result<Option<Self>> {
        bid::Entity::find_by_id(id.0)
            .one(conn)
            .await?
            .map(Bid::try_from)
            .transpose()
    }

    async fn archive<C: ConnectionTrait>(conn: &C, current: &Self) -> Result<()> {
        let model: bid_history::ActiveModel = current.into();
        bid_history::Entity::insert(model)
            .exec_without_returning(conn)
            .await?;
        Ok(())
    }

    async fn snapshot<C: ConnectionTrait>(
        conn: &C,
        id: Self::Id,
        version: i32,
    ) -> Result<Option<BidAttrs>> {
        bid_history::Entity::find_by_id((id.0, version))
            .one(conn)
            .await?
            .map(|model| model.attrs())
            .transpose()
    }

    async fn history<C: ConnectionTrait>(
        conn: &C,
        id: Self::Id,
    ) -> Result<Vec<Revision<BidAttrs>>> {
        bid_history::Entity::find()
            .filter(bid_history::Column::Id.eq(id.0))
            .order_by_asc(bid_history::Column::Version)
            .all(conn)
            .await?
            .into_iter()
            .map(|model| {
                Ok(Revision {
                    version: model.version,
                    attrs: model.attrs()?,
                    archived_at: model.archived_at,
                })
            })
            .collect()
    }

    async fn store<C: ConnectionTrait>(conn: &C, next: &Self, expected: i32) -> Result<u64> {
        let attrs = &next.attrs;
        let result = bid::Entity::update_many()
            .col_expr(bid::Column::Name, Expr::value(attrs.name.clone()))
            .col_expr(
                bid::Column::Description,
                Expr::value(attrs.description.clone()),
            )
            .col_expr(bid::Column::Status, Expr::value(attrs.status.to_string()))
            .col_expr(bid::Column::TenderId, Expr::value(attrs.tender_id.0))
            .col_expr(
                bid::Column::AuthorType,
                Expr::value(attrs.author.author_type().to_string()),
            )
            .col_expr(bid::Column::AuthorId, Expr::value(attrs.author.id()))
            .col_expr(bid::Column::Version, Expr::value(next.version))
            .filter(bid::Column::Id.eq(next.id.0))
            .filter(bid::Column::Version.eq(expected))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }
}
