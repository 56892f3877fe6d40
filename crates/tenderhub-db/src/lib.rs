//! database layer for tenderhub.
//!
//! this crate provides persistent storage for:
//! - Employees, organizations and organization membership
//! - Tenders and bids, each with an append-only history table
//! - Bid decision counters and reviews
//!
//! tenders and bids are only ever changed through the versioned store, which
//! archives the previous attribute set before every write.

#![warn(missing_docs)]

mod entity;
mod error;
mod migration;
mod query;
mod versioned;

pub use error::Error;
pub use query::{BidFilter, Page, TenderFilter};
pub use versioned::{Change, Revision};

use std::future::Future;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, Database as SeaOrmDatabase,
    DatabaseConnection, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;

use tenderhub_types::{
    AuthorType, Bid, BidAttrs, BidId, Config, DecisionCounters, Organization, OrganizationId,
    Review, Tender, TenderAttrs, TenderId, TenderStatus, User, UserId,
};

use crate::entity::{bid, employee, organization, organization_responsible, review, tender};

/// result type for database operations.
pub type Result<T> = std::result::Result<T, Error>;

/// database trait for tenderhub storage operations.
///
/// this trait abstracts over different database backends (sqlite, postgresql).
/// nothing is ever physically deleted: tenders and bids are superseded by new
/// versions and their previous states move to the history tables.
pub trait Database: Send + Sync {
    // ─── Health Check ─────────────────────────────────────────────────────────

    /// ping the database to verify connectivity.
    ///
    /// returns `ok(())` if the database is reachable, `err` otherwise.
    /// used for health checks with a recommended timeout of 1 second.
    fn ping(&self) -> impl Future<Output = Result<()>> + Send;

    // ─── Employee Operations ─────────────────────────────────────────────────

    /// create a new user.
    fn create_user(&self, user: &User) -> impl Future<Output = Result<User>> + Send;

    /// get a user by id.
    fn get_user(&self, id: UserId) -> impl Future<Output = Result<Option<User>>> + Send;

    /// get a user by username.
    fn get_user_by_name(&self, username: &str)
    -> impl Future<Output = Result<Option<User>>> + Send;

    /// list all users ordered by username.
    fn list_users(&self) -> impl Future<Output = Result<Vec<User>>> + Send;

    // ─── Organization Operations ─────────────────────────────────────────────

    /// create a new organization.
    fn create_organization(
        &self,
        org: &Organization,
    ) -> impl Future<Output = Result<Organization>> + Send;

    /// get an organization by id.
    fn get_organization(
        &self,
        id: OrganizationId,
    ) -> impl Future<Output = Result<Option<Organization>>> + Send;

    /// list all organizations ordered by name.
    fn list_organizations(&self) -> impl Future<Output = Result<Vec<Organization>>> + Send;

    /// make a user responsible for an organization.
    fn add_responsible(
        &self,
        org_id: OrganizationId,
        user_id: UserId,
    ) -> impl Future<Output = Result<()>> + Send;

    /// ids of the users responsible for an organization.
    fn list_responsible_users(
        &self,
        org_id: OrganizationId,
    ) -> impl Future<Output = Result<Vec<UserId>>> + Send;

    /// ids of the organizations a user is responsible for, lowest first.
    fn list_organizations_for_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<OrganizationId>>> + Send;

    // ─── Tender Operations ───────────────────────────────────────────────────

    /// insert a new tender. a duplicate name fails with `AlreadyExists`.
    fn create_tender(&self, tender: &Tender) -> impl Future<Output = Result<Tender>> + Send;

    /// get a tender by id.
    fn get_tender(&self, id: TenderId) -> impl Future<Output = Result<Option<Tender>>> + Send;

    /// list tenders matching `filter`, ordered by name.
    fn list_tenders(
        &self,
        filter: &TenderFilter,
        page: Page,
    ) -> impl Future<Output = Result<Vec<Tender>>> + Send;

    /// archive the current tender and write the next version.
    fn mutate_tender(
        &self,
        id: TenderId,
        change: Change<TenderAttrs>,
    ) -> impl Future<Output = Result<Tender>> + Send;

    /// write a new version carrying the attributes archived at `version`.
    fn rollback_tender(
        &self,
        id: TenderId,
        version: i32,
    ) -> impl Future<Output = Result<Tender>> + Send;

    /// archived versions of a tender, oldest first.
    fn tender_history(
        &self,
        id: TenderId,
    ) -> impl Future<Output = Result<Vec<Revision<TenderAttrs>>>> + Send;

    // ─── Bid Operations ──────────────────────────────────────────────────────

    /// insert a new bid with zeroed counters. a duplicate name fails with
    /// `AlreadyExists`.
    fn create_bid(&self, bid: &Bid) -> impl Future<Output = Result<Bid>> + Send;

    /// get a bid by id.
    fn get_bid(&self, id: BidId) -> impl Future<Output = Result<Option<Bid>>> + Send;

    /// list bids matching `filter`, ordered by name.
    fn list_bids(
        &self,
        filter: &BidFilter,
        page: Page,
    ) -> impl Future<Output = Result<Vec<Bid>>> + Send;

    /// archive the current bid and write the next version.
    fn mutate_bid(
        &self,
        id: BidId,
        change: Change<BidAttrs>,
    ) -> impl Future<Output = Result<Bid>> + Send;

    /// write a new version carrying the attributes archived at `version`.
    fn rollback_bid(&self, id: BidId, version: i32) -> impl Future<Output = Result<Bid>> + Send;

    /// archived versions of a bid, oldest first.
    fn bid_history(
        &self,
        id: BidId,
    ) -> impl Future<Output = Result<Vec<Revision<BidAttrs>>>> + Send;

    // ─── Decision Operations ─────────────────────────────────────────────────

    /// current decision counters of a bid.
    fn get_decision_counters(
        &self,
        id: BidId,
    ) -> impl Future<Output = Result<Option<DecisionCounters>>> + Send;

    /// replace the counters of a bid, provided they still equal `expected`.
    ///
    /// when `close_tender` is set, that tender is closed through the
    /// versioned store in the same transaction and returned.
    fn record_decision(
        &self,
        id: BidId,
        expected: DecisionCounters,
        next: DecisionCounters,
        close_tender: Option<TenderId>,
    ) -> impl Future<Output = Result<Option<Tender>>> + Send;

    // ─── Review Operations ───────────────────────────────────────────────────

    /// insert a review.
    fn create_review(&self, review: &Review) -> impl Future<Output = Result<Review>> + Send;

    /// reviews on bids of `tender_id` authored by user `author`, oldest first.
    fn list_reviews(
        &self,
        tender_id: TenderId,
        author: UserId,
        page: Page,
    ) -> impl Future<Output = Result<Vec<Review>>> + Send;
}

/// the main database implementation using sea-orm.
#[derive(Clone)]
pub struct TenderhubDb {
    conn: DatabaseConnection,
}

impl TenderhubDb {
    /// create a new database connection from config and run migrations.
    pub async fn new(config: &Config) -> Result<Self> {
        let url = Self::build_connection_url(&config.database)?;
        let conn: DatabaseConnection = SeaOrmDatabase::connect(&url)
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        let db = Self { conn };

        if config.database.db_type == "sqlite" && config.database.write_ahead_log {
            db.enable_wal_mode().await?;
        }

        db.migrate().await?;
        Ok(db)
    }

    /// enable write-ahead logging mode for sqlite.
    async fn enable_wal_mode(&self) -> Result<()> {
        self.conn
            .execute_unprepared("PRAGMA journal_mode=WAL")
            .await
            .map_err(|e| Error::Connection(format!("failed to enable WAL mode: {}", e)))?;
        tracing::info!("sqlite WAL mode enabled");
        Ok(())
    }

    /// build a sea-orm compatible connection url from config.
    fn build_connection_url(config: &tenderhub_types::DatabaseConfig) -> Result<String> {
        match config.db_type.as_str() {
            "sqlite" => {
                let path = if config.connection_string.starts_with("sqlite:") {
                    config.connection_string.clone()
                } else {
                    format!("sqlite:{}", config.connection_string)
                };
                // create the file if it doesn't exist
                if path.contains('?') {
                    Ok(path)
                } else {
                    Ok(format!("{}?mode=rwc", path))
                }
            }
            "postgres" | "postgresql" => Ok(config.connection_string.clone()),
            other => Err(Error::InvalidData(format!(
                "unsupported database type: {}",
                other
            ))),
        }
    }

    /// create an in-memory sqlite database for testing.
    pub async fn new_in_memory() -> Result<Self> {
        let conn: DatabaseConnection = SeaOrmDatabase::connect("sqlite::memory:")
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        let db = Self { conn };
        db.migrate().await?;
        Ok(db)
    }

    /// run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        migration::Migrator::up(&self.conn, None)
            .await
            .map_err(|e| Error::Migration(e.to_string()))?;
        Ok(())
    }
}

fn counter_value(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

impl Database for TenderhubDb {
    // health check

    async fn ping(&self) -> Result<()> {
        self.conn
            .execute_unprepared("SELECT 1")
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;
        Ok(())
    }

    // employee operations

    async fn create_user(&self, user: &User) -> Result<User> {
        let model: employee::ActiveModel = user.into();
        let result = model.insert(&self.conn).await?;
        Ok(result.into())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        let result = employee::Entity::find_by_id(id.0).one(&self.conn).await?;
        Ok(result.map(Into::into))
    }

    async fn get_user_by_name(&self, username: &str) -> Result<Option<User>> {
        let result = employee::Entity::find()
            .filter(employee::Column::Username.eq(username))
            .one(&self.conn)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let results = employee::Entity::find()
            .order_by_asc(employee::Column::Username)
            .all(&self.conn)
            .await?;
        Ok(results.into_iter().map(Into::into).collect())
    }

    // organization operations

    async fn create_organization(&self, org: &Organization) -> Result<Organization> {
        let model: organization::ActiveModel = org.into();
        let result = model.insert(&self.conn).await?;
        result.try_into()
    }

    async fn get_organization(&self, id: OrganizationId) -> Result<Option<Organization>> {
        organization::Entity::find_by_id(id.0)
            .one(&self.conn)
            .await?
            .map(Organization::try_from)
            .transpose()
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        organization::Entity::find()
            .order_by_asc(organization::Column::Name)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(Organization::try_from)
            .collect()
    }

    async fn add_responsible(&self, org_id: OrganizationId, user_id: UserId) -> Result<()> {
        let model = organization_responsible::ActiveModel {
            organization_id: Set(org_id.0),
            user_id: Set(user_id.0),
        };
        organization_responsible::Entity::insert(model)
            .exec_without_returning(&self.conn)
            .await?;
        Ok(())
    }

    async fn list_responsible_users(&self, org_id: OrganizationId) -> Result<Vec<UserId>> {
        let results = organization_responsible::Entity::find()
            .filter(organization_responsible::Column::OrganizationId.eq(org_id.0))
            .order_by_asc(organization_responsible::Column::UserId)
            .all(&self.conn)
            .await?;
        Ok(results.into_iter().map(|m| UserId(m.user_id)).collect())
    }

    async fn list_organizations_for_user(&self, user_id: UserId) -> Result<Vec<OrganizationId>> {
        let results = organization_responsible::Entity::find()
            .filter(organization_responsible::Column::UserId.eq(user_id.0))
            .order_by_asc(organization_responsible::Column::OrganizationId)
            .all(&self.conn)
            .await?;
        Ok(results
            .into_iter()
            .map(|m| OrganizationId(m.organization_id))
            .collect())
    }

    // tender operations

    async fn create_tender(&self, tender: &Tender) -> Result<Tender> {
        let model: tender::ActiveModel = tender.into();
        let result = model.insert(&self.conn).await?;
        tracing::info!(tender_id = %tender.id, name = %tender.attrs.name, "tender created");
        result.try_into()
    }

    async fn get_tender(&self, id: TenderId) -> Result<Option<Tender>> {
        tender::Entity::find_by_id(id.0)
            .one(&self.conn)
            .await?
            .map(Tender::try_from)
            .transpose()
    }

    async fn list_tenders(&self, filter: &TenderFilter, page: Page) -> Result<Vec<Tender>> {
        let mut query = tender::Entity::find();

        if let Some(org_ids) = &filter.organization_ids {
            if org_ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(
                tender::Column::OrganizationId.is_in(org_ids.iter().map(|id| id.0)),
            );
        }
        if let Some(service_type) = filter.service_type {
            query = query.filter(tender::Column::ServiceType.eq(service_type.as_str()));
        }
        if let Some(creator_id) = filter.creator_id {
            query = query.filter(tender::Column::CreatorId.eq(creator_id.0));
        }

        let query = page.apply(query.order_by_asc(tender::Column::Name));
        query
            .all(&self.conn)
            .await?
            .into_iter()
            .map(Tender::try_from)
            .collect()
    }

    async fn mutate_tender(&self, id: TenderId, change: Change<TenderAttrs>) -> Result<Tender> {
        versioned::mutate::<Tender>(&self.conn, id, change).await
    }

    async fn rollback_tender(&self, id: TenderId, version: i32) -> Result<Tender> {
        versioned::mutate::<Tender>(&self.conn, id, Change::Restore(version)).await
    }

    async fn tender_history(&self, id: TenderId) -> Result<Vec<Revision<TenderAttrs>>> {
        <Tender as versioned::VersionedTable>::history(&self.conn, id).await
    }

    // bid operations

    async fn create_bid(&self, bid: &Bid) -> Result<Bid> {
        let model: bid::ActiveModel = bid.into();
        let result = model.insert(&self.conn).await?;
        tracing::info!(bid_id = %bid.id, tender_id = %bid.attrs.tender_id, "bid created");
        result.try_into()
    }

    async fn get_bid(&self, id: BidId) -> Result<Option<Bid>> {
        bid::Entity::find_by_id(id.0)
            .one(&self.conn)
            .await?
            .map(Bid::try_from)
            .transpose()
    }

    async fn list_bids(&self, filter: &BidFilter, page: Page) -> Result<Vec<Bid>> {
        let mut query = bid::Entity::find();

        if let Some(tender_id) = filter.tender_id {
            query = query.filter(bid::Column::TenderId.eq(tender_id.0));
        }
        if let Some(author) = filter.author {
            query = query
                .filter(bid::Column::AuthorType.eq(author.author_type().as_str()))
                .filter(bid::Column::AuthorId.eq(author.id()));
        }

        let query = page.apply(query.order_by_asc(bid::Column::Name));
        query
            .all(&self.conn)
            .await?
            .into_iter()
            .map(Bid::try_from)
            .collect()
    }

    async fn mutate_bid(&self, id: BidId, change: Change<BidAttrs>) -> Result<Bid> {
        versioned::mutate::<Bid>(&self.conn, id, change).await
    }

    async fn rollback_bid(&self, id: BidId, version: i32) -> Result<Bid> {
        versioned::mutate::<Bid>(&self.conn, id, Change::Restore(version)).await
    }

    async fn bid_history(&self, id: BidId) -> Result<Vec<Revision<BidAttrs>>> {
        <Bid as versioned::VersionedTable>::history(&self.conn, id).await
    }

    // decision operations

    async fn get_decision_counters(&self, id: BidId) -> Result<Option<DecisionCounters>> {
        let result = bid::Entity::find_by_id(id.0).one(&self.conn).await?;
        Ok(result.map(|model| model.counters()))
    }

    async fn record_decision(
        &self,
        id: BidId,
        expected: DecisionCounters,
        next: DecisionCounters,
        close_tender: Option<TenderId>,
    ) -> Result<Option<Tender>> {
        let txn = self.conn.begin().await?;

        let result = bid::Entity::update_many()
            .col_expr(
                bid::Column::Approvals,
                Expr::value(counter_value(next.approvals)),
            )
            .col_expr(
                bid::Column::Rejections,
                Expr::value(counter_value(next.rejections)),
            )
            .filter(bid::Column::Id.eq(id.0))
            .filter(bid::Column::Approvals.eq(counter_value(expected.approvals)))
            .filter(bid::Column::Rejections.eq(counter_value(expected.rejections)))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            let exists = bid::Entity::find_by_id(id.0).one(&txn).await?.is_some();
            return Err(if exists {
                Error::Conflict(format!("bid {id} decision counters changed"))
            } else {
                Error::NotFound(format!("bid {id}"))
            });
        }

        let closed = match close_tender {
            Some(tender_id) => {
                let change = Change::apply(|mut attrs: TenderAttrs| {
                    attrs.status = TenderStatus::Closed;
                    attrs
                });
                Some(versioned::mutate_in::<Tender, _>(&txn, tender_id, change).await?)
            }
            None => None,
        };

        txn.commit().await?;

        tracing::info!(
            bid_id = %id,
            approvals = next.approvals,
            rejections = next.rejections,
            tender_closed = closed.is_some(),
            "decision recorded"
        );
        Ok(closed)
    }

    // review operations

    async fn create_review(&self, review: &Review) -> Result<Review> {
        let model: review::ActiveModel = review.into();
        let result = model.insert(&self.conn).await?;
        Ok(result.into())
    }

    async fn list_reviews(
        &self,
        tender_id: TenderId,
        author: UserId,
        page: Page,
    ) -> Result<Vec<Review>> {
        let query = review::Entity::find()
            .join(JoinType::InnerJoin, review::Relation::Bid.def())
            .filter(bid::Column::TenderId.eq(tender_id.0))
            .filter(bid::Column::AuthorType.eq(AuthorType::User.as_str()))
            .filter(bid::Column::AuthorId.eq(author.0))
            .order_by_asc(review::Column::CreatedAt);

        let results = page.apply(query).all(&self.conn).await?;
        Ok(results.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenderhub_types::{BidAuthor, BidStatus, OrganizationType, ServiceType, Versioned};

    async fn setup_test_db() -> TenderhubDb {
        TenderhubDb::new_in_memory().await.unwrap()
    }

    /// a user responsible for a fresh organization.
    async fn seed_member(db: &TenderhubDb, username: &str) -> (User, Organization) {
        let user = db.create_user(&User::new(username.into())).await.unwrap();
        let org = db
            .create_organization(&Organization::new(
                format!("{username}-org"),
                OrganizationType::LLC,
            ))
            .await
            .unwrap();
        db.add_responsible(org.id, user.id).await.unwrap();
        (user, org)
    }

    async fn seed_tender(db: &TenderhubDb, name: &str) -> (Tender, User) {
        let (user, org) = seed_member(db, &format!("{}-owner", name.to_lowercase())).await;
        let tender = Tender::new(
            name.into(),
            "description".into(),
            ServiceType::Construction,
            org.id,
            user.id,
        );
        (db.create_tender(&tender).await.unwrap(), user)
    }

    fn publish(mut attrs: TenderAttrs) -> TenderAttrs {
        attrs.status = TenderStatus::Published;
        attrs
    }

    #[tokio::test]
    async fn test_ping() {
        let db = setup_test_db().await;
        db.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_user_and_membership_lookup() {
        let db = setup_test_db().await;
        let (user, org) = seed_member(&db, "alice").await;

        let by_name = db.get_user_by_name("alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, user.id);
        assert!(db.get_user_by_name("bob").await.unwrap().is_none());

        assert_eq!(db.list_responsible_users(org.id).await.unwrap(), vec![user.id]);
        assert_eq!(
            db.list_organizations_for_user(user.id).await.unwrap(),
            vec![org.id]
        );

        // membership is a set
        let dup = db.add_responsible(org.id, user.id).await;
        assert!(matches!(dup, Err(Error::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_duplicate_tender_name() {
        let db = setup_test_db().await;
        let (tender, user) = seed_tender(&db, "Bridge").await;

        let copy = Tender::new(
            "Bridge".into(),
            String::new(),
            ServiceType::Delivery,
            tender.attrs.organization_id,
            user.id,
        );
        let result = db.create_tender(&copy).await;
        assert!(matches!(result, Err(Error::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_history_grows_with_each_mutation() {
        let db = setup_test_db().await;
        let (tender, _) = seed_tender(&db, "Roads").await;
        assert_eq!(tender.version, 1);

        for n in 1..=3 {
            let updated = db
                .mutate_tender(
                    tender.id,
                    Change::apply(move |mut attrs: TenderAttrs| {
                        attrs.description = format!("edit {n}");
                        attrs
                    }),
                )
                .await
                .unwrap();
            assert_eq!(updated.version, n + 1);
            assert_eq!(updated.created_at, tender.created_at);
        }

        let history = db.tender_history(tender.id).await.unwrap();
        let versions: Vec<i32> = history.iter().map(|r| r.version).collect();
        assert_eq!(versions, vec![1, 2, 3]);
        assert_eq!(history[0].attrs, tender.attrs);

        let live = db.get_tender(tender.id).await.unwrap().unwrap();
        assert_eq!(live.version, 4);
        assert_eq!(live.attrs.description, "edit 3");
    }

    #[tokio::test]
    async fn test_rollback_copies_attributes_not_version() {
        let db = setup_test_db().await;
        let (tender, _) = seed_tender(&db, "Pipes").await;

        let published = db
            .mutate_tender(tender.id, Change::apply(publish))
            .await
            .unwrap();
        assert_eq!(published.version, 2);

        let first = db.rollback_tender(tender.id, 1).await.unwrap();
        assert_eq!(first.version, 3);
        assert_eq!(first.attrs, tender.attrs);

        let second = db.rollback_tender(tender.id, 1).await.unwrap();
        assert_eq!(second.version, 4);
        assert_eq!(second.attrs, first.attrs);

        // history is never renumbered
        let versions: Vec<i32> = db
            .tender_history(tender.id)
            .await
            .unwrap()
            .iter()
            .map(|r| r.version)
            .collect();
        assert_eq!(versions, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_rollback_to_live_or_future_version_is_not_found() {
        let db = setup_test_db().await;
        let (tender, _) = seed_tender(&db, "Wires").await;
        db.mutate_tender(tender.id, Change::apply(publish))
            .await
            .unwrap();

        for version in [0, 2, 3, 42] {
            let result = db.rollback_tender(tender.id, version).await;
            assert!(
                matches!(result, Err(Error::NotFound(_))),
                "version {version}: {result:?}"
            );
        }

        // failed rollbacks leave no trace
        let live = db.get_tender(tender.id).await.unwrap().unwrap();
        assert_eq!(live.version, 2);
        assert_eq!(db.tender_history(tender.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mutate_missing_tender() {
        let db = setup_test_db().await;
        let result = db
            .mutate_tender(TenderId::new_v4(), Change::apply(publish))
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_rename_to_taken_name_rolls_back() {
        let db = setup_test_db().await;
        let (first, _) = seed_tender(&db, "Alpha").await;
        let (second, _) = seed_tender(&db, "Beta").await;

        let result = db
            .mutate_tender(
                second.id,
                Change::apply(|mut attrs: TenderAttrs| {
                    attrs.name = "Alpha".into();
                    attrs
                }),
            )
            .await;
        assert!(matches!(result, Err(Error::AlreadyExists(_))));

        let live = db.get_tender(second.id).await.unwrap().unwrap();
        assert_eq!(live.version, 1);
        assert!(db.tender_history(second.id).await.unwrap().is_empty());
        assert_eq!(
            db.get_tender(first.id).await.unwrap().unwrap().attrs.name,
            "Alpha"
        );
    }

    #[tokio::test]
    async fn test_list_tenders_filters_and_pages() {
        let db = setup_test_db().await;
        let (a, owner) = seed_tender(&db, "Charlie").await;
        let (b, _) = seed_tender(&db, "Alpha").await;
        let (_, _) = seed_tender(&db, "Bravo").await;

        let all = db
            .list_tenders(&TenderFilter::default(), Page::all())
            .await
            .unwrap();
        let names: Vec<&str> = all.iter().map(|t| t.attrs.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Bravo", "Charlie"]);

        let window = db
            .list_tenders(&TenderFilter::default(), Page::new(1, 1))
            .await
            .unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].attrs.name, "Bravo");

        let by_orgs = TenderFilter {
            organization_ids: Some(vec![a.attrs.organization_id, b.attrs.organization_id]),
            ..Default::default()
        };
        assert_eq!(db.list_tenders(&by_orgs, Page::all()).await.unwrap().len(), 2);

        let none = TenderFilter {
            organization_ids: Some(Vec::new()),
            ..Default::default()
        };
        assert!(db.list_tenders(&none, Page::all()).await.unwrap().is_empty());

        let mine = TenderFilter {
            creator_id: Some(owner.id),
            ..Default::default()
        };
        let mine = db.list_tenders(&mine, Page::all()).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, a.id);

        let delivery = TenderFilter {
            service_type: Some(ServiceType::Delivery),
            ..Default::default()
        };
        assert!(db.list_tenders(&delivery, Page::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_offset_without_limit_is_unbounded() {
        let db = setup_test_db().await;
        for name in ["Alpha", "Bravo", "Charlie"] {
            seed_tender(&db, name).await;
        }

        let rest = db
            .list_tenders(&TenderFilter::default(), Page::new(1, 0))
            .await
            .unwrap();
        let names: Vec<&str> = rest.iter().map(|t| t.attrs.name.as_str()).collect();
        assert_eq!(names, vec!["Bravo", "Charlie"]);

        let negative = db
            .list_tenders(&TenderFilter::default(), Page::new(2, -1))
            .await
            .unwrap();
        assert_eq!(negative.len(), 1);
        assert_eq!(negative[0].attrs.name, "Charlie");
    }

    #[tokio::test]
    async fn test_archived_version_collision_is_conflict() {
        let db = setup_test_db().await;
        let (tender, _) = seed_tender(&db, "Canals").await;

        // a history row already holds (id, 1)
        let stray: entity::tender_history::ActiveModel = (&tender).into();
        entity::tender_history::Entity::insert(stray)
            .exec_without_returning(&db.conn)
            .await
            .unwrap();

        let result = db
            .mutate_tender(tender.id, Change::apply(publish))
            .await;
        assert!(matches!(result, Err(Error::Conflict(_))));

        let live = db.get_tender(tender.id).await.unwrap().unwrap();
        assert_eq!(live, tender);
        assert_eq!(db.tender_history(tender.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_stale_version_guard_updates_nothing() {
        let db = setup_test_db().await;
        let (tender, _) = seed_tender(&db, "Docks").await;

        let next = tender.revise(publish(tender.attrs.clone()));
        let stale = <Tender as versioned::VersionedTable>::store(&db.conn, &next, 7)
            .await
            .unwrap();
        assert_eq!(stale, 0);
        assert_eq!(db.get_tender(tender.id).await.unwrap().unwrap(), tender);

        // someone else moves the live row on
        tender::Entity::update_many()
            .col_expr(tender::Column::Version, Expr::value(2))
            .filter(tender::Column::Id.eq(tender.id.0))
            .exec(&db.conn)
            .await
            .unwrap();
        let lost = <Tender as versioned::VersionedTable>::store(&db.conn, &next, 1)
            .await
            .unwrap();
        assert_eq!(lost, 0);
        let live = db.get_tender(tender.id).await.unwrap().unwrap();
        assert_eq!(live.version, 2);
        assert_eq!(live.status(), TenderStatus::Created);
    }

    #[tokio::test]
    async fn test_bid_versioning_and_listing() {
        let db = setup_test_db().await;
        let (tender, author) = seed_tender(&db, "Offices").await;

        let bid = Bid::new(
            "Offer".into(),
            "first".into(),
            tender.id,
            BidAuthor::User(author.id),
        );
        let bid = db.create_bid(&bid).await.unwrap();
        assert_eq!(
            db.get_decision_counters(bid.id).await.unwrap(),
            Some(DecisionCounters::default())
        );

        let canceled = db
            .mutate_bid(
                bid.id,
                Change::apply(|mut attrs: BidAttrs| {
                    attrs.status = BidStatus::Canceled;
                    attrs
                }),
            )
            .await
            .unwrap();
        assert_eq!(canceled.version, 2);

        let restored = db.rollback_bid(bid.id, 1).await.unwrap();
        assert_eq!(restored.version, 3);
        assert_eq!(restored.status(), BidStatus::Created);
        assert_eq!(db.bid_history(bid.id).await.unwrap().len(), 2);

        let by_author = BidFilter {
            author: Some(BidAuthor::User(author.id)),
            ..Default::default()
        };
        assert_eq!(db.list_bids(&by_author, Page::all()).await.unwrap().len(), 1);

        let by_org = BidFilter {
            author: Some(BidAuthor::Organization(tender.attrs.organization_id)),
            ..Default::default()
        };
        assert!(db.list_bids(&by_org, Page::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_record_decision_closes_tender_atomically() {
        let db = setup_test_db().await;
        let (tender, author) = seed_tender(&db, "Ports").await;
        let bid = db
            .create_bid(&Bid::new(
                "Dock".into(),
                String::new(),
                tender.id,
                BidAuthor::User(author.id),
            ))
            .await
            .unwrap();

        let zero = DecisionCounters::default();
        let one = DecisionCounters {
            approvals: 1,
            rejections: 0,
        };
        let closed = db
            .record_decision(bid.id, zero, one, Some(tender.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(closed.status(), TenderStatus::Closed);
        assert_eq!(closed.version, 2);
        assert_eq!(db.get_decision_counters(bid.id).await.unwrap(), Some(one));
        assert_eq!(db.tender_history(tender.id).await.unwrap().len(), 1);

        // stale expectation
        let stale = db.record_decision(bid.id, zero, one, None).await;
        assert!(matches!(stale, Err(Error::Conflict(_))));

        let missing = db.record_decision(BidId::new_v4(), zero, one, None).await;
        assert!(matches!(missing, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_failed_close_keeps_counters() {
        let db = setup_test_db().await;
        let (tender, author) = seed_tender(&db, "Rails").await;
        let bid = db
            .create_bid(&Bid::new(
                "Track".into(),
                String::new(),
                tender.id,
                BidAuthor::User(author.id),
            ))
            .await
            .unwrap();

        let one = DecisionCounters {
            approvals: 1,
            rejections: 0,
        };
        let result = db
            .record_decision(
                bid.id,
                DecisionCounters::default(),
                one,
                Some(TenderId::new_v4()),
            )
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert_eq!(
            db.get_decision_counters(bid.id).await.unwrap(),
            Some(DecisionCounters::default())
        );
    }

    #[tokio::test]
    async fn test_reviews_are_scoped_to_tender_and_author() {
        let db = setup_test_db().await;
        let (tender, author) = seed_tender(&db, "Parks").await;
        let (other_tender, _) = seed_tender(&db, "Lakes").await;

        let bid = db
            .create_bid(&Bid::new(
                "Trees".into(),
                String::new(),
                tender.id,
                BidAuthor::User(author.id),
            ))
            .await
            .unwrap();
        let other_bid = db
            .create_bid(&Bid::new(
                "Fish".into(),
                String::new(),
                other_tender.id,
                BidAuthor::User(author.id),
            ))
            .await
            .unwrap();

        db.create_review(&Review::new(bid.id, "solid".into()).unwrap())
            .await
            .unwrap();
        db.create_review(&Review::new(bid.id, "late".into()).unwrap())
            .await
            .unwrap();
        db.create_review(&Review::new(other_bid.id, "wet".into()).unwrap())
            .await
            .unwrap();

        let reviews = db
            .list_reviews(tender.id, author.id, Page::all())
            .await
            .unwrap();
        assert_eq!(reviews.len(), 2);
        assert!(reviews.iter().all(|r| r.bid_id == bid.id));

        let limited = db
            .list_reviews(tender.id, author.id, Page::new(0, 1))
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);

        let stranger = db
            .list_reviews(tender.id, UserId::new_v4(), Page::all())
            .await
            .unwrap();
        assert!(stranger.is_empty());
    }
}
