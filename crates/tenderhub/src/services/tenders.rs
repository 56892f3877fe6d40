//! tender service: creation, listing, edits, status changes and rollback.

use tracing::{debug, info};

use tenderhub_db::{Change, Database, Page, TenderFilter};
use tenderhub_types::{
    OrganizationId, ServiceType, Tender, TenderAttrs, TenderId, TenderPatch, TenderStatus,
    text::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN, check_max_len, check_required},
};

use super::access;
use super::error::{Result, ServiceError};

/// input for [`create`].
#[derive(Debug, Clone)]
pub struct NewTender {
    /// display name.
    pub name: String,
    /// free-text description.
    pub description: String,
    /// kind of service procured.
    pub service_type: ServiceType,
    /// owning organization. the creator must be responsible for it.
    pub organization_id: OrganizationId,
    /// representative creating the tender.
    pub creator_username: String,
}

/// create a tender on behalf of a representative of its organization.
pub async fn create<D: Database>(db: &D, req: NewTender) -> Result<Tender> {
    check_required("description", &req.description, MAX_DESCRIPTION_LEN)?;

    let creator = access::resolve_user(db, &req.creator_username).await?;
    access::ensure_member(db, req.organization_id, &creator).await?;

    let tender = Tender::new(
        req.name,
        req.description,
        req.service_type,
        req.organization_id,
        creator.id,
    );
    tender.attrs.validate()?;

    let tender = db.create_tender(&tender).await?;
    info!(tender_id = %tender.id, creator = %creator.username, "tender created");
    Ok(tender)
}

/// list tenders, optionally restricted to the organizations `username`
/// represents.
pub async fn list<D: Database>(
    db: &D,
    service_type: Option<ServiceType>,
    username: Option<&str>,
    page: Page,
) -> Result<Vec<Tender>> {
    let organization_ids = match username {
        Some(username) if !username.is_empty() => {
            let user = access::resolve_user(db, username).await?;
            Some(db.list_organizations_for_user(user.id).await?)
        }
        _ => None,
    };

    let filter = TenderFilter {
        service_type,
        organization_ids,
        creator_id: None,
    };
    let tenders = db.list_tenders(&filter, page).await?;
    debug!(count = tenders.len(), "listing tenders");
    Ok(tenders)
}

/// tenders created by `username`.
pub async fn list_mine<D: Database>(db: &D, username: &str, page: Page) -> Result<Vec<Tender>> {
    let user = access::resolve_user(db, username).await?;
    let filter = TenderFilter {
        creator_id: Some(user.id),
        ..Default::default()
    };
    Ok(db.list_tenders(&filter, page).await?)
}

/// current status of a tender, if `username` may read it.
pub async fn status<D: Database>(db: &D, id: TenderId, username: &str) -> Result<TenderStatus> {
    let tender = access::can_read(db, id, username).await?;
    Ok(tender.status())
}

/// set the status of a tender.
pub async fn set_status<D: Database>(
    db: &D,
    id: TenderId,
    status: TenderStatus,
    username: &str,
) -> Result<Tender> {
    access::can_write(db, id, username).await?;

    let tender = db
        .mutate_tender(
            id,
            Change::apply(move |mut attrs: TenderAttrs| {
                attrs.status = status;
                attrs
            }),
        )
        .await?;
    info!(tender_id = %id, %status, version = tender.version, "tender status updated");
    Ok(tender)
}

/// apply a partial edit. an empty patch is rejected.
pub async fn edit<D: Database>(
    db: &D,
    id: TenderId,
    patch: TenderPatch,
    username: &str,
) -> Result<Tender> {
    if patch.is_empty() {
        return Err(ServiceError::invalid("nothing to edit"));
    }
    if let Some(name) = &patch.name {
        check_required("name", name, MAX_NAME_LEN)?;
    }
    if let Some(description) = &patch.description {
        check_max_len("description", description, MAX_DESCRIPTION_LEN)?;
    }

    access::can_write(db, id, username).await?;

    let tender = db
        .mutate_tender(id, Change::apply(move |attrs: TenderAttrs| patch.apply(attrs)))
        .await?;
    info!(tender_id = %id, version = tender.version, "tender edited");
    Ok(tender)
}

/// restore the attributes archived at `version` as a new version.
pub async fn rollback<D: Database>(
    db: &D,
    id: TenderId,
    version: i32,
    username: &str,
) -> Result<Tender> {
    access::can_write(db, id, username).await?;
    Ok(db.rollback_tender(id, version).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_helpers::{organization, test_db, user};

    fn new_tender(name: &str, org: OrganizationId, username: &str) -> NewTender {
        NewTender {
            name: name.to_string(),
            description: "build a bridge".to_string(),
            service_type: ServiceType::Construction,
            organization_id: org,
            creator_username: username.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_requires_membership() {
        let db = test_db().await;
        let alice = user(&db, "alice").await;
        let bob = user(&db, "bob").await;
        let org = organization(&db, "Acme", &[&alice]).await;

        let tender = create(&db, new_tender("Bridge", org.id, "alice"))
            .await
            .unwrap();
        assert_eq!(tender.version, 1);
        assert_eq!(tender.status(), TenderStatus::Created);
        assert_eq!(tender.creator_id, Some(alice.id));

        let denied = create(&db, new_tender("Tunnel", org.id, &bob.username)).await;
        assert!(matches!(denied, Err(ServiceError::UserIsNotOrgResponsible)));

        let unknown = create(&db, new_tender("Tunnel", org.id, "carol")).await;
        assert!(matches!(unknown, Err(ServiceError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_and_long_names() {
        let db = test_db().await;
        let alice = user(&db, "alice").await;
        let org = organization(&db, "Acme", &[&alice]).await;

        create(&db, new_tender("Bridge", org.id, "alice"))
            .await
            .unwrap();
        let dup = create(&db, new_tender("Bridge", org.id, "alice")).await;
        assert!(matches!(dup, Err(ServiceError::InvalidInput(_))));

        let long = "x".repeat(MAX_NAME_LEN + 1);
        let too_long = create(&db, new_tender(&long, org.id, "alice")).await;
        assert!(matches!(too_long, Err(ServiceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_edit_then_rollback() {
        let db = test_db().await;
        let alice = user(&db, "alice").await;
        let org = organization(&db, "Acme", &[&alice]).await;
        let tender = create(&db, new_tender("Bridge", org.id, "alice"))
            .await
            .unwrap();

        let edited = edit(
            &db,
            tender.id,
            TenderPatch {
                description: Some("build two bridges".into()),
                service_type: Some(ServiceType::Manufacture),
                ..Default::default()
            },
            "alice",
        )
        .await
        .unwrap();
        assert_eq!(edited.version, 2);
        assert_eq!(edited.attrs.name, "Bridge");
        assert_eq!(edited.attrs.service_type, ServiceType::Manufacture);

        let restored = rollback(&db, tender.id, 1, "alice").await.unwrap();
        assert_eq!(restored.version, 3);
        assert_eq!(restored.attrs, tender.attrs);

        let missing = rollback(&db, tender.id, 3, "alice").await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_empty_edit_is_invalid() {
        let db = test_db().await;
        let result = edit(&db, TenderId::new_v4(), TenderPatch::default(), "alice").await;
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_read_access_follows_publication() {
        let db = test_db().await;
        let alice = user(&db, "alice").await;
        user(&db, "bob").await;
        let org = organization(&db, "Acme", &[&alice]).await;
        let tender = create(&db, new_tender("Bridge", org.id, "alice"))
            .await
            .unwrap();

        // unpublished: read == write
        assert_eq!(
            status(&db, tender.id, "alice").await.unwrap(),
            TenderStatus::Created
        );
        assert!(matches!(
            status(&db, tender.id, "bob").await,
            Err(ServiceError::UserIsNotOrgResponsible)
        ));
        assert!(matches!(
            status(&db, tender.id, "").await,
            Err(ServiceError::UserNotFound)
        ));

        set_status(&db, tender.id, TenderStatus::Published, "alice")
            .await
            .unwrap();

        // published: anyone, even nobody
        for username in ["alice", "bob", "", "nobody"] {
            assert_eq!(
                status(&db, tender.id, username).await.unwrap(),
                TenderStatus::Published
            );
        }

        // writing still needs membership
        let denied = set_status(&db, tender.id, TenderStatus::Closed, "bob").await;
        assert!(matches!(denied, Err(ServiceError::UserIsNotOrgResponsible)));
    }

    #[tokio::test]
    async fn test_list_by_username_restricts_to_their_organizations() {
        let db = test_db().await;
        let alice = user(&db, "alice").await;
        let bob = user(&db, "bob").await;
        let lonely = user(&db, "lonely").await;
        let acme = organization(&db, "Acme", &[&alice]).await;
        let globex = organization(&db, "Globex", &[&bob]).await;

        create(&db, new_tender("A", acme.id, "alice")).await.unwrap();
        create(&db, new_tender("B", globex.id, "bob")).await.unwrap();

        let all = list(&db, None, None, Page::all()).await.unwrap();
        assert_eq!(all.len(), 2);

        let alices = list(&db, None, Some("alice"), Page::all()).await.unwrap();
        assert_eq!(alices.len(), 1);
        assert_eq!(alices[0].attrs.name, "A");

        let nothing = list(&db, None, Some(&lonely.username), Page::all())
            .await
            .unwrap();
        assert!(nothing.is_empty());

        let mine = list_mine(&db, "bob", Page::all()).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].attrs.name, "B");
    }
}
