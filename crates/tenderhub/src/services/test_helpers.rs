//! shared fixtures for service tests

use tenderhub_db::{Database, TenderhubDb};
use tenderhub_types::{Organization, OrganizationType, User};

/// fresh in-memory database with migrations applied.
pub async fn test_db() -> TenderhubDb {
    TenderhubDb::new_in_memory().await.unwrap()
}

/// create a user with the given username.
pub async fn user(db: &TenderhubDb, username: &str) -> User {
    db.create_user(&User::new(username.to_string())).await.unwrap()
}

/// create an organization represented by `members`.
pub async fn organization(db: &TenderhubDb, name: &str, members: &[&User]) -> Organization {
    let org = db
        .create_organization(&Organization::new(name.to_string(), OrganizationType::LLC))
        .await
        .unwrap();
    for member in members {
        db.add_responsible(org.id, member.id).await.unwrap();
    }
    org
}
