//! shared test utilities for api endpoint tests

#![allow(dead_code)] // Test utilities may not all be used in every test file

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use tenderhub::create_app;
use tenderhub_db::{Database, TenderhubDb};
use tenderhub_types::{Organization, OrganizationType, User};
use tower::ServiceExt;

/// test fixture: an in-memory database seeded with one organization and
/// its representatives, plus the app built on top of it.
pub struct ApiFixture {
    pub db: TenderhubDb,
    pub org: Organization,
    pub reps: Vec<User>,
    pub outsider: User,
    pub app: Router,
}

impl ApiFixture {
    /// fixture whose organization has `reps` responsible users named
    /// `rep0`, `rep1`, ...
    pub async fn with_reps(reps: usize) -> Self {
        let db = TenderhubDb::new_in_memory().await.unwrap();

        let org = db
            .create_organization(&Organization::new("Acme".into(), OrganizationType::LLC))
            .await
            .unwrap();

        let mut users = Vec::new();
        for i in 0..reps {
            let user = db.create_user(&User::new(format!("rep{i}"))).await.unwrap();
            db.add_responsible(org.id, user.id).await.unwrap();
            users.push(user);
        }
        let outsider = db.create_user(&User::new("outsider".into())).await.unwrap();

        let app = create_app(db.clone());
        Self {
            db,
            org,
            reps: users,
            outsider,
            app,
        }
    }

    /// send a request and return the status with the parsed json body
    /// (`Value::Null` for an empty body).
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    /// create a tender as `rep0` and return its json.
    pub async fn create_tender(&self, name: &str) -> Value {
        let (status, body) = self
            .send(
                "POST",
                "/api/tenders/new",
                Some(serde_json::json!({
                    "name": name,
                    "description": "build a bridge",
                    "serviceType": "Construction",
                    "organizationId": self.org.id.to_string(),
                    "creatorUsername": "rep0",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create tender failed: {body}");
        body
    }

    /// create and publish a tender, returning its id.
    pub async fn published_tender(&self, name: &str) -> String {
        let tender = self.create_tender(name).await;
        let id = tender["id"].as_str().unwrap().to_string();
        let (status, _) = self
            .send(
                "PUT",
                &format!("/api/tenders/{id}/status?status=Published&username=rep0"),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        id
    }

    /// submit a bid on behalf of the fixture organization, returning its id.
    pub async fn org_bid(&self, tender_id: &str, name: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/api/bids/new",
                Some(serde_json::json!({
                    "name": name,
                    "description": "we can do it",
                    "tenderId": tender_id,
                    "authorType": "Organization",
                    "authorID": self.org.id.to_string(),
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create bid failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }
}
