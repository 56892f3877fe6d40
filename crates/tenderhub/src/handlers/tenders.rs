//! tender endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, patch, post, put},
};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::handlers::{ApiError, ApiPath, ApiQuery, JsonBody, ResultExt};
use crate::services::tenders::{self, NewTender};
use tenderhub_db::Page;
use tenderhub_types::{OrganizationId, ServiceType, Tender, TenderId, TenderPatch, TenderStatus};

/// tender representation in api responses.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderResponse {
    /// unique identifier.
    pub id: String,
    /// display name.
    pub name: String,
    /// free-text description.
    pub description: String,
    /// kind of service procured.
    pub service_type: String,
    /// lifecycle status.
    pub status: String,
    /// organization that owns the tender.
    pub organization_id: String,
    /// current version, starting at 1.
    pub version: i32,
    /// creation time (rfc 3339).
    pub created_at: String,
}

impl From<Tender> for TenderResponse {
    fn from(tender: Tender) -> Self {
        Self {
            id: tender.id.to_string(),
            name: tender.attrs.name,
            description: tender.attrs.description,
            service_type: tender.attrs.service_type.to_string(),
            status: tender.attrs.status.to_string(),
            organization_id: tender.attrs.organization_id.to_string(),
            version: tender.version,
            created_at: tender.created_at.to_rfc3339(),
        }
    }
}

/// request body for creating a tender.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenderRequest {
    /// display name.
    pub name: String,
    /// free-text description.
    pub description: String,
    /// kind of service procured.
    pub service_type: String,
    /// organization that owns the tender.
    pub organization_id: OrganizationId,
    /// representative creating the tender.
    pub creator_username: String,
}

/// request body for a partial edit. empty strings leave a field unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditTenderRequest {
    /// new name.
    pub name: String,
    /// new description.
    pub description: String,
    /// new service type.
    pub service_type: String,
}

impl EditTenderRequest {
    fn into_patch(self) -> Result<TenderPatch, ApiError> {
        let service_type = match self.service_type.as_str() {
            "" => None,
            other => Some(other.parse::<ServiceType>().map_bad_request()?),
        };
        Ok(TenderPatch {
            name: non_empty(self.name),
            description: non_empty(self.description),
            service_type,
        })
    }
}

pub(crate) fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// `GET /api/tenders` query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListTendersQuery {
    /// only tenders of this service type.
    pub service_type: Option<String>,
    /// only tenders of this user's organizations.
    pub username: Option<String>,
    /// rows to skip.
    pub offset: i64,
    /// maximum rows to return. non-positive means no limit.
    pub limit: i64,
}

/// query parameters carrying only the acting user and a page.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserPageQuery {
    /// acting user.
    pub username: String,
    /// rows to skip.
    pub offset: i64,
    /// maximum rows to return. non-positive means no limit.
    pub limit: i64,
}

/// query parameters carrying only the acting user.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserQuery {
    /// acting user.
    pub username: String,
}

/// `PUT /api/tenders/{id}/status` query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SetStatusQuery {
    /// target tender status.
    pub status: String,
    /// acting user.
    pub username: String,
}

/// create the tenders router.
///
/// routes carry their full path so the listing answers both with and
/// without the trailing slash.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tenders", get(list_tenders))
        .route("/api/tenders/", get(list_tenders))
        .route("/api/tenders/new", post(create_tender))
        .route("/api/tenders/my", get(my_tenders))
        .route("/api/tenders/{id}/edit", patch(edit_tender))
        .route(
            "/api/tenders/{id}/status",
            get(tender_status).put(set_tender_status),
        )
        .route("/api/tenders/{id}/rollback/{version}", put(rollback_tender))
}

/// list tenders, optionally for a user's organizations.
///
/// `GET /api/tenders?serviceType=&username=&offset=&limit=`
async fn list_tenders(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListTendersQuery>,
) -> Result<Json<Vec<TenderResponse>>, ApiError> {
    let service_type = match query.service_type.as_deref() {
        None | Some("") => None,
        Some(other) => Some(other.parse::<ServiceType>().map_bad_request()?),
    };
    let tenders = tenders::list(
        &state.db,
        service_type,
        query.username.as_deref(),
        Page::new(query.offset, query.limit),
    )
    .await?;
    Ok(Json(tenders.into_iter().map(TenderResponse::from).collect()))
}

/// create a tender.
///
/// `POST /api/tenders/new`
async fn create_tender(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateTenderRequest>,
) -> Result<Json<TenderResponse>, ApiError> {
    let service_type = req.service_type.parse::<ServiceType>().map_bad_request()?;
    let tender = tenders::create(
        &state.db,
        NewTender {
            name: req.name,
            description: req.description,
            service_type,
            organization_id: req.organization_id,
            creator_username: req.creator_username,
        },
    )
    .await?;
    Ok(Json(tender.into()))
}

/// tenders created by the acting user.
///
/// `GET /api/tenders/my?username=`
async fn my_tenders(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserPageQuery>,
) -> Result<Json<Vec<TenderResponse>>, ApiError> {
    let page = Page::new(query.offset, query.limit);
    let tenders = tenders::list_mine(&state.db, &query.username, page).await?;
    Ok(Json(tenders.into_iter().map(TenderResponse::from).collect()))
}

/// partially edit a tender.
///
/// `PATCH /api/tenders/{id}/edit?username=`
async fn edit_tender(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<TenderId>,
    ApiQuery(query): ApiQuery<UserQuery>,
    JsonBody(req): JsonBody<EditTenderRequest>,
) -> Result<Json<TenderResponse>, ApiError> {
    let patch = req.into_patch()?;
    let tender = tenders::edit(&state.db, id, patch, &query.username).await?;
    Ok(Json(tender.into()))
}

/// read a tender's status.
///
/// `GET /api/tenders/{id}/status?username=`
async fn tender_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<TenderId>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<String>, ApiError> {
    let status = tenders::status(&state.db, id, &query.username).await?;
    Ok(Json(status.to_string()))
}

/// set a tender's status.
///
/// `PUT /api/tenders/{id}/status?status=&username=`
async fn set_tender_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<TenderId>,
    ApiQuery(query): ApiQuery<SetStatusQuery>,
) -> Result<Json<TenderResponse>, ApiError> {
    let status = query.status.parse::<TenderStatus>().map_bad_request()?;
    let tender = tenders::set_status(&state.db, id, status, &query.username).await?;
    Ok(Json(tender.into()))
}

/// roll a tender back to an archived version.
///
/// `PUT /api/tenders/{id}/rollback/{version}?username=`
async fn rollback_tender(
    State(state): State<AppState>,
    ApiPath((id, version)): ApiPath<(TenderId, i32)>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<TenderResponse>, ApiError> {
    let tender = tenders::rollback(&state.db, id, version, &query.username).await?;
    Ok(Json(tender.into()))
}
