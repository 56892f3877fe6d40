//! bid endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, patch, post, put},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::handlers::tenders::{UserPageQuery, UserQuery, non_empty};
use crate::handlers::{ApiError, ApiPath, ApiQuery, JsonBody, ResultExt};
use crate::services::bids::{self, NewBid};
use tenderhub_db::Page;
use tenderhub_types::{
    AuthorType, Bid, BidAuthor, BidId, BidPatch, BidStatus, Decision, Review, TenderId,
};

/// bid representation in api responses.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidResponse {
    /// unique identifier.
    pub id: String,
    /// display name.
    pub name: String,
    /// free-text description.
    pub description: String,
    /// lifecycle status.
    pub status: String,
    /// tender the bid is placed on.
    pub tender_id: String,
    /// author kind: `Organization` or `User`.
    pub author_type: String,
    /// id of the authoring user or organization.
    pub author_id: String,
    /// current version, starting at 1.
    pub version: i32,
    /// creation time (rfc 3339).
    pub created_at: String,
}

impl From<Bid> for BidResponse {
    fn from(bid: Bid) -> Self {
        let author = bid.author();
        Self {
            id: bid.id.to_string(),
            name: bid.attrs.name,
            description: bid.attrs.description,
            status: bid.attrs.status.to_string(),
            tender_id: bid.attrs.tender_id.to_string(),
            author_type: author.author_type().to_string(),
            author_id: author.id().to_string(),
            version: bid.version,
            created_at: bid.created_at.to_rfc3339(),
        }
    }
}

/// review representation in api responses.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    /// unique identifier.
    pub id: String,
    /// review text.
    pub description: String,
    /// creation time (rfc 3339).
    pub created_at: String,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id.to_string(),
            description: review.description,
            created_at: review.created_at.to_rfc3339(),
        }
    }
}

/// request body for submitting a bid.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBidRequest {
    /// display name.
    pub name: String,
    /// free-text description.
    pub description: String,
    /// tender the bid is placed on.
    pub tender_id: TenderId,
    /// author kind: `Organization` or `User`.
    pub author_type: String,
    /// id of the authoring user or organization.
    #[serde(rename = "authorID")]
    pub author_id: Uuid,
}

/// request body for a partial edit. empty strings leave a field unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EditBidRequest {
    /// new name.
    pub name: String,
    /// new description.
    pub description: String,
}

/// `PUT /api/bids/{id}/status` query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SetBidStatusQuery {
    /// target bid status.
    pub status: String,
    /// acting user.
    pub username: String,
}

/// `PUT /api/bids/{id}/submit_decision` query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DecisionQuery {
    /// `Approved` or `Rejected`.
    pub decision: String,
    /// acting user.
    pub username: String,
}

/// `PUT /api/bids/{id}/feedback` query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedbackQuery {
    /// review text.
    pub bid_feedback: String,
    /// acting user.
    pub username: String,
}

/// `GET /api/bids/{tenderId}/reviews` query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewsQuery {
    /// bid author whose reviews are listed.
    pub author_username: String,
    /// tender representative asking for the reviews.
    pub requester_username: String,
    /// rows to skip.
    pub offset: i64,
    /// maximum rows to return. non-positive means no limit.
    pub limit: i64,
}

/// create the bids router.
///
/// `{id}` is a bid id except under `list` and `reviews`, where it names the
/// tender.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/bids/new", post(create_bid))
        .route("/api/bids/my", get(my_bids))
        .route("/api/bids/{id}/list", get(tender_bids))
        .route("/api/bids/{id}/reviews", get(tender_reviews))
        .route("/api/bids/{id}/status", get(bid_status).put(set_bid_status))
        .route("/api/bids/{id}/edit", patch(edit_bid))
        .route("/api/bids/{id}/submit_decision", put(submit_decision))
        .route("/api/bids/{id}/feedback", put(feedback))
        .route("/api/bids/{id}/rollback/{version}", put(rollback_bid))
}

/// submit a bid.
///
/// `POST /api/bids/new`
async fn create_bid(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateBidRequest>,
) -> Result<Json<BidResponse>, ApiError> {
    let author_type = req.author_type.parse::<AuthorType>().map_bad_request()?;
    let bid = bids::create(
        &state.db,
        NewBid {
            name: req.name,
            description: req.description,
            tender_id: req.tender_id,
            author: BidAuthor::from_parts(author_type, req.author_id),
        },
    )
    .await?;
    Ok(Json(bid.into()))
}

/// bids authored by the acting user.
///
/// `GET /api/bids/my?username=`
async fn my_bids(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserPageQuery>,
) -> Result<Json<Vec<BidResponse>>, ApiError> {
    let page = Page::new(query.offset, query.limit);
    let bids = bids::list_mine(&state.db, &query.username, page).await?;
    Ok(Json(bids.into_iter().map(BidResponse::from).collect()))
}

/// bids on a tender.
///
/// `GET /api/bids/{tenderId}/list?username=`
async fn tender_bids(
    State(state): State<AppState>,
    ApiPath(tender_id): ApiPath<TenderId>,
    ApiQuery(query): ApiQuery<UserPageQuery>,
) -> Result<Json<Vec<BidResponse>>, ApiError> {
    let page = Page::new(query.offset, query.limit);
    let bids = bids::list_for_tender(&state.db, tender_id, &query.username, page).await?;
    Ok(Json(bids.into_iter().map(BidResponse::from).collect()))
}

/// read a bid's status.
///
/// `GET /api/bids/{id}/status?username=`
async fn bid_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BidId>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<String>, ApiError> {
    let status = bids::status(&state.db, id, &query.username).await?;
    Ok(Json(status.to_string()))
}

/// set a bid's status.
///
/// `PUT /api/bids/{id}/status?status=&username=`
async fn set_bid_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BidId>,
    ApiQuery(query): ApiQuery<SetBidStatusQuery>,
) -> Result<Json<BidResponse>, ApiError> {
    let status = query.status.parse::<BidStatus>().map_bad_request()?;
    let bid = bids::set_status(&state.db, id, status, &query.username).await?;
    Ok(Json(bid.into()))
}

/// partially edit a bid.
///
/// `PATCH /api/bids/{id}/edit?username=`
async fn edit_bid(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BidId>,
    ApiQuery(query): ApiQuery<UserQuery>,
    JsonBody(req): JsonBody<EditBidRequest>,
) -> Result<Json<BidResponse>, ApiError> {
    let patch = BidPatch {
        name: non_empty(req.name),
        description: non_empty(req.description),
    };
    let bid = bids::edit(&state.db, id, patch, &query.username).await?;
    Ok(Json(bid.into()))
}

/// approve or reject a bid.
///
/// `PUT /api/bids/{id}/submit_decision?decision=&username=`
async fn submit_decision(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BidId>,
    ApiQuery(query): ApiQuery<DecisionQuery>,
) -> Result<Json<BidResponse>, ApiError> {
    let decision = query.decision.parse::<Decision>().map_bad_request()?;
    let bid = bids::submit_decision(&state.db, &state.quorum, id, decision, &query.username).await?;
    Ok(Json(bid.into()))
}

/// leave feedback on a bid.
///
/// `PUT /api/bids/{id}/feedback?bidFeedback=&username=`
async fn feedback(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BidId>,
    ApiQuery(query): ApiQuery<FeedbackQuery>,
) -> Result<Json<BidResponse>, ApiError> {
    let bid = bids::feedback(&state.db, id, query.bid_feedback, &query.username).await?;
    Ok(Json(bid.into()))
}

/// roll a bid back to an archived version.
///
/// `PUT /api/bids/{id}/rollback/{version}?username=`
async fn rollback_bid(
    State(state): State<AppState>,
    ApiPath((id, version)): ApiPath<(BidId, i32)>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<BidResponse>, ApiError> {
    let bid = bids::rollback(&state.db, id, version, &query.username).await?;
    Ok(Json(bid.into()))
}

/// reviews on a tender's bids by one author.
///
/// `GET /api/bids/{tenderId}/reviews?authorUsername=&requesterUsername=`
async fn tender_reviews(
    State(state): State<AppState>,
    ApiPath(tender_id): ApiPath<TenderId>,
    ApiQuery(query): ApiQuery<ReviewsQuery>,
) -> Result<Json<Vec<ReviewResponse>>, ApiError> {
    let reviews = bids::reviews(
        &state.db,
        tender_id,
        &query.author_username,
        &query.requester_username,
        Page::new(query.offset, query.limit),
    )
    .await?;
    Ok(Json(reviews.into_iter().map(ReviewResponse::from).collect()))
}
