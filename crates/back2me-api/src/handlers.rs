//! HTTP request handlers for the API service.
//!
//! Implements the claim and rating endpoints using axum. Every operation
//! takes the acting user's id explicitly, in the request body or query
//! string; there is no ambient session state.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use back2me_claims::{ClaimError, ClaimRegistry};
use back2me_domain::{Claim, ClaimId, ClaimStatus, PostId, Rating, Reputation, UserId};
use back2me_reputation::{RatingError, ReputationAggregator};
use back2me_store::SqliteStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Persistence for claims, ratings, posts, and profiles
    ///
    /// rusqlite connections are not thread-safe, so access is serialized
    /// behind a mutex; every write is a single statement and the section
    /// held is short.
    pub store: Arc<Mutex<SqliteStore>>,
    /// Claim lifecycle service
    pub registry: Arc<ClaimRegistry>,
    /// Rating and reputation service
    pub aggregator: Arc<ReputationAggregator>,
}

/// Claim creation request
#[derive(Debug, Deserialize)]
pub struct CreateClaimRequest {
    /// Id of the user filing the claim
    pub claimant_id: String,
    /// Why the item belongs to the claimant
    pub message: String,
}

/// Claim transition request
#[derive(Debug, Deserialize)]
pub struct TransitionClaimRequest {
    /// Id of the user deciding the claim; must own the post
    pub actor_id: String,
    /// Target status: "accepted" or "rejected"
    pub status: String,
}

/// Rating submission request
#[derive(Debug, Deserialize)]
pub struct SubmitRatingRequest {
    /// Id of the user giving the rating
    pub rater_user_id: String,
    /// Id of the user being rated
    pub rated_user_id: String,
    /// Star value, 1-5
    pub stars: u8,
    /// Optional free-text feedback
    #[serde(default)]
    pub comment: Option<String>,
    /// Claim this rating stems from, if any
    #[serde(default)]
    pub claim_id: Option<String>,
}

/// Viewer scoping for claim listings
#[derive(Debug, Deserialize)]
pub struct ViewerQuery {
    /// Id of the user requesting the listing
    pub viewer_id: String,
}

/// Rater scoping for the rating-status probe
#[derive(Debug, Deserialize)]
pub struct RaterQuery {
    /// Id of the prospective rater
    pub rater_id: String,
}

/// Claim as serialized over the wire
#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimBody {
    /// Claim id
    pub id: String,
    /// Post the claim was filed against
    pub post_id: String,
    /// User who filed the claim
    pub claimer_id: String,
    /// Claim message
    pub message: String,
    /// One of "pending", "accepted", "rejected"
    pub status: String,
    /// Seconds since Unix epoch
    pub created_at: u64,
}

impl From<Claim> for ClaimBody {
    fn from(claim: Claim) -> Self {
        Self {
            id: claim.id.to_string(),
            post_id: claim.post_id.to_string(),
            claimer_id: claim.claimer_id.to_string(),
            message: claim.message,
            status: claim.status.as_str().to_string(),
            created_at: claim.created_at,
        }
    }
}

/// Rating as serialized over the wire
#[derive(Debug, Serialize, Deserialize)]
pub struct RatingBody {
    /// Rating id
    pub id: String,
    /// User who gave the rating
    pub rater_user_id: String,
    /// User who received the rating
    pub rated_user_id: String,
    /// Star value, 1-5
    pub stars: u8,
    /// Optional free-text feedback
    pub comment: Option<String>,
    /// Claim this rating stems from, if any
    pub claim_id: Option<String>,
    /// Seconds since Unix epoch
    pub created_at: u64,
}

impl From<Rating> for RatingBody {
    fn from(rating: Rating) -> Self {
        Self {
            id: rating.id.to_string(),
            rater_user_id: rating.rater_user_id.to_string(),
            rated_user_id: rating.rated_user_id.to_string(),
            stars: rating.stars.value(),
            comment: rating.comment,
            claim_id: rating.claim_id.map(|c| c.to_string()),
            created_at: rating.created_at,
        }
    }
}

/// Reputation as serialized over the wire
#[derive(Debug, Serialize, Deserialize)]
pub struct ReputationBody {
    /// Mean star value; 0.0 when unrated
    pub average: f64,
    /// Number of ratings received
    pub count: usize,
}

impl From<Reputation> for ReputationBody {
    fn from(reputation: Reputation) -> Self {
        Self {
            average: reputation.average,
            count: reputation.count,
        }
    }
}

/// Rating-status probe response
#[derive(Debug, Serialize, Deserialize)]
pub struct RatingStatusResponse {
    /// Whether this rater already rated this user
    pub has_rated: bool,
    /// Whether a rating action should be offered
    pub can_rate: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Claim workflow error
    Claim(ClaimError),
    /// Rating workflow error
    Rating(RatingError),
    /// Malformed request (unparseable ids, unknown status literals)
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Claim(e) => {
                let status = match e {
                    ClaimError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    ClaimError::InvalidClaimant | ClaimError::Unauthorized => {
                        StatusCode::FORBIDDEN
                    }
                    ClaimError::InvalidTransition { .. } => StatusCode::CONFLICT,
                    ClaimError::PostNotFound | ClaimError::ClaimNotFound => {
                        StatusCode::NOT_FOUND
                    }
                    ClaimError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.to_string())
            }
            AppError::Rating(e) => {
                let status = match e {
                    RatingError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    RatingError::SelfRating => StatusCode::FORBIDDEN,
                    RatingError::DuplicateRating => StatusCode::CONFLICT,
                    RatingError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<ClaimError> for AppError {
    fn from(e: ClaimError) -> Self {
        AppError::Claim(e)
    }
}

impl From<RatingError> for AppError {
    fn from(e: RatingError) -> Self {
        AppError::Rating(e)
    }
}

fn parse_user_id(field: &str, value: &str) -> Result<UserId, AppError> {
    UserId::from_string(value).map_err(|e| AppError::BadRequest(format!("{}: {}", field, e)))
}

fn parse_post_id(value: &str) -> Result<PostId, AppError> {
    PostId::from_string(value).map_err(|e| AppError::BadRequest(format!("post id: {}", e)))
}

fn parse_claim_id(value: &str) -> Result<ClaimId, AppError> {
    ClaimId::from_string(value).map_err(|e| AppError::BadRequest(format!("claim id: {}", e)))
}

/// POST /posts/{id}/claims - File a claim against a post
async fn create_claim(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Json(request): Json<CreateClaimRequest>,
) -> Result<(StatusCode, Json<ClaimBody>), AppError> {
    let post_id = parse_post_id(&post_id)?;
    let claimant_id = parse_user_id("claimant_id", &request.claimant_id)?;

    let mut store = state.store.lock().await;
    let claim = state
        .registry
        .create_claim(&mut *store, claimant_id, post_id, &request.message)?;

    Ok((StatusCode::CREATED, Json(claim.into())))
}

/// GET /posts/{id}/claims - List the claims a viewer may see on a post
async fn list_claims(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Query(query): Query<ViewerQuery>,
) -> Result<Json<Vec<ClaimBody>>, AppError> {
    let post_id = parse_post_id(&post_id)?;
    let viewer_id = parse_user_id("viewer_id", &query.viewer_id)?;

    let store = state.store.lock().await;
    let claims = state
        .registry
        .list_claims_for_viewer(&*store, viewer_id, post_id)?;

    Ok(Json(claims.into_iter().map(ClaimBody::from).collect()))
}

/// POST /claims/{id}/status - Accept or reject a claim
async fn transition_claim(
    State(state): State<AppState>,
    Path(claim_id): Path<String>,
    Json(request): Json<TransitionClaimRequest>,
) -> Result<Json<ClaimBody>, AppError> {
    let claim_id = parse_claim_id(&claim_id)?;
    let actor_id = parse_user_id("actor_id", &request.actor_id)?;
    let new_status = ClaimStatus::parse(&request.status)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown status: {}", request.status)))?;

    let mut store = state.store.lock().await;
    let claim = state
        .registry
        .transition_claim(&mut *store, actor_id, claim_id, new_status)?;

    Ok(Json(claim.into()))
}

/// POST /ratings - Submit a rating
async fn submit_rating(
    State(state): State<AppState>,
    Json(request): Json<SubmitRatingRequest>,
) -> Result<(StatusCode, Json<RatingBody>), AppError> {
    let rater_id = parse_user_id("rater_user_id", &request.rater_user_id)?;
    let rated_user_id = parse_user_id("rated_user_id", &request.rated_user_id)?;
    let claim_id = request
        .claim_id
        .as_deref()
        .map(parse_claim_id)
        .transpose()?;

    let mut store = state.store.lock().await;
    let rating = state.aggregator.submit_rating(
        &mut *store,
        rater_id,
        rated_user_id,
        request.stars,
        request.comment,
        claim_id,
    )?;

    Ok((StatusCode::CREATED, Json(rating.into())))
}

/// GET /users/{id}/reputation - Recompute a user's reputation
async fn get_reputation(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ReputationBody>, AppError> {
    let user_id = parse_user_id("user id", &user_id)?;

    let store = state.store.lock().await;
    let reputation = state.aggregator.get_reputation(&*store, user_id)?;

    Ok(Json(reputation.into()))
}

/// GET /users/{id}/rating-status - Whether a rater may rate this user
async fn rating_status(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<RaterQuery>,
) -> Result<Json<RatingStatusResponse>, AppError> {
    let rated_user_id = parse_user_id("user id", &user_id)?;
    let rater_id = parse_user_id("rater_id", &query.rater_id)?;

    let store = state.store.lock().await;
    let has_rated = state.aggregator.has_rated(&*store, rater_id, rated_user_id)?;
    let can_rate = state.aggregator.can_rate(&*store, rater_id, rated_user_id)?;

    Ok(Json(RatingStatusResponse { has_rated, can_rate }))
}

/// GET /health - Liveness check
async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "ok".to_string(),
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/posts/:id/claims", post(create_claim).get(list_claims))
        .route("/claims/:id/status", post(transition_claim))
        .route("/ratings", post(submit_rating))
        .route("/users/:id/reputation", get(get_reputation))
        .route("/users/:id/rating-status", get(rating_status))
        .route("/health", get(health_check))
        .with_state(state)
}
