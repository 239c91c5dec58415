//! HTTP routes.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use greenproof::core::{ActionId, AttestRequest, ImpactAction, NewAction, Proof, ProofHash, TxId};
use greenproof::store::{Page, Store, MAX_PAGE_SIZE};
use greenproof::{parse_action_id, GreenProof, HealthReport};

use crate::error::ApiError;
use crate::schema;

/// Service shared across handlers; the backend is chosen at startup.
pub type SharedService = Arc<GreenProof<Arc<dyn Store>>>;

type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn build_router(service: SharedService, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/schema", get(schemas))
        .route("/actions", post(create_action).get(list_actions))
        .route("/actions/:id", get(get_action))
        .route("/actions/:id/attest", post(attest_action))
        .route("/actions/:id/verify", get(verify_action))
        .route("/actions/:id/proofs", get(action_proofs))
        .route("/proofs", get(list_proofs))
        .with_state(service)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: ActionId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AttestResponse {
    pub proof_hash: ProofHash,
    pub tx_id: TxId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

impl From<PageQuery> for Page {
    fn from(query: PageQuery) -> Self {
        Page::new(
            query.offset.unwrap_or(0),
            query.limit.unwrap_or(MAX_PAGE_SIZE),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyQuery {
    pub salt: Option<String>,
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "GreenProof backend is running".to_string(),
    })
}

async fn health(State(service): State<SharedService>) -> (StatusCode, Json<HealthReport>) {
    let report = service.health().await;
    let status = if report.storage {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

async fn schemas() -> Json<Value> {
    Json(schema::all())
}

async fn create_action(
    State(service): State<SharedService>,
    new: Result<Json<NewAction>, JsonRejection>,
) -> ApiResult<CreatedResponse> {
    let Json(new) = new?;
    let action = service.create_action(new).await?;
    Ok(Json(CreatedResponse { id: action.id }))
}

async fn list_actions(
    State(service): State<SharedService>,
    page: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Vec<ImpactAction>> {
    let Query(page) = page?;
    Ok(Json(service.list_actions(page.into()).await?))
}

async fn get_action(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> ApiResult<ImpactAction> {
    let id = parse_action_id(&id)?;
    Ok(Json(service.require_action(&id).await?))
}

/// The body is optional; an empty body attests without a salt.
async fn attest_action(
    State(service): State<SharedService>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<AttestResponse> {
    let id = parse_action_id(&id)?;
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        AttestRequest::default()
    } else {
        let Json(request) = Json::<AttestRequest>::from_bytes(&body)?;
        request
    };

    let proof = service.attest(&id, request).await?;
    Ok(Json(AttestResponse {
        proof_hash: proof.proof_hash,
        tx_id: proof.tx_id,
    }))
}

async fn verify_action(
    State(service): State<SharedService>,
    Path(id): Path<String>,
    query: Result<Query<VerifyQuery>, QueryRejection>,
) -> ApiResult<VerifyResponse> {
    let id = parse_action_id(&id)?;
    let Query(query) = query?;
    let valid = service.verify(&id, query.salt.as_deref()).await?;
    Ok(Json(VerifyResponse { valid }))
}

async fn action_proofs(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Proof>> {
    let id = parse_action_id(&id)?;
    Ok(Json(service.proofs_for_action(&id).await?))
}

async fn list_proofs(
    State(service): State<SharedService>,
    page: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Vec<Proof>> {
    let Query(page) = page?;
    Ok(Json(service.list_proofs(page.into()).await?))
}
