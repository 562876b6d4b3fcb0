use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{authenticate, TokenManager};

use super::domain::{BidId, RfqId, RfqStatus, Role};
use super::repository::ProcurementStore;
use super::service::{
    CreateOrderRequest, CreateRfqRequest, ProcurementError, ProcurementService, SubmitBidRequest,
};

/// Shared router state: the workflow service plus the token gate.
pub struct ProcurementApi<S> {
    pub service: Arc<ProcurementService<S>>,
    pub tokens: Arc<TokenManager>,
}

impl<S> Clone for ProcurementApi<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl IntoResponse for ProcurementError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProcurementError::Validation(_)
            | ProcurementError::InvalidState(_)
            | ProcurementError::Conflict(_) => StatusCode::BAD_REQUEST,
            ProcurementError::Forbidden(_) => StatusCode::FORBIDDEN,
            ProcurementError::NotFound(_) => StatusCode::NOT_FOUND,
            ProcurementError::Store(err) => {
                tracing::error!(error = %err, "procurement store failure");
                let body = Json(json!({ "error": "Server error" }));
                return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
            }
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Router builder exposing the procurement HTTP surface.
pub fn procurement_router<S>(api: ProcurementApi<S>) -> Router
where
    S: ProcurementStore + 'static,
{
    Router::new()
        .route("/api/rfq/create", post(create_rfq_handler::<S>))
        .route("/api/rfq/:id", get(rfq_detail_handler::<S>))
        .route("/api/rfqs", get(list_rfqs_handler::<S>))
        .route("/api/bids/submit", post(submit_bid_handler::<S>))
        .route("/api/bids/rfq/:rfq_id", get(bids_for_rfq_handler::<S>))
        .route("/api/bids/admin", get(admin_bids_handler::<S>))
        .route("/api/bids/:id/approve", post(approve_bid_handler::<S>))
        .route("/api/orders/create", post(create_order_handler::<S>))
        .route("/api/orders/history", get(order_history_handler::<S>))
        .route("/api/equipments", get(list_equipment_handler::<S>))
        .route("/api/users", get(list_users_handler::<S>))
        .with_state(api)
}

async fn create_rfq_handler<S: ProcurementStore + 'static>(
    State(api): State<ProcurementApi<S>>,
    headers: HeaderMap,
    Json(request): Json<CreateRfqRequest>,
) -> Response {
    let identity = match authenticate(&api.tokens, &headers) {
        Ok(identity) => identity,
        Err(err) => return err.into_response(),
    };
    match api.service.create_rfq(&identity, request) {
        Ok(rfq) => (StatusCode::OK, Json(rfq)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct StatusQuery {
    status: Option<String>,
}

async fn list_rfqs_handler<S: ProcurementStore + 'static>(
    State(api): State<ProcurementApi<S>>,
    headers: HeaderMap,
    Query(query): Query<StatusQuery>,
) -> Response {
    let identity = match authenticate(&api.tokens, &headers) {
        Ok(identity) => identity,
        Err(err) => return err.into_response(),
    };
    let status = match query.status.as_deref() {
        Some(raw) => match RfqStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                let body = Json(json!({ "error": "Invalid status" }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
        },
        None => None,
    };
    match api.service.list_rfqs(&identity, status) {
        Ok(rfqs) => (StatusCode::OK, Json(rfqs)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn rfq_detail_handler<S: ProcurementStore + 'static>(
    State(api): State<ProcurementApi<S>>,
    Path(id): Path<RfqId>,
) -> Response {
    match api.service.rfq_detail(id) {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn submit_bid_handler<S: ProcurementStore + 'static>(
    State(api): State<ProcurementApi<S>>,
    headers: HeaderMap,
    Json(request): Json<SubmitBidRequest>,
) -> Response {
    let identity = match authenticate(&api.tokens, &headers) {
        Ok(identity) => identity,
        Err(err) => return err.into_response(),
    };
    match api.service.submit_bid(&identity, request) {
        Ok(bid) => (StatusCode::OK, Json(bid)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn bids_for_rfq_handler<S: ProcurementStore + 'static>(
    State(api): State<ProcurementApi<S>>,
    Path(rfq_id): Path<RfqId>,
) -> Response {
    match api.service.bids_for_rfq(rfq_id) {
        Ok(bids) => (StatusCode::OK, Json(bids)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn admin_bids_handler<S: ProcurementStore + 'static>(
    State(api): State<ProcurementApi<S>>,
    headers: HeaderMap,
) -> Response {
    let identity = match authenticate(&api.tokens, &headers) {
        Ok(identity) => identity,
        Err(err) => return err.into_response(),
    };
    match api.service.admin_bids(&identity) {
        Ok(bids) => (StatusCode::OK, Json(bids)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn approve_bid_handler<S: ProcurementStore + 'static>(
    State(api): State<ProcurementApi<S>>,
    headers: HeaderMap,
    Path(id): Path<BidId>,
) -> Response {
    let identity = match authenticate(&api.tokens, &headers) {
        Ok(identity) => identity,
        Err(err) => return err.into_response(),
    };
    match api.service.approve_bid(&identity, id) {
        Ok(_) => (StatusCode::OK, Json(json!({ "ok": true }))).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn create_order_handler<S: ProcurementStore + 'static>(
    State(api): State<ProcurementApi<S>>,
    headers: HeaderMap,
    Json(request): Json<CreateOrderRequest>,
) -> Response {
    let identity = match authenticate(&api.tokens, &headers) {
        Ok(identity) => identity,
        Err(err) => return err.into_response(),
    };
    match api.service.create_order(&identity, request) {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn order_history_handler<S: ProcurementStore + 'static>(
    State(api): State<ProcurementApi<S>>,
    headers: HeaderMap,
) -> Response {
    let identity = match authenticate(&api.tokens, &headers) {
        Ok(identity) => identity,
        Err(err) => return err.into_response(),
    };
    match api.service.order_history(&identity) {
        Ok(orders) => (StatusCode::OK, Json(orders)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn list_equipment_handler<S: ProcurementStore + 'static>(
    State(api): State<ProcurementApi<S>>,
) -> Response {
    match api.service.list_equipment() {
        Ok(equipment) => (StatusCode::OK, Json(equipment)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct RoleQuery {
    role: Option<String>,
}

async fn list_users_handler<S: ProcurementStore + 'static>(
    State(api): State<ProcurementApi<S>>,
    Query(query): Query<RoleQuery>,
) -> Response {
    let role = match query.role.as_deref() {
        Some(raw) => match Role::parse(raw) {
            Some(role) => Some(role),
            None => {
                let body = Json(json!({ "error": "Invalid role" }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
        },
        None => None,
    };
    match api.service.list_users(role) {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(err) => err.into_response(),
    }
}
