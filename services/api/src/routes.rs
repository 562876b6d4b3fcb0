use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde_json::json;
use vendorhub::accounts::{accounts_router, AccountsApi};
use vendorhub::workflows::procurement::{procurement_router, ProcurementApi, ProcurementStore};

pub(crate) fn with_api_routes<S>(
    procurement: ProcurementApi<S>,
    accounts: AccountsApi<S>,
) -> axum::Router
where
    S: ProcurementStore + 'static,
{
    procurement_router(procurement)
        .merge(accounts_router(accounts))
        .route("/ping", axum::routing::get(ping))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
