use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{post, put};
use axum::{Json, Router};
use serde_json::json;

use crate::auth::{authenticate, AuthError, TokenManager};
use crate::workflows::procurement::repository::ProcurementStore;

use super::service::{
    AccountError, AccountService, LoginRequest, RegisterRequest, UpdateProfileRequest,
};

/// Shared router state for the account endpoints.
pub struct AccountsApi<S> {
    pub service: Arc<AccountService<S>>,
    pub tokens: Arc<TokenManager>,
}

impl<S> Clone for AccountsApi<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let status = match &self {
            AccountError::Validation(_) | AccountError::EmailTaken => StatusCode::BAD_REQUEST,
            AccountError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AccountError::Auth(AuthError::MissingToken | AuthError::InvalidToken) => {
                StatusCode::UNAUTHORIZED
            }
            AccountError::Auth(_) | AccountError::Token(_) | AccountError::Store(_) => {
                tracing::error!(error = %self, "account operation failure");
                let body = Json(json!({ "error": "Server error" }));
                return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
            }
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Router builder for registration, login, and profile updates.
pub fn accounts_router<S>(api: AccountsApi<S>) -> Router
where
    S: ProcurementStore + 'static,
{
    Router::new()
        .route("/api/auth/register", post(register_handler::<S>))
        .route("/api/auth/login", post(login_handler::<S>))
        .route("/api/users/profile", put(update_profile_handler::<S>))
        .with_state(api)
}

async fn register_handler<S: ProcurementStore + 'static>(
    State(api): State<AccountsApi<S>>,
    Json(request): Json<RegisterRequest>,
) -> Response {
    match api.service.register(request) {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn login_handler<S: ProcurementStore + 'static>(
    State(api): State<AccountsApi<S>>,
    Json(request): Json<LoginRequest>,
) -> Response {
    match api.service.login(request) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn update_profile_handler<S: ProcurementStore + 'static>(
    State(api): State<AccountsApi<S>>,
    headers: HeaderMap,
    Json(request): Json<UpdateProfileRequest>,
) -> Response {
    let identity = match authenticate(&api.tokens, &headers) {
        Ok(identity) => identity,
        Err(err) => return err.into_response(),
    };
    match api.service.update_profile(&identity, request) {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(err) => err.into_response(),
    }
}
