use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::workflows::procurement::domain::{Role, UserId};

use super::tokens::TokenManager;

/// The authenticated caller, threaded explicitly through every workflow call
/// rather than stashed in request-scoped ambient state.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Failures raised by the authentication gate.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("A token is required for authentication")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("password hashing failed")]
    Hashing(argon2::password_hash::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::MissingToken | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Resolve the caller from the `Authorization` header. The `Bearer ` prefix
/// is optional; a bare token is accepted too.
pub fn authenticate(tokens: &TokenManager, headers: &HeaderMap) -> Result<Identity, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = header.strip_prefix("Bearer ").unwrap_or(header);
    let claims = tokens
        .validate(token)
        .map_err(|_| AuthError::InvalidToken)?;
    Ok(claims.identity())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::procurement::domain::{User, VendorProfile};
    use axum::http::HeaderValue;

    fn manager() -> TokenManager {
        TokenManager::new(b"test-secret", 3600)
    }

    fn token_for(role: Role) -> String {
        let user = User {
            id: UserId(3),
            email: "client@example.com".to_string(),
            name: "Client A".to_string(),
            role,
            hashed_password: String::new(),
            profile: VendorProfile::default(),
        };
        manager().issue(&user).expect("issue")
    }

    #[test]
    fn accepts_bearer_prefixed_and_bare_tokens() {
        let token = token_for(Role::Client);
        let mut headers = HeaderMap::new();

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).expect("header"),
        );
        let identity = authenticate(&manager(), &headers).expect("bearer form");
        assert_eq!(identity.user_id, UserId(3));

        headers.insert(AUTHORIZATION, HeaderValue::from_str(&token).expect("header"));
        let identity = authenticate(&manager(), &headers).expect("bare form");
        assert_eq!(identity.role, Role::Client);
    }

    #[test]
    fn missing_header_is_rejected() {
        let headers = HeaderMap::new();
        assert!(matches!(
            authenticate(&manager(), &headers),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer nonsense"));
        assert!(matches!(
            authenticate(&manager(), &headers),
            Err(AuthError::InvalidToken)
        ));
    }
}
