use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, verify_password, AuthError, Identity, TokenManager};
use crate::workflows::procurement::domain::{Role, VendorProfile};
use crate::workflows::procurement::repository::{NewUser, ProcurementStore, StoreError};
use crate::workflows::procurement::views::{self, ProfileView, UserView};

/// Registration payload. Role defaults to `vendor` when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Successful login: the bearer token plus the public user shape.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserView,
}

/// Self-service vendor profile replacement. Rating is clamped to the 0-5
/// scale at the boundary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    pub company_name: Option<String>,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub certifications: Vec<String>,
    pub categories: Vec<String>,
    pub rating: f64,
    pub orders_count: u32,
    pub experience_years: u32,
}

impl Default for UpdateProfileRequest {
    fn default() -> Self {
        let profile = VendorProfile::default();
        Self {
            company_name: profile.company_name,
            contact_name: profile.contact_name,
            phone: profile.phone,
            certifications: profile.certifications,
            categories: profile.categories,
            rating: profile.rating,
            orders_count: profile.orders_count,
            experience_years: profile.experience_years,
        }
    }
}

/// Error raised by account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{0}")]
    Validation(String),
    #[error("Email already registered")]
    EmailTaken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("token issuance failed")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Registration, login, and profile maintenance over the shared store.
pub struct AccountService<S> {
    store: Arc<S>,
    tokens: Arc<TokenManager>,
}

impl<S> Clone for AccountService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl<S: ProcurementStore> AccountService<S> {
    pub fn new(store: Arc<S>, tokens: Arc<TokenManager>) -> Self {
        Self { store, tokens }
    }

    /// Create an account. Responds with the public view only; store and
    /// hashing failures surface as opaque server errors.
    pub fn register(&self, request: RegisterRequest) -> Result<UserView, AccountError> {
        let (email, password, name) = match (request.email, request.password, request.name) {
            (Some(email), Some(password), Some(name))
                if !email.trim().is_empty() && !password.is_empty() && !name.trim().is_empty() =>
            {
                (email, password, name)
            }
            _ => return Err(AccountError::Validation("Missing fields".to_string())),
        };

        if self.store.find_user_by_email(&email)?.is_some() {
            return Err(AccountError::EmailTaken);
        }

        let hashed_password = hash_password(&password)?;
        let user = self.store.insert_user(NewUser {
            email,
            name,
            role: request.role.unwrap_or(Role::Vendor),
            hashed_password,
            profile: VendorProfile::default(),
        })?;
        Ok(views::user_view(&user))
    }

    /// Verify credentials and issue a bearer token. Which half of the
    /// credential pair failed is never revealed.
    pub fn login(&self, request: LoginRequest) -> Result<LoginResponse, AccountError> {
        let (email, password) = match (request.email, request.password) {
            (Some(email), Some(password)) => (email, password),
            _ => return Err(AccountError::Validation("Missing fields".to_string())),
        };

        let user = self
            .store
            .find_user_by_email(&email)?
            .ok_or(AccountError::InvalidCredentials)?;
        if !verify_password(&password, &user.hashed_password) {
            return Err(AccountError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user)?;
        Ok(LoginResponse {
            token,
            user: views::user_view(&user),
        })
    }

    /// Replace the caller's vendor profile fields.
    pub fn update_profile(
        &self,
        identity: &Identity,
        request: UpdateProfileRequest,
    ) -> Result<ProfileView, AccountError> {
        let profile = VendorProfile {
            company_name: request.company_name,
            contact_name: request.contact_name,
            phone: request.phone,
            certifications: request.certifications,
            categories: request.categories,
            rating: request.rating.clamp(0.0, 5.0),
            orders_count: request.orders_count,
            experience_years: request.experience_years,
        };
        let user = self.store.update_vendor_profile(identity.user_id, profile)?;
        Ok(views::profile_view(&user))
    }
}
