use serde::{Deserialize, Serialize};

use crate::workflows::procurement::domain::{Role, UserId};

use super::identity::Identity;

/// Claims embedded in access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

impl Claims {
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: UserId(self.sub),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}
