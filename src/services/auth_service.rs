//! Authentication domain types and the service seam the HTTP layer talks to.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Binary authorization tier. Managers may write; both tiers may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Manager,
    User,
}

impl Role {
    /// Parses the stored role code. Anything other than "M" is treated as a
    /// common user, so a malformed role can never grant write access.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        if code == "M" { Self::Manager } else { Self::User }
    }

    #[must_use]
    pub const fn as_code(self) -> &'static str {
        match self {
            Self::Manager => "M",
            Self::User => "U",
        }
    }

    #[must_use]
    pub const fn is_manager(self) -> bool {
        matches!(self, Self::Manager)
    }
}

/// Immutable per-request authentication state. Built once from the session
/// by the auth middleware and handed to handlers as a request extension;
/// handlers never read the raw session for identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    pub username: String,
    pub role: Role,
}

impl AuthContext {
    #[must_use]
    pub const fn is_manager(&self) -> bool {
        self.role.is_manager()
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Deliberately does not say whether the username or the password was
    /// wrong.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Account details for the signed-in user view
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub username: String,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Checks credentials and returns the context to store in the session.
    async fn login(&self, username: &str, password: &str) -> Result<AuthContext, AuthError>;

    async fn user_info(&self, username: &str) -> Result<UserInfo, AuthError>;
}
