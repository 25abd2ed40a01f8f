//! `SeaORM` implementation of the `AuthService` trait.

use crate::db::Store;
use crate::services::auth_service::{AuthContext, AuthError, AuthService, Role, UserInfo};
use async_trait::async_trait;

pub struct SeaOrmAuthService {
    store: Store,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<AuthContext, AuthError> {
        let is_valid = self.store.verify_user_password(username, password).await?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(AuthContext {
            username: user.username,
            role: Role::from_code(&user.role),
        })
    }

    async fn user_info(&self, username: &str) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(UserInfo {
            username: user.username,
            role: Role::from_code(&user.role),
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_codes() {
        assert_eq!(Role::from_code("M"), Role::Manager);
        assert_eq!(Role::from_code("U"), Role::User);
        assert_eq!(Role::from_code(""), Role::User);
        assert_eq!(Role::from_code("manager"), Role::User);
        assert_eq!(Role::Manager.as_code(), "M");
        assert!(Role::Manager.is_manager());
        assert!(!Role::User.is_manager());
    }
}
