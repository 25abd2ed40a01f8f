pub mod auth_service;
pub mod auth_service_impl;

pub use auth_service::{AuthContext, AuthError, AuthService, Role, UserInfo};
pub use auth_service_impl::SeaOrmAuthService;
