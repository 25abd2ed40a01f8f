use axum::{
    Extension, Form, Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState};
use crate::services::AuthContext;

/// Session slot holding the serialized [`AuthContext`]
const SESSION_AUTH_KEY: &str = "auth";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub username: String,
    pub role: String,
}

impl From<&AuthContext> for UserDto {
    fn from(ctx: &AuthContext) -> Self {
        Self {
            username: ctx.username.clone(),
            role: ctx.role.as_code().to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct UserInfoResponse {
    pub username: String,
    pub role: String,
    pub created_at: String,
    pub updated_at: String,
}

// ============================================================================
// Guards
// ============================================================================

/// Authentication middleware. Rebuilds the [`AuthContext`] from the session
/// and injects it as a request extension; anonymous requests (and sessions
/// that fail to decode) are redirected to the login entry point.
pub async fn require_login(session: Session, mut request: Request, next: Next) -> Response {
    match session.get::<AuthContext>(SESSION_AUTH_KEY).await {
        Ok(Some(ctx)) => {
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        _ => Redirect::to("/login").into_response(),
    }
}

/// Pure predicate over the authenticated context. The context only exists
/// past [`require_login`], so this check implies authentication and fails
/// closed when the session carries no manager role.
pub fn require_manager(ctx: &AuthContext) -> Result<(), ApiError> {
    if ctx.is_manager() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /login
pub async fn login_page(session: Session) -> impl IntoResponse {
    let already_signed_in = matches!(
        session.get::<AuthContext>(SESSION_AUTH_KEY).await,
        Ok(Some(_))
    );
    if already_signed_in {
        Redirect::to("/dashboard").into_response()
    } else {
        (StatusCode::OK, "Ella Rises admin: sign in via POST /login").into_response()
    }
}

/// POST /login
/// Verifies credentials and populates the session. Every failure surfaces
/// the same generic message.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(payload): Form<LoginRequest>,
) -> Result<Redirect, ApiError> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let ctx = state.auth().login(&payload.username, &payload.password).await?;

    session
        .insert(SESSION_AUTH_KEY, &ctx)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!("User logged in: {}", ctx.username);

    Ok(Redirect::to("/dashboard"))
}

/// GET /logout
/// Destroys all session state unconditionally.
pub async fn logout(session: Session) -> Redirect {
    let _ = session.flush().await;
    Redirect::to("/login")
}

/// GET /me
pub async fn current_user(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<UserInfoResponse>>, ApiError> {
    let info = state.auth().user_info(&ctx.username).await?;

    Ok(Json(ApiResponse::success(UserInfoResponse {
        username: info.username,
        role: info.role.as_code().to_string(),
        created_at: info.created_at,
        updated_at: info.updated_at,
    })))
}

/// GET /
pub async fn root(session: Session) -> Redirect {
    match session.get::<AuthContext>(SESSION_AUTH_KEY).await {
        Ok(Some(_)) => Redirect::to("/dashboard"),
        _ => Redirect::to("/login"),
    }
}
