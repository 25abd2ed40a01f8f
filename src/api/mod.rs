use axum::{
    Router,
    http::{HeaderValue, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use time;

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, SeaOrmAuthService};

pub mod auth;
mod dashboard;
mod donations;
mod error;
mod events;
mod milestones;
mod participants;
mod surveys;
mod types;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub fn auth(&self) -> &Arc<dyn AuthService> {
        &self.auth_service
    }
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;

    let auth_service: Arc<dyn AuthService> = Arc::new(SeaOrmAuthService::new(store.clone()));

    Ok(Arc::new(AppState {
        config: Arc::new(RwLock::new(config)),
        store,
        auth_service,
    }))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (cors_origins, secure_cookies, session_timeout_minutes) = {
        let config = state.config().read().await;
        (
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
            config.server.session_timeout_minutes,
        )
    };

    let protected_routes = create_protected_router();

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            session_timeout_minutes,
        )));

    let app = Router::new()
        .merge(protected_routes)
        .route("/", get(auth::root))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/tea", get(teapot))
        .layer(session_layer)
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    app.layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard::show))
        .route("/me", get(auth::current_user))
        .route("/participants", get(participants::list))
        .route("/participants/edit", get(participants::new_form))
        .route("/participants/edit/{email}", get(participants::edit_form))
        .route("/participants/save", post(participants::save))
        .route("/participants/delete/{email}", post(participants::delete))
        .route("/events", get(events::list_templates))
        .route("/events/edit", get(events::new_template_form))
        .route("/events/edit/{name}", get(events::edit_template_form))
        .route("/events/save", post(events::save_template))
        .route("/events/delete/{name}", post(events::delete_template))
        .route("/events/occurrences", get(events::list_occurrences))
        .route("/events/occurrences/edit", get(events::new_occurrence_form))
        .route(
            "/events/occurrences/edit/{id}",
            get(events::edit_occurrence_form),
        )
        .route("/events/occurrences/save", post(events::save_occurrence))
        .route(
            "/events/occurrences/delete/{id}",
            post(events::delete_occurrence),
        )
        .route("/surveys", get(surveys::list))
        .route("/surveys/edit", get(surveys::new_form))
        .route("/surveys/edit/{id}", get(surveys::edit_form))
        .route("/surveys/save", post(surveys::save))
        .route("/surveys/delete/{id}", post(surveys::delete))
        .route("/milestones", get(milestones::list))
        .route("/milestones/edit", get(milestones::new_form))
        .route("/milestones/edit/{email}/{date}", get(milestones::edit_form))
        .route("/milestones/save", post(milestones::save))
        .route(
            "/milestones/delete/{email}/{date}",
            post(milestones::delete),
        )
        .route("/donations", get(donations::list))
        .route("/donations/edit", get(donations::new_form))
        .route("/donations/edit/{email}/{date}", get(donations::edit_form))
        .route("/donations/save", post(donations::save))
        .route("/donations/delete/{email}/{date}", post(donations::delete))
        .route_layer(middleware::from_fn(auth::require_login))
}

async fn teapot() -> impl IntoResponse {
    (StatusCode::IM_A_TEAPOT, "I'm a teapot")
}
