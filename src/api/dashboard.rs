use axum::{Extension, Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use super::auth::UserDto;
use super::{ApiError, ApiResponse, AppState};
use crate::services::AuthContext;

#[derive(Debug, Serialize)]
pub struct DashboardDto {
    pub user: UserDto,
    pub counts: CountsDto,
}

#[derive(Debug, Serialize)]
pub struct CountsDto {
    pub participants: u64,
    pub event_templates: u64,
    pub event_occurrences: u64,
    pub surveys: u64,
    pub milestones: u64,
    pub donations: u64,
}

/// GET /dashboard — authenticated landing page with per-entity totals
pub async fn show(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<DashboardDto>>, ApiError> {
    let counts = state.store().dashboard_counts().await?;

    Ok(Json(ApiResponse::success(DashboardDto {
        user: UserDto::from(&ctx),
        counts: CountsDto {
            participants: counts.participants,
            event_templates: counts.event_templates,
            event_occurrences: counts.event_occurrences,
            surveys: counts.surveys,
            milestones: counts.milestones,
            donations: counts.donations,
        },
    })))
}
