use axum::{
    Extension, Form, Json,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::require_manager;
use super::{ApiError, ApiResponse, AppState, ListQuery};
use crate::db::MilestoneInput;
use crate::input::blank_to_none;
use crate::services::AuthContext;

#[derive(Debug, Serialize)]
pub struct MilestoneDto {
    pub participant_email: String,
    pub achieved_on: String,
    pub title: String,
}

impl From<crate::db::Milestone> for MilestoneDto {
    fn from(m: crate::db::Milestone) -> Self {
        Self {
            participant_email: m.participant_email,
            achieved_on: m.achieved_on,
            title: m.title,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveMilestoneForm {
    #[serde(default)]
    pub original_email: Option<String>,
    #[serde(default)]
    pub original_date: Option<String>,
    #[serde(default)]
    pub participant_email: String,
    #[serde(default)]
    pub achieved_on: String,
    #[serde(default)]
    pub title: String,
}

/// GET /milestones?search=<term>
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<MilestoneDto>>>, ApiError> {
    let rows = state
        .store()
        .list_milestones(query.search.as_deref())
        .await?;
    let dtos: Vec<MilestoneDto> = rows.into_iter().map(MilestoneDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// GET /milestones/edit
pub async fn new_form(
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_manager(&ctx)?;
    Ok(Json(ApiResponse::success(())))
}

/// GET /milestones/edit/{email}/{date}
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path((email, date)): Path<(String, String)>,
) -> Result<Json<ApiResponse<MilestoneDto>>, ApiError> {
    require_manager(&ctx)?;

    let milestone = state
        .store()
        .get_milestone(&email, &date)
        .await?
        .ok_or_else(|| ApiError::not_found("Milestone", format!("{email}/{date}")))?;

    Ok(Json(ApiResponse::success(MilestoneDto::from(milestone))))
}

/// POST /milestones/save — the (email, date) key pair may change under
/// edit; the original pair locates the row.
pub async fn save(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Form(form): Form<SaveMilestoneForm>,
) -> Result<Redirect, ApiError> {
    require_manager(&ctx)?;

    let participant_email = form.participant_email.trim().to_string();
    if participant_email.is_empty() {
        return Err(ApiError::validation("Participant email is required"));
    }

    let achieved_on = form.achieved_on.trim().to_string();
    if achieved_on.is_empty() {
        return Err(ApiError::validation("Milestone date is required"));
    }

    let input = MilestoneInput {
        participant_email,
        achieved_on,
        title: form.title.trim().to_string(),
    };

    let original_email = blank_to_none(form.original_email);
    let original_date = blank_to_none(form.original_date);
    let original = original_email
        .as_deref()
        .zip(original_date.as_deref());

    state.store().save_milestone(original, &input).await?;

    Ok(Redirect::to("/milestones"))
}

/// POST /milestones/delete/{email}/{date} — idempotent
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path((email, date)): Path<(String, String)>,
) -> Result<Redirect, ApiError> {
    require_manager(&ctx)?;

    state.store().delete_milestone(&email, &date).await?;

    Ok(Redirect::to("/milestones"))
}
