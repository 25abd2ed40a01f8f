use axum::{
    Extension, Form, Json,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::require_manager;
use super::{ApiError, ApiResponse, AppState, ListQuery};
use crate::db::ParticipantInput;
use crate::input::blank_to_none;
use crate::services::AuthContext;

#[derive(Debug, Serialize)]
pub struct ParticipantDto {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl From<crate::db::Participant> for ParticipantDto {
    fn from(p: crate::db::Participant) -> Self {
        Self {
            email: p.email,
            first_name: p.first_name,
            last_name: p.last_name,
            date_of_birth: p.date_of_birth,
            role: p.role,
            phone: p.phone,
            city: p.city,
            state: p.state,
            zip: p.zip,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveParticipantForm {
    #[serde(default)]
    pub original_email: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
}

/// GET /participants?search=<term>
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<ParticipantDto>>>, ApiError> {
    let rows = state
        .store()
        .list_participants(query.search.as_deref())
        .await?;
    let dtos: Vec<ParticipantDto> = rows.into_iter().map(ParticipantDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// GET /participants/edit — blank create form
pub async fn new_form(
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_manager(&ctx)?;
    Ok(Json(ApiResponse::success(())))
}

/// GET /participants/edit/{email} — pre-filled edit form
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<ParticipantDto>>, ApiError> {
    require_manager(&ctx)?;

    let participant = state
        .store()
        .get_participant(&email)
        .await?
        .ok_or_else(|| ApiError::not_found("Participant", &email))?;

    Ok(Json(ApiResponse::success(ParticipantDto::from(participant))))
}

/// POST /participants/save — create, or update when `original_email` is set
pub async fn save(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Form(form): Form<SaveParticipantForm>,
) -> Result<Redirect, ApiError> {
    require_manager(&ctx)?;

    let email = form.email.trim().to_string();
    if email.is_empty() {
        return Err(ApiError::validation("Participant email is required"));
    }

    let input = ParticipantInput {
        email,
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        date_of_birth: blank_to_none(form.date_of_birth),
        role: blank_to_none(form.role),
        phone: blank_to_none(form.phone),
        city: blank_to_none(form.city),
        state: blank_to_none(form.state),
        zip: blank_to_none(form.zip),
    };

    let original = blank_to_none(form.original_email);
    state
        .store()
        .save_participant(original.as_deref(), &input)
        .await?;

    Ok(Redirect::to("/participants"))
}

/// POST /participants/delete/{email} — idempotent
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(email): Path<String>,
) -> Result<Redirect, ApiError> {
    require_manager(&ctx)?;

    state.store().delete_participant(&email).await?;

    Ok(Redirect::to("/participants"))
}
