use axum::{
    Extension, Form, Json,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::require_manager;
use super::{ApiError, ApiResponse, AppState, ListQuery};
use crate::db::SurveyInput;
use crate::input::{blank_to_none, canonicalize_datetime, display_datetime, parse_score};
use crate::services::AuthContext;

#[derive(Debug, Serialize)]
pub struct SurveyDto {
    pub id: i32,
    pub participant_email: String,
    pub event_name: String,
    /// Canonical stored value
    pub occurrence_start: Option<String>,
    /// Render-time M/DD/YYYY HH:MM formatting of `occurrence_start`
    pub occurrence_start_display: Option<String>,
    pub submitted_at: String,
    pub satisfaction_score: Option<f64>,
    pub usefulness_score: Option<f64>,
    pub instructor_score: Option<f64>,
    pub recommendation_score: Option<f64>,
    pub overall_score: Option<f64>,
    pub nps_bucket: Option<String>,
    pub comments: Option<String>,
}

impl From<crate::db::Survey> for SurveyDto {
    fn from(s: crate::db::Survey) -> Self {
        let occurrence_start_display = s.occurrence_start.as_deref().map(display_datetime);
        Self {
            id: s.id,
            participant_email: s.participant_email,
            event_name: s.event_name,
            occurrence_start: s.occurrence_start,
            occurrence_start_display,
            submitted_at: s.submitted_at,
            satisfaction_score: s.satisfaction_score,
            usefulness_score: s.usefulness_score,
            instructor_score: s.instructor_score,
            recommendation_score: s.recommendation_score,
            overall_score: s.overall_score,
            nps_bucket: s.nps_bucket,
            comments: s.comments,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveSurveyForm {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub participant_email: String,
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub occurrence_start: Option<String>,
    #[serde(default)]
    pub satisfaction_score: Option<String>,
    #[serde(default)]
    pub usefulness_score: Option<String>,
    #[serde(default)]
    pub instructor_score: Option<String>,
    #[serde(default)]
    pub recommendation_score: Option<String>,
    #[serde(default)]
    pub overall_score: Option<String>,
    #[serde(default)]
    pub nps_bucket: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// GET /surveys?search=<term>
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<SurveyDto>>>, ApiError> {
    let rows = state.store().list_surveys(query.search.as_deref()).await?;
    let dtos: Vec<SurveyDto> = rows.into_iter().map(SurveyDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// GET /surveys/edit
pub async fn new_form(
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_manager(&ctx)?;
    Ok(Json(ApiResponse::success(())))
}

/// GET /surveys/edit/{id}
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<SurveyDto>>, ApiError> {
    require_manager(&ctx)?;

    let survey = state
        .store()
        .get_survey(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Survey", id))?;

    Ok(Json(ApiResponse::success(SurveyDto::from(survey))))
}

/// POST /surveys/save — create, or update when `id` is set.
/// Scores left blank store as NULL; the occurrence start is stored
/// canonically and only formatted for display.
pub async fn save(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Form(form): Form<SaveSurveyForm>,
) -> Result<Redirect, ApiError> {
    require_manager(&ctx)?;

    let participant_email = form.participant_email.trim().to_string();
    if participant_email.is_empty() {
        return Err(ApiError::validation("Participant email is required"));
    }

    let event_name = form.event_name.trim().to_string();
    if event_name.is_empty() {
        return Err(ApiError::validation("Event name is required"));
    }

    let occurrence_start = match blank_to_none(form.occurrence_start) {
        Some(raw) => Some(
            canonicalize_datetime(&raw)
                .ok_or_else(|| ApiError::validation("Occurrence start must be a valid date and time"))?,
        ),
        None => None,
    };

    let id = match blank_to_none(form.id) {
        Some(raw) => Some(
            raw.parse::<i32>()
                .map_err(|_| ApiError::validation("Invalid survey id"))?,
        ),
        None => None,
    };

    let input = SurveyInput {
        participant_email,
        event_name,
        occurrence_start,
        satisfaction_score: parse_score(form.satisfaction_score.as_deref()),
        usefulness_score: parse_score(form.usefulness_score.as_deref()),
        instructor_score: parse_score(form.instructor_score.as_deref()),
        recommendation_score: parse_score(form.recommendation_score.as_deref()),
        overall_score: parse_score(form.overall_score.as_deref()),
        nps_bucket: blank_to_none(form.nps_bucket),
        comments: blank_to_none(form.comments),
    };

    state.store().save_survey(id, &input).await?;

    Ok(Redirect::to("/surveys"))
}

/// POST /surveys/delete/{id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> Result<Redirect, ApiError> {
    require_manager(&ctx)?;

    state.store().delete_survey(id).await?;

    Ok(Redirect::to("/surveys"))
}
