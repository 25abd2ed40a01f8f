use axum::{
    Extension, Form, Json,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::require_manager;
use super::{ApiError, ApiResponse, AppState, ListQuery};
use crate::db::{EventOccurrenceInput, EventTemplateInput};
use crate::input::{blank_to_none, canonicalize_datetime, display_datetime, parse_optional_int};
use crate::services::AuthContext;

// ============================================================================
// Templates
// ============================================================================

#[derive(Debug, Serialize)]
pub struct EventTemplateDto {
    pub name: String,
    pub event_type: Option<String>,
    pub description: Option<String>,
    pub recurrence: Option<String>,
    pub default_capacity: Option<i32>,
}

impl From<crate::db::EventTemplate> for EventTemplateDto {
    fn from(t: crate::db::EventTemplate) -> Self {
        Self {
            name: t.name,
            event_type: t.event_type,
            description: t.description,
            recurrence: t.recurrence,
            default_capacity: t.default_capacity,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveTemplateForm {
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub recurrence: Option<String>,
    #[serde(default)]
    pub default_capacity: Option<String>,
}

/// GET /events?search=<term>
pub async fn list_templates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<EventTemplateDto>>>, ApiError> {
    let rows = state
        .store()
        .list_event_templates(query.search.as_deref())
        .await?;
    let dtos: Vec<EventTemplateDto> = rows.into_iter().map(EventTemplateDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// GET /events/edit
pub async fn new_template_form(
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_manager(&ctx)?;
    Ok(Json(ApiResponse::success(())))
}

/// GET /events/edit/{name}
pub async fn edit_template_form(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<EventTemplateDto>>, ApiError> {
    require_manager(&ctx)?;

    let template = state
        .store()
        .get_event_template(&name)
        .await?
        .ok_or_else(|| ApiError::not_found("Event template", &name))?;

    Ok(Json(ApiResponse::success(EventTemplateDto::from(template))))
}

/// POST /events/save
pub async fn save_template(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Form(form): Form<SaveTemplateForm>,
) -> Result<Redirect, ApiError> {
    require_manager(&ctx)?;

    let name = form.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::validation("Event name is required"));
    }

    let default_capacity = parse_optional_int(form.default_capacity.as_deref())
        .map_err(|e| ApiError::validation(format!("Default capacity is {e}")))?;

    let input = EventTemplateInput {
        name,
        event_type: blank_to_none(form.event_type),
        description: blank_to_none(form.description),
        recurrence: blank_to_none(form.recurrence),
        default_capacity,
    };

    let original = blank_to_none(form.original_name);
    state
        .store()
        .save_event_template(original.as_deref(), &input)
        .await?;

    Ok(Redirect::to("/events"))
}

/// POST /events/delete/{name} — occurrences of the template are untouched
pub async fn delete_template(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(name): Path<String>,
) -> Result<Redirect, ApiError> {
    require_manager(&ctx)?;

    state.store().delete_event_template(&name).await?;

    Ok(Redirect::to("/events"))
}

// ============================================================================
// Occurrences
// ============================================================================

#[derive(Debug, Serialize)]
pub struct EventOccurrenceDto {
    pub id: i32,
    pub template_name: String,
    pub starts_at: String,
    pub starts_at_display: String,
    pub ends_at: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub registration_deadline: Option<String>,
}

impl From<crate::db::EventOccurrence> for EventOccurrenceDto {
    fn from(o: crate::db::EventOccurrence) -> Self {
        let starts_at_display = display_datetime(&o.starts_at);
        Self {
            id: o.id,
            template_name: o.template_name,
            starts_at: o.starts_at,
            starts_at_display,
            ends_at: o.ends_at,
            location: o.location,
            capacity: o.capacity,
            registration_deadline: o.registration_deadline,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveOccurrenceForm {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub template_name: String,
    #[serde(default)]
    pub starts_at: String,
    #[serde(default)]
    pub ends_at: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub capacity: Option<String>,
    #[serde(default)]
    pub registration_deadline: Option<String>,
}

/// GET /events/occurrences?search=<term>
pub async fn list_occurrences(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<EventOccurrenceDto>>>, ApiError> {
    let rows = state
        .store()
        .list_event_occurrences(query.search.as_deref())
        .await?;
    let dtos: Vec<EventOccurrenceDto> = rows.into_iter().map(EventOccurrenceDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// GET /events/occurrences/edit
pub async fn new_occurrence_form(
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_manager(&ctx)?;
    Ok(Json(ApiResponse::success(())))
}

/// GET /events/occurrences/edit/{id}
pub async fn edit_occurrence_form(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<EventOccurrenceDto>>, ApiError> {
    require_manager(&ctx)?;

    let occurrence = state
        .store()
        .get_event_occurrence(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Event occurrence", id))?;

    Ok(Json(ApiResponse::success(EventOccurrenceDto::from(
        occurrence,
    ))))
}

/// POST /events/occurrences/save
pub async fn save_occurrence(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Form(form): Form<SaveOccurrenceForm>,
) -> Result<Redirect, ApiError> {
    require_manager(&ctx)?;

    let template_name = form.template_name.trim().to_string();
    if template_name.is_empty() {
        return Err(ApiError::validation("Event template name is required"));
    }
    if !state.store().event_template_exists(&template_name).await? {
        return Err(ApiError::not_found("Event template", &template_name));
    }

    let starts_at = canonicalize_datetime(&form.starts_at)
        .ok_or_else(|| ApiError::validation("Start time must be a valid date and time"))?;

    let ends_at = match blank_to_none(form.ends_at) {
        Some(raw) => Some(
            canonicalize_datetime(&raw)
                .ok_or_else(|| ApiError::validation("End time must be a valid date and time"))?,
        ),
        None => None,
    };

    let registration_deadline = match blank_to_none(form.registration_deadline) {
        Some(raw) => Some(canonicalize_datetime(&raw).ok_or_else(|| {
            ApiError::validation("Registration deadline must be a valid date and time")
        })?),
        None => None,
    };

    let capacity = parse_optional_int(form.capacity.as_deref())
        .map_err(|e| ApiError::validation(format!("Capacity is {e}")))?;

    let id = match blank_to_none(form.id) {
        Some(raw) => Some(
            raw.parse::<i32>()
                .map_err(|_| ApiError::validation("Invalid occurrence id"))?,
        ),
        None => None,
    };

    let input = EventOccurrenceInput {
        template_name,
        starts_at,
        ends_at,
        location: blank_to_none(form.location),
        capacity,
        registration_deadline,
    };

    state.store().save_event_occurrence(id, &input).await?;

    Ok(Redirect::to("/events/occurrences"))
}

/// POST /events/occurrences/delete/{id}
pub async fn delete_occurrence(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> Result<Redirect, ApiError> {
    require_manager(&ctx)?;

    state.store().delete_event_occurrence(id).await?;

    Ok(Redirect::to("/events/occurrences"))
}
