use axum::{
    Extension, Form, Json,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::require_manager;
use super::{ApiError, ApiResponse, AppState, ListQuery};
use crate::db::DonationInput;
use crate::input::{blank_to_none, parse_amount};
use crate::services::AuthContext;

#[derive(Debug, Serialize)]
pub struct DonationDto {
    pub participant_email: String,
    pub donated_on: String,
    pub amount: f64,
}

impl From<crate::db::Donation> for DonationDto {
    fn from(d: crate::db::Donation) -> Self {
        Self {
            participant_email: d.participant_email,
            donated_on: d.donated_on,
            amount: d.amount,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveDonationForm {
    #[serde(default)]
    pub original_email: Option<String>,
    #[serde(default)]
    pub original_date: Option<String>,
    #[serde(default)]
    pub participant_email: String,
    #[serde(default)]
    pub donated_on: String,
    #[serde(default)]
    pub amount: String,
}

/// GET /donations?search=<term>
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<DonationDto>>>, ApiError> {
    let rows = state.store().list_donations(query.search.as_deref()).await?;
    let dtos: Vec<DonationDto> = rows.into_iter().map(DonationDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// GET /donations/edit
pub async fn new_form(
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_manager(&ctx)?;
    Ok(Json(ApiResponse::success(())))
}

/// GET /donations/edit/{email}/{date}
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path((email, date)): Path<(String, String)>,
) -> Result<Json<ApiResponse<DonationDto>>, ApiError> {
    require_manager(&ctx)?;

    let donation = state
        .store()
        .get_donation(&email, &date)
        .await?
        .ok_or_else(|| ApiError::not_found("Donation", format!("{email}/{date}")))?;

    Ok(Json(ApiResponse::success(DonationDto::from(donation))))
}

/// POST /donations/save — the amount field tolerates currency decoration
/// ("$50.00" stores as 50.00); a blank date is rejected rather than stored
/// as an empty string.
pub async fn save(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Form(form): Form<SaveDonationForm>,
) -> Result<Redirect, ApiError> {
    require_manager(&ctx)?;

    let participant_email = form.participant_email.trim().to_string();
    if participant_email.is_empty() {
        return Err(ApiError::validation("Participant email is required"));
    }

    let donated_on = form.donated_on.trim().to_string();
    if donated_on.is_empty() {
        return Err(ApiError::validation("Donation date is required"));
    }

    let amount = parse_amount(&form.amount)
        .ok_or_else(|| ApiError::validation("Donation amount must be a number"))?;

    let input = DonationInput {
        participant_email,
        donated_on,
        amount,
    };

    let original_email = blank_to_none(form.original_email);
    let original_date = blank_to_none(form.original_date);
    let original = original_email
        .as_deref()
        .zip(original_date.as_deref());

    state.store().save_donation(original, &input).await?;

    Ok(Redirect::to("/donations"))
}

/// POST /donations/delete/{email}/{date} — idempotent
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path((email, date)): Path<(String, String)>,
) -> Result<Redirect, ApiError> {
    require_manager(&ctx)?;

    state.store().delete_donation(&email, &date).await?;

    Ok(Redirect::to("/donations"))
}
