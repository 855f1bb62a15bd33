// src/handlers/billing.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{common::error::AppError, config::AppState};

// ---
// Payload: CloseMonth
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloseMonthPayload {
    /// Período no formato YYYY-MM; sempre explícito, nunca o "mês atual".
    #[validate(length(min = 7, max = 7, message = "O período deve estar no formato YYYY-MM."))]
    pub period: String,
}

// ---
// Handler: close_month
// ---
pub async fn close_month(
    State(app_state): State<AppState>,
    Json(payload): Json<CloseMonthPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    match app_state
        .billing_service
        .close_month(&app_state.db_pool, &payload.period)
        .await?
    {
        Some(statement) => Ok((StatusCode::CREATED, Json(statement)).into_response()),
        // Sem despesa aprovada no período: nada foi gerado.
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

pub async fn list_statements(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let statements = app_state
        .billing_service
        .list_statements(&app_state.db_pool)
        .await?;
    Ok(Json(statements))
}

pub async fn list_debts_for_resident(
    State(app_state): State<AppState>,
    Path(resident_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let debts = app_state
        .billing_service
        .debts_for_resident(&app_state.db_pool, resident_id)
        .await?;
    Ok(Json(debts))
}
