// src/handlers/charges.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{common::error::AppError, config::AppState};

// ---
// Payload: PayCharge
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayChargePayload {
    #[validate(length(min = 1, message = "O método de pagamento é obrigatório."))]
    pub payment_method: String,
    pub note: Option<String>,
}

// ---
// Handler: pay_charge
// ---
pub async fn pay_charge(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PayChargePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let charge = app_state
        .charge_service
        .pay_charge(
            &app_state.db_pool,
            id,
            &payload.payment_method,
            payload.note.as_deref(),
        )
        .await?;

    Ok(Json(charge))
}

// ---
// Handler: cobranças de uma reserva
// ---
pub async fn list_charges_for_reservation(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let charges = app_state
        .charge_service
        .list_for_reservation(&app_state.db_pool, id)
        .await?;

    Ok(Json(charges))
}
