// src/handlers/catalog.rs

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
// Payload: CreateAmenity
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAmenityPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
}

pub async fn create_amenity(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateAmenityPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let amenity = app_state
        .catalog_service
        .create_amenity(
            &app_state.db_pool,
            &payload.name,
            payload.description.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(amenity)))
}

pub async fn get_all_amenities(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let amenities = app_state
        .catalog_service
        .get_all_amenities(&app_state.db_pool)
        .await?;
    Ok(Json(amenities))
}

// ---
// Payload: CreateReservationType
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationTypePayload {
    pub amenity_id: Uuid,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(range(min = 0, message = "A taxa não pode ser negativa."))]
    pub fee_amount: i64,

    #[validate(range(min = 0, message = "A caução não pode ser negativa."))]
    pub deposit_amount: i64,

    #[validate(range(min = 1, message = "A duração máxima deve ser maior que zero."))]
    pub max_duration_minutes: i32,

    pub rules: Option<String>,

    #[serde(default = "default_requires_approval")]
    pub requires_approval: bool,
}

fn default_requires_approval() -> bool {
    true
}

pub async fn create_reservation_type(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateReservationTypePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let rtype = app_state
        .catalog_service
        .create_reservation_type(
            &app_state.db_pool,
            payload.amenity_id,
            &payload.name,
            payload.fee_amount,
            payload.deposit_amount,
            payload.max_duration_minutes,
            payload.rules.as_deref(),
            payload.requires_approval,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(rtype)))
}

pub async fn get_types_for_amenity(
    State(app_state): State<AppState>,
    Path(amenity_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let types = app_state
        .catalog_service
        .get_types_for_amenity(&app_state.db_pool, amenity_id)
        .await?;
    Ok(Json(types))
}
