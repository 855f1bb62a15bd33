// src/handlers/reservations.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{common::error::AppError, config::AppState};

// ---
// Payload: RequestReservation
// ---
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestReservationPayload {
    pub amenity_id: Uuid,
    pub reservation_type_id: Uuid,
    pub resident_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    // Dados livres do formulário do tipo de reserva (lista de convidados...)
    pub form_data: Option<serde_json::Value>,
}

// ---
// Handler: request_reservation
// ---
pub async fn request_reservation(
    State(app_state): State<AppState>,
    Json(payload): Json<RequestReservationPayload>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = app_state
        .reservation_service
        .request(
            &app_state.db_pool,
            payload.amenity_id,
            payload.reservation_type_id,
            payload.resident_id,
            payload.start_at,
            payload.end_at,
            payload.form_data,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

// ---
// Payload: AdminReservation (reserva direta ou bloqueio do sistema)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminReservationPayload {
    pub amenity_id: Uuid,
    pub reservation_type_id: Option<Uuid>,
    pub resident_id: Option<Uuid>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[serde(default)]
    pub is_system: bool,
    #[validate(length(min = 1, message = "O motivo do bloqueio não pode ser vazio."))]
    pub system_reason: Option<String>,
}

pub async fn create_reservation_as_admin(
    State(app_state): State<AppState>,
    Json(payload): Json<AdminReservationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let reservation = app_state
        .reservation_service
        .create_as_admin(
            &app_state.db_pool,
            payload.amenity_id,
            payload.reservation_type_id,
            payload.resident_id,
            payload.start_at,
            payload.end_at,
            payload.is_system,
            payload.system_reason,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

// ---
// Handlers: transições da máquina de estados
// ---
pub async fn approve_reservation(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = app_state
        .reservation_service
        .approve(&app_state.db_pool, id)
        .await?;
    Ok(Json(reservation))
}

pub async fn reject_reservation(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = app_state
        .reservation_service
        .reject(&app_state.db_pool, id)
        .await?;
    Ok(Json(reservation))
}

pub async fn cancel_reservation(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = app_state
        .reservation_service
        .cancel(&app_state.db_pool, id)
        .await?;
    Ok(Json(reservation))
}

pub async fn mark_no_show(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = app_state
        .reservation_service
        .mark_no_show(&app_state.db_pool, id, Utc::now())
        .await?;
    Ok(Json(reservation))
}

/// Gatilho da varredura de reservas encerradas (chamado por um cron
/// externo ou manualmente pelo administrador).
pub async fn sweep_completed(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let swept = app_state
        .reservation_service
        .complete_elapsed(&app_state.db_pool, Utc::now())
        .await?;
    Ok(Json(serde_json::json!({ "completed": swept })))
}

// ---
// Leituras
// ---
pub async fn get_reservation(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = app_state
        .reservation_service
        .get(&app_state.db_pool, id)
        .await?;
    Ok(Json(reservation))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaQuery {
    pub amenity_id: Uuid,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Agenda de um espaço: reservas ativas que cruzam a janela consultada.
pub async fn get_agenda(
    State(app_state): State<AppState>,
    Query(query): Query<AgendaQuery>,
) -> Result<impl IntoResponse, AppError> {
    let reservations = app_state
        .reservation_service
        .agenda(&app_state.db_pool, query.amenity_id, query.from, query.to)
        .await?;
    Ok(Json(reservations))
}

/// Histórico de reservas de um morador, mais recentes primeiro.
pub async fn list_reservations_for_resident(
    State(app_state): State<AppState>,
    Path(resident_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let reservations = app_state
        .reservation_service
        .list_for_resident(&app_state.db_pool, resident_id)
        .await?;
    Ok(Json(reservations))
}

// ---
// Payload/Handler: incidente com multa
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportIncidentPayload {
    #[validate(length(min = 1, message = "A descrição do incidente é obrigatória."))]
    pub description: String,

    #[validate(range(min = 1, message = "O valor da multa deve ser maior que zero."))]
    pub amount: i64,

    pub evidence_url: Option<String>,
}

/// Registra um incidente e emite a multa correspondente. Reservas que
/// nunca saíram do pedido (REQUESTED) ou foram negadas (REJECTED) nunca
/// ocuparam o espaço e respondem 422.
pub async fn report_incident(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReportIncidentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let fine = app_state
        .incident_service
        .report_incident(
            &app_state.db_pool,
            id,
            &payload.description,
            payload.amount,
            payload.evidence_url.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(fine)))
}

// ---
// Payload/Handler: decisão da caução
// ---
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecideDepositPayload {
    pub verdict: crate::models::deposit::DepositVerdict,
    pub retained_amount: Option<i64>,
    pub reason: Option<String>,
}

pub async fn decide_deposit(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DecideDepositPayload>,
) -> Result<impl IntoResponse, AppError> {
    let decision = app_state
        .deposit_service
        .decide(
            &app_state.db_pool,
            id,
            payload.verdict,
            payload.retained_amount,
            payload.reason.as_deref(),
            Utc::now(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(decision)))
}

pub async fn get_deposit_decision(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let decision = app_state
        .deposit_service
        .get_decision(&app_state.db_pool, id)
        .await?
        .ok_or(AppError::DepositDecisionNotFound)?;
    Ok(Json(decision))
}
