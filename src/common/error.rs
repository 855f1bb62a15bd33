use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::models::reservation::ReservationStatus;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia. Resultados de
// negócio (conflito de agenda, cobrança já paga...) voltam para o chamador
// como são; falhas de armazenamento viram 500 genérico e vão para o log.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Entrada inválida: {0}")]
    InvalidInput(String),

    #[error("Conflito de horário para o espaço")]
    ScheduleConflict,

    #[error("A cobrança já foi paga")]
    AlreadyPaid,

    #[error("A caução desta reserva já foi decidida")]
    AlreadyDecided,

    #[error("O período já foi fechado")]
    PeriodAlreadyClosed,

    #[error("A operação '{action}' não é permitida no status {status}")]
    InvalidState {
        action: &'static str,
        status: ReservationStatus,
    },

    #[error("Espaço não encontrado")]
    AmenityNotFound,

    #[error("Tipo de reserva não encontrado")]
    ReservationTypeNotFound,

    #[error("Reserva não encontrada")]
    ReservationNotFound,

    #[error("Cobrança não encontrada")]
    ChargeNotFound,

    #[error("A caução desta reserva ainda não foi decidida")]
    DepositDecisionNotFound,

    #[error("A cobrança foi anulada e não pode ser paga")]
    ChargeVoided,

    #[error("A reserva não possui caução a decidir")]
    DepositChargeMissing,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidInput(msg) => {
                let body = Json(json!({ "error": msg }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::ScheduleConflict => (
                StatusCode::CONFLICT,
                "Já existe uma reserva para este espaço no horário escolhido.".to_string(),
            ),
            AppError::AlreadyPaid => (
                StatusCode::CONFLICT,
                "Esta cobrança já foi paga.".to_string(),
            ),
            AppError::AlreadyDecided => (
                StatusCode::CONFLICT,
                "A caução desta reserva já foi decidida.".to_string(),
            ),
            AppError::PeriodAlreadyClosed => (
                StatusCode::CONFLICT,
                "Este período já foi fechado.".to_string(),
            ),

            AppError::InvalidState { action, status } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("A operação '{action}' não é permitida no status {status}."),
            ),
            AppError::ChargeVoided => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "A cobrança foi anulada e não pode ser paga.".to_string(),
            ),
            AppError::DepositChargeMissing => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "A reserva não possui caução a decidir.".to_string(),
            ),

            AppError::AmenityNotFound => (
                StatusCode::NOT_FOUND,
                "Espaço não encontrado.".to_string(),
            ),
            AppError::ReservationTypeNotFound => (
                StatusCode::NOT_FOUND,
                "Tipo de reserva não encontrado.".to_string(),
            ),
            AppError::ReservationNotFound => (
                StatusCode::NOT_FOUND,
                "Reserva não encontrada.".to_string(),
            ),
            AppError::ChargeNotFound => (
                StatusCode::NOT_FOUND,
                "Cobrança não encontrada.".to_string(),
            ),
            AppError::DepositDecisionNotFound => (
                StatusCode::NOT_FOUND,
                "A caução desta reserva ainda não foi decidida.".to_string(),
            ),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado. Contate a administração.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
