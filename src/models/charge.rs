// src/models/charge.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "charge_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargeKind {
    Fee,     // Taxa de uso
    Deposit, // Caução (reembolsável conforme decisão pós-uso)
    Fine,    // Multa por incidente
}

impl ChargeKind {
    /// Só a caução volta para o morador; taxa e multa são receita direta.
    pub fn is_refundable(self) -> bool {
        matches!(self, Self::Deposit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "charge_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargeStatus {
    Pending,
    Paid,
    Void, // Cobrança anulada junto com a reserva cancelada; fica para auditoria
}

/// Uma obrigação monetária ligada a uma reserva ou a um período de cobrança.
/// O valor é imutável depois de criado; só o status e os metadados de
/// pagamento mudam.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Charge {
    pub id: Uuid,
    pub reservation_id: Option<Uuid>,
    #[schema(example = "2025-06")]
    pub period: Option<String>,
    pub kind: ChargeKind,
    #[schema(example = 10000)]
    pub amount: i64,
    pub status: ChargeStatus,
    pub description: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_deposit_is_refundable() {
        assert!(ChargeKind::Deposit.is_refundable());
        assert!(!ChargeKind::Fee.is_refundable());
        assert!(!ChargeKind::Fine.is_refundable());
    }
}
