// src/models/catalog.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Um espaço comum reservável (salão de festas, churrasqueira...).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Amenity {
    pub id: Uuid,
    #[schema(example = "Salão de Festas")]
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Perfil de reserva de um espaço: valores, duração máxima e política de
/// aprovação. Editável pelo administrador; as reservas congelam os valores
/// no momento da criação, então edições não alteram dívidas existentes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationType {
    pub id: Uuid,
    pub amenity_id: Uuid,
    #[schema(example = "Evento com convidados")]
    pub name: String,
    #[schema(example = 10000)]
    pub fee_amount: i64,
    #[schema(example = 20000)]
    pub deposit_amount: i64,
    #[schema(example = 240)]
    pub max_duration_minutes: i32,
    pub rules: Option<String>,
    pub requires_approval: bool,
    pub created_at: DateTime<Utc>,
}
