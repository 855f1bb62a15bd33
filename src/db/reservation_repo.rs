// src/db/reservation_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::is_exclusion_violation, error::AppError},
    models::reservation::{Reservation, ReservationStatus},
};

/// Dados de uma reserva nova, já com os valores do catálogo congelados.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub amenity_id: Uuid,
    pub reservation_type_id: Option<Uuid>,
    pub resident_id: Option<Uuid>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: ReservationStatus,
    pub is_system: bool,
    pub system_reason: Option<String>,
    pub form_data: Option<serde_json::Value>,
    pub fee_amount: i64,
    pub deposit_amount: i64,
}

#[derive(Clone)]
pub struct ReservationRepository;

impl ReservationRepository {
    pub fn new() -> Self {
        Self
    }

    /// Insere a reserva; a constraint de exclusão do banco faz a checagem de
    /// sobreposição no mesmo instante do INSERT. Duas requisições
    /// concorrentes para a mesma janela: uma entra, a outra recebe
    /// `ScheduleConflict`.
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        new: &NewReservation,
    ) -> Result<Reservation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (
                amenity_id, reservation_type_id, resident_id,
                start_at, end_at, status, is_system, system_reason,
                form_data, fee_amount, deposit_amount
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(new.amenity_id)
        .bind(new.reservation_type_id)
        .bind(new.resident_id)
        .bind(new.start_at)
        .bind(new.end_at)
        .bind(new.status)
        .bind(new.is_system)
        .bind(new.system_reason.as_deref())
        .bind(new.form_data.as_ref())
        .bind(new.fee_amount)
        .bind(new.deposit_amount)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if is_exclusion_violation(&e) {
                AppError::ScheduleConflict
            } else {
                AppError::DatabaseError(e)
            }
        })?;

        Ok(reservation)
    }

    pub async fn get<'e, E>(
        &self,
        executor: E,
        reservation_id: Uuid,
    ) -> Result<Option<Reservation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservation =
            sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
                .bind(reservation_id)
                .fetch_optional(executor)
                .await?;

        Ok(reservation)
    }

    /// Busca travando a linha (`FOR UPDATE`): a checagem de status e a
    /// transição que vem depois enxergam um estado que ninguém mais altera
    /// até o commit.
    pub async fn get_for_update<'e, E>(
        &self,
        executor: E,
        reservation_id: Uuid,
    ) -> Result<Option<Reservation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservation =
            sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1 FOR UPDATE")
                .bind(reservation_id)
                .fetch_optional(executor)
                .await?;

        Ok(reservation)
    }

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        reservation_id: Uuid,
        status: ReservationStatus,
    ) -> Result<Reservation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(reservation_id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(reservation)
    }

    /// Varredura: reservas confirmadas cuja janela já terminou viram
    /// COMPLETED. Retorna quantas linhas mudaram.
    pub async fn complete_elapsed<'e, E>(
        &self,
        executor: E,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET status = 'COMPLETED', updated_at = NOW()
            WHERE status = 'CONFIRMED' AND end_at <= $1
            "#,
        )
        .bind(now)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Agenda de um espaço: reservas que ocupam horário dentro da janela
    /// consultada (interseção de intervalos semiabertos).
    pub async fn get_agenda<'e, E>(
        &self,
        executor: E,
        amenity_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Reservation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // O filtro de status é o mesmo da constraint de exclusão.
        let blocking: Vec<ReservationStatus> = ReservationStatus::ALL
            .into_iter()
            .filter(|s| s.blocks_agenda())
            .collect();

        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE amenity_id = $1
              AND status = ANY($2)
              AND start_at < $4 AND end_at > $3
            ORDER BY start_at ASC
            "#,
        )
        .bind(amenity_id)
        .bind(blocking)
        .bind(from)
        .bind(to)
        .fetch_all(executor)
        .await?;

        Ok(reservations)
    }

    pub async fn get_for_resident<'e, E>(
        &self,
        executor: E,
        resident_id: Uuid,
    ) -> Result<Vec<Reservation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE resident_id = $1 ORDER BY start_at DESC",
        )
        .bind(resident_id)
        .fetch_all(executor)
        .await?;

        Ok(reservations)
    }
}
