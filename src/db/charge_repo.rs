// src/db/charge_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::is_unique_violation, error::AppError},
    models::{
        charge::{Charge, ChargeKind},
        deposit::{DepositDecision, DepositVerdict},
    },
};

#[derive(Clone)]
pub struct ChargeRepository;

impl ChargeRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  COBRANÇAS
    // =========================================================================

    #[allow(clippy::too_many_arguments)]
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        reservation_id: Option<Uuid>,
        period: Option<&str>,
        kind: ChargeKind,
        amount: i64,
        description: Option<&str>,
        note: Option<&str>,
    ) -> Result<Charge, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let charge = sqlx::query_as::<_, Charge>(
            r#"
            INSERT INTO charges (reservation_id, period, kind, amount, description, note)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(reservation_id)
        .bind(period)
        .bind(kind)
        .bind(amount)
        .bind(description)
        .bind(note)
        .fetch_one(executor)
        .await?;

        Ok(charge)
    }

    pub async fn get<'e, E>(
        &self,
        executor: E,
        charge_id: Uuid,
    ) -> Result<Option<Charge>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let charge = sqlx::query_as::<_, Charge>("SELECT * FROM charges WHERE id = $1")
            .bind(charge_id)
            .fetch_optional(executor)
            .await?;

        Ok(charge)
    }

    /// Marca como paga SOMENTE se ainda estiver pendente — o WHERE condicional
    /// é a trava de idempotência: um segundo pagamento concorrente não acha
    /// linha para atualizar e não credita duas vezes.
    pub async fn mark_paid_if_pending<'e, E>(
        &self,
        executor: E,
        charge_id: Uuid,
        payment_method: &str,
        note: Option<&str>,
    ) -> Result<Option<Charge>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let charge = sqlx::query_as::<_, Charge>(
            r#"
            UPDATE charges
            SET status = 'PAID', paid_at = NOW(), payment_method = $2, note = $3
            WHERE id = $1 AND status = 'PENDING'
            RETURNING *
            "#,
        )
        .bind(charge_id)
        .bind(payment_method)
        .bind(note)
        .fetch_optional(executor)
        .await?;

        Ok(charge)
    }

    pub async fn count_pending_for_reservation<'e, E>(
        &self,
        executor: E,
        reservation_id: Uuid,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM charges WHERE reservation_id = $1 AND status = 'PENDING'",
        )
        .bind(reservation_id)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    /// Cancelamento da reserva: cobranças em aberto viram VOID (nunca são
    /// apagadas, ficam para auditoria).
    pub async fn void_pending_for_reservation<'e, E>(
        &self,
        executor: E,
        reservation_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE charges SET status = 'VOID' WHERE reservation_id = $1 AND status = 'PENDING'",
        )
        .bind(reservation_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn get_for_reservation<'e, E>(
        &self,
        executor: E,
        reservation_id: Uuid,
    ) -> Result<Vec<Charge>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let charges = sqlx::query_as::<_, Charge>(
            "SELECT * FROM charges WHERE reservation_id = $1 ORDER BY created_at ASC",
        )
        .bind(reservation_id)
        .fetch_all(executor)
        .await?;

        Ok(charges)
    }

    // =========================================================================
    //  DECISÕES DE CAUÇÃO
    // =========================================================================

    /// Registra a decisão. A unicidade por reserva é da constraint
    /// `deposit_decisions_reservation_id_key`: a segunda decisão, mesmo
    /// concorrente, recebe `AlreadyDecided`.
    pub async fn insert_deposit_decision<'e, E>(
        &self,
        executor: E,
        reservation_id: Uuid,
        verdict: DepositVerdict,
        retained_amount: i64,
        refunded_amount: i64,
        reason: Option<&str>,
    ) -> Result<DepositDecision, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let decision = sqlx::query_as::<_, DepositDecision>(
            r#"
            INSERT INTO deposit_decisions (
                reservation_id, verdict, retained_amount, refunded_amount, reason
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(reservation_id)
        .bind(verdict)
        .bind(retained_amount)
        .bind(refunded_amount)
        .bind(reason)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "deposit_decisions_reservation_id_key") {
                AppError::AlreadyDecided
            } else {
                AppError::DatabaseError(e)
            }
        })?;

        Ok(decision)
    }

    pub async fn get_deposit_decision<'e, E>(
        &self,
        executor: E,
        reservation_id: Uuid,
    ) -> Result<Option<DepositDecision>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let decision = sqlx::query_as::<_, DepositDecision>(
            "SELECT * FROM deposit_decisions WHERE reservation_id = $1",
        )
        .bind(reservation_id)
        .fetch_optional(executor)
        .await?;

        Ok(decision)
    }
}
