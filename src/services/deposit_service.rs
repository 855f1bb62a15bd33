// src/services/deposit_service.rs

use chrono::{DateTime, Utc};
use sqlx::{Acquire, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BillingRepository, ChargeRepository, ReservationRepository},
    models::{
        charge::ChargeStatus,
        deposit::{DepositDecision, DepositVerdict, adjudicate},
        reservation::ReservationStatus,
    },
};

/// Adjudicação pós-uso da caução: libera, retém parte ou retém tudo.
/// Exatamente uma decisão por reserva — a garantia é a constraint de
/// unicidade, não uma pré-checagem.
#[derive(Clone)]
pub struct DepositService {
    charges: ChargeRepository,
    reservations: ReservationRepository,
    billing: BillingRepository,
}

impl DepositService {
    pub fn new(
        charges: ChargeRepository,
        reservations: ReservationRepository,
        billing: BillingRepository,
    ) -> Self {
        Self {
            charges,
            reservations,
            billing,
        }
    }

    pub async fn decide<'e, A>(
        &self,
        acquirer: A,
        reservation_id: Uuid,
        verdict: DepositVerdict,
        retained_amount: Option<i64>,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<DepositDecision, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut tx = acquirer.begin().await?;

        let reservation = self
            .reservations
            .get_for_update(&mut *tx, reservation_id)
            .await?
            .ok_or(AppError::ReservationNotFound)?;

        if !matches!(
            reservation.status,
            ReservationStatus::Completed | ReservationStatus::NoShow
        ) {
            return Err(AppError::InvalidState {
                action: "decidir caução",
                status: reservation.status,
            });
        }

        // A cobrança reembolsável da reserva é a caução.
        let deposit = self
            .charges
            .get_for_reservation(&mut *tx, reservation_id)
            .await?
            .into_iter()
            .find(|c| c.kind.is_refundable())
            .ok_or(AppError::DepositChargeMissing)?;
        if deposit.status != ChargeStatus::Paid {
            return Err(AppError::InvalidInput(
                "A caução ainda não foi paga e não pode ser decidida.".into(),
            ));
        }

        let split = adjudicate(verdict, retained_amount, reason, deposit.amount)?;

        let decision = self
            .charges
            .insert_deposit_decision(
                &mut *tx,
                reservation_id,
                verdict,
                split.retained,
                split.refunded,
                reason,
            )
            .await?;

        // A parte retida vira crédito realizado do condomínio e entra na
        // receita do período corrente.
        if split.retained > 0 {
            self.billing
                .insert_payment(
                    &mut *tx,
                    &format!("Retenção de caução — reserva {reservation_id}"),
                    split.retained,
                    "DEPOSIT_RETENTION",
                    &now.format("%Y-%m").to_string(),
                )
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            %reservation_id,
            retido = split.retained,
            devolvido = split.refunded,
            "Caução decidida"
        );
        Ok(decision)
    }

    pub async fn get_decision<'e, A>(
        &self,
        acquirer: A,
        reservation_id: Uuid,
    ) -> Result<Option<DepositDecision>, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut conn = acquirer.acquire().await?;
        self.charges
            .get_deposit_decision(&mut *conn, reservation_id)
            .await
    }
}
