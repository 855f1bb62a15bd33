// src/services/charge_service.rs

use sqlx::{Acquire, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ChargeRepository, ReservationRepository},
    models::charge::{Charge, ChargeStatus},
};

/// Razão de cobranças. O pagamento e a eventual confirmação da reserva
/// ("última cobrança paga") acontecem na mesma transação: dois pagamentos
/// concorrentes não deixam a reserva presa em APPROVED_PENDING_PAYMENT.
#[derive(Clone)]
pub struct ChargeService {
    charges: ChargeRepository,
    reservations: ReservationRepository,
}

impl ChargeService {
    pub fn new(charges: ChargeRepository, reservations: ReservationRepository) -> Self {
        Self {
            charges,
            reservations,
        }
    }

    /// Registra o pagamento de uma cobrança pendente. Idempotente no
    /// sentido que importa: a segunda chamada recebe `AlreadyPaid` e nada é
    /// creditado duas vezes.
    pub async fn pay_charge<'e, A>(
        &self,
        acquirer: A,
        charge_id: Uuid,
        payment_method: &str,
        note: Option<&str>,
    ) -> Result<Charge, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut tx = acquirer.begin().await?;

        let paid = self
            .charges
            .mark_paid_if_pending(&mut *tx, charge_id, payment_method, note)
            .await?;

        let charge = match paid {
            Some(charge) => charge,
            // O UPDATE condicional não achou linha pendente: descobre por quê.
            None => {
                let existing = self
                    .charges
                    .get(&mut *tx, charge_id)
                    .await?
                    .ok_or(AppError::ChargeNotFound)?;
                return match existing.status {
                    ChargeStatus::Paid => Err(AppError::AlreadyPaid),
                    ChargeStatus::Void => Err(AppError::ChargeVoided),
                    ChargeStatus::Pending => {
                        // Só alcançável se alguém anulou/pagou entre o UPDATE
                        // e este SELECT; trate como conflito de pagamento.
                        Err(AppError::AlreadyPaid)
                    }
                };
            }
        };

        // Era a última pendente? A checagem roda com a reserva travada, na
        // mesma transação do pagamento.
        if let Some(reservation_id) = charge.reservation_id {
            let reservation = self
                .reservations
                .get_for_update(&mut *tx, reservation_id)
                .await?
                .ok_or(AppError::ReservationNotFound)?;

            let pending = self
                .charges
                .count_pending_for_reservation(&mut *tx, reservation_id)
                .await?;

            // Já CONFIRMED (ou qualquer outro estado): no-op, não erro.
            if let Some(next) = reservation.status.on_charges_settled(pending) {
                self.reservations
                    .set_status(&mut *tx, reservation_id, next)
                    .await?;
                tracing::info!(%reservation_id, "Todas as cobranças pagas, reserva confirmada");
            }
        }

        tx.commit().await?;

        tracing::info!(%charge_id, valor = charge.amount, "Cobrança paga");
        Ok(charge)
    }

    pub async fn list_for_reservation<'e, A>(
        &self,
        acquirer: A,
        reservation_id: Uuid,
    ) -> Result<Vec<Charge>, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut conn = acquirer.acquire().await?;

        self.reservations
            .get(&mut *conn, reservation_id)
            .await?
            .ok_or(AppError::ReservationNotFound)?;

        self.charges
            .get_for_reservation(&mut *conn, reservation_id)
            .await
    }
}
