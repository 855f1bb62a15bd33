// src/services/incident_service.rs

use sqlx::{Acquire, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ChargeRepository, ReservationRepository},
    models::charge::{Charge, ChargeKind},
};

/// Registro de incidentes (danos, avarias) e emissão da multa
/// correspondente. Independente da caução: cada incidente gera uma multa
/// própria e uma reserva pode acumular várias.
#[derive(Clone)]
pub struct IncidentService {
    charges: ChargeRepository,
    reservations: ReservationRepository,
}

impl IncidentService {
    pub fn new(charges: ChargeRepository, reservations: ReservationRepository) -> Self {
        Self {
            charges,
            reservations,
        }
    }

    pub async fn report_incident<'e, A>(
        &self,
        acquirer: A,
        reservation_id: Uuid,
        description: &str,
        amount: i64,
        evidence_url: Option<&str>,
    ) -> Result<Charge, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        if description.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "A descrição do incidente é obrigatória.".into(),
            ));
        }
        if amount <= 0 {
            return Err(AppError::InvalidInput(
                "O valor da multa deve ser maior que zero.".into(),
            ));
        }

        let mut tx = acquirer.begin().await?;

        let reservation = self
            .reservations
            .get(&mut *tx, reservation_id)
            .await?
            .ok_or(AppError::ReservationNotFound)?;

        if !reservation.status.incident_eligible() {
            return Err(AppError::InvalidState {
                action: "registrar incidente",
                status: reservation.status,
            });
        }

        let note = evidence_url.map(|url| format!("Evidência: {url}"));
        let fine = self
            .charges
            .insert(
                &mut *tx,
                Some(reservation_id),
                None,
                ChargeKind::Fine,
                amount,
                Some(description),
                note.as_deref(),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(%reservation_id, multa = amount, "Incidente registrado");
        Ok(fine)
    }
}
