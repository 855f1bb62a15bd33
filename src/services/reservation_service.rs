// src/services/reservation_service.rs

use chrono::{DateTime, TimeDelta, Utc};
use sqlx::{Acquire, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        CatalogRepository, ChargeRepository, ReservationRepository,
        reservation_repo::NewReservation,
    },
    models::{
        catalog::ReservationType,
        charge::ChargeKind,
        reservation::{Reservation, ReservationStatus, initial_status, windows_overlap},
    },
};

/// Máquina de estados da reserva. Toda operação roda em uma transação; as
/// corridas de agenda são resolvidas pela constraint de exclusão no INSERT,
/// e as transições de status leem a linha com `FOR UPDATE`.
#[derive(Clone)]
pub struct ReservationService {
    reservations: ReservationRepository,
    charges: ChargeRepository,
    catalog: CatalogRepository,
    // Política: reservas criadas pelo administrador devem cobranças
    // normalmente ou são isentas (configurável por ambiente).
    admin_reservations_exempt: bool,
}

impl ReservationService {
    pub fn new(
        reservations: ReservationRepository,
        charges: ChargeRepository,
        catalog: CatalogRepository,
        admin_reservations_exempt: bool,
    ) -> Self {
        Self {
            reservations,
            charges,
            catalog,
            admin_reservations_exempt,
        }
    }

    fn validate_window(
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        rtype: Option<&ReservationType>,
    ) -> Result<(), AppError> {
        if end_at <= start_at {
            return Err(AppError::InvalidInput(
                "O término da reserva deve ser depois do início.".into(),
            ));
        }
        if let Some(rtype) = rtype {
            let max = TimeDelta::minutes(i64::from(rtype.max_duration_minutes));
            if end_at - start_at > max {
                return Err(AppError::InvalidInput(format!(
                    "A duração máxima para '{}' é de {} minutos.",
                    rtype.name, rtype.max_duration_minutes
                )));
            }
        }
        Ok(())
    }

    /// Checagem de disponibilidade antes do INSERT, com o id do conflito no
    /// log. A palavra final continua sendo da constraint de exclusão, que
    /// cobre a corrida entre esta leitura e a escrita.
    async fn ensure_window_free(
        &self,
        conn: &mut sqlx::PgConnection,
        amenity_id: Uuid,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let agenda = self
            .reservations
            .get_agenda(&mut *conn, amenity_id, start_at, end_at)
            .await?;
        if let Some(conflict) = agenda
            .iter()
            .find(|r| windows_overlap(r.start_at, r.end_at, start_at, end_at))
        {
            tracing::warn!(%amenity_id, conflito = %conflict.id, "Janela indisponível");
            return Err(AppError::ScheduleConflict);
        }
        Ok(())
    }

    /// Pedido de reserva de um morador. Congela taxa/caução do tipo no ato;
    /// tipos sem aprovação e sem valores entram direto como CONFIRMED.
    #[allow(clippy::too_many_arguments)]
    pub async fn request<'e, A>(
        &self,
        acquirer: A,
        amenity_id: Uuid,
        reservation_type_id: Uuid,
        resident_id: Uuid,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        form_data: Option<serde_json::Value>,
    ) -> Result<Reservation, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut tx = acquirer.begin().await?;

        let amenity = self
            .catalog
            .get_amenity(&mut *tx, amenity_id)
            .await?
            .ok_or(AppError::AmenityNotFound)?;
        if !amenity.is_active {
            return Err(AppError::InvalidInput(format!(
                "O espaço '{}' está desativado para reservas.",
                amenity.name
            )));
        }

        let rtype = self
            .catalog
            .get_reservation_type(&mut *tx, reservation_type_id)
            .await?
            .ok_or(AppError::ReservationTypeNotFound)?;
        if rtype.amenity_id != amenity_id {
            return Err(AppError::InvalidInput(
                "O tipo de reserva não pertence a este espaço.".into(),
            ));
        }

        Self::validate_window(start_at, end_at, Some(&rtype))?;
        self.ensure_window_free(&mut *tx, amenity_id, start_at, end_at)
            .await?;

        let status = initial_status(
            false,
            rtype.requires_approval,
            rtype.fee_amount,
            rtype.deposit_amount,
        );

        let reservation = self
            .reservations
            .insert(
                &mut *tx,
                &NewReservation {
                    amenity_id,
                    reservation_type_id: Some(reservation_type_id),
                    resident_id: Some(resident_id),
                    start_at,
                    end_at,
                    status,
                    is_system: false,
                    system_reason: None,
                    form_data,
                    fee_amount: rtype.fee_amount,
                    deposit_amount: rtype.deposit_amount,
                },
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            reservation_id = %reservation.id,
            %amenity_id,
            status = %reservation.status,
            "Reserva criada"
        );
        Ok(reservation)
    }

    /// Aprovação do síndico. Sem valores a cobrar a reserva confirma direto;
    /// caso contrário materializa as cobranças e aguarda pagamento.
    pub async fn approve<'e, A>(
        &self,
        acquirer: A,
        reservation_id: Uuid,
    ) -> Result<Reservation, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut tx = acquirer.begin().await?;

        let reservation = self
            .reservations
            .get_for_update(&mut *tx, reservation_id)
            .await?
            .ok_or(AppError::ReservationNotFound)?;

        if reservation.status != ReservationStatus::Requested {
            return Err(AppError::InvalidState {
                action: "aprovar",
                status: reservation.status,
            });
        }

        let next = if reservation.total_owed() == 0 {
            ReservationStatus::Confirmed
        } else {
            if reservation.fee_amount > 0 {
                self.charges
                    .insert(
                        &mut *tx,
                        Some(reservation_id),
                        None,
                        ChargeKind::Fee,
                        reservation.fee_amount,
                        Some("Taxa de uso"),
                        None,
                    )
                    .await?;
            }
            if reservation.deposit_amount > 0 {
                self.charges
                    .insert(
                        &mut *tx,
                        Some(reservation_id),
                        None,
                        ChargeKind::Deposit,
                        reservation.deposit_amount,
                        Some("Caução"),
                        None,
                    )
                    .await?;
            }
            ReservationStatus::ApprovedPendingPayment
        };

        let updated = self
            .reservations
            .set_status(&mut *tx, reservation_id, next)
            .await?;

        tx.commit().await?;

        tracing::info!(%reservation_id, status = %updated.status, "Reserva aprovada");
        Ok(updated)
    }

    pub async fn reject<'e, A>(
        &self,
        acquirer: A,
        reservation_id: Uuid,
    ) -> Result<Reservation, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut tx = acquirer.begin().await?;

        let reservation = self
            .reservations
            .get_for_update(&mut *tx, reservation_id)
            .await?
            .ok_or(AppError::ReservationNotFound)?;

        if reservation.status != ReservationStatus::Requested {
            return Err(AppError::InvalidState {
                action: "rejeitar",
                status: reservation.status,
            });
        }

        let updated = self
            .reservations
            .set_status(&mut *tx, reservation_id, ReservationStatus::Rejected)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Cancela a reserva e anula as cobranças em aberto na mesma transação.
    pub async fn cancel<'e, A>(
        &self,
        acquirer: A,
        reservation_id: Uuid,
    ) -> Result<Reservation, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut tx = acquirer.begin().await?;

        let reservation = self
            .reservations
            .get_for_update(&mut *tx, reservation_id)
            .await?
            .ok_or(AppError::ReservationNotFound)?;

        if !reservation
            .status
            .can_transition_to(ReservationStatus::Cancelled)
        {
            return Err(AppError::InvalidState {
                action: "cancelar",
                status: reservation.status,
            });
        }

        let voided = self
            .charges
            .void_pending_for_reservation(&mut *tx, reservation_id)
            .await?;

        let updated = self
            .reservations
            .set_status(&mut *tx, reservation_id, ReservationStatus::Cancelled)
            .await?;

        tx.commit().await?;

        tracing::info!(%reservation_id, cobrancas_anuladas = voided, "Reserva cancelada");
        Ok(updated)
    }

    /// Varredura periódica: confirmadas com janela encerrada viram
    /// COMPLETED. O gatilho (cron, chamada manual) é externo ao core.
    pub async fn complete_elapsed<'e, A>(
        &self,
        acquirer: A,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut tx = acquirer.begin().await?;
        let swept = self.reservations.complete_elapsed(&mut *tx, now).await?;
        tx.commit().await?;

        if swept > 0 {
            tracing::info!(reservas = swept, "Varredura de reservas encerradas");
        }
        Ok(swept)
    }

    /// Registro de não comparecimento: decisão explícita do administrador,
    /// só depois que a janela terminou.
    pub async fn mark_no_show<'e, A>(
        &self,
        acquirer: A,
        reservation_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Reservation, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut tx = acquirer.begin().await?;

        let reservation = self
            .reservations
            .get_for_update(&mut *tx, reservation_id)
            .await?
            .ok_or(AppError::ReservationNotFound)?;

        if reservation.status != ReservationStatus::Confirmed {
            return Err(AppError::InvalidState {
                action: "registrar não comparecimento",
                status: reservation.status,
            });
        }
        if reservation.end_at > now {
            return Err(AppError::InvalidInput(
                "A janela da reserva ainda não terminou.".into(),
            ));
        }

        let updated = self
            .reservations
            .set_status(&mut *tx, reservation_id, ReservationStatus::NoShow)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Reserva direta do administrador: nasce CONFIRMED, mas continua
    /// sujeita à exclusão de sobreposição. Bloqueios do sistema
    /// (`is_system`) nunca cobram nada; reservas em nome de um morador
    /// cobram conforme a política configurada.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_as_admin<'e, A>(
        &self,
        acquirer: A,
        amenity_id: Uuid,
        reservation_type_id: Option<Uuid>,
        resident_id: Option<Uuid>,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        is_system: bool,
        system_reason: Option<String>,
    ) -> Result<Reservation, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut tx = acquirer.begin().await?;

        self.catalog
            .get_amenity(&mut *tx, amenity_id)
            .await?
            .ok_or(AppError::AmenityNotFound)?;

        let rtype = match reservation_type_id {
            Some(type_id) if !is_system => {
                let rtype = self
                    .catalog
                    .get_reservation_type(&mut *tx, type_id)
                    .await?
                    .ok_or(AppError::ReservationTypeNotFound)?;
                if rtype.amenity_id != amenity_id {
                    return Err(AppError::InvalidInput(
                        "O tipo de reserva não pertence a este espaço.".into(),
                    ));
                }
                Some(rtype)
            }
            _ => None,
        };

        Self::validate_window(start_at, end_at, rtype.as_ref())?;
        self.ensure_window_free(&mut *tx, amenity_id, start_at, end_at)
            .await?;

        let (fee_amount, deposit_amount) = match (&rtype, self.admin_reservations_exempt) {
            (Some(rtype), false) => (rtype.fee_amount, rtype.deposit_amount),
            _ => (0, 0),
        };

        let reservation = self
            .reservations
            .insert(
                &mut *tx,
                &NewReservation {
                    amenity_id,
                    reservation_type_id: rtype.as_ref().map(|t| t.id),
                    resident_id,
                    start_at,
                    end_at,
                    status: ReservationStatus::Confirmed,
                    is_system,
                    system_reason,
                    form_data: None,
                    fee_amount,
                    deposit_amount,
                },
            )
            .await?;

        // Pré-aprovada, mas ainda devendo: as cobranças nascem pendentes.
        if fee_amount > 0 {
            self.charges
                .insert(
                    &mut *tx,
                    Some(reservation.id),
                    None,
                    ChargeKind::Fee,
                    fee_amount,
                    Some("Taxa de uso"),
                    None,
                )
                .await?;
        }
        if deposit_amount > 0 {
            self.charges
                .insert(
                    &mut *tx,
                    Some(reservation.id),
                    None,
                    ChargeKind::Deposit,
                    deposit_amount,
                    Some("Caução"),
                    None,
                )
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            reservation_id = %reservation.id,
            %amenity_id,
            is_system,
            "Reserva administrativa criada"
        );
        Ok(reservation)
    }

    // --- Leituras ---

    pub async fn get<'e, A>(
        &self,
        acquirer: A,
        reservation_id: Uuid,
    ) -> Result<Reservation, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut conn = acquirer.acquire().await?;
        self.reservations
            .get(&mut *conn, reservation_id)
            .await?
            .ok_or(AppError::ReservationNotFound)
    }

    pub async fn agenda<'e, A>(
        &self,
        acquirer: A,
        amenity_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Reservation>, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut conn = acquirer.acquire().await?;
        self.reservations
            .get_agenda(&mut *conn, amenity_id, from, to)
            .await
    }

    pub async fn list_for_resident<'e, A>(
        &self,
        acquirer: A,
        resident_id: Uuid,
    ) -> Result<Vec<Reservation>, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut conn = acquirer.acquire().await?;
        self.reservations
            .get_for_resident(&mut *conn, resident_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn rtype(max_duration_minutes: i32) -> ReservationType {
        ReservationType {
            id: Uuid::new_v4(),
            amenity_id: Uuid::new_v4(),
            name: "Evento".to_string(),
            fee_amount: 10000,
            deposit_amount: 20000,
            max_duration_minutes,
            rules: None,
            requires_approval: true,
            created_at: Utc::now(),
        }
    }

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, h, m, 0).unwrap()
    }

    #[test]
    fn rejects_inverted_or_empty_window() {
        for (start, end) in [(ts(14, 0), ts(10, 0)), (ts(10, 0), ts(10, 0))] {
            let err = ReservationService::validate_window(start, end, None);
            assert!(matches!(err, Err(AppError::InvalidInput(_))));
        }
    }

    #[test]
    fn enforces_max_duration_from_snapshot() {
        let rtype = rtype(240);
        // 4h exatas: no limite
        assert!(ReservationService::validate_window(ts(10, 0), ts(14, 0), Some(&rtype)).is_ok());
        // 4h01: estoura
        let err = ReservationService::validate_window(ts(10, 0), ts(14, 1), Some(&rtype));
        assert!(matches!(err, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn system_blocks_skip_duration_limit() {
        // Bloqueio sem tipo: só a ordenação da janela é exigida
        assert!(ReservationService::validate_window(ts(8, 0), ts(20, 0), None).is_ok());
    }
}
