// src/models/reservation.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "reservation_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Requested,              // Aguardando aprovação do síndico
    ApprovedPendingPayment, // Aprovada, cobranças em aberto
    Confirmed,              // Paga (ou isenta): bloqueia a agenda
    Rejected,
    Cancelled,
    Completed,
    NoShow,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 7] = [
        Self::Requested,
        Self::ApprovedPendingPayment,
        Self::Confirmed,
        Self::Rejected,
        Self::Cancelled,
        Self::Completed,
        Self::NoShow,
    ];

    /// Estados finais: a reserva não muda mais de status.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Rejected | Self::Cancelled | Self::Completed | Self::NoShow
        )
    }

    /// Estados que ocupam a agenda do espaço (participam da exclusão de
    /// sobreposição no banco).
    pub fn blocks_agenda(self) -> bool {
        matches!(
            self,
            Self::Requested | Self::ApprovedPendingPayment | Self::Confirmed
        )
    }

    /// Tabela de transições da máquina de estados.
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Requested, Confirmed)
                | (Requested, ApprovedPendingPayment)
                | (Requested, Rejected)
                | (Requested, Cancelled)
                | (ApprovedPendingPayment, Confirmed)
                | (ApprovedPendingPayment, Cancelled)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
                | (Confirmed, NoShow)
        )
    }

    /// Transição disparada pela quitação de cobranças: a reserva confirma
    /// quando não resta nenhuma pendente e ela ainda aguardava pagamento.
    /// Qualquer outro caso (inclusive já CONFIRMED) é no-op.
    pub fn on_charges_settled(self, pending_count: i64) -> Option<ReservationStatus> {
        if pending_count == 0 && self == Self::ApprovedPendingPayment {
            Some(Self::Confirmed)
        } else {
            None
        }
    }

    /// Incidente pressupõe uso do espaço: reservas que nunca saíram do
    /// pedido (ou foram negadas) não multam ninguém.
    pub fn incident_eligible(self) -> bool {
        !matches!(self, Self::Requested | Self::Rejected)
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Requested => "REQUESTED",
            Self::ApprovedPendingPayment => "APPROVED_PENDING_PAYMENT",
            Self::Confirmed => "CONFIRMED",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
            Self::NoShow => "NO_SHOW",
        };
        f.write_str(s)
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    pub amenity_id: Uuid,
    pub reservation_type_id: Option<Uuid>,
    pub resident_id: Option<Uuid>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: ReservationStatus,
    pub is_system: bool,
    pub system_reason: Option<String>,
    pub form_data: Option<serde_json::Value>,

    // Valores congelados do tipo de reserva na criação; edições posteriores
    // do catálogo não alteram o que já é devido.
    #[schema(example = 10000)]
    pub fee_amount: i64,
    #[schema(example = 20000)]
    pub deposit_amount: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Soma congelada de taxa + caução.
    pub fn total_owed(&self) -> i64 {
        self.fee_amount + self.deposit_amount
    }
}

/// Interseção de intervalos semiabertos `[start, end)`.
pub fn windows_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Status inicial de uma reserva recém-criada.
///
/// Bloqueios do sistema nascem confirmados; tipos sem aprovação e sem
/// valores a cobrar também. Todo o resto começa aguardando o síndico.
pub fn initial_status(
    is_system: bool,
    requires_approval: bool,
    fee_amount: i64,
    deposit_amount: i64,
) -> ReservationStatus {
    if is_system {
        return ReservationStatus::Confirmed;
    }
    if !requires_approval && fee_amount == 0 && deposit_amount == 0 {
        return ReservationStatus::Confirmed;
    }
    ReservationStatus::Requested
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, h, m, 0).unwrap()
    }

    #[test]
    fn terminal_states() {
        use ReservationStatus::*;
        for s in [Rejected, Cancelled, Completed, NoShow] {
            assert!(s.is_terminal(), "{s} deveria ser terminal");
        }
        for s in [Requested, ApprovedPendingPayment, Confirmed] {
            assert!(!s.is_terminal(), "{s} não deveria ser terminal");
        }
    }

    #[test]
    fn agenda_blocking_states() {
        use ReservationStatus::*;
        for s in [Requested, ApprovedPendingPayment, Confirmed] {
            assert!(s.blocks_agenda());
        }
        for s in [Rejected, Cancelled, Completed, NoShow] {
            assert!(!s.blocks_agenda());
        }
    }

    #[test]
    fn transition_table_is_exhaustive() {
        use ReservationStatus::*;
        let legal = [
            (Requested, Confirmed),
            (Requested, ApprovedPendingPayment),
            (Requested, Rejected),
            (Requested, Cancelled),
            (ApprovedPendingPayment, Confirmed),
            (ApprovedPendingPayment, Cancelled),
            (Confirmed, Completed),
            (Confirmed, Cancelled),
            (Confirmed, NoShow),
        ];
        for from in ReservationStatus::ALL {
            for to in ReservationStatus::ALL {
                let expected = legal.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "transição {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn no_transition_leaves_terminal_state() {
        for from in ReservationStatus::ALL.into_iter().filter(|s| s.is_terminal()) {
            for to in ReservationStatus::ALL {
                assert!(!from.can_transition_to(to));
            }
        }
    }

    #[test]
    fn confirms_only_when_no_pending_charges_remain() {
        use ReservationStatus::*;
        // Duas cobranças: pagar a primeira deixa uma pendente, nada muda.
        assert_eq!(ApprovedPendingPayment.on_charges_settled(1), None);
        // Pagar a última zera as pendências e confirma.
        assert_eq!(ApprovedPendingPayment.on_charges_settled(0), Some(Confirmed));
    }

    #[test]
    fn settlement_is_noop_outside_pending_payment() {
        use ReservationStatus::*;
        // Já confirmada: reinvocação do pagamento não regride nem erra.
        assert_eq!(Confirmed.on_charges_settled(0), None);
        for s in ReservationStatus::ALL
            .into_iter()
            .filter(|s| *s != ApprovedPendingPayment)
        {
            assert_eq!(s.on_charges_settled(0), None);
            assert_eq!(s.on_charges_settled(2), None);
        }
    }

    #[test]
    fn incidents_require_a_reservation_that_held_the_space() {
        use ReservationStatus::*;
        for s in [Requested, Rejected] {
            assert!(!s.incident_eligible(), "{s} não deveria aceitar incidente");
        }
        for s in [ApprovedPendingPayment, Confirmed, Cancelled, Completed, NoShow] {
            assert!(s.incident_eligible(), "{s} deveria aceitar incidente");
        }
    }

    #[test]
    fn overlap_is_half_open() {
        // [10:00, 12:00) e [12:00, 14:00) apenas se tocam
        assert!(!windows_overlap(ts(10, 0), ts(12, 0), ts(12, 0), ts(14, 0)));
        assert!(!windows_overlap(ts(12, 0), ts(14, 0), ts(10, 0), ts(12, 0)));

        // Sobreposição parcial
        assert!(windows_overlap(ts(10, 0), ts(12, 0), ts(11, 0), ts(13, 0)));
        // Continência
        assert!(windows_overlap(ts(10, 0), ts(14, 0), ts(11, 0), ts(12, 0)));
        // Janelas idênticas
        assert!(windows_overlap(ts(10, 0), ts(12, 0), ts(10, 0), ts(12, 0)));
        // Disjuntas
        assert!(!windows_overlap(ts(8, 0), ts(9, 0), ts(10, 0), ts(11, 0)));
    }

    #[test]
    fn system_reservations_start_confirmed() {
        assert_eq!(
            initial_status(true, true, 10000, 20000),
            ReservationStatus::Confirmed
        );
    }

    #[test]
    fn free_no_approval_type_starts_confirmed() {
        assert_eq!(
            initial_status(false, false, 0, 0),
            ReservationStatus::Confirmed
        );
    }

    #[test]
    fn paid_or_approval_types_start_requested() {
        assert_eq!(
            initial_status(false, true, 0, 0),
            ReservationStatus::Requested
        );
        assert_eq!(
            initial_status(false, false, 10000, 0),
            ReservationStatus::Requested
        );
        assert_eq!(
            initial_status(false, false, 0, 20000),
            ReservationStatus::Requested
        );
    }
}
