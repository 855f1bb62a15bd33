// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(
            // --- Catálogo ---
            models::catalog::Amenity,
            models::catalog::ReservationType,
            handlers::catalog::CreateAmenityPayload,
            handlers::catalog::CreateReservationTypePayload,

            // --- Reservas ---
            models::reservation::ReservationStatus,
            models::reservation::Reservation,
            handlers::reservations::RequestReservationPayload,
            handlers::reservations::AdminReservationPayload,
            handlers::reservations::ReportIncidentPayload,
            handlers::reservations::DecideDepositPayload,

            // --- Cobranças ---
            models::charge::ChargeKind,
            models::charge::ChargeStatus,
            models::charge::Charge,
            handlers::charges::PayChargePayload,

            // --- Caução ---
            models::deposit::DepositVerdict,
            models::deposit::DepositDecision,

            // --- Fechamento ---
            models::billing::ExpenseStatus,
            models::billing::DebtKind,
            models::billing::Resident,
            models::billing::Expense,
            models::billing::Debt,
            models::billing::FinancialStatement,
            handlers::billing::CloseMonthPayload,
        )
    ),
    tags(
        (name = "Catalog", description = "Espaços comuns e tipos de reserva"),
        (name = "Reservations", description = "Ciclo de vida das reservas"),
        (name = "Charges", description = "Cobranças: taxa, caução e multa"),
        (name = "Billing", description = "Fechamento mensal e dívidas por morador")
    )
)]
pub struct ApiDoc;
