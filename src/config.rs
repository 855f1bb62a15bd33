// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{BillingRepository, CatalogRepository, ChargeRepository, ReservationRepository},
    services::{
        BillingService, CatalogService, ChargeService, DepositService, IncidentService,
        ReservationService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub catalog_service: CatalogService,
    pub reservation_service: ReservationService,
    pub charge_service: ChargeService,
    pub incident_service: IncidentService,
    pub deposit_service: DepositService,
    pub billing_service: BillingService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;

        // Conecta ao banco de dados; o acquire_timeout limita quanto tempo
        // uma operação espera por conexão (timeout é falha re-tentável, não
        // sucesso).
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // Políticas configuráveis por ambiente
        let parking_fee: i64 = env::var("PARKING_FEE")
            .unwrap_or_else(|_| "15000".to_string())
            .parse()?;
        let admin_reservations_exempt = env::var("ADMIN_RESERVATIONS_EXEMPT")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        // --- Monta o gráfico de dependências ---
        let catalog_repo = CatalogRepository::new();
        let reservation_repo = ReservationRepository::new();
        let charge_repo = ChargeRepository::new();
        let billing_repo = BillingRepository::new();

        let catalog_service = CatalogService::new(catalog_repo.clone());
        let reservation_service = ReservationService::new(
            reservation_repo.clone(),
            charge_repo.clone(),
            catalog_repo,
            admin_reservations_exempt,
        );
        let charge_service = ChargeService::new(charge_repo.clone(), reservation_repo.clone());
        let incident_service = IncidentService::new(charge_repo.clone(), reservation_repo.clone());
        let deposit_service =
            DepositService::new(charge_repo, reservation_repo, billing_repo.clone());
        let billing_service = BillingService::new(billing_repo, parking_fee);

        Ok(Self {
            db_pool,
            catalog_service,
            reservation_service,
            charge_service,
            incident_service,
            deposit_service,
            billing_service,
        })
    }
}
