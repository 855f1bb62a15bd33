//src/main.rs

use axum::{
    Json, Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod services;

use crate::config::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é aceitável aqui: se a configuração falhar, a aplicação não
    // deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização (inclui as constraints que
    // sustentam as regras de concorrência).
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let catalog_routes = Router::new()
        .route(
            "/amenities",
            post(handlers::catalog::create_amenity).get(handlers::catalog::get_all_amenities),
        )
        .route("/types", post(handlers::catalog::create_reservation_type))
        .route(
            "/amenities/{id}/types",
            get(handlers::catalog::get_types_for_amenity),
        );

    let reservation_routes = Router::new()
        .route(
            "/",
            post(handlers::reservations::request_reservation)
                .get(handlers::reservations::get_agenda),
        )
        .route(
            "/admin",
            post(handlers::reservations::create_reservation_as_admin),
        )
        .route(
            "/sweep-completed",
            post(handlers::reservations::sweep_completed),
        )
        .route("/{id}", get(handlers::reservations::get_reservation))
        .route(
            "/{id}/approve",
            post(handlers::reservations::approve_reservation),
        )
        .route(
            "/{id}/reject",
            post(handlers::reservations::reject_reservation),
        )
        .route(
            "/{id}/cancel",
            post(handlers::reservations::cancel_reservation),
        )
        .route("/{id}/no-show", post(handlers::reservations::mark_no_show))
        .route(
            "/{id}/charges",
            get(handlers::charges::list_charges_for_reservation),
        )
        .route(
            "/{id}/incidents",
            post(handlers::reservations::report_incident),
        )
        .route(
            "/{id}/deposit-decision",
            post(handlers::reservations::decide_deposit)
                .get(handlers::reservations::get_deposit_decision),
        );

    let charge_routes = Router::new().route("/{id}/pay", post(handlers::charges::pay_charge));

    let billing_routes = Router::new()
        .route("/close", post(handlers::billing::close_month))
        .route("/statements", get(handlers::billing::list_statements));

    let resident_routes = Router::new()
        .route(
            "/{id}/reservations",
            get(handlers::reservations::list_reservations_for_resident),
        )
        .route(
            "/{id}/debts",
            get(handlers::billing::list_debts_for_resident),
        );

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/docs/openapi.json",
            get(|| async { Json(docs::ApiDoc::openapi()) }),
        )
        .nest("/api/catalog", catalog_routes)
        .nest("/api/reservations", reservation_routes)
        .nest("/api/charges", charge_routes)
        .nest("/api/billing", billing_routes)
        .nest("/api/residents", resident_routes)
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
