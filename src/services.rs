pub mod billing_service;
pub mod catalog_service;
pub mod charge_service;
pub mod deposit_service;
pub mod incident_service;
pub mod reservation_service;

pub use billing_service::BillingService;
pub use catalog_service::CatalogService;
pub use charge_service::ChargeService;
pub use deposit_service::DepositService;
pub use incident_service::IncidentService;
pub use reservation_service::ReservationService;
