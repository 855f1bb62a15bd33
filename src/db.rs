pub mod billing_repo;
pub mod catalog_repo;
pub mod charge_repo;
pub mod reservation_repo;

pub use billing_repo::BillingRepository;
pub use catalog_repo::CatalogRepository;
pub use charge_repo::ChargeRepository;
pub use reservation_repo::ReservationRepository;
