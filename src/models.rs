pub mod billing;
pub mod catalog;
pub mod charge;
pub mod deposit;
pub mod reservation;
