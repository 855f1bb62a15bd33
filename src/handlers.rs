pub mod billing;
pub mod catalog;
pub mod charges;
pub mod reservations;
