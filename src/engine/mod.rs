//! The attendance, leave and payroll core: pure functions with no I/O.

pub mod balance;
pub mod error;
pub mod geofence;
pub mod payroll;
pub mod reconcile;

pub use error::DomainError;
