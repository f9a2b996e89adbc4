pub mod amortization;
pub mod error;
pub mod loans;
pub mod presentation;
pub mod rates;
pub mod types;

#[cfg(feature = "restructure")]
pub mod restructure;

#[cfg(feature = "schedule")]
pub mod schedule;

pub use error::MortgageError;
pub use types::*;

/// Standard result type for all mortgage analytics operations
pub type MortgageResult<T> = Result<T, MortgageError>;
