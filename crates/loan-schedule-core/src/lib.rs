pub mod error;
pub mod loan;
pub mod money;
pub mod schedule;
pub mod types;

pub use error::LoanScheduleError;
pub use types::*;

/// Standard result type for all loan-schedule operations
pub type LoanScheduleResult<T> = Result<T, LoanScheduleError>;
