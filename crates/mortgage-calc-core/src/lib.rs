pub mod error;
pub mod mortgage;
pub mod types;

pub use error::MortgageCalcError;
pub use types::*;

/// Standard result type for all mortgage-calc operations
pub type CalcResult<T> = Result<T, MortgageCalcError>;
