//! Mortgage repayment calculator: raw form input, per-field validation,
//! and the repayment / interest-only payment models.

pub mod calculator;
pub mod inputs;
pub mod validator;

#[cfg(feature = "session")]
pub mod session;

pub use calculator::{
    calculate, calculate_mortgage, calculate_validated, MortgageInput, MortgageResult,
};
pub use inputs::{Field, FieldValue, LoanModel, ModelField, MortgageInputs};
pub use validator::{validate, ValidatedMortgage, Validation};

#[cfg(feature = "session")]
pub use session::{MortgageSession, SubmitOutcome};
