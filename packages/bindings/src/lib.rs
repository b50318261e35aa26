use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

use mortgage_calc_core::mortgage::{self, FieldValue, LoanModel, MortgageInput, MortgageInputs};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Form input
// ---------------------------------------------------------------------------

/// Parse one raw text field ("250,000") into `{ value, error }`.
#[napi]
pub fn parse_field(raw: String) -> NapiResult<String> {
    serde_json::to_string(&FieldValue::parse(&raw)).map_err(to_napi_error)
}

/// Validate a form record and return `{ inputs, passed }` with every
/// field's error flag set.
#[napi]
pub fn validate_mortgage(inputs_json: String) -> NapiResult<String> {
    let inputs: MortgageInputs = serde_json::from_str(&inputs_json).map_err(to_napi_error)?;
    serde_json::to_string(&mortgage::validate(&inputs)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Calculate from a JSON request, returning the full output envelope.
#[napi]
pub fn calculate_mortgage(input_json: String) -> NapiResult<String> {
    let input: MortgageInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage::calculate_mortgage(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Calculate straight from a validated form record. Fails if the record
/// does not pass validation.
#[napi]
pub fn calculate_from_form(inputs_json: String) -> NapiResult<String> {
    let inputs: MortgageInputs = serde_json::from_str(&inputs_json).map_err(to_napi_error)?;
    let validation = mortgage::validate(&inputs);
    let validated = validation.validated().ok_or_else(|| {
        let names: Vec<&str> = validation.invalid_fields().iter().map(|f| f.name()).collect();
        to_napi_error(format!("invalid fields: {}", names.join(", ")))
    })?;
    let result = mortgage::calculate_validated(&validated).map_err(to_napi_error)?;
    serde_json::to_string(&result).map_err(to_napi_error)
}

/// Direct calculation with decimal strings, e.g. `("repayment", "100000", "4.5", "25")`.
#[napi]
pub fn calculate_payment(
    model: String,
    amount: String,
    interest_rate: String,
    years: String,
) -> NapiResult<String> {
    let model: LoanModel = model.parse().map_err(to_napi_error)?;
    let amount: Decimal = amount.parse().map_err(to_napi_error)?;
    let interest_rate: Decimal = interest_rate.parse().map_err(to_napi_error)?;
    let years: Decimal = years.parse().map_err(to_napi_error)?;
    let result =
        mortgage::calculate(model, amount, interest_rate, years).map_err(to_napi_error)?;
    serde_json::to_string(&result).map_err(to_napi_error)
}
