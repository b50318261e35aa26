//! Form-level input record for the mortgage calculator.
//!
//! Each numeric slot carries its parsed value together with a field error
//! flag. The record is immutable: every edit produces a new `MortgageInputs`
//! so a partially-applied change can never be observed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MortgageCalcError;

// ---------------------------------------------------------------------------
// Loan model
// ---------------------------------------------------------------------------

/// Amortization model. "Nothing selected yet" is `Option::None` on the
/// input record, never a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanModel {
    /// Level monthly payment that fully repays principal over the term.
    Repayment,
    /// Monthly payment covers interest only.
    InterestOnly,
}

impl LoanModel {
    pub fn label(&self) -> &'static str {
        match self {
            LoanModel::Repayment => "Repayment",
            LoanModel::InterestOnly => "Interest Only",
        }
    }
}

impl fmt::Display for LoanModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LoanModel {
    type Err = MortgageCalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "repayment" => Ok(LoanModel::Repayment),
            "interest-only" | "interest_only" | "interestonly" | "interest" => {
                Ok(LoanModel::InterestOnly)
            }
            other => Err(MortgageCalcError::InvalidInput {
                field: "model".into(),
                reason: format!(
                    "unknown mortgage type '{other}' (expected repayment or interest-only)"
                ),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Field identifiers
// ---------------------------------------------------------------------------

/// The four input slots of the form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Amount,
    Years,
    InterestRate,
    Model,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Amount, Field::Years, Field::InterestRate, Field::Model];

    /// Machine name, matching the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Amount => "amount",
            Field::Years => "years",
            Field::InterestRate => "interest_rate",
            Field::Model => "model",
        }
    }

    /// Human label shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Amount => "Mortgage Amount",
            Field::Years => "Mortgage Term",
            Field::InterestRate => "Interest Rate",
            Field::Model => "Mortgage Type",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Field values
// ---------------------------------------------------------------------------

/// A numeric input slot: the parsed value (if any) and its error flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub value: Option<Decimal>,
    pub error: bool,
}

impl FieldValue {
    /// Untouched slot: no value, no error displayed yet.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a slot from an already-numeric value. Absent, zero and
    /// negative values are flagged.
    pub fn from_value(value: Option<Decimal>) -> Self {
        Self {
            value,
            error: !is_positive(value),
        }
    }

    /// Parse raw text as typed by the user. Thousands separators (`,` and
    /// `_`) and surrounding whitespace are ignored. Unparseable text yields
    /// an absent value.
    ///
    /// Broader than a digits-only keypad: a leading `-` and scientific
    /// notation (`1.5e5`) parse, so text from files and flags is accepted.
    /// Negative values come back flagged like zero.
    pub fn parse(raw: &str) -> Self {
        Self::from_value(parse_number(raw))
    }

    /// True when the slot holds a usable (strictly positive) number.
    pub fn is_valid(&self) -> bool {
        is_positive(self.value)
    }

    /// Copy of this slot with the error flag recomputed from its value.
    pub(crate) fn checked(&self) -> Self {
        Self::from_value(self.value)
    }
}

fn is_positive(value: Option<Decimal>) -> bool {
    matches!(value, Some(v) if v > Decimal::ZERO)
}

fn parse_number(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    if cleaned.contains(['e', 'E']) {
        return Decimal::from_scientific(&cleaned).ok();
    }
    Decimal::from_str(&cleaned).ok()
}

/// The mortgage-type selector and its error flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelField {
    pub value: Option<LoanModel>,
    pub error: bool,
}

impl ModelField {
    /// A selection always clears the error.
    pub fn selected(model: LoanModel) -> Self {
        Self {
            value: Some(model),
            error: false,
        }
    }

    pub(crate) fn checked(&self) -> Self {
        Self {
            value: self.value,
            error: self.value.is_none(),
        }
    }
}

// ---------------------------------------------------------------------------
// Input record
// ---------------------------------------------------------------------------

/// Everything the user has entered so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageInputs {
    pub amount: FieldValue,
    pub years: FieldValue,
    pub interest_rate: FieldValue,
    pub model: ModelField,
}

impl MortgageInputs {
    /// Fresh record as shown after a reset.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_amount(self, amount: FieldValue) -> Self {
        Self { amount, ..self }
    }

    pub fn with_years(self, years: FieldValue) -> Self {
        Self { years, ..self }
    }

    pub fn with_interest_rate(self, interest_rate: FieldValue) -> Self {
        Self {
            interest_rate,
            ..self
        }
    }

    pub fn with_model(self, model: LoanModel) -> Self {
        Self {
            model: ModelField::selected(model),
            ..self
        }
    }

    /// Build a record from raw text fields. `model` of `None` leaves the
    /// selector unselected.
    pub fn from_raw(
        amount: &str,
        years: &str,
        interest_rate: &str,
        model: Option<LoanModel>,
    ) -> Self {
        let inputs = Self::new()
            .with_amount(FieldValue::parse(amount))
            .with_years(FieldValue::parse(years))
            .with_interest_rate(FieldValue::parse(interest_rate));
        match model {
            Some(m) => inputs.with_model(m),
            None => inputs,
        }
    }

    /// Current error flag for a slot.
    pub fn has_error(&self, field: Field) -> bool {
        match field {
            Field::Amount => self.amount.error,
            Field::Years => self.years.error,
            Field::InterestRate => self.interest_rate.error,
            Field::Model => self.model.error,
        }
    }
}
