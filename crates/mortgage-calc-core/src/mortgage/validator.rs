//! Per-field validation of the mortgage form.
//!
//! Validation never fails: every slot is checked and flagged independently,
//! and the caller gets the flagged record back together with an overall
//! verdict. Only a passing validation can produce a [`ValidatedMortgage`],
//! which is what the calculator consumes.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::inputs::{Field, LoanModel, MortgageInputs};
use crate::types::{Money, Rate, Years};

/// Outcome of validating a [`MortgageInputs`] record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    /// The input record with every error flag recomputed.
    pub inputs: MortgageInputs,
    /// True only if no slot is flagged.
    pub passed: bool,
}

/// Calculator input that has passed validation: all numbers strictly
/// positive and a model selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidatedMortgage {
    model: LoanModel,
    amount: Money,
    interest_rate: Rate,
    years: Years,
}

impl ValidatedMortgage {
    pub fn model(&self) -> LoanModel {
        self.model
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    /// Annual rate in percent.
    pub fn interest_rate(&self) -> Rate {
        self.interest_rate
    }

    pub fn years(&self) -> Years {
        self.years
    }
}

impl Validation {
    /// Slots that failed, in form order.
    pub fn invalid_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.inputs.has_error(*f))
            .collect()
    }

    /// The gated calculator input, present only when validation passed.
    pub fn validated(&self) -> Option<ValidatedMortgage> {
        if !self.passed {
            return None;
        }
        Some(ValidatedMortgage {
            model: self.inputs.model.value?,
            amount: self.inputs.amount.value?,
            interest_rate: self.inputs.interest_rate.value?,
            years: self.inputs.years.value?,
        })
    }
}

/// Check every slot of `inputs` and return the flagged record.
///
/// Amount, term and rate are flagged when absent or not strictly positive;
/// the model is flagged when nothing is selected.
pub fn validate(inputs: &MortgageInputs) -> Validation {
    let checked = MortgageInputs {
        amount: inputs.amount.checked(),
        years: inputs.years.checked(),
        interest_rate: inputs.interest_rate.checked(),
        model: inputs.model.checked(),
    };

    let passed = Field::ALL.iter().all(|f| !checked.has_error(*f));

    debug!(
        passed,
        amount_error = checked.amount.error,
        years_error = checked.years.error,
        interest_rate_error = checked.interest_rate.error,
        model_error = checked.model.error,
        "validated mortgage inputs"
    );

    Validation {
        inputs: checked,
        passed,
    }
}
