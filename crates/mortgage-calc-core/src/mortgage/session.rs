//! Form session: the input record, the last result, and the observers to
//! notify when a new result becomes available.
//!
//! The session enforces the one sequencing rule of the calculator: nothing
//! is calculated unless validation passes first.

use tracing::debug;

use super::calculator::{calculate_validated, MortgageResult};
use super::inputs::{Field, FieldValue, LoanModel, MortgageInputs};
use super::validator::validate;
use crate::CalcResult;

type ResultObserver = Box<dyn FnMut(&MortgageResult)>;

/// What happened on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; the listed slots are now flagged on the record.
    Invalid(Vec<Field>),
    /// A new result was calculated and stored.
    Calculated(MortgageResult),
}

#[derive(Default)]
pub struct MortgageSession {
    inputs: MortgageInputs,
    result: Option<MortgageResult>,
    observers: Vec<ResultObserver>,
}

impl MortgageSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inputs(&self) -> &MortgageInputs {
        &self.inputs
    }

    /// Last successful result, if any.
    pub fn result(&self) -> Option<&MortgageResult> {
        self.result.as_ref()
    }

    pub fn set_amount(&mut self, raw: &str) {
        self.inputs = self.inputs.with_amount(FieldValue::parse(raw));
    }

    pub fn set_years(&mut self, raw: &str) {
        self.inputs = self.inputs.with_years(FieldValue::parse(raw));
    }

    pub fn set_interest_rate(&mut self, raw: &str) {
        self.inputs = self.inputs.with_interest_rate(FieldValue::parse(raw));
    }

    pub fn select_model(&mut self, model: LoanModel) {
        self.inputs = self.inputs.with_model(model);
    }

    /// Reset the form. The last result stays until the next successful
    /// submit replaces it.
    pub fn clear(&mut self) {
        self.inputs = MortgageInputs::new();
    }

    /// Register a callback run after every successful calculation.
    pub fn on_result<F>(&mut self, observer: F)
    where
        F: FnMut(&MortgageResult) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Validate the current record and, if it passes, calculate and publish
    /// a new result.
    pub fn submit(&mut self) -> CalcResult<SubmitOutcome> {
        let validation = validate(&self.inputs);
        self.inputs = validation.inputs;

        let validated = match validation.validated() {
            Some(v) => v,
            None => {
                let invalid = validation.invalid_fields();
                debug!(?invalid, "submit rejected");
                return Ok(SubmitOutcome::Invalid(invalid));
            }
        };

        let result = calculate_validated(&validated)?;
        self.result = Some(result);
        for observer in self.observers.iter_mut() {
            observer(&result);
        }

        Ok(SubmitOutcome::Calculated(result))
    }
}

impl std::fmt::Debug for MortgageSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MortgageSession")
            .field("inputs", &self.inputs)
            .field("result", &self.result)
            .field("observers", &self.observers.len())
            .finish()
    }
}
