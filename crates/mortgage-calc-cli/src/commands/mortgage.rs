use clap::Args;
use serde_json::{json, Value};
use tracing::debug;

use mortgage_calc_core::mortgage::{
    calculate_mortgage, validate, LoanModel, MortgageInput, MortgageInputs, Validation,
};

use crate::input;

/// Mortgage form fields. Numbers are taken as raw text so thousands
/// separators ("250,000") are accepted.
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct MortgageArgs {
    /// Mortgage amount (principal), e.g. 250,000
    #[arg(long)]
    pub amount: Option<String>,

    /// Mortgage term in years
    #[arg(long, alias = "term")]
    pub years: Option<String>,

    /// Annual interest rate in percent (e.g. 4.5 for 4.5%)
    #[arg(long, alias = "rate")]
    pub interest_rate: Option<String>,

    /// Mortgage type: repayment or interest-only
    #[arg(long, alias = "type")]
    pub model: Option<LoanModel>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

impl MortgageArgs {
    fn has_form_fields(&self) -> bool {
        self.amount.is_some()
            || self.years.is_some()
            || self.interest_rate.is_some()
            || self.model.is_some()
    }

    /// Assemble the form record from the raw flags. Missing flags become
    /// empty fields and are flagged by validation.
    fn form_inputs(&self) -> MortgageInputs {
        MortgageInputs::from_raw(
            self.amount.as_deref().unwrap_or_default(),
            self.years.as_deref().unwrap_or_default(),
            self.interest_rate.as_deref().unwrap_or_default(),
            self.model,
        )
    }

    /// Form record from flags, or from a JSON request when no flags are set.
    fn resolve(&self) -> Result<MortgageInputs, Box<dyn std::error::Error>> {
        if self.input.is_none() && self.has_form_fields() {
            return Ok(self.form_inputs());
        }
        match input::read_request::<MortgageInput>(self.input.as_deref())? {
            Some(req) => Ok(MortgageInputs::from(&req)),
            None => Ok(self.form_inputs()),
        }
    }
}

pub fn run_calculate(args: MortgageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let validation = validate(&args.resolve()?);
    let validated = match validation.validated() {
        Some(v) => v,
        None => return Err(describe_invalid(&validation).into()),
    };
    debug!(?validated, "inputs accepted");

    let result = calculate_mortgage(&MortgageInput::from(&validated))?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_validate(args: MortgageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let validation = validate(&args.resolve()?);
    Ok(validation_report(&validation))
}

fn validation_report(validation: &Validation) -> Value {
    let invalid: Vec<&str> = validation
        .invalid_fields()
        .iter()
        .map(|f| f.name())
        .collect();
    json!({
        "passed": validation.passed,
        "invalid_fields": invalid,
        "fields": validation.inputs,
    })
}

/// One line per offending field, as the form shows under each input.
fn describe_invalid(validation: &Validation) -> String {
    let lines: Vec<String> = validation
        .invalid_fields()
        .iter()
        .map(|f| {
            let flag = f.name().replace('_', "-");
            format!("  {} (--{}): This field is required", f.label(), flag)
        })
        .collect();
    format!("invalid mortgage details\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn args(
        amount: Option<&str>,
        years: Option<&str>,
        rate: Option<&str>,
        model: Option<LoanModel>,
    ) -> MortgageArgs {
        MortgageArgs {
            amount: amount.map(String::from),
            years: years.map(String::from),
            interest_rate: rate.map(String::from),
            model,
            input: None,
        }
    }

    #[test]
    fn test_form_inputs_parse_raw_text() {
        let a = args(Some("100,000"), Some("25"), Some("4.5"), Some(LoanModel::Repayment));
        let inputs = a.form_inputs();
        assert_eq!(inputs.amount.value, Some(dec!(100000)));
        assert!(validate(&inputs).passed);
    }

    #[test]
    fn test_calculate_from_flags() {
        let a = args(Some("100,000"), Some("25"), Some("4.5"), Some(LoanModel::InterestOnly));
        let value = run_calculate(a).unwrap();
        let figure = |key: &str| -> Decimal {
            value["result"][key].as_str().unwrap().parse().unwrap()
        };
        assert_eq!(figure("monthly_payment"), dec!(375));
        assert_eq!(figure("total_repaid"), dec!(112500));
    }

    #[test]
    fn test_calculate_lists_every_invalid_field() {
        let a = args(Some("0"), Some("10"), Some("-5"), None);
        let err = run_calculate(a).unwrap_err().to_string();
        assert!(err.contains("Mortgage Amount"));
        assert!(err.contains("Interest Rate"));
        assert!(err.contains("Mortgage Type"));
        assert!(!err.contains("Mortgage Term"));
    }

    #[test]
    fn test_validate_report() {
        let a = args(Some("0"), Some("10"), Some("-5"), Some(LoanModel::Repayment));
        let report = run_validate(a).unwrap();
        assert_eq!(report["passed"], false);
        assert_eq!(report["invalid_fields"], json!(["amount", "interest_rate"]));
        assert_eq!(report["fields"]["years"]["error"], false);
    }
}
