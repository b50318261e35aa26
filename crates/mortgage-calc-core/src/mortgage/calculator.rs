//! Mortgage payment models: level-pay repayment and interest-only.
//!
//! Rates are taken in percent, as typed into the form (4.5 = 4.5%), and
//! terms in years. All math in `rust_decimal::Decimal`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::inputs::{FieldValue, LoanModel, MortgageInputs};
use super::validator::{validate, ValidatedMortgage};
use crate::error::MortgageCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Years};
use crate::CalcResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Terms beyond this many years draw a warning.
const LONG_TERM_YEARS: Decimal = dec!(40);

/// Annual rates (percent) beyond this draw a warning.
const HIGH_RATE_PERCENT: Decimal = dec!(25);

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

/// Mortgage calculation request, as supplied in JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInput {
    pub model: LoanModel,
    /// Principal borrowed.
    pub amount: Money,
    /// Annual interest rate in percent (e.g. 4.5 = 4.5%).
    pub interest_rate: Rate,
    /// Term in years.
    pub years: Years,
}

impl From<&ValidatedMortgage> for MortgageInput {
    fn from(v: &ValidatedMortgage) -> Self {
        Self {
            model: v.model(),
            amount: v.amount(),
            interest_rate: v.interest_rate(),
            years: v.years(),
        }
    }
}

impl From<&MortgageInput> for MortgageInputs {
    fn from(input: &MortgageInput) -> Self {
        MortgageInputs::new()
            .with_amount(FieldValue::from_value(Some(input.amount)))
            .with_years(FieldValue::from_value(Some(input.years)))
            .with_interest_rate(FieldValue::from_value(Some(input.interest_rate)))
            .with_model(input.model)
    }
}

/// Payment figures for a mortgage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageResult {
    pub monthly_payment: Money,
    /// Sum of all monthly payments over the term.
    pub total_repaid: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the monthly payment and total repaid for `model`.
///
/// Inputs are expected to have been through [`validate`]; they are not
/// re-checked here. Arithmetic errors (zero-length term, decimal overflow)
/// are returned rather than panicking.
pub fn calculate(
    model: LoanModel,
    amount: Money,
    annual_rate_percent: Rate,
    years: Years,
) -> CalcResult<MortgageResult> {
    let result = match model {
        LoanModel::Repayment => repayment(amount, annual_rate_percent, years),
        LoanModel::InterestOnly => interest_only(amount, annual_rate_percent, years),
    };

    match &result {
        Ok(r) => debug!(
            ?model,
            %amount,
            %annual_rate_percent,
            %years,
            monthly_payment = %r.monthly_payment,
            total_repaid = %r.total_repaid,
            "calculated mortgage"
        ),
        Err(e) => warn!(
            ?model,
            %amount,
            %annual_rate_percent,
            %years,
            error = %e,
            "mortgage calculation failed"
        ),
    }

    result
}

/// Calculate from input that has passed validation.
pub fn calculate_validated(input: &ValidatedMortgage) -> CalcResult<MortgageResult> {
    calculate(input.model(), input.amount(), input.interest_rate(), input.years())
}

/// Validate and calculate a JSON-shaped request, wrapped in the standard
/// output envelope.
pub fn calculate_mortgage(
    input: &MortgageInput,
) -> CalcResult<ComputationOutput<MortgageResult>> {
    let start = Instant::now();

    let validation = validate(&MortgageInputs::from(input));
    let validated = match validation.validated() {
        Some(v) => v,
        None => {
            let field = validation
                .invalid_fields()
                .first()
                .map(|f| f.name())
                .unwrap_or("input");
            return Err(MortgageCalcError::InvalidInput {
                field: field.into(),
                reason: "must be greater than zero".into(),
            });
        }
    };

    let result = calculate_validated(&validated)?;

    let mut warnings: Vec<String> = Vec::new();
    if input.model == LoanModel::InterestOnly {
        warnings.push(
            "Interest-only total covers interest alone; \
             the principal is repaid separately at term end"
                .into(),
        );
    }
    if input.years > LONG_TERM_YEARS {
        warnings.push(format!("Term of {} years is unusually long", input.years));
    }
    if input.interest_rate > HIGH_RATE_PERCENT {
        warnings.push(format!("Interest rate of {}% is unusually high", input.interest_rate));
    }

    let methodology = match input.model {
        LoanModel::Repayment => "Repayment Mortgage (level-pay annuity, monthly compounding)",
        LoanModel::InterestOnly => "Interest-Only Mortgage (simple annual interest)",
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, warnings, elapsed, result))
}

// ---------------------------------------------------------------------------
// Interest-only
// ---------------------------------------------------------------------------

/// Interest-only: one year's interest spread over 12 months.
///
/// `total_repaid` is the interest paid over the term and deliberately
/// excludes the principal, which is settled separately at maturity.
fn interest_only(
    amount: Money,
    annual_rate_percent: Rate,
    years: Years,
) -> CalcResult<MortgageResult> {
    let annual_interest = amount
        .checked_mul(annual_rate_percent / dec!(100))
        .ok_or_else(|| overflow("interest-only annual interest"))?;
    let monthly_payment = annual_interest
        .checked_div(MONTHS_PER_YEAR)
        .ok_or_else(|| overflow("interest-only monthly payment"))?;
    let total_repaid = annual_interest
        .checked_mul(years)
        .ok_or_else(|| overflow("interest-only total"))?;

    Ok(MortgageResult {
        monthly_payment,
        total_repaid,
    })
}

// ---------------------------------------------------------------------------
// Repayment
// ---------------------------------------------------------------------------

/// Level-pay amortising loan:
/// PMT = P * r * (1+r)^n / ((1+r)^n - 1), with r the monthly rate and n
/// the number of monthly payments.
fn repayment(
    amount: Money,
    annual_rate_percent: Rate,
    years: Years,
) -> CalcResult<MortgageResult> {
    let monthly_rate = annual_rate_percent / dec!(100) / MONTHS_PER_YEAR;
    let n = years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| overflow("number of payments"))?;

    if n.is_zero() {
        return Err(MortgageCalcError::DivisionByZero {
            context: "repayment term of zero months".into(),
        });
    }

    let monthly_payment = if monthly_rate.is_zero() {
        // Zero-rate: principal spread evenly.
        spread_evenly(amount, n)?
    } else {
        let factor = compound_factor(monthly_rate, n)?;
        let denom = factor - Decimal::ONE;
        if denom.is_zero() {
            // Rate too small to register at 28 digits of precision.
            spread_evenly(amount, n)?
        } else {
            amount
                .checked_mul(monthly_rate)
                .and_then(|x| x.checked_mul(factor))
                .and_then(|x| x.checked_div(denom))
                .ok_or_else(|| overflow("repayment monthly payment"))?
        }
    };

    let total_repaid = monthly_payment
        .checked_mul(n)
        .ok_or_else(|| overflow("repayment total"))?;

    Ok(MortgageResult {
        monthly_payment,
        total_repaid,
    })
}

/// (1 + r)^n. Whole-month terms use exact integer powers; fractional
/// month counts fall back to `powd`.
fn compound_factor(monthly_rate: Rate, n: Decimal) -> CalcResult<Decimal> {
    let base = Decimal::ONE + monthly_rate;
    let factor = match n.to_u64() {
        Some(whole) if n.fract().is_zero() => base.checked_powu(whole),
        _ => base.checked_powd(n),
    };
    factor.ok_or_else(|| overflow("compound factor (1 + r)^n"))
}

/// Principal split into `n` equal payments. A sub-month term can push the
/// quotient past the decimal range.
fn spread_evenly(amount: Money, n: Decimal) -> CalcResult<Money> {
    amount
        .checked_div(n)
        .ok_or_else(|| overflow("repayment monthly payment"))
}

fn overflow(context: &str) -> MortgageCalcError {
    MortgageCalcError::Overflow {
        context: context.into(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const TOL: Decimal = dec!(0.01);

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn standard_input(model: LoanModel) -> MortgageInput {
        MortgageInput {
            model,
            amount: dec!(100000),
            interest_rate: dec!(4.5),
            years: dec!(25),
        }
    }

    #[test]
    fn test_repayment_reference_payment() {
        let r = calculate(LoanModel::Repayment, dec!(100000), dec!(4.5), dec!(25)).unwrap();
        assert_close(r.monthly_payment.round_dp(2), dec!(555.83), TOL, "monthly payment");
        assert_close(r.total_repaid, dec!(166749), dec!(5), "total repaid");
    }

    #[test]
    fn test_repayment_total_is_payment_times_months() {
        let years = dec!(30);
        let r = calculate(LoanModel::Repayment, dec!(250000), dec!(6), years).unwrap();
        assert_eq!(r.total_repaid, r.monthly_payment * (years * dec!(12)));
    }

    #[test]
    fn test_repayment_30y_6pct() {
        // Standard textbook figure: 200k at 6% over 30 years = 1199.10
        let r = calculate(LoanModel::Repayment, dec!(200000), dec!(6), dec!(30)).unwrap();
        assert_close(r.monthly_payment, dec!(1199.10), TOL, "30y 6% payment");
    }

    #[test]
    fn test_repayment_exceeds_principal() {
        let r = calculate(LoanModel::Repayment, dec!(100000), dec!(3), dec!(10)).unwrap();
        assert!(r.total_repaid > dec!(100000));
    }

    #[test]
    fn test_repayment_fractional_term() {
        // 2.5 years = 30 payments.
        let r = calculate(LoanModel::Repayment, dec!(30000), dec!(5), dec!(2.5)).unwrap();
        assert_close(r.monthly_payment, dec!(1065.88), TOL, "2.5y payment");
        assert_eq!(r.total_repaid, r.monthly_payment * dec!(30));
    }

    #[test]
    fn test_repayment_non_whole_month_term() {
        // 1.05 years = 12.6 payments, exercises the powd branch.
        let r = calculate(LoanModel::Repayment, dec!(12000), dec!(6), dec!(1.05)).unwrap();
        let whole_year = calculate(LoanModel::Repayment, dec!(12000), dec!(6), dec!(1)).unwrap();
        assert!(r.monthly_payment < whole_year.monthly_payment);
        assert!(r.monthly_payment > Decimal::ZERO);
    }

    #[test]
    fn test_repayment_zero_rate_spreads_principal() {
        let r = calculate(LoanModel::Repayment, dec!(120000), Decimal::ZERO, dec!(10)).unwrap();
        assert_eq!(r.monthly_payment, dec!(1000));
        assert_eq!(r.total_repaid, dec!(120000));
    }

    #[test]
    fn test_repayment_sub_precision_rate_spreads_principal() {
        // 1e-26 percent a year is below 28-digit precision once made monthly.
        let rate = dec!(0.00000000000000000000000001);
        let inputs = MortgageInputs::from_raw("120000", "10", &rate.to_string(), None)
            .with_model(LoanModel::Repayment);
        assert!(validate(&inputs).passed);

        let r = calculate(LoanModel::Repayment, dec!(120000), rate, dec!(10)).unwrap();
        assert_eq!(r.monthly_payment, dec!(120000) / dec!(120));
        assert_eq!(r.total_repaid, r.monthly_payment * dec!(120));
    }

    #[test]
    fn test_repayment_unregistered_compounding_spreads_principal() {
        // (1 + r)^n rounds to exactly 1 for a term of a tiny fraction of a month.
        let amount = dec!(0.0000000000000000000000000012);
        let years = dec!(0.0000000000000000000000000001);
        let r = calculate(LoanModel::Repayment, amount, dec!(4.5), years).unwrap();
        let n = years * dec!(12);
        assert_eq!(r.monthly_payment, amount / n);
        assert_eq!(r.total_repaid, r.monthly_payment * n);
    }

    #[test]
    fn test_repayment_tiny_term_overflows_without_panic() {
        let cases = [
            (dec!(100000), dec!(4.5), dec!(0.0000000000000000000000000001)),
            (
                dec!(1000000),
                dec!(0.0000000000000000000000001),
                dec!(0.000000000000000000000001),
            ),
        ];
        for (amount, rate, years) in cases {
            let inputs = MortgageInputs::new()
                .with_amount(FieldValue::from_value(Some(amount)))
                .with_years(FieldValue::from_value(Some(years)))
                .with_interest_rate(FieldValue::from_value(Some(rate)))
                .with_model(LoanModel::Repayment);
            let gated = validate(&inputs).validated().unwrap();
            let result = calculate_validated(&gated);
            assert!(
                matches!(result, Err(MortgageCalcError::Overflow { .. })),
                "amount={amount} rate={rate} years={years}: {result:?}"
            );
        }
    }

    #[test]
    fn test_repayment_zero_term_is_error() {
        let result = calculate(LoanModel::Repayment, dec!(100000), dec!(4.5), Decimal::ZERO);
        assert!(matches!(
            result,
            Err(MortgageCalcError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_repayment_overflow_is_error() {
        let result = calculate(LoanModel::Repayment, dec!(100000), dec!(1200), dec!(1000));
        assert!(matches!(result, Err(MortgageCalcError::Overflow { .. })));
    }

    #[test]
    fn test_interest_only_reference() {
        let r = calculate(LoanModel::InterestOnly, dec!(100000), dec!(4.5), dec!(25)).unwrap();
        assert_eq!(r.monthly_payment, dec!(375));
        assert_eq!(r.total_repaid, dec!(112500));
    }

    #[test]
    fn test_interest_only_total_excludes_principal() {
        let r = calculate(LoanModel::InterestOnly, dec!(200000), dec!(5), dec!(20)).unwrap();
        assert_eq!(r.total_repaid, dec!(200000));
        assert_close(r.monthly_payment, dec!(833.3333), dec!(0.0001), "monthly interest");
    }

    #[test]
    fn test_interest_only_cheaper_monthly_than_repayment() {
        let io = calculate(LoanModel::InterestOnly, dec!(150000), dec!(4), dec!(25)).unwrap();
        let rp = calculate(LoanModel::Repayment, dec!(150000), dec!(4), dec!(25)).unwrap();
        assert!(io.monthly_payment < rp.monthly_payment);
    }

    #[test]
    fn test_calculate_validated_matches_calculate() {
        let inputs = MortgageInputs::from_raw("100,000", "25", "4.5", Some(LoanModel::Repayment));
        let gated = validate(&inputs).validated().unwrap();
        let a = calculate_validated(&gated).unwrap();
        let b = calculate(LoanModel::Repayment, dec!(100000), dec!(4.5), dec!(25)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_envelope_repayment() {
        let out = calculate_mortgage(&standard_input(LoanModel::Repayment)).unwrap();
        assert!(out.methodology.contains("Repayment"));
        assert!(out.warnings.is_empty());
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
        assert_close(out.result.monthly_payment, dec!(555.83), TOL, "envelope payment");
    }

    #[test]
    fn test_envelope_interest_only_warns() {
        let out = calculate_mortgage(&standard_input(LoanModel::InterestOnly)).unwrap();
        assert!(out.methodology.contains("Interest-Only"));
        assert!(out.warnings.iter().any(|w| w.contains("principal")));
    }

    #[test]
    fn test_envelope_long_term_and_high_rate_warn() {
        let input = MortgageInput {
            model: LoanModel::Repayment,
            amount: dec!(100000),
            interest_rate: dec!(30),
            years: dec!(50),
        };
        let out = calculate_mortgage(&input).unwrap();
        assert_eq!(out.warnings.len(), 2);
    }

    #[test]
    fn test_envelope_rejects_non_positive() {
        let mut input = standard_input(LoanModel::Repayment);
        input.years = Decimal::ZERO;
        match calculate_mortgage(&input) {
            Err(MortgageCalcError::InvalidInput { field, .. }) => assert_eq!(field, "years"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_envelope_assumptions_echo_input() {
        let out = calculate_mortgage(&standard_input(LoanModel::InterestOnly)).unwrap();
        assert_eq!(out.assumptions["model"], "interest_only");
        assert_eq!(out.assumptions["amount"], "100000");
    }
}
