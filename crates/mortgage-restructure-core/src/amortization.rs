//! Level-payment amortisation for fixed-rate, fixed-term loans.
//!
//! Rates come in as annual percentages (3.5 = 3.5% p.a.) and are converted
//! to a monthly periodic rate internally. All math in `rust_decimal::Decimal`;
//! nothing is rounded here.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate, MONTHS_PER_YEAR};
use crate::MortgageResult;

/// Convert an annual percentage rate to the monthly periodic rate.
/// 3.5 (% p.a.) -> 0.035 / 12.
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / dec!(100) / Decimal::from(MONTHS_PER_YEAR)
}

/// Monthly payment on a level-pay loan.
///
/// `P * r / (1 - (1+r)^-n)` with `r` the monthly rate, or straight-line
/// `P / n` when the rate is zero. The discount factor `(1+r)^-n` stays in
/// `[0, 1]`, so only the final product can leave the decimal range; that
/// case is reported as `InvalidInput` on the principal.
pub fn monthly_payment(
    principal: Money,
    annual_rate_percent: Percent,
    term_months: u32,
) -> MortgageResult<Money> {
    validate_terms(principal, annual_rate_percent, term_months)?;

    let n = Decimal::from(term_months);
    if annual_rate_percent.is_zero() {
        return Ok(principal / n);
    }

    let r = monthly_rate(annual_rate_percent);
    let discount = (Decimal::ONE / (Decimal::ONE + r))
        .checked_powu(u64::from(term_months))
        .unwrap_or(Decimal::ZERO);

    let denom = Decimal::ONE - discount;
    if denom <= Decimal::ZERO {
        return Err(MortgageError::DivisionByZero {
            context: "amortisation factor".into(),
        });
    }

    principal
        .checked_mul(r)
        .and_then(|interest| interest.checked_div(denom))
        .ok_or_else(|| out_of_range("principal", principal))
}

/// Interest paid over the full term: `payment * n - principal`.
pub fn total_interest(
    principal: Money,
    annual_rate_percent: Percent,
    term_months: u32,
) -> MortgageResult<Money> {
    let payment = monthly_payment(principal, annual_rate_percent, term_months)?;
    Ok(lifetime_paid(principal, payment, term_months)? - principal)
}

/// `payment * n`, checked.
pub(crate) fn lifetime_paid(
    principal: Money,
    payment: Money,
    term_months: u32,
) -> MortgageResult<Money> {
    payment
        .checked_mul(Decimal::from(term_months))
        .ok_or_else(|| out_of_range("principal", principal))
}

pub(crate) fn out_of_range(field: &str, value: Decimal) -> MortgageError {
    MortgageError::invalid(field, format!("{value} is too large to amortise in decimal range"))
}

fn validate_terms(
    principal: Money,
    annual_rate_percent: Percent,
    term_months: u32,
) -> MortgageResult<()> {
    if principal < Decimal::ZERO {
        return Err(MortgageError::invalid(
            "principal",
            "Principal cannot be negative",
        ));
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(MortgageError::invalid(
            "annual_rate_percent",
            "Interest rate cannot be negative",
        ));
    }
    if term_months == 0 {
        return Err(MortgageError::invalid(
            "term_months",
            "Term must be at least one month",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Envelope API
// ---------------------------------------------------------------------------

/// Single-loan payment calculation input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    pub principal: Money,
    /// Annual rate in percent (e.g. 5.25).
    pub annual_rate_percent: Percent,
    pub term_months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOutput {
    pub monthly_payment: Money,
    pub monthly_rate: Rate,
    pub total_paid: Money,
    pub total_interest: Money,
}

/// Monthly payment plus lifetime totals for one loan.
pub fn calculate_payment(input: &PaymentInput) -> MortgageResult<ComputationOutput<PaymentOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let payment = monthly_payment(input.principal, input.annual_rate_percent, input.term_months)?;
    let total_paid = lifetime_paid(input.principal, payment, input.term_months)?;

    if input.annual_rate_percent > dec!(25) {
        warnings.push(format!(
            "Rate of {}% is unusually high for a mortgage",
            input.annual_rate_percent
        ));
    }

    let output = PaymentOutput {
        monthly_payment: payment,
        monthly_rate: monthly_rate(input.annual_rate_percent),
        total_paid,
        total_interest: total_paid - input.principal,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortisation",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

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

    #[test]
    fn test_zero_rate_is_straight_line() {
        let pmt = monthly_payment(dec!(120_000), dec!(0), 300).unwrap();
        assert_eq!(pmt, dec!(400));
    }

    #[test]
    fn test_thirty_year_six_percent() {
        let pmt = monthly_payment(dec!(100_000), dec!(6), 360).unwrap();
        assert_close(pmt, dec!(599.55), dec!(0.01), "100k @ 6% / 30y");
    }

    #[test]
    fn test_twenty_five_year_three_and_half() {
        let pmt = monthly_payment(dec!(250_000), dec!(3.5), 300).unwrap();
        assert_close(pmt, dec!(1251.56), dec!(0.01), "250k @ 3.5% / 25y");
    }

    #[test]
    fn test_interest_is_positive() {
        let principal = dec!(80_000);
        let pmt = monthly_payment(principal, dec!(0.25), 12).unwrap();
        assert!(pmt * dec!(12) > principal);
        assert!(total_interest(principal, dec!(0.25), 12).unwrap() > Decimal::ZERO);
    }

    #[test]
    fn test_zero_principal() {
        assert_eq!(monthly_payment(dec!(0), dec!(5), 120).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_monthly_rate_conversion() {
        assert_eq!(monthly_rate(dec!(6)), dec!(0.005));
    }

    #[test]
    fn test_rejects_negative_principal() {
        let err = monthly_payment(dec!(-1), dec!(5), 120).unwrap_err();
        match err {
            MortgageError::InvalidInput { field, .. } => assert_eq!(field, "principal"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_negative_rate() {
        assert!(matches!(
            monthly_payment(dec!(1000), dec!(-0.5), 120),
            Err(MortgageError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_term() {
        assert!(matches!(
            monthly_payment(dec!(1000), dec!(5), 0),
            Err(MortgageError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_long_compounding_tends_to_interest_only() {
        // (1+r)^-n vanishes, so the payment approaches P * r.
        let pmt = monthly_payment(dec!(1000), dec!(1000), 600).unwrap();
        let r = monthly_rate(dec!(1000));
        assert_close(pmt, dec!(1000) * r, dec!(0.000001), "1000% over 50y");
    }

    #[test]
    fn test_large_principal_stays_finite() {
        let pmt = monthly_payment(dec!(100_000_000_000_000_000_000), dec!(100), 300).unwrap();
        assert!(pmt > dec!(100_000_000_000_000_000_000) * monthly_rate(dec!(100)));
        assert!(pmt < dec!(100_000_000_000_000_000_000));
    }

    #[test]
    fn test_payment_beyond_decimal_range_is_reported() {
        let err = monthly_payment(dec!(70_000_000_000_000_000_000_000_000_000), dec!(12000), 12)
            .unwrap_err();
        match err {
            MortgageError::InvalidInput { field, .. } => assert_eq!(field, "principal"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_lifetime_total_beyond_decimal_range_is_reported() {
        let input = PaymentInput {
            principal: dec!(70_000_000_000_000_000_000_000_000_000),
            annual_rate_percent: dec!(12),
            term_months: 360,
        };
        assert!(matches!(
            calculate_payment(&input),
            Err(MortgageError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_calculate_payment_totals() {
        let input = PaymentInput {
            principal: dec!(100_000),
            annual_rate_percent: dec!(6),
            term_months: 360,
        };
        let out = calculate_payment(&input).unwrap();
        let r = &out.result;
        assert_eq!(r.total_paid, r.monthly_payment * dec!(360));
        assert_eq!(r.total_interest, r.total_paid - dec!(100_000));
        assert!(out.warnings.is_empty());
        assert_eq!(out.methodology, "Level-payment amortisation");
    }
}
