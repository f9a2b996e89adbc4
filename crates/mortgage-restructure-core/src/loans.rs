//! Aggregation of a borrower's existing loans into a single position.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::MortgageResult;

/// One existing mortgage obligation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    /// Lender or statement identifier, e.g. "Loan A".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_id: Option<String>,
    /// Outstanding balance.
    pub balance: Money,
    /// Annual rate in percent (3.5 = 3.5%).
    pub rate: Percent,
    /// Current contractual monthly payment.
    pub monthly_payment: Money,
}

impl Loan {
    pub fn new(balance: Money, rate: Percent, monthly_payment: Money) -> Self {
        Self {
            loan_id: None,
            balance,
            rate,
            monthly_payment,
        }
    }
}

/// Totals across all existing loans. Derived on every call, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateLoanPosition {
    pub total_balance: Money,
    pub total_monthly_payment: Money,
    /// Balance-weighted average rate in percent; 0 when the total balance is 0.
    pub weighted_average_rate: Percent,
    pub loan_count: usize,
}

/// Reduce `loans` to totals and a balance-weighted average rate.
pub fn aggregate(loans: &[Loan]) -> MortgageResult<AggregateLoanPosition> {
    if loans.is_empty() {
        return Err(MortgageError::NoLoansFound);
    }

    let mut total_balance = Decimal::ZERO;
    let mut total_monthly_payment = Decimal::ZERO;
    let mut balance_times_rate = Decimal::ZERO;

    for (i, loan) in loans.iter().enumerate() {
        validate_loan(i, loan)?;
        total_balance = total_balance
            .checked_add(loan.balance)
            .ok_or_else(|| too_large(i, "balance"))?;
        total_monthly_payment = total_monthly_payment
            .checked_add(loan.monthly_payment)
            .ok_or_else(|| too_large(i, "monthly_payment"))?;
        balance_times_rate = loan
            .balance
            .checked_mul(loan.rate)
            .and_then(|weighted| balance_times_rate.checked_add(weighted))
            .ok_or_else(|| too_large(i, "balance"))?;
    }

    Ok(AggregateLoanPosition {
        total_balance,
        total_monthly_payment,
        weighted_average_rate: weighted_rate(balance_times_rate, total_balance),
        loan_count: loans.len(),
    })
}

/// Rate is 0, not an error, when the total balance is 0.
fn weighted_rate(balance_times_rate: Decimal, total_balance: Money) -> Percent {
    if total_balance.is_zero() {
        Decimal::ZERO
    } else {
        balance_times_rate / total_balance
    }
}

fn too_large(index: usize, field: &str) -> MortgageError {
    MortgageError::invalid(
        format!("existing_loans[{index}].{field}"),
        "Totals across loans exceed decimal range",
    )
}

fn validate_loan(index: usize, loan: &Loan) -> MortgageResult<()> {
    if loan.balance < Decimal::ZERO {
        return Err(MortgageError::invalid(
            format!("existing_loans[{index}].balance"),
            "Loan balance cannot be negative",
        ));
    }
    if loan.rate < Decimal::ZERO {
        return Err(MortgageError::invalid(
            format!("existing_loans[{index}].rate"),
            "Loan rate cannot be negative",
        ));
    }
    if loan.monthly_payment < Decimal::ZERO {
        return Err(MortgageError::invalid(
            format!("existing_loans[{index}].monthly_payment"),
            "Monthly payment cannot be negative",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Envelope API
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanAnalysisInput {
    pub existing_loans: Vec<Loan>,
}

/// Aggregate the current loan book and flag anything worth a second look.
pub fn analyze_loans(
    input: &LoanAnalysisInput,
) -> MortgageResult<ComputationOutput<AggregateLoanPosition>> {
    let start = Instant::now();
    let position = aggregate(&input.existing_loans)?;

    let mut warnings = Vec::new();
    if position.total_balance.is_zero() {
        warnings.push("Total balance is zero; weighted average rate reported as 0".into());
    }
    for (i, loan) in input.existing_loans.iter().enumerate() {
        if loan.balance > Decimal::ZERO && loan.monthly_payment.is_zero() {
            warnings.push(format!(
                "Loan {} has a balance but no monthly payment",
                loan.loan_id.clone().unwrap_or_else(|| i.to_string())
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Balance-weighted loan aggregation",
        input,
        warnings,
        elapsed,
        position,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn two_loans() -> Vec<Loan> {
        vec![
            Loan::new(dec!(100_000), dec!(3.5), dec!(500)),
            Loan::new(dec!(50_000), dec!(4.0), dec!(250)),
        ]
    }

    #[test]
    fn test_aggregate_two_loans() {
        let pos = aggregate(&two_loans()).unwrap();
        assert_eq!(pos.total_balance, dec!(150_000));
        assert_eq!(pos.total_monthly_payment, dec!(750));
        assert_eq!(pos.loan_count, 2);
        assert!((pos.weighted_average_rate - dec!(3.667)).abs() < dec!(0.001));
    }

    #[test]
    fn test_empty_loans_rejected() {
        assert!(matches!(aggregate(&[]), Err(MortgageError::NoLoansFound)));
    }

    #[test]
    fn test_zero_balance_gives_zero_rate() {
        let loans = vec![
            Loan::new(dec!(0), dec!(5), dec!(0)),
            Loan::new(dec!(0), dec!(7), dec!(0)),
        ];
        let pos = aggregate(&loans).unwrap();
        assert_eq!(pos.weighted_average_rate, Decimal::ZERO);
        assert_eq!(pos.loan_count, 2);
    }

    #[test]
    fn test_weighting_ignores_zero_balance_loans() {
        let loans = vec![
            Loan::new(dec!(200_000), dec!(4), dec!(1_000)),
            Loan::new(dec!(0), dec!(9), dec!(0)),
        ];
        assert_eq!(aggregate(&loans).unwrap().weighted_average_rate, dec!(4));
    }

    #[test]
    fn test_negative_balance_names_the_loan() {
        let mut loans = two_loans();
        loans[1].balance = dec!(-1);
        match aggregate(&loans).unwrap_err() {
            MortgageError::InvalidInput { field, .. } => {
                assert_eq!(field, "existing_loans[1].balance")
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_balances_beyond_decimal_range_are_reported() {
        let huge = dec!(70_000_000_000_000_000_000_000_000_000);
        let loans = vec![
            Loan::new(huge, dec!(5), dec!(1_000)),
            Loan::new(huge, dec!(5), dec!(1_000)),
        ];
        match aggregate(&loans).unwrap_err() {
            MortgageError::InvalidInput { field, .. } => {
                assert_eq!(field, "existing_loans[0].balance")
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_payments_beyond_decimal_range_are_reported() {
        let huge = dec!(70_000_000_000_000_000_000_000_000_000);
        let loans = vec![
            Loan::new(dec!(1_000), dec!(0), huge),
            Loan::new(dec!(1_000), dec!(0), huge),
        ];
        match aggregate(&loans).unwrap_err() {
            MortgageError::InvalidInput { field, .. } => {
                assert_eq!(field, "existing_loans[1].monthly_payment")
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_inputs_are_untouched() {
        let loans = two_loans();
        let before = loans.clone();
        let _ = aggregate(&loans).unwrap();
        assert_eq!(loans, before);
    }

    #[test]
    fn test_analyze_loans_flags_missing_payment() {
        let input = LoanAnalysisInput {
            existing_loans: vec![Loan {
                loan_id: Some("Loan B".into()),
                balance: dec!(10_000),
                rate: dec!(5),
                monthly_payment: dec!(0),
            }],
        };
        let out = analyze_loans(&input).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("Loan B"));
    }
}
