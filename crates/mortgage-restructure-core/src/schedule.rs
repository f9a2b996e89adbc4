//! Month-by-month amortisation schedule for a level-pay loan.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{lifetime_paid, monthly_payment, monthly_rate};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::MortgageResult;

/// Terms longer than this are reported but still built.
const LONG_TERM_MONTHS: u32 = 480;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub term_months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub monthly_payment: Money,
    pub rows: Vec<ScheduleRow>,
    pub total_paid: Money,
    pub total_interest: Money,
}

/// Build the full schedule. The last row takes whatever balance is left so
/// the loan closes at exactly zero.
pub fn build_schedule(
    input: &ScheduleInput,
) -> MortgageResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let payment = monthly_payment(input.principal, input.annual_rate_percent, input.term_months)?;
    let r = monthly_rate(input.annual_rate_percent);
    // Running totals stay below payment * n; check that once up front.
    lifetime_paid(input.principal, payment, input.term_months)?;

    if input.term_months > LONG_TERM_MONTHS {
        warnings.push(format!(
            "Term of {} months is longer than {} years",
            input.term_months,
            LONG_TERM_MONTHS / 12
        ));
    }

    let mut rows = Vec::with_capacity(input.term_months as usize);
    let mut balance = input.principal;
    let mut total_paid = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;

    for month in 1..=input.term_months {
        let interest = balance * r;
        let (month_payment, principal) = if month == input.term_months {
            (balance + interest, balance)
        } else {
            let p = (payment - interest).min(balance).max(Decimal::ZERO);
            (payment, p)
        };

        balance -= principal;
        total_paid += month_payment;
        total_interest += interest;

        rows.push(ScheduleRow {
            month,
            payment: month_payment,
            interest,
            principal,
            closing_balance: balance,
        });
    }

    let last_adjustment = rows
        .last()
        .map(|row| (row.payment - payment).abs())
        .unwrap_or(Decimal::ZERO);
    if last_adjustment > dec!(0.01) {
        warnings.push(format!(
            "Final payment differs from the level payment by {}",
            last_adjustment.round_dp(2)
        ));
    }

    let output = AmortizationSchedule {
        monthly_payment: payment,
        rows,
        total_paid,
        total_interest,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortisation schedule",
        input,
        warnings,
        elapsed,
        output,
    ))
}
