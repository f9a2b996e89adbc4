//! Rounding for display. Calculations never round; callers apply these to
//! finished results just before rendering.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::amortization::PaymentOutput;
use crate::loans::AggregateLoanPosition;

/// Decimal places for currency amounts.
pub const MONEY_DP: u32 = 2;

/// Decimal places for rates (percent or periodic).
pub const RATE_DP: u32 = 4;

/// Round half-up (away from zero) to cents.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Round half-up to [`RATE_DP`] places.
pub fn round_rate(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(RATE_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// A copy of the value rounded for presentation.
pub trait Rounded {
    fn rounded(&self) -> Self;
}

impl Rounded for AggregateLoanPosition {
    fn rounded(&self) -> Self {
        Self {
            total_balance: round_money(self.total_balance),
            total_monthly_payment: round_money(self.total_monthly_payment),
            weighted_average_rate: round_rate(self.weighted_average_rate),
            loan_count: self.loan_count,
        }
    }
}

impl Rounded for PaymentOutput {
    fn rounded(&self) -> Self {
        Self {
            monthly_payment: round_money(self.monthly_payment),
            monthly_rate: round_rate(self.monthly_rate),
            total_paid: round_money(self.total_paid),
            total_interest: round_money(self.total_interest),
        }
    }
}

#[cfg(feature = "restructure")]
mod restructure_impls {
    use super::*;
    use crate::restructure::{LoanStructure, RestructureAnalysis, RestructureLeg, RestructureScenario};

    impl Rounded for RestructureLeg {
        fn rounded(&self) -> Self {
            Self {
                rate_offer: self.rate_offer.clone(),
                rate: round_rate(self.rate),
                amount: round_money(self.amount),
                monthly_payment: round_money(self.monthly_payment),
            }
        }
    }

    impl Rounded for RestructureScenario {
        fn rounded(&self) -> Self {
            Self {
                combination_name: self.combination_name.clone(),
                split_amount: round_money(self.split_amount),
                legs: self.legs.iter().map(Rounded::rounded).collect(),
                total_monthly_payment: round_money(self.total_monthly_payment),
                monthly_savings: round_money(self.monthly_savings),
                annual_savings: round_money(self.annual_savings),
                weighted_average_rate: round_rate(self.weighted_average_rate),
                break_even_months: self.break_even_months,
            }
        }
    }

    impl Rounded for RestructureAnalysis {
        fn rounded(&self) -> Self {
            Self {
                current_position: self.current_position.rounded(),
                loan_structure: LoanStructure {
                    split_count: self.loan_structure.split_count,
                    leg_amount: round_money(self.loan_structure.leg_amount),
                    total_amount: round_money(self.loan_structure.total_amount),
                },
                scenarios: self.scenarios.iter().map(Rounded::rounded).collect(),
                candidates_evaluated: self.candidates_evaluated,
            }
        }
    }
}

#[cfg(feature = "schedule")]
mod schedule_impls {
    use super::*;
    use crate::schedule::{AmortizationSchedule, ScheduleRow};

    impl Rounded for AmortizationSchedule {
        fn rounded(&self) -> Self {
            Self {
                monthly_payment: round_money(self.monthly_payment),
                rows: self
                    .rows
                    .iter()
                    .map(|r| ScheduleRow {
                        month: r.month,
                        payment: round_money(r.payment),
                        interest: round_money(r.interest),
                        principal: round_money(r.principal),
                        closing_balance: round_money(r.closing_balance),
                    })
                    .collect(),
                total_paid: round_money(self.total_paid),
                total_interest: round_money(self.total_interest),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_half_up_to_cents() {
        assert_eq!(round_money(dec!(1.005)), dec!(1.01));
        assert_eq!(round_money(dec!(1.0049)), dec!(1.00));
        assert_eq!(round_money(dec!(-2.345)), dec!(-2.35));
    }

    #[test]
    fn test_rate_places() {
        assert_eq!(round_rate(dec!(3.66666666)), dec!(3.6667));
    }

    #[test]
    fn test_position_rounding_keeps_count() {
        let pos = AggregateLoanPosition {
            total_balance: dec!(150000.004),
            total_monthly_payment: dec!(750.125),
            weighted_average_rate: dec!(3.666666),
            loan_count: 2,
        };
        let r = pos.rounded();
        assert_eq!(r.total_balance, dec!(150000.00));
        assert_eq!(r.total_monthly_payment, dec!(750.13));
        assert_eq!(r.weighted_average_rate, dec!(3.6667));
        assert_eq!(r.loan_count, 2);
    }
}
