#![cfg(feature = "schedule")]

use mortgage_restructure_core::presentation::Rounded;
use mortgage_restructure_core::schedule::{build_schedule, ScheduleInput};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn test_schedule_interest_matches_level_payment_totals() {
    let input = ScheduleInput {
        principal: dec!(225_000),
        annual_rate_percent: dec!(6.59),
        term_months: 300,
    };
    let out = build_schedule(&input).unwrap();
    let s = &out.result;
    let level_total = s.monthly_payment * dec!(300);
    assert!((s.total_paid - level_total).abs() < dec!(0.01));
    assert!(s.rows.windows(2).all(|w| w[1].closing_balance <= w[0].closing_balance));
    assert!(s.rows.windows(2).all(|w| w[1].interest <= w[0].interest));
}

#[test]
fn test_rounded_schedule_rows_in_cents() {
    let input = ScheduleInput {
        principal: dec!(10_000),
        annual_rate_percent: dec!(5),
        term_months: 24,
    };
    let out = build_schedule(&input).unwrap().result.rounded();
    assert!(out.rows.iter().all(|r| r.payment.scale() <= 2 && r.interest.scale() <= 2));
    assert_eq!(out.rows.last().unwrap().closing_balance, Decimal::ZERO);
}
