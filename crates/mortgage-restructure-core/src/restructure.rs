//! Equal-split restructuring: re-divide the total balance into `split_count`
//! equal legs, try every combination of offered rates across the legs, rank
//! by monthly savings against the current payment and collapse combinations
//! that use the same set of rates in a different order.
//!
//! Ranking is by `monthly_savings` descending. Ties are broken by the leg
//! rate names compared element by element, ascending, so output order never
//! depends on the order of the rate table. Deduplication runs after the sort,
//! so the surviving member of each symmetric class is the one with its legs
//! in ascending name order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

use crate::amortization::monthly_payment;
use crate::error::MortgageError;
use crate::loans::{aggregate, AggregateLoanPosition, Loan};
use crate::rates::{validate_offers, RateOffer};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, MONTHS_PER_YEAR};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Two loans of equal size.
pub const DEFAULT_SPLIT_COUNT: u32 = 2;

/// 25-year term.
pub const DEFAULT_TERM_MONTHS: u32 = 300;

/// Number of unique combinations returned.
pub const DEFAULT_TOP_N: usize = 15;

/// Upper bound on `offers ^ split_count` ordered combinations.
pub const MAX_CANDIDATES: usize = 1_000_000;

/// Upper bound on legs built across all candidates (`candidates * split_count`).
pub const MAX_LEGS: usize = 2_000_000;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One of the new loans in a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestructureLeg {
    pub rate_offer: String,
    pub rate: Percent,
    pub amount: Money,
    pub monthly_payment: Money,
}

/// A candidate re-split of the total balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestructureScenario {
    /// Leg rate names joined with " + ", e.g. "flexi + 24_months_fixed".
    pub combination_name: String,
    /// Balance carried by each leg.
    pub split_amount: Money,
    pub legs: Vec<RestructureLeg>,
    pub total_monthly_payment: Money,
    /// Current payment minus the new payment; negative means the scenario costs more.
    pub monthly_savings: Money,
    pub annual_savings: Money,
    /// Simple mean of leg rates (legs are equal-sized).
    pub weighted_average_rate: Percent,
    /// Months of savings needed to recover the restructure cost, if one was given
    /// and the scenario saves money.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_even_months: Option<Decimal>,
}

impl RestructureScenario {
    /// Leg rate names in leg order.
    pub fn leg_rate_offers(&self) -> Vec<&str> {
        self.legs.iter().map(|l| l.rate_offer.as_str()).collect()
    }

    /// Order-independent identity: the sorted multiset of leg rate names.
    fn combination_key(&self) -> Vec<String> {
        let mut key: Vec<String> = self.legs.iter().map(|l| l.rate_offer.clone()).collect();
        key.sort();
        key
    }
}

/// Knobs for [`generate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub split_count: u32,
    pub term_months: u32,
    pub top_n: usize,
    /// Upfront cost of restructuring (break fees, legal), for break-even.
    pub restructure_cost: Option<Money>,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            split_count: DEFAULT_SPLIT_COUNT,
            term_months: DEFAULT_TERM_MONTHS,
            top_n: DEFAULT_TOP_N,
            restructure_cost: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Scenario generation
// ---------------------------------------------------------------------------

/// Enumerate, score, rank and deduplicate restructure scenarios.
///
/// Every ordered tuple of `split_count` offers is evaluated (pairs in the
/// usual two-loan case), so the work grows as `offers ^ split_count`.
pub fn generate(
    total_balance: Money,
    current_total_payment: Money,
    rate_offers: &[RateOffer],
    params: &ScenarioParams,
) -> MortgageResult<Vec<RestructureScenario>> {
    validate_params(total_balance, rate_offers, params)?;
    let total_candidates = candidate_count(rate_offers.len(), params.split_count)?;

    let split = params.split_count as usize;
    let leg_amount = total_balance / Decimal::from(params.split_count);

    // Every leg has the same amount, so each offer's payment is computed once.
    let offer_payments = rate_offers
        .iter()
        .map(|offer| monthly_payment(leg_amount, offer.annual_rate_percent, params.term_months))
        .collect::<MortgageResult<Vec<Money>>>()?;

    let mut candidates = Vec::with_capacity(total_candidates);
    let mut indices = vec![0usize; split];
    loop {
        candidates.push(build_scenario(
            &indices,
            rate_offers,
            &offer_payments,
            leg_amount,
            current_total_payment,
            params.restructure_cost,
        )?);
        if !advance(&mut indices, rate_offers.len()) {
            break;
        }
    }

    candidates.sort_by(|a, b| {
        b.monthly_savings.cmp(&a.monthly_savings).then_with(|| {
            a.legs
                .iter()
                .map(|l| &l.rate_offer)
                .cmp(b.legs.iter().map(|l| &l.rate_offer))
        })
    });

    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut unique = Vec::with_capacity(params.top_n.min(candidates.len()));
    for scenario in candidates {
        if unique.len() == params.top_n {
            break;
        }
        if seen.insert(scenario.combination_key()) {
            unique.push(scenario);
        }
    }

    tracing::debug!(
        candidates = total_candidates,
        returned = unique.len(),
        split_count = params.split_count,
        "generated restructure scenarios"
    );

    Ok(unique)
}

fn build_scenario(
    indices: &[usize],
    rate_offers: &[RateOffer],
    offer_payments: &[Money],
    leg_amount: Money,
    current_total_payment: Money,
    restructure_cost: Option<Money>,
) -> MortgageResult<RestructureScenario> {
    let legs: Vec<RestructureLeg> = indices
        .iter()
        .map(|&i| RestructureLeg {
            rate_offer: rate_offers[i].name.clone(),
            rate: rate_offers[i].annual_rate_percent,
            amount: leg_amount,
            monthly_payment: offer_payments[i],
        })
        .collect();

    let total_monthly_payment =
        checked_sum(legs.iter().map(|l| l.monthly_payment), "total_balance")?;
    let monthly_savings = current_total_payment
        .checked_sub(total_monthly_payment)
        .ok_or_else(|| exceeds_range("total_balance"))?;
    let annual_savings = monthly_savings
        .checked_mul(Decimal::from(MONTHS_PER_YEAR))
        .ok_or_else(|| exceeds_range("total_balance"))?;
    let rate_sum = checked_sum(legs.iter().map(|l| l.rate), "rate_offers")?;
    let combination_name = legs
        .iter()
        .map(|l| l.rate_offer.as_str())
        .collect::<Vec<_>>()
        .join(" + ");

    Ok(RestructureScenario {
        combination_name,
        split_amount: leg_amount,
        weighted_average_rate: rate_sum / Decimal::from(legs.len()),
        legs,
        total_monthly_payment,
        monthly_savings,
        annual_savings,
        break_even_months: restructure_cost.and_then(|cost| break_even_months(cost, monthly_savings)),
    })
}

fn checked_sum(mut values: impl Iterator<Item = Decimal>, field: &str) -> MortgageResult<Decimal> {
    values.try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v).ok_or_else(|| exceeds_range(field))
    })
}

fn exceeds_range(field: &str) -> MortgageError {
    MortgageError::invalid(field, "Scenario totals exceed decimal range")
}

/// Months until cumulative savings cover `cost`; `None` if the scenario never
/// does or the count is beyond decimal range.
pub fn break_even_months(cost: Money, monthly_savings: Money) -> Option<Decimal> {
    if monthly_savings <= Decimal::ZERO {
        return None;
    }
    cost.checked_div(monthly_savings).map(|months| months.ceil())
}

/// Odometer step over `base`-ary tuples, last position fastest.
/// Returns false once every tuple has been visited.
fn advance(indices: &mut [usize], base: usize) -> bool {
    for slot in indices.iter_mut().rev() {
        *slot += 1;
        if *slot < base {
            return true;
        }
        *slot = 0;
    }
    false
}

/// Number of ordered combinations, `offers ^ split_count`, bounded by
/// [`MAX_CANDIDATES`]. The legs those combinations carry are bounded by
/// [`MAX_LEGS`], which also limits `split_count` on a one-offer sheet.
pub fn candidate_count(offer_count: usize, split_count: u32) -> MortgageResult<usize> {
    let too_many = || {
        MortgageError::invalid(
            "split_count",
            format!(
                "{offer_count} offers across {split_count} legs exceeds {MAX_CANDIDATES} combinations or {MAX_LEGS} legs"
            ),
        )
    };
    let candidates = offer_count
        .checked_pow(split_count)
        .filter(|&n| n <= MAX_CANDIDATES)
        .ok_or_else(too_many)?;
    usize::try_from(split_count)
        .ok()
        .and_then(|split| candidates.checked_mul(split))
        .filter(|&legs| legs <= MAX_LEGS)
        .ok_or_else(too_many)?;
    Ok(candidates)
}

fn validate_params(
    total_balance: Money,
    rate_offers: &[RateOffer],
    params: &ScenarioParams,
) -> MortgageResult<()> {
    if total_balance < Decimal::ZERO {
        return Err(MortgageError::invalid(
            "total_balance",
            "Total balance cannot be negative",
        ));
    }
    if params.split_count == 0 {
        return Err(MortgageError::invalid(
            "split_count",
            "Balance must be split into at least one loan",
        ));
    }
    if params.term_months == 0 {
        return Err(MortgageError::invalid(
            "term_months",
            "Term must be at least one month",
        ));
    }
    if let Some(cost) = params.restructure_cost {
        if cost < Decimal::ZERO {
            return Err(MortgageError::invalid(
                "restructure_cost",
                "Restructure cost cannot be negative",
            ));
        }
    }
    validate_offers(rate_offers)
}

// ---------------------------------------------------------------------------
// Full analysis
// ---------------------------------------------------------------------------

fn default_split_count() -> u32 {
    DEFAULT_SPLIT_COUNT
}

fn default_term_months() -> u32 {
    DEFAULT_TERM_MONTHS
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

/// Existing loans plus the rate sheet to restructure against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestructureInput {
    pub existing_loans: Vec<Loan>,
    pub rate_offers: Vec<RateOffer>,
    #[serde(default = "default_split_count")]
    pub split_count: u32,
    #[serde(default = "default_term_months")]
    pub term_months: u32,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restructure_cost: Option<Money>,
}

impl RestructureInput {
    pub fn params(&self) -> ScenarioParams {
        ScenarioParams {
            split_count: self.split_count,
            term_months: self.term_months,
            top_n: self.top_n,
            restructure_cost: self.restructure_cost,
        }
    }
}

/// How the balance is carved up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanStructure {
    pub split_count: u32,
    pub leg_amount: Money,
    pub total_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestructureAnalysis {
    pub current_position: AggregateLoanPosition,
    pub loan_structure: LoanStructure,
    pub scenarios: Vec<RestructureScenario>,
    /// Ordered combinations scored before deduplication.
    pub candidates_evaluated: usize,
}

/// Aggregate the existing loans, then rank restructure scenarios against
/// the current total payment.
pub fn analyze_restructure(
    input: &RestructureInput,
) -> MortgageResult<ComputationOutput<RestructureAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let position = aggregate(&input.existing_loans)?;
    let params = input.params();
    let scenarios = generate(
        position.total_balance,
        position.total_monthly_payment,
        &input.rate_offers,
        &params,
    )?;
    let candidates_evaluated = candidate_count(input.rate_offers.len(), params.split_count)?;

    if position.total_balance.is_zero() {
        warnings.push("Total balance is zero; every scenario has a zero payment".into());
    }
    if position.total_monthly_payment.is_zero() {
        warnings.push("Current monthly payment is zero; savings will be zero or negative".into());
    }
    if params.split_count != DEFAULT_SPLIT_COUNT {
        warnings.push(format!(
            "Split into {} loans generalises the two-loan strategy; {} combinations evaluated",
            params.split_count, candidates_evaluated
        ));
    }
    if let Some(best) = scenarios.first() {
        if best.monthly_savings <= Decimal::ZERO {
            tracing::warn!(best_savings = %best.monthly_savings, "no saving scenario");
            warnings.push(format!(
                "No rate combination lowers the current monthly payment of {}",
                position.total_monthly_payment.round_dp(2)
            ));
        }
    }

    let leg_amount = position.total_balance / Decimal::from(params.split_count);
    let analysis = RestructureAnalysis {
        loan_structure: LoanStructure {
            split_count: params.split_count,
            leg_amount,
            total_amount: position.total_balance,
        },
        current_position: position,
        scenarios,
        candidates_evaluated,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Equal-split restructure with exhaustive rate-combination search",
        input,
        warnings,
        elapsed,
        analysis,
    ))
}
