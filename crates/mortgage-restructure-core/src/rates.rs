//! Named market rate offers available for a restructure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::MortgageError;
use crate::types::Percent;
use crate::MortgageResult;

/// Rate types quoted on a typical retail mortgage rate sheet, in display order.
pub const STANDARD_RATE_TYPES: [&str; 10] = [
    "floating",
    "flexi",
    "offset",
    "6_months_fixed",
    "12_months_fixed",
    "18_months_fixed",
    "24_months_fixed",
    "36_months_fixed",
    "48_months_fixed",
    "60_months_fixed",
];

/// A single named point on the rate sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateOffer {
    /// Identifier such as "12_months_fixed".
    pub name: String,
    /// Annual rate in percent.
    pub annual_rate_percent: Percent,
}

impl RateOffer {
    pub fn new(name: impl Into<String>, annual_rate_percent: Percent) -> Self {
        Self {
            name: name.into(),
            annual_rate_percent,
        }
    }
}

/// A validated set of rate offers: non-empty, uniquely named, non-negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RateTable {
    offers: Vec<RateOffer>,
}

impl RateTable {
    /// Accept every offer as given, preserving order.
    pub fn new(offers: Vec<RateOffer>) -> MortgageResult<Self> {
        validate_offers(&offers)?;
        Ok(Self { offers })
    }

    /// Build from `(name, rate)` pairs, in iteration order.
    pub fn from_rates<I, S>(rates: I) -> MortgageResult<Self>
    where
        I: IntoIterator<Item = (S, Percent)>,
        S: Into<String>,
    {
        Self::new(
            rates
                .into_iter()
                .map(|(name, rate)| RateOffer::new(name, rate))
                .collect(),
        )
    }

    /// Keep only the recognised rate types, ordered as in
    /// [`STANDARD_RATE_TYPES`]. Unrecognised keys are dropped.
    pub fn standard<I, S>(rates: I) -> MortgageResult<Self>
    where
        I: IntoIterator<Item = (S, Percent)>,
        S: AsRef<str>,
    {
        let supplied: Vec<(S, Percent)> = rates.into_iter().collect();
        let offers = STANDARD_RATE_TYPES
            .iter()
            .filter_map(|rate_type| {
                supplied
                    .iter()
                    .find(|(name, _)| name.as_ref() == *rate_type)
                    .map(|(_, rate)| RateOffer::new(*rate_type, *rate))
            })
            .collect();
        Self::new(offers)
    }

    pub fn offers(&self) -> &[RateOffer] {
        &self.offers
    }

    pub fn get(&self, name: &str) -> Option<&RateOffer> {
        self.offers.iter().find(|o| o.name == name)
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    pub fn into_offers(self) -> Vec<RateOffer> {
        self.offers
    }
}

pub(crate) fn validate_offers(offers: &[RateOffer]) -> MortgageResult<()> {
    if offers.is_empty() {
        return Err(MortgageError::invalid(
            "rate_offers",
            "At least one rate offer is required",
        ));
    }

    let mut seen = HashSet::with_capacity(offers.len());
    for (i, offer) in offers.iter().enumerate() {
        if offer.name.trim().is_empty() {
            return Err(MortgageError::invalid(
                format!("rate_offers[{i}].name"),
                "Rate offer name cannot be blank",
            ));
        }
        if offer.annual_rate_percent < Decimal::ZERO {
            return Err(MortgageError::invalid(
                format!("rate_offers[{i}].annual_rate_percent"),
                format!("Rate for '{}' cannot be negative", offer.name),
            ));
        }
        if !seen.insert(offer.name.as_str()) {
            return Err(MortgageError::invalid(
                format!("rate_offers[{i}].name"),
                format!("Duplicate rate offer '{}'", offer.name),
            ));
        }
    }
    Ok(())
}
