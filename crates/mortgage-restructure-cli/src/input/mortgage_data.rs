//! The mortgage data file: existing loans plus the lender's rate sheet.
//!
//! ```json
//! {
//!   "existing_loans": [{"balance": 300000, "rate": 7.24, "monthly_payment": 2250}],
//!   "market_conditions": {"current_rates": {"floating": 8.64, "12_months_fixed": 6.95}}
//! }
//! ```
//!
//! Rates may also sit directly under `market_conditions`, or be given as an
//! explicit `rate_offers` list.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};

use mortgage_restructure_core::loans::Loan;
use mortgage_restructure_core::rates::{RateOffer, RateTable};

#[derive(Debug, Deserialize)]
pub struct MortgageData {
    #[serde(default)]
    pub existing_loans: Vec<Loan>,
    #[serde(default)]
    pub market_conditions: Option<MarketConditions>,
    #[serde(default)]
    pub rate_offers: Option<Vec<RateOffer>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MarketConditions {
    Nested { current_rates: Map<String, Value> },
    Flat(Map<String, Value>),
}

impl MarketConditions {
    fn rates(&self) -> &Map<String, Value> {
        match self {
            MarketConditions::Nested { current_rates } => current_rates,
            MarketConditions::Flat(rates) => rates,
        }
    }

    /// Numeric entries only; anything else on the sheet (dates, notes) is skipped.
    fn numeric_rates(&self) -> Vec<(String, Decimal)> {
        self.rates()
            .iter()
            .filter_map(|(name, value)| {
                let rate = serde_json::from_value::<Decimal>(value.clone()).ok()?;
                Some((name.clone(), rate))
            })
            .collect()
    }
}

impl MortgageData {
    /// Load from `--input <file>` or stdin; `purpose` names the command in
    /// the error when neither is given.
    pub fn load(path: Option<&str>, purpose: &str) -> Result<Self, Box<dyn std::error::Error>> {
        super::load(path)?
            .ok_or_else(|| format!("--input <file.json> or stdin required for {purpose}").into())
    }

    /// Build the rate table. Explicit `rate_offers` win over the market sheet;
    /// from the sheet only recognised rate types are kept unless
    /// `all_rate_types` is set.
    pub fn rate_table(&self, all_rate_types: bool) -> Result<RateTable, Box<dyn std::error::Error>> {
        if let Some(offers) = &self.rate_offers {
            return Ok(RateTable::new(offers.clone())?);
        }

        let market = self
            .market_conditions
            .as_ref()
            .ok_or("input has neither 'rate_offers' nor 'market_conditions'")?;
        let rates = market.numeric_rates();
        tracing::debug!(count = rates.len(), all_rate_types, "read market rates");

        let table = if all_rate_types {
            RateTable::from_rates(rates)?
        } else {
            RateTable::standard(rates)?
        };
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_nested_current_rates() {
        let data: MortgageData = serde_json::from_str(
            r#"{"market_conditions": {"current_rates": {"floating": 8.64, "flexi": 8.74}, "as_of": "2024-05-01"}}"#,
        )
        .unwrap();
        let table = data.rate_table(false).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.offers()[0].name, "floating");
    }

    #[test]
    fn test_flat_rates_skip_non_numeric() {
        let data: MortgageData = serde_json::from_str(
            r#"{"market_conditions": {"offset": 8.64, "cashback": 2.0, "note": "indicative"}}"#,
        )
        .unwrap();
        assert_eq!(data.rate_table(false).unwrap().len(), 1);
        let all = data.rate_table(true).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all.get("cashback").unwrap().annual_rate_percent, dec!(2.0));
    }

    #[test]
    fn test_explicit_offers_take_precedence() {
        let data: MortgageData = serde_json::from_str(
            r#"{"rate_offers": [{"name": "teaser", "annual_rate_percent": 1.99}],
                "market_conditions": {"current_rates": {"floating": 8.64}}}"#,
        )
        .unwrap();
        let table = data.rate_table(false).unwrap();
        assert_eq!(table.offers()[0].name, "teaser");
    }

    #[test]
    fn test_missing_rates_is_an_error() {
        let data: MortgageData = serde_json::from_str(r#"{"existing_loans": []}"#).unwrap();
        assert!(data.rate_table(false).is_err());
    }
}
