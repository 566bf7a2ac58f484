// Not every test binary uses every helper
#![allow(dead_code)]

use serde::Deserialize;
use vanilla_lib::{Compounding, MarketData, OptionContract, OptionType, PricingResult};

/// Reference row: contract, market and closed-form values computed offline
#[derive(Debug, Deserialize)]
pub struct ReferenceRow {
    pub option_type: OptionType,
    pub compounding: Compounding,
    pub spot: f64,
    pub strike: f64,
    pub rate: f64,
    pub dividend_yield: f64,
    pub volatility: f64,
    pub maturity: f64,
    pub npv: f64,
    pub delta: f64,
    pub gamma: f64,
    pub vega: f64,
    pub theta: f64,
    pub rho: f64,
    pub dividend_rho: f64,
}

impl ReferenceRow {
    pub fn contract(&self) -> OptionContract {
        OptionContract::new(self.option_type, self.strike, self.maturity)
    }

    pub fn market(&self) -> MarketData {
        MarketData::new(self.spot, self.rate, self.dividend_yield, self.volatility)
            .with_compounding(self.compounding)
    }

    /// Expected values as a `PricingResult` (extra fields left at zero)
    pub fn expected(&self) -> PricingResult {
        PricingResult {
            npv: self.npv,
            delta: self.delta,
            gamma: self.gamma,
            vega: self.vega,
            theta: self.theta,
            rho: self.rho,
            dividend_rho: self.dividend_rho,
            ..PricingResult::default()
        }
    }
}

/// Load the closed-form reference table
pub fn load_reference_rows(
    file_path: &str,
) -> Result<Vec<ReferenceRow>, Box<dyn std::error::Error>> {
    let mut reader = csv::Reader::from_path(file_path)?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: ReferenceRow = result?;
        rows.push(row);
    }
    Ok(rows)
}

/// Contract from the ATM scenario: one-year ATM call struck at 100
pub fn atm_contract(option_type: OptionType) -> OptionContract {
    OptionContract::new(option_type, 100.0, 1.0)
}

/// Market from the ATM scenario: S0 = 100, r = 6%, q = 3% (annual), vol = 30%
pub fn atm_market() -> MarketData {
    MarketData::new(100.0, 0.06, 0.03, 0.30)
}

/// A spread of contracts across moneyness, maturity and option type
pub fn contract_grid() -> Vec<OptionContract> {
    let mut contracts = Vec::new();
    for &option_type in &[OptionType::Call, OptionType::Put] {
        for &strike in &[60.0, 80.0, 95.0, 100.0, 105.0, 120.0, 150.0] {
            for &maturity in &[1.0 / 52.0, 0.25, 1.0, 5.0] {
                contracts.push(OptionContract::new(option_type, strike, maturity));
            }
        }
    }
    contracts
}
