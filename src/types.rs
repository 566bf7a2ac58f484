//! Contract, market and result value objects.
//!
//! Everything here is an immutable value: build a new instance to change a
//! field (see the `with_*` helpers on [`MarketData`]).

use crate::error::{PricingError, Result};

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Payoff direction: +1 for call, -1 for put
    pub fn phi(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Undiscounted intrinsic value at the given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        (self.phi() * (spot - strike)).max(0.0)
    }
}

/// European vanilla option contract.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionContract {
    /// Call or put
    pub option_type: OptionType,
    /// Strike price
    pub strike: f64,
    /// Time to maturity as an Actual/365-fixed year fraction
    pub maturity_years: f64,
}

impl OptionContract {
    pub fn new(option_type: OptionType, strike: f64, maturity_years: f64) -> Self {
        Self {
            option_type,
            strike,
            maturity_years,
        }
    }

    pub fn call(strike: f64, maturity_years: f64) -> Self {
        Self::new(OptionType::Call, strike, maturity_years)
    }

    pub fn put(strike: f64, maturity_years: f64) -> Self {
        Self::new(OptionType::Put, strike, maturity_years)
    }

    /// Rejects non-positive or non-finite strike and maturity.
    pub fn validate(&self) -> Result<()> {
        if !self.strike.is_finite() || self.strike <= 0.0 {
            return Err(PricingError::invalid_input(format!(
                "strike must be positive, got {}",
                self.strike
            )));
        }
        if !self.maturity_years.is_finite() || self.maturity_years <= 0.0 {
            return Err(PricingError::invalid_input(format!(
                "maturity must be a positive year fraction, got {}",
                self.maturity_years
            )));
        }
        Ok(())
    }

    /// Lower no-arbitrage bound: the discounted intrinsic value
    /// `max(phi * (S e^{-qT} - K e^{-rT}), 0)`.
    pub fn discounted_intrinsic(&self, market: &MarketData) -> f64 {
        let t = self.maturity_years;
        let forward_spot = market.spot * market.dividend_discount_factor(t);
        let discounted_strike = self.strike * market.discount_factor(t);
        self.option_type.intrinsic(forward_spot, discounted_strike)
    }

    /// Upper no-arbitrage bound: `S e^{-qT}` for a call, `K e^{-rT}` for a put.
    pub fn price_upper_bound(&self, market: &MarketData) -> f64 {
        let t = self.maturity_years;
        match self.option_type {
            OptionType::Call => market.spot * market.dividend_discount_factor(t),
            OptionType::Put => self.strike * market.discount_factor(t),
        }
    }
}

/// Quoting convention of the rate and dividend yield inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Compounding {
    Continuous,
    #[default]
    Annual,
    SemiAnnual,
    Quarterly,
    Monthly,
}

impl Compounding {
    /// Compounding periods per year, `None` for continuous compounding
    pub fn periods_per_year(&self) -> Option<f64> {
        match self {
            Compounding::Continuous => None,
            Compounding::Annual => Some(1.0),
            Compounding::SemiAnnual => Some(2.0),
            Compounding::Quarterly => Some(4.0),
            Compounding::Monthly => Some(12.0),
        }
    }

    /// Equivalent continuously-compounded rate: `f * ln(1 + r / f)`.
    pub fn to_continuous(&self, rate: f64) -> f64 {
        match self.periods_per_year() {
            None => rate,
            Some(f) => f * (rate / f).ln_1p(),
        }
    }

    fn accepts(&self, rate: f64) -> bool {
        match self.periods_per_year() {
            None => rate.is_finite(),
            Some(f) => rate.is_finite() && 1.0 + rate / f > 0.0,
        }
    }
}

/// Flat market environment for a single pricing call.
///
/// Rates are quoted in `compounding` (annual by default) and normalised to
/// continuous compounding by the pricer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketData {
    /// Spot price of the underlying
    pub spot: f64,
    /// Risk-free rate quoted in `compounding`
    pub risk_free_rate: f64,
    /// Dividend yield quoted in `compounding`
    pub dividend_yield: f64,
    /// Black-Scholes volatility (decimal, e.g. 0.30)
    pub volatility: f64,
    /// Quoting convention of the two rates
    #[cfg_attr(feature = "serde", serde(default))]
    pub compounding: Compounding,
}

impl MarketData {
    /// Market data with annually compounded rate and dividend yield.
    pub fn new(spot: f64, risk_free_rate: f64, dividend_yield: f64, volatility: f64) -> Self {
        Self {
            spot,
            risk_free_rate,
            dividend_yield,
            volatility,
            compounding: Compounding::Annual,
        }
    }

    /// Market data with continuously compounded rate and dividend yield.
    pub fn continuous(
        spot: f64,
        risk_free_rate: f64,
        dividend_yield: f64,
        volatility: f64,
    ) -> Self {
        Self::new(spot, risk_free_rate, dividend_yield, volatility)
            .with_compounding(Compounding::Continuous)
    }

    pub fn with_spot(self, spot: f64) -> Self {
        Self { spot, ..self }
    }

    pub fn with_volatility(self, volatility: f64) -> Self {
        Self { volatility, ..self }
    }

    pub fn with_risk_free_rate(self, risk_free_rate: f64) -> Self {
        Self {
            risk_free_rate,
            ..self
        }
    }

    pub fn with_dividend_yield(self, dividend_yield: f64) -> Self {
        Self {
            dividend_yield,
            ..self
        }
    }

    pub fn with_compounding(self, compounding: Compounding) -> Self {
        Self {
            compounding,
            ..self
        }
    }

    /// Continuously-compounded risk-free rate
    pub fn continuous_rate(&self) -> f64 {
        self.compounding.to_continuous(self.risk_free_rate)
    }

    /// Continuously-compounded dividend yield
    pub fn continuous_dividend_yield(&self) -> f64 {
        self.compounding.to_continuous(self.dividend_yield)
    }

    /// `e^{-rT}`
    pub fn discount_factor(&self, t: f64) -> f64 {
        (-self.continuous_rate() * t).exp()
    }

    /// `e^{-qT}`
    pub fn dividend_discount_factor(&self, t: f64) -> f64 {
        (-self.continuous_dividend_yield() * t).exp()
    }

    /// Forward price `S e^{(r-q)T}`
    pub fn forward(&self, t: f64) -> f64 {
        self.spot * ((self.continuous_rate() - self.continuous_dividend_yield()) * t).exp()
    }

    /// Validates spot and rates; the volatility field is not inspected.
    pub fn validate_without_volatility(&self) -> Result<()> {
        if !self.spot.is_finite() || self.spot <= 0.0 {
            return Err(PricingError::invalid_input(format!(
                "spot must be positive, got {}",
                self.spot
            )));
        }
        if !self.compounding.accepts(self.risk_free_rate) {
            return Err(PricingError::invalid_input(format!(
                "risk-free rate {} is not valid under {:?} compounding",
                self.risk_free_rate, self.compounding
            )));
        }
        if !self.compounding.accepts(self.dividend_yield) {
            return Err(PricingError::invalid_input(format!(
                "dividend yield {} is not valid under {:?} compounding",
                self.dividend_yield, self.compounding
            )));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_without_volatility()?;
        if !self.volatility.is_finite() || self.volatility < 0.0 {
            return Err(PricingError::invalid_input(format!(
                "volatility must be non-negative, got {}",
                self.volatility
            )));
        }
        Ok(())
    }
}

/// Price and sensitivities from a single closed-form evaluation.
///
/// Vega and rho are per unit change (1.0 = 100 vol points / 100% rate),
/// theta is per year of calendar time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricingResult {
    pub npv: f64,
    pub delta: f64,
    pub gamma: f64,
    pub vega: f64,
    pub theta: f64,
    pub rho: f64,
    pub dividend_rho: f64,
    /// dV/dK
    pub strike_sensitivity: f64,
    /// Risk-neutral probability of finishing in the money, `N(phi * d2)`
    pub itm_cash_probability: f64,
}

impl PricingResult {
    /// Theta per calendar day (Actual/365)
    pub fn theta_per_day(&self) -> f64 {
        self.theta / 365.0
    }

    /// Percentage price change per percentage spot move. `None` for a
    /// worthless option.
    pub fn elasticity(&self, spot: f64) -> Option<f64> {
        if self.npv.abs() < f64::EPSILON {
            None
        } else {
            Some(self.delta * spot / self.npv)
        }
    }
}
