//! Black-Scholes-Merton closed form for European vanilla options with a
//! continuous dividend yield.
//!
//! ```text
//! d1 = (ln(S/K) + (r - q + σ²/2)T) / (σ√T)
//! d2 = d1 - σ√T
//! V  = φ (S e^{-qT} N(φ d1) - K e^{-rT} N(φ d2))
//! ```
//!
//! Rates on [`MarketData`] are normalised to continuous compounding before
//! they enter the formula. Zero variance (`σ√T == 0`) is priced as the
//! discounted intrinsic value instead of dividing by zero.

use crate::error::{PricingError, Result};
use crate::models::traits::OptionPricer;
use crate::models::utils::{norm_cdf, norm_pdf};
use crate::types::{MarketData, OptionContract, PricingResult};

/// Analytic pricer for European calls and puts.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlackScholesPricer;

/// Intermediate terms shared by the price and every Greek.
#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy)]
struct ClosedFormTerms {
    phi: f64,
    S: f64,
    K: f64,
    T: f64,
    sqrt_t: f64,
    r: f64,
    q: f64,
    sigma: f64,
    std_dev: f64,
    df_r: f64,
    df_q: f64,
    /// N(φ d1)
    nd1: f64,
    /// N(φ d2)
    nd2: f64,
    /// n(d1)
    pdf_d1: f64,
}

impl ClosedFormTerms {
    #[allow(non_snake_case)]
    fn new(contract: &OptionContract, market: &MarketData) -> Self {
        let phi = contract.option_type.phi();
        let S = market.spot;
        let K = contract.strike;
        let T = contract.maturity_years;
        let r = market.continuous_rate();
        let q = market.continuous_dividend_yield();
        let sigma = market.volatility;

        let sqrt_t = T.sqrt();
        let std_dev = sigma * sqrt_t;
        let df_r = (-r * T).exp();
        let df_q = (-q * T).exp();

        let (nd1, nd2, pdf_d1) = if std_dev > 0.0 {
            // σ²T/2 folded in as std_dev / 2 so huge volatilities do not overflow
            let d1 = ((S / K).ln() + (r - q) * T) / std_dev + 0.5 * std_dev;
            let d2 = d1 - std_dev;
            (norm_cdf(phi * d1), norm_cdf(phi * d2), norm_pdf(d1))
        } else {
            // d1, d2 -> ±inf depending on forward moneyness
            let in_the_money = phi * (S * df_q - K * df_r) > 0.0;
            let step = if in_the_money { 1.0 } else { 0.0 };
            (step, step, 0.0)
        };

        Self {
            phi,
            S,
            K,
            T,
            sqrt_t,
            r,
            q,
            sigma,
            std_dev,
            df_r,
            df_q,
            nd1,
            nd2,
            pdf_d1,
        }
    }

    fn npv(&self) -> f64 {
        let value = self.phi * (self.S * self.df_q * self.nd1 - self.K * self.df_r * self.nd2);
        // Rounding can leave a deep out-of-the-money value a hair below zero.
        // Written as a comparison so a NaN still reaches the finiteness check.
        if value < 0.0 {
            0.0
        } else {
            value
        }
    }

    fn vega(&self) -> f64 {
        self.S * self.df_q * self.pdf_d1 * self.sqrt_t
    }

    fn gamma(&self) -> f64 {
        if self.std_dev > 0.0 {
            self.df_q * self.pdf_d1 / (self.S * self.std_dev)
        } else {
            0.0
        }
    }

    fn theta(&self) -> f64 {
        let diffusion = if self.sqrt_t > 0.0 {
            -self.S * self.df_q * self.pdf_d1 * self.sigma / (2.0 * self.sqrt_t)
        } else {
            0.0
        };
        diffusion - self.phi * self.r * self.K * self.df_r * self.nd2
            + self.phi * self.q * self.S * self.df_q * self.nd1
    }

    fn result(&self) -> PricingResult {
        PricingResult {
            npv: self.npv(),
            delta: self.phi * self.df_q * self.nd1,
            gamma: self.gamma(),
            vega: self.vega(),
            theta: self.theta(),
            rho: self.phi * self.K * self.T * self.df_r * self.nd2,
            dividend_rho: -self.phi * self.S * self.T * self.df_q * self.nd1,
            strike_sensitivity: -self.phi * self.df_r * self.nd2,
            itm_cash_probability: self.nd2,
        }
    }
}

fn finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PricingError::NonFiniteResult(name))
    }
}

impl BlackScholesPricer {
    pub fn new() -> Self {
        Self
    }

    /// Net present value of the option.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a non-positive strike, spot or maturity, or a
    /// negative volatility.
    pub fn price(&self, contract: &OptionContract, market: &MarketData) -> Result<f64> {
        validate(contract, market)?;
        finite("npv", ClosedFormTerms::new(contract, market).npv())
    }

    /// Price and all sensitivities from a single evaluation of the shared
    /// `d1`/`d2` terms.
    pub fn greeks(&self, contract: &OptionContract, market: &MarketData) -> Result<PricingResult> {
        validate(contract, market)?;
        let result = ClosedFormTerms::new(contract, market).result();

        finite("npv", result.npv)?;
        finite("delta", result.delta)?;
        finite("gamma", result.gamma)?;
        finite("vega", result.vega)?;
        finite("theta", result.theta)?;
        finite("rho", result.rho)?;
        finite("dividend rho", result.dividend_rho)?;
        finite("strike sensitivity", result.strike_sensitivity)?;

        Ok(result)
    }
}

impl OptionPricer for BlackScholesPricer {
    fn npv(&self, contract: &OptionContract, market: &MarketData) -> Result<f64> {
        self.price(contract, market)
    }

    fn npv_and_vega(&self, contract: &OptionContract, market: &MarketData) -> Result<(f64, f64)> {
        validate(contract, market)?;
        let terms = ClosedFormTerms::new(contract, market);
        Ok((finite("npv", terms.npv())?, finite("vega", terms.vega())?))
    }
}

fn validate(contract: &OptionContract, market: &MarketData) -> Result<()> {
    contract.validate()?;
    market.validate()
}
