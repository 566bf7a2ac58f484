//! # Vanilla-Lib: Analytic European Option Pricing and Implied Volatility
//!
//! `vanilla-lib` prices European vanilla options with the Black-Scholes-Merton
//! closed form (continuous dividend yield), computes the full set of analytic
//! Greeks in one pass, and inverts the price for implied volatility with a
//! safeguarded Newton-Raphson solver.
//!
//! ## Core Features
//!
//! - **Closed-form pricing**: NPV, delta, gamma, vega, theta, rho and dividend rho
//! - **Rate normalisation**: annually (or periodically) compounded inputs are
//!   converted to continuous compounding before entering the formula
//! - **Zero-variance handling**: zero volatility prices as discounted intrinsic
//!   value, never as a division by zero
//! - **Implied volatility**: Newton-Raphson with bisection fallback, or Brent,
//!   with explicit no-arbitrage checks and typed failures
//!
//! ## Quick Start
//!
//! ```rust
//! use vanilla_lib::{greeks, implied_volatility, default_configs, MarketData, OptionContract};
//!
//! // One-year at-the-money call, 6% rate and 3% dividend yield (annual compounding)
//! let contract = OptionContract::call(100.0, 1.0);
//! let market = MarketData::new(100.0, 0.06, 0.03, 0.30);
//!
//! let result = greeks(&contract, &market)?;
//! assert!((result.npv - 12.8381).abs() < 1e-4);
//!
//! // Volatility implied by a market price of 15.0
//! let vol = implied_volatility(&contract, &market, 15.0, &default_configs::standard())?;
//! assert!(vol > 0.30);
//! # Ok::<(), vanilla_lib::PricingError>(())
//! ```
//!
//! ## Conventions
//!
//! - Vega and rho are per unit change (1.0 = 100 vol points / 100% rate)
//! - Theta is per year of calendar time; see [`PricingResult::theta_per_day`]
//! - Maturities are year fractions (Actual/365 fixed)
//!
//! ## Logging
//!
//! The solver emits `tracing` events (`trace` per iteration, `debug` on
//! convergence, bisection fallback and rejected targets). Install a
//! subscriber in the application to see them.

// ================================================================================================
// MODULES
// ================================================================================================

pub mod error;
pub mod models;
pub mod solver;
pub mod types;

// ================================================================================================
// PUBLIC RE-EXPORTS
// ================================================================================================

pub use error::{PricingError, Result};
pub use models::bs::BlackScholesPricer;
pub use models::traits::OptionPricer;
pub use solver::{ImpliedVolConfig, ImpliedVolatility, ImpliedVolatilitySolver, SolverMethod};
pub use types::{Compounding, MarketData, OptionContract, OptionType, PricingResult};

// ================================================================================================
// DEFAULT CONFIGURATIONS
// ================================================================================================

/// Pre-configured implied volatility solver settings.
///
/// - [`standard()`]: 1e-6 price tolerance, 100 iterations, guess 0.2, bracket [1e-6, 5.0]
/// - [`precise()`]: 1e-12 price tolerance for reference values and tests
/// - [`fast()`]: 1e-4 price tolerance for screening large quote sets
pub mod default_configs {
    use crate::solver::ImpliedVolConfig;

    /// Default solver configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use vanilla_lib::default_configs;
    ///
    /// let config = default_configs::standard();
    /// assert_eq!(config.max_iterations, 100);
    /// ```
    pub fn standard() -> ImpliedVolConfig {
        ImpliedVolConfig::standard()
    }

    /// Tight price tolerance, larger iteration budget.
    pub fn precise() -> ImpliedVolConfig {
        ImpliedVolConfig::precise()
    }

    /// Loose price tolerance, small iteration budget.
    pub fn fast() -> ImpliedVolConfig {
        ImpliedVolConfig::fast()
    }
}

// ================================================================================================
// PRICING API
// ================================================================================================

/// Black-Scholes-Merton net present value of a European option.
///
/// # Arguments
///
/// * `contract` - Option type, strike and maturity (year fraction)
/// * `market` - Spot, rate, dividend yield and volatility. Rates are quoted in
///   `market.compounding` and normalised to continuous compounding.
///
/// # Errors
///
/// [`PricingError::InvalidInput`] if strike, spot or maturity is not positive,
/// or volatility is negative.
pub fn price(contract: &OptionContract, market: &MarketData) -> Result<f64> {
    BlackScholesPricer.price(contract, market)
}

/// Price and Greeks of a European option from a single closed-form evaluation.
///
/// # Example
///
/// ```rust
/// use vanilla_lib::{greeks, MarketData, OptionContract};
///
/// let put = OptionContract::put(100.0, 0.5);
/// let market = MarketData::continuous(100.0, 0.05, 0.0, 0.2);
///
/// let result = greeks(&put, &market)?;
/// assert!(result.delta < 0.0);
/// assert!(result.gamma > 0.0 && result.vega > 0.0);
/// # Ok::<(), vanilla_lib::PricingError>(())
/// ```
///
/// # Errors
///
/// Same as [`price`].
pub fn greeks(contract: &OptionContract, market: &MarketData) -> Result<PricingResult> {
    BlackScholesPricer.greeks(contract, market)
}

/// Volatility that reproduces `target_price` under [`price`].
///
/// The `volatility` field of `market` is ignored.
///
/// # Errors
///
/// * [`PricingError::InvalidInput`] for invalid contract, market or `config`
/// * [`PricingError::NoArbitrageBound`] if the target is below the discounted
///   intrinsic value or at/above the upper bound (`S e^{-qT}` for calls,
///   `K e^{-rT}` for puts)
/// * [`PricingError::ConvergenceFailure`] if the solver cannot meet
///   `config.tolerance` within `config.max_iterations`
pub fn implied_volatility(
    contract: &OptionContract,
    market: &MarketData,
    target_price: f64,
    config: &ImpliedVolConfig,
) -> Result<f64> {
    ImpliedVolatilitySolver::new(config.clone()).solve(contract, market, target_price)
}
