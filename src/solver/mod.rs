//! Implied volatility solver
//!
//! Inverts [`OptionPricer::npv`] in the volatility argument. Before iterating
//! the target is checked against the no-arbitrage range
//! `[discounted intrinsic, S e^{-qT} | K e^{-rT})`; a price outside it has no
//! implied volatility at all.
//!
//! The default method is Newton-Raphson on analytic vega, safeguarded by a
//! bracket `[lo, hi]` that shrinks on every evaluation (the price is
//! increasing in volatility). Whenever vega drops below the configured floor
//! or a Newton step would leave the bracket, the iteration bisects instead.
//! Brent's method is available as an alternative.
//!
//! Each call walks `Iterating -> Converged | Failed` on its own stack; the
//! solver itself holds only configuration.

pub mod config;

use std::cell::Cell;

use roots::{find_root_brent, Convergency};
use tracing::{debug, trace};

use crate::error::{PricingError, Result};
use crate::models::bs::BlackScholesPricer;
use crate::models::traits::OptionPricer;
use crate::types::{MarketData, OptionContract};

pub use config::{ImpliedVolConfig, SolverMethod};

/// Converged implied volatility with iteration diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImpliedVolatility {
    pub volatility: f64,
    /// Pricer evaluations used
    pub iterations: usize,
    pub newton_steps: usize,
    pub bisection_steps: usize,
    /// `price(volatility) - target` at the returned volatility
    pub price_error: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Newton,
    Bisection,
}

/// Solves for the volatility that reproduces a target option price.
#[derive(Debug, Clone, Default)]
pub struct ImpliedVolatilitySolver<P = BlackScholesPricer> {
    pricer: P,
    config: ImpliedVolConfig,
}

impl ImpliedVolatilitySolver<BlackScholesPricer> {
    pub fn new(config: ImpliedVolConfig) -> Self {
        Self::with_pricer(BlackScholesPricer, config)
    }
}

impl<P: OptionPricer> ImpliedVolatilitySolver<P> {
    pub fn with_pricer(pricer: P, config: ImpliedVolConfig) -> Self {
        Self { pricer, config }
    }

    pub fn config(&self) -> &ImpliedVolConfig {
        &self.config
    }

    /// Implied volatility of `target_price`. The `volatility` field of
    /// `market` is ignored.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` for an invalid contract, market or configuration
    /// * `NoArbitrageBound` if the target lies outside the attainable range
    /// * `ConvergenceFailure` if the tolerance is not met within the
    ///   iteration budget or the bracket collapses
    pub fn solve(
        &self,
        contract: &OptionContract,
        market: &MarketData,
        target_price: f64,
    ) -> Result<f64> {
        self.solve_detailed(contract, market, target_price)
            .map(|solution| solution.volatility)
    }

    /// Same as [`solve`](Self::solve) but also reports how the solution was
    /// reached.
    pub fn solve_detailed(
        &self,
        contract: &OptionContract,
        market: &MarketData,
        target_price: f64,
    ) -> Result<ImpliedVolatility> {
        self.config.validate()?;
        contract.validate()?;
        market.validate_without_volatility()?;
        check_no_arbitrage(contract, market, target_price)?;

        match self.config.method {
            SolverMethod::NewtonBisection => self.newton_bisection(contract, market, target_price),
            SolverMethod::Brent => self.brent(contract, market, target_price),
        }
    }

    fn newton_bisection(
        &self,
        contract: &OptionContract,
        market: &MarketData,
        target: f64,
    ) -> Result<ImpliedVolatility> {
        let cfg = &self.config;
        let mut lo = cfg.min_vol;
        let mut hi = cfg.max_vol;
        let mut sigma = cfg.initial_guess.clamp(lo, hi);
        let mut newton_steps = 0;
        let mut bisection_steps = 0;

        for iteration in 1..=cfg.max_iterations {
            let (npv, vega) = self
                .pricer
                .npv_and_vega(contract, &market.with_volatility(sigma))?;
            let diff = npv - target;
            trace!(iteration, sigma, price_error = diff, vega, "implied vol iteration");

            if diff.abs() < cfg.tolerance {
                debug!(
                    iteration,
                    sigma, newton_steps, bisection_steps, "implied vol converged"
                );
                return Ok(ImpliedVolatility {
                    volatility: sigma,
                    iterations: iteration,
                    newton_steps,
                    bisection_steps,
                    price_error: diff,
                });
            }

            if diff > 0.0 {
                hi = sigma;
            } else {
                lo = sigma;
            }
            if hi - lo <= f64::EPSILON * hi {
                debug!(iteration, sigma, price_error = diff, "volatility bracket collapsed");
                return Err(PricingError::ConvergenceFailure {
                    last_estimate: sigma,
                    iterations: iteration,
                });
            }

            let (next, step) = next_estimate(sigma, diff, vega, lo, hi, cfg.vega_floor);
            match step {
                Step::Newton => newton_steps += 1,
                Step::Bisection => {
                    bisection_steps += 1;
                    debug!(iteration, sigma, vega, lo, hi, "falling back to bisection");
                }
            }
            sigma = next;
        }

        debug!(
            max_iterations = cfg.max_iterations,
            sigma, "implied vol iteration budget exhausted"
        );
        Err(PricingError::ConvergenceFailure {
            last_estimate: sigma,
            iterations: cfg.max_iterations,
        })
    }

    fn brent(
        &self,
        contract: &OptionContract,
        market: &MarketData,
        target: f64,
    ) -> Result<ImpliedVolatility> {
        let cfg = &self.config;
        let evaluations = Cell::new(0usize);
        let last_sigma = Cell::new(cfg.initial_guess);
        let pricing_error: Cell<Option<PricingError>> = Cell::new(None);

        let objective = |sigma: f64| -> f64 {
            evaluations.set(evaluations.get() + 1);
            last_sigma.set(sigma);
            match self.pricer.npv(contract, &market.with_volatility(sigma)) {
                Ok(npv) => npv - target,
                Err(e) => {
                    pricing_error.set(Some(e));
                    f64::NAN
                }
            }
        };

        let mut convergency = PriceConvergency {
            tolerance: cfg.tolerance,
            max_iterations: cfg.max_iterations,
        };
        let found = find_root_brent(cfg.min_vol, cfg.max_vol, &objective, &mut convergency);

        if let Some(e) = pricing_error.take() {
            return Err(e);
        }

        let sigma = match found {
            Ok(sigma) => sigma,
            Err(e) => {
                debug!(error = ?e, evaluations = evaluations.get(), "brent search failed");
                return Err(PricingError::ConvergenceFailure {
                    last_estimate: last_sigma.get(),
                    iterations: evaluations.get(),
                });
            }
        };

        let diff = self.pricer.npv(contract, &market.with_volatility(sigma))? - target;
        if diff.abs() >= cfg.tolerance {
            debug!(sigma, price_error = diff, "brent root outside price tolerance");
            return Err(PricingError::ConvergenceFailure {
                last_estimate: sigma,
                iterations: evaluations.get(),
            });
        }

        debug!(sigma, evaluations = evaluations.get(), "implied vol converged (brent)");
        Ok(ImpliedVolatility {
            volatility: sigma,
            iterations: evaluations.get(),
            newton_steps: 0,
            bisection_steps: 0,
            price_error: diff,
        })
    }
}

/// Brent stops on the same price tolerance as Newton; the bracket itself is
/// only considered converged once it shrinks to machine precision.
struct PriceConvergency {
    tolerance: f64,
    max_iterations: usize,
}

impl Convergency<f64> for PriceConvergency {
    fn is_root_found(&mut self, y: f64) -> bool {
        y.abs() < self.tolerance
    }

    fn is_converged(&mut self, x1: f64, x2: f64) -> bool {
        (x1 - x2).abs() <= f64::EPSILON * x1.abs().max(x2.abs())
    }

    fn is_iteration_limit_reached(&mut self, iter: usize) -> bool {
        iter >= self.max_iterations
    }
}

/// Newton step when it is well defined and stays strictly inside the
/// bracket, otherwise the bracket midpoint.
fn next_estimate(
    sigma: f64,
    diff: f64,
    vega: f64,
    lo: f64,
    hi: f64,
    vega_floor: f64,
) -> (f64, Step) {
    if vega > vega_floor {
        let newton = sigma - diff / vega;
        if newton.is_finite() && newton > lo && newton < hi {
            return (newton, Step::Newton);
        }
    }
    (0.5 * (lo + hi), Step::Bisection)
}

fn check_no_arbitrage(contract: &OptionContract, market: &MarketData, target: f64) -> Result<()> {
    let lower = contract.discounted_intrinsic(market);
    let upper = contract.price_upper_bound(market);

    if !target.is_finite() || target < lower || target >= upper {
        debug!(target, lower, upper, "target price outside no-arbitrage bounds");
        return Err(PricingError::NoArbitrageBound {
            target,
            lower,
            upper,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_estimate_takes_newton_inside_bracket() {
        let (next, step) = next_estimate(0.3, 0.5, 10.0, 0.1, 1.0, 1e-8);
        assert_eq!(step, Step::Newton);
        assert!((next - 0.25).abs() < 1e-15);
    }

    #[test]
    fn test_next_estimate_bisects_on_flat_vega() {
        let (next, step) = next_estimate(0.3, 0.5, 1e-12, 0.1, 1.0, 1e-8);
        assert_eq!(step, Step::Bisection);
        assert_eq!(next, 0.55);
    }

    #[test]
    fn test_next_estimate_bisects_when_step_leaves_bracket() {
        // Newton would jump to -0.2
        let (next, step) = next_estimate(0.3, 5.0, 10.0, 0.1, 0.3, 1e-8);
        assert_eq!(step, Step::Bisection);
        assert!((next - 0.2).abs() < 1e-15);
    }

    #[test]
    fn test_price_convergency() {
        let mut convergency = PriceConvergency {
            tolerance: 1e-6,
            max_iterations: 10,
        };
        assert!(convergency.is_root_found(5e-7));
        assert!(!convergency.is_root_found(-2e-6));
        assert!(!convergency.is_converged(0.3, 0.3 + 1e-9));
        assert!(convergency.is_converged(0.3, 0.3));
        assert!(convergency.is_iteration_limit_reached(10));
    }

    #[test]
    fn test_check_no_arbitrage() {
        let market = MarketData::continuous(100.0, 0.05, 0.0, 0.0);
        let call = OptionContract::call(100.0, 1.0);

        assert!(check_no_arbitrage(&call, &market, 10.0).is_ok());
        assert!(matches!(
            check_no_arbitrage(&call, &market, 1.0),
            Err(PricingError::NoArbitrageBound { .. })
        ));
        assert!(matches!(
            check_no_arbitrage(&call, &market, 100.0),
            Err(PricingError::NoArbitrageBound { .. })
        ));
        assert!(check_no_arbitrage(&call, &market, f64::NAN).is_err());
    }
}
