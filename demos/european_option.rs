//! Prices a one-year at-the-money European call and backs out the volatility
//! implied by two market quotes.
//!
//! ```text
//! cargo run --example european_option [-- path/to/solver.toml]
//! RUST_LOG=vanilla_lib=debug cargo run --example european_option
//! ```

use std::path::Path;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use vanilla_lib::{
    default_configs, greeks, ImpliedVolConfig, ImpliedVolatilitySolver, MarketData,
    OptionContract,
};

const DEFAULT_CONFIG: &str = "demos/solver.toml";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = load_config()?;

    println!("European Option Pricing Demo");
    println!("============================");

    // S0 = 100, K = 100, T = 1y, r = 6%, q = 3% (annually compounded), vol = 30%
    let contract = OptionContract::call(100.0, 1.0);
    let market = MarketData::new(100.0, 0.06, 0.03, 0.30);

    println!("\nContract: {:?}", contract);
    println!(
        "Market: spot {:.2}, rate {:.2}% ({:?}), dividend yield {:.2}%, vol {:.1}%",
        market.spot,
        market.risk_free_rate * 100.0,
        market.compounding,
        market.dividend_yield * 100.0,
        market.volatility * 100.0
    );
    println!(
        "Continuous equivalents: r = {:.6}, q = {:.6}",
        market.continuous_rate(),
        market.continuous_dividend_yield()
    );

    let result = greeks(&contract, &market).context("pricing failed")?;

    println!("\nMark to market");
    println!("  NPV:                {:>12.6}", result.npv);
    println!("  Delta:              {:>12.6}", result.delta);
    println!("  Gamma:              {:>12.6}", result.gamma);
    println!("  Vega:               {:>12.6}", result.vega);
    println!("  Theta (per year):   {:>12.6}", result.theta);
    println!("  Theta (per day):    {:>12.6}", result.theta_per_day());
    println!("  Rho:                {:>12.6}", result.rho);
    println!("  Dividend rho:       {:>12.6}", result.dividend_rho);
    println!("  Strike sensitivity: {:>12.6}", result.strike_sensitivity);
    println!("  ITM probability:    {:>12.6}", result.itm_cash_probability);
    if let Some(elasticity) = result.elasticity(market.spot) {
        println!("  Elasticity:         {:>12.6}", elasticity);
    }

    let solver = ImpliedVolatilitySolver::new(config);
    println!(
        "\nImplied volatility ({:?}, price tolerance {:e})",
        solver.config().method,
        solver.config().tolerance
    );
    for target in [15.0, 10.0] {
        match solver.solve_detailed(&contract, &market, target) {
            Ok(solution) => println!(
                "  price {:>6.2} -> vol {:.6} ({} evaluations, {} newton, {} bisection)",
                target,
                solution.volatility,
                solution.iterations,
                solution.newton_steps,
                solution.bisection_steps
            ),
            Err(e) => println!("  price {:>6.2} -> {}", target, e),
        }
    }

    // Below the discounted intrinsic value there is no volatility to find
    if let Err(e) = solver.solve(&contract, &market, 1.0) {
        println!("  price {:>6.2} -> {}", 1.0, e);
    }

    Ok(())
}

fn load_config() -> anyhow::Result<ImpliedVolConfig> {
    match std::env::args().nth(1) {
        Some(path) => ImpliedVolConfig::load(&path),
        None if Path::new(DEFAULT_CONFIG).exists() => ImpliedVolConfig::load(DEFAULT_CONFIG),
        None => Ok(default_configs::standard()),
    }
}
