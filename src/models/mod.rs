pub mod bs;

/// Common traits used by pricing models
pub mod traits {
    use crate::error::Result;
    use crate::types::{MarketData, OptionContract};

    /// A model that maps a volatility input to an option value.
    ///
    /// The implied volatility solver is generic over this trait; it only ever
    /// varies `market.volatility` between calls.
    pub trait OptionPricer {
        fn npv(&self, contract: &OptionContract, market: &MarketData) -> Result<f64>;

        /// Value together with its derivative with respect to volatility.
        fn npv_and_vega(&self, contract: &OptionContract, market: &MarketData)
            -> Result<(f64, f64)>;
    }
}

/// Standard normal helpers shared by the closed-form models
pub mod utils {
    use std::f64::consts::{FRAC_1_SQRT_2, PI};

    /// Standard normal cumulative distribution function.
    ///
    /// Written in terms of `erfc` so the lower tail keeps full relative
    /// precision.
    pub fn norm_cdf(x: f64) -> f64 {
        0.5 * libm::erfc(-x * FRAC_1_SQRT_2)
    }

    /// Standard normal probability density function
    pub fn norm_pdf(x: f64) -> f64 {
        (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
    }

}
