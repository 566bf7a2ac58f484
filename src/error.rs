//! Error types for vanilla-lib

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Target price {target} outside no-arbitrage bounds [{lower}, {upper})")]
    NoArbitrageBound { target: f64, lower: f64, upper: f64 },

    #[error(
        "Implied volatility solver failed to converge after {iterations} iterations (last estimate: {last_estimate})"
    )]
    ConvergenceFailure { last_estimate: f64, iterations: usize },

    #[error("Non-finite {0} produced by the closed form")]
    NonFiniteResult(&'static str),
}

pub type Result<T> = std::result::Result<T, PricingError>;

impl PricingError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// True for the error kinds raised before any computation starts.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::NoArbitrageBound { .. })
    }
}
