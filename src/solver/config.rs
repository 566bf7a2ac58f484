use crate::error::{PricingError, Result};

/// Root-finding strategy used by the implied volatility solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SolverMethod {
    /// Newton-Raphson on analytic vega, bisecting whenever vega is below
    /// the floor or the Newton step leaves the bracket
    #[default]
    NewtonBisection,
    /// Brent's method on the volatility bracket
    Brent,
}

/// Implied volatility solver configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImpliedVolConfig {
    /// Absolute tolerance in price units: stop once
    /// `|price(σ) - target| < tolerance`. Scale it with the notional; it must
    /// stay above the floating-point spacing of the price itself.
    #[cfg_attr(feature = "serde", serde(default = "default_tolerance"))]
    pub tolerance: f64,

    #[cfg_attr(feature = "serde", serde(default = "default_max_iterations"))]
    pub max_iterations: usize,

    /// Starting volatility for Newton iterations
    #[cfg_attr(feature = "serde", serde(default = "default_initial_guess"))]
    pub initial_guess: f64,

    /// Lower end of the volatility bracket
    #[cfg_attr(feature = "serde", serde(default = "default_min_vol"))]
    pub min_vol: f64,

    /// Upper end of the volatility bracket
    #[cfg_attr(feature = "serde", serde(default = "default_max_vol"))]
    pub max_vol: f64,

    /// Vega below this switches the iteration to bisection
    #[cfg_attr(feature = "serde", serde(default = "default_vega_floor"))]
    pub vega_floor: f64,

    #[cfg_attr(feature = "serde", serde(default))]
    pub method: SolverMethod,
}

impl Default for ImpliedVolConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            initial_guess: default_initial_guess(),
            min_vol: default_min_vol(),
            max_vol: default_max_vol(),
            vega_floor: default_vega_floor(),
            method: SolverMethod::default(),
        }
    }
}

impl ImpliedVolConfig {
    /// Default tolerances: 1e-6 in price, 100 iterations, bracket [1e-6, 5.0]
    pub fn standard() -> Self {
        Self::default()
    }

    /// Tight tolerance for reference-grade inversions
    pub fn precise() -> Self {
        Self {
            tolerance: 1e-12,
            max_iterations: 200,
            vega_floor: 1e-12,
            ..Self::default()
        }
    }

    /// Loose tolerance for quick screening of large quote sets
    pub fn fast() -> Self {
        Self {
            tolerance: 1e-4,
            max_iterations: 30,
            ..Self::default()
        }
    }

    pub fn with_method(self, method: SolverMethod) -> Self {
        Self { method, ..self }
    }

    pub fn with_tolerance(self, tolerance: f64) -> Self {
        Self { tolerance, ..self }
    }

    pub fn with_max_iterations(self, max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }

    pub fn with_initial_guess(self, initial_guess: f64) -> Self {
        Self {
            initial_guess,
            ..self
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(PricingError::invalid_input(format!(
                "solver tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(PricingError::invalid_input(
                "solver needs at least one iteration",
            ));
        }
        if !(self.min_vol.is_finite() && self.max_vol.is_finite())
            || self.min_vol <= 0.0
            || self.min_vol >= self.max_vol
        {
            return Err(PricingError::invalid_input(format!(
                "volatility bracket must satisfy 0 < min_vol < max_vol, got [{}, {}]",
                self.min_vol, self.max_vol
            )));
        }
        if !self.initial_guess.is_finite() {
            return Err(PricingError::invalid_input(format!(
                "initial guess must be finite, got {}",
                self.initial_guess
            )));
        }
        if self.vega_floor.is_nan() || self.vega_floor < 0.0 {
            return Err(PricingError::invalid_input(format!(
                "vega floor must be non-negative, got {}",
                self.vega_floor
            )));
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl ImpliedVolConfig {
    /// Parse a configuration from TOML. Missing keys take their defaults.
    ///
    /// ```toml
    /// tolerance = 1e-8
    /// max_iterations = 50
    /// method = "brent"
    /// ```
    pub fn from_toml_str(input: &str) -> anyhow::Result<Self> {
        use anyhow::Context;

        let config: Self =
            toml::from_str(input).context("failed to parse implied volatility config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML configuration file.
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        use anyhow::Context;

        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid config in {}", path.display()))
    }
}

fn default_tolerance() -> f64 {
    1e-6
}

fn default_max_iterations() -> usize {
    100
}

fn default_initial_guess() -> f64 {
    0.2
}

fn default_min_vol() -> f64 {
    1e-6
}

fn default_max_vol() -> f64 {
    5.0
}

fn default_vega_floor() -> f64 {
    1e-8
}
