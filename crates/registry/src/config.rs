//! Registry configuration.
//!
//! ```toml
//! default-fee = 3000
//! volatility-decimals = 5
//!
//! [curve]
//! min-fee = 3000
//! max-fee = 10000
//! steepness = "2"
//! midpoint = "5"
//! ```
//!
//! Every field is optional. Fees are in hundredths of a basis point;
//! steepness and midpoint are decimals converted to 64.64 fixed point.

use crate::error::ConfigError;
use dynfee_domain::fee_curve::FeeCurve;
use dynfee_domain::math::Q64x64;
use dynfee_domain::value_objects::{CurveParameters, Fee};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Fee charged by pools without registered market data (0.30%).
pub const DEFAULT_FEE: u32 = 3000;
/// Decimal precision of volatility feeds.
pub const DEFAULT_VOLATILITY_DECIMALS: u8 = 5;

/// Top-level registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RegistryConfig {
    /// Fee returned for pools with no registered market data.
    #[serde(default = "default_fee")]
    pub default_fee: u32,
    /// Decimal precision of the raw feed values.
    #[serde(default = "default_volatility_decimals")]
    pub volatility_decimals: u8,
    /// Fee curve shape.
    #[serde(default)]
    pub curve: CurveConfig,
}

/// Sigmoid curve parameters as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CurveConfig {
    #[serde(default = "default_min_fee")]
    pub min_fee: u32,
    #[serde(default = "default_max_fee")]
    pub max_fee: u32,
    /// Zero selects the built-in default.
    #[serde(default = "default_steepness")]
    pub steepness: Decimal,
    /// Volatility, in whole units, at which the fee is halfway between the
    /// bounds. Zero selects the built-in default.
    #[serde(default = "default_midpoint")]
    pub midpoint: Decimal,
}

fn default_fee() -> u32 {
    DEFAULT_FEE
}

fn default_volatility_decimals() -> u8 {
    DEFAULT_VOLATILITY_DECIMALS
}

fn default_min_fee() -> u32 {
    3000
}

fn default_max_fee() -> u32 {
    10000
}

fn default_steepness() -> Decimal {
    Decimal::from(2)
}

fn default_midpoint() -> Decimal {
    Decimal::from(5)
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_fee: default_fee(),
            volatility_decimals: default_volatility_decimals(),
            curve: CurveConfig::default(),
        }
    }
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            min_fee: default_min_fee(),
            max_fee: default_max_fee(),
            steepness: default_steepness(),
            midpoint: default_midpoint(),
        }
    }
}

impl RegistryConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed documents or unknown keys.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&contents)?;
        info!(path = %path.as_ref().display(), "Loaded registry config");
        Ok(config)
    }

    pub fn default_fee(&self) -> Fee {
        Fee::new(self.default_fee)
    }

    /// Builds the validated fee curve.
    ///
    /// # Errors
    /// Returns an error if the curve parameters are invalid.
    pub fn fee_curve(&self) -> Result<FeeCurve, ConfigError> {
        Ok(FeeCurve::new(
            self.curve.parameters()?,
            self.volatility_decimals,
        )?)
    }
}

impl CurveConfig {
    /// Converts to validated [`CurveParameters`].
    ///
    /// # Errors
    /// Returns an error if the bounds are invalid or a decimal does not fit
    /// in 64.64 fixed point.
    pub fn parameters(&self) -> Result<CurveParameters, ConfigError> {
        let steepness = Q64x64::try_from(self.steepness).map_err(|source| ConfigError::Value {
            field: "steepness",
            source,
        })?;
        let midpoint = Q64x64::try_from(self.midpoint).map_err(|source| ConfigError::Value {
            field: "midpoint",
            source,
        })?;
        Ok(CurveParameters::new(
            Fee::new(self.min_fee),
            Fee::new(self.max_fee),
            steepness,
            midpoint,
        )?)
    }
}
