use dynfee_data::OracleError;
use dynfee_domain::error::{CurveError, MathError};
use dynfee_domain::value_objects::PoolId;
use thiserror::Error;

/// Errors surfaced by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No market data is registered for the pool.
    #[error("no market data registered for pool {0}")]
    NotFound(PoolId),
    /// The pool was not created with a dynamic fee.
    #[error("pool {0} is not configured for dynamic fees")]
    MissingConfiguration(PoolId),
    /// A registered feed could not be read.
    #[error("failed to read volatility for pool {pool}: {source}")]
    Upstream {
        pool: PoolId,
        #[source]
        source: OracleError,
    },
}

/// Invalid or unreadable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid curve: {0}")]
    Curve(#[from] CurveError),
    #[error("{field} is not representable: {source}")]
    Value {
        field: &'static str,
        #[source]
        source: MathError,
    },
}
