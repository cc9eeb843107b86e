//! Per-pool registry of volatility feeds.

use crate::config::RegistryConfig;
use crate::error::{ConfigError, RegistryError};
use dashmap::DashMap;
use dynfee_data::VolatilityOracle;
use dynfee_domain::entities::{MarketDataSource, PoolKey};
use dynfee_domain::fee_curve::FeeCurve;
use dynfee_domain::value_objects::{Fee, FeedRef, PoolId, VolatilityReading};
use std::fmt;
use tracing::{debug, info, warn};

/// Maps pools to their volatility feeds and computes their fees.
///
/// Pools without registered market data are charged the default fee. For
/// registered pools every call to [`PoolFeeRegistry::compute_fee`] reads the
/// feeds again; nothing is cached.
///
/// The registry is `Sync`: registrations and removals replace entries
/// atomically and are visible to the next fee computation on any thread.
pub struct PoolFeeRegistry<O> {
    oracle: O,
    curve: FeeCurve,
    default_fee: Fee,
    sources: DashMap<PoolId, MarketDataSource>,
}

impl<O: VolatilityOracle> PoolFeeRegistry<O> {
    /// Creates an empty registry.
    pub fn new(curve: FeeCurve, default_fee: Fee, oracle: O) -> Self {
        info!(
            lower_fee = curve.params().lower_fee().value(),
            upper_fee = curve.params().upper_fee().value(),
            steepness = %curve.params().steepness(),
            midpoint = %curve.params().midpoint(),
            decimals = curve.decimals(),
            default_fee = default_fee.value(),
            "Pool fee registry created"
        );
        Self {
            oracle,
            curve,
            default_fee,
            sources: DashMap::new(),
        }
    }

    /// Creates an empty registry from configuration.
    ///
    /// # Errors
    /// Returns an error if the configured curve is invalid.
    pub fn from_config(config: &RegistryConfig, oracle: O) -> Result<Self, ConfigError> {
        Ok(Self::new(config.fee_curve()?, config.default_fee(), oracle))
    }

    /// Checks that a pool may use this registry for its fees.
    ///
    /// # Errors
    /// Returns [`RegistryError::MissingConfiguration`] unless the pool uses
    /// a dynamic fee.
    pub fn on_pool_activate(&self, key: &PoolKey) -> Result<(), RegistryError> {
        if !key.fee_mode.is_dynamic() {
            warn!(pool = %key.id, fee_mode = ?key.fee_mode, "Rejecting pool without dynamic fee");
            return Err(RegistryError::MissingConfiguration(key.id.clone()));
        }
        debug!(pool = %key.id, "Pool activated");
        Ok(())
    }

    /// Computes the fee for the next trade in `pool`.
    ///
    /// # Errors
    /// Returns [`RegistryError::Upstream`] if a registered feed cannot be
    /// read. An unregistered pool is never an error.
    pub fn compute_fee(&self, pool: &PoolId) -> Result<Fee, RegistryError> {
        let Some(source) = self.market_data(pool) else {
            debug!(pool = %pool, fee = self.default_fee.value(), "No market data, using default fee");
            return Ok(self.default_fee);
        };

        let short_term = self.read_feed(pool, &source.short_term_feed)?;
        // Read so that an unreachable long-term feed fails the call; the
        // value is not part of the formula.
        let long_term = self.read_feed(pool, &source.long_term_feed)?;

        let fee = self.curve.fee_for_reading(short_term.value);
        debug!(
            pool = %pool,
            short_term = short_term.value,
            long_term = long_term.value,
            fee = fee.value(),
            "Computed dynamic fee"
        );
        Ok(fee)
    }

    /// Registers the feeds of a pool, replacing any previous registration.
    ///
    /// Feeds are not contacted here; an unreachable feed surfaces on the next
    /// [`PoolFeeRegistry::compute_fee`].
    pub fn update_market_data(
        &self,
        pool: PoolId,
        short_term_feed: FeedRef,
        long_term_feed: FeedRef,
        precision: u8,
    ) {
        debug!(
            pool = %pool,
            short_term = %short_term_feed,
            long_term = %long_term_feed,
            precision,
            "Market data updated"
        );
        self.sources.insert(
            pool,
            MarketDataSource::new(short_term_feed, long_term_feed, precision),
        );
    }

    /// Unregisters the feeds of a pool and returns them.
    ///
    /// # Errors
    /// Returns [`RegistryError::NotFound`] if the pool has no registration;
    /// the registry is left unchanged.
    pub fn remove_market_data(&self, pool: &PoolId) -> Result<MarketDataSource, RegistryError> {
        match self.sources.remove(pool) {
            Some((_, source)) => {
                debug!(pool = %pool, "Market data removed");
                Ok(source)
            }
            None => Err(RegistryError::NotFound(pool.clone())),
        }
    }

    /// Current registration of a pool.
    #[must_use]
    pub fn market_data(&self, pool: &PoolId) -> Option<MarketDataSource> {
        self.sources.get(pool).map(|entry| entry.value().clone())
    }

    #[must_use]
    pub fn is_configured(&self, pool: &PoolId) -> bool {
        self.sources.contains_key(pool)
    }

    /// All registered pools, sorted.
    #[must_use]
    pub fn configured_pools(&self) -> Vec<PoolId> {
        let mut pools: Vec<PoolId> = self.sources.iter().map(|entry| entry.key().clone()).collect();
        pools.sort();
        pools
    }

    pub fn curve(&self) -> &FeeCurve {
        &self.curve
    }

    pub fn default_fee(&self) -> Fee {
        self.default_fee
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    fn read_feed(&self, pool: &PoolId, feed: &FeedRef) -> Result<VolatilityReading, RegistryError> {
        self.oracle.latest_reading(feed).map_err(|source| {
            warn!(pool = %pool, feed = %feed, error = %source, "Volatility read failed");
            RegistryError::Upstream {
                pool: pool.clone(),
                source,
            }
        })
    }
}

impl<O> fmt::Debug for PoolFeeRegistry<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolFeeRegistry")
            .field("curve", &self.curve)
            .field("default_fee", &self.default_fee)
            .field("pools", &self.sources.len())
            .finish_non_exhaustive()
    }
}
