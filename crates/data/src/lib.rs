//! Access to volatility feeds.
//!
//! The fee engine never talks to an oracle network directly. It depends on the
//! [`VolatilityOracle`] trait defined here, which hosts implement over their
//! own feed infrastructure. This crate also ships:
//! - [`providers::InMemoryOracle`], a concurrent in-memory feed store
//! - [`snapshot::FeedSnapshot`], a JSON snapshot format for feed values
//! - [`staleness::StalenessGuard`], an opt-in freshness check

use dynfee_domain::value_objects::{FeedRef, VolatilityReading};
use std::sync::Arc;

/// Error types.
pub mod error;
/// Oracle implementations.
pub mod providers;
/// JSON feed snapshots.
pub mod snapshot;
/// Freshness checks on top of another oracle.
pub mod staleness;

pub use error::{OracleError, SnapshotError};

/// Source of the latest volatility reading of a feed.
///
/// Implementations are read at every fee computation; they must not be
/// expected to cache on behalf of the caller.
pub trait VolatilityOracle: Send + Sync {
    /// Returns the most recent reading published by `feed`.
    ///
    /// # Errors
    /// Returns an [`OracleError`] if the feed is unknown or cannot be read.
    fn latest_reading(&self, feed: &FeedRef) -> Result<VolatilityReading, OracleError>;
}

impl<T: VolatilityOracle + ?Sized> VolatilityOracle for Arc<T> {
    fn latest_reading(&self, feed: &FeedRef) -> Result<VolatilityReading, OracleError> {
        (**self).latest_reading(feed)
    }
}

impl<T: VolatilityOracle + ?Sized> VolatilityOracle for &T {
    fn latest_reading(&self, feed: &FeedRef) -> Result<VolatilityReading, OracleError> {
        (**self).latest_reading(feed)
    }
}
