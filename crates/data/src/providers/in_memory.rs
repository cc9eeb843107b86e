use crate::{OracleError, VolatilityOracle};
use dashmap::DashMap;
use dynfee_domain::value_objects::{FeedRef, VolatilityReading};
use tracing::debug;

#[derive(Debug, Clone)]
enum FeedState {
    Live(VolatilityReading),
    Failing(String),
}

/// Feed store held in memory.
///
/// Every method takes `&self`; updates are visible to the next read on any
/// thread.
#[derive(Debug, Default)]
pub struct InMemoryOracle {
    feeds: DashMap<FeedRef, FeedState>,
}

impl InMemoryOracle {
    /// Creates an empty oracle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a reading, replacing whatever the feed held before.
    pub fn set_reading(&self, feed: FeedRef, reading: VolatilityReading) {
        debug!(feed = %feed, value = reading.value, updated_at = reading.updated_at, "Feed updated");
        self.feeds.insert(feed, FeedState::Live(reading));
    }

    /// Makes subsequent reads of `feed` fail with
    /// [`OracleError::Unavailable`].
    pub fn set_failure(&self, feed: FeedRef, reason: impl Into<String>) {
        self.feeds.insert(feed, FeedState::Failing(reason.into()));
    }

    /// Removes a feed. Returns whether it existed.
    pub fn remove(&self, feed: &FeedRef) -> bool {
        self.feeds.remove(feed).is_some()
    }

    /// Number of feeds, live or failing.
    #[must_use]
    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }

    /// All known feeds, sorted.
    #[must_use]
    pub fn feeds(&self) -> Vec<FeedRef> {
        let mut feeds: Vec<FeedRef> = self.feeds.iter().map(|entry| entry.key().clone()).collect();
        feeds.sort();
        feeds
    }
}

impl VolatilityOracle for InMemoryOracle {
    fn latest_reading(&self, feed: &FeedRef) -> Result<VolatilityReading, OracleError> {
        match self.feeds.get(feed).map(|entry| entry.value().clone()) {
            Some(FeedState::Live(reading)) => Ok(reading),
            Some(FeedState::Failing(reason)) => Err(OracleError::Unavailable {
                feed: feed.clone(),
                reason,
            }),
            None => Err(OracleError::UnknownFeed(feed.clone())),
        }
    }
}
