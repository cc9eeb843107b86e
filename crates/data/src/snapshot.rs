use crate::error::SnapshotError;
use crate::providers::InMemoryOracle;
use chrono::{DateTime, Utc};
use dynfee_domain::value_objects::{FeedRef, VolatilityReading};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// One feed value in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FeedEntry {
    pub feed: FeedRef,
    /// Reading in raw feed units.
    pub value: i128,
    pub updated_at: DateTime<Utc>,
}

/// A point-in-time dump of feed values.
///
/// ```json
/// { "feeds": [ { "feed": "eth-usdc-1h", "value": 1250000, "updated-at": "2026-01-01T00:00:00Z" } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSnapshot {
    #[serde(default)]
    pub feeds: Vec<FeedEntry>,
}

impl FeedSnapshot {
    /// Parses a JSON snapshot.
    ///
    /// # Errors
    /// Returns an error if the document is malformed or lists a feed twice.
    pub fn from_json_str(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Reads and parses a JSON snapshot file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let snapshot = Self::from_json_str(&contents)?;
        info!(
            path = %path.as_ref().display(),
            feeds = snapshot.feeds.len(),
            "Loaded feed snapshot"
        );
        Ok(snapshot)
    }

    /// Checks that every feed is listed once with a post-epoch timestamp.
    ///
    /// # Errors
    /// Returns the first offending feed.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut seen = HashSet::new();
        for entry in &self.feeds {
            if !seen.insert(&entry.feed) {
                return Err(SnapshotError::DuplicateFeed(entry.feed.clone()));
            }
            if entry.updated_at.timestamp() < 0 {
                return Err(SnapshotError::InvalidTimestamp(entry.feed.clone()));
            }
        }
        Ok(())
    }

    /// Loads the snapshot into a fresh [`InMemoryOracle`].
    ///
    /// # Errors
    /// Returns an error if the snapshot does not validate.
    pub fn into_oracle(self) -> Result<InMemoryOracle, SnapshotError> {
        self.validate()?;
        let oracle = InMemoryOracle::new();
        for entry in self.feeds {
            let updated_at = u64::try_from(entry.updated_at.timestamp())
                .map_err(|_| SnapshotError::InvalidTimestamp(entry.feed.clone()))?;
            oracle.set_reading(entry.feed, VolatilityReading::new(entry.value, updated_at));
        }
        Ok(oracle)
    }
}
