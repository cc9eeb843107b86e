use dynfee_domain::value_objects::FeedRef;
use thiserror::Error;

/// Failure to obtain a reading from a feed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("unknown feed {0}")]
    UnknownFeed(FeedRef),
    #[error("feed {feed} unavailable: {reason}")]
    Unavailable { feed: FeedRef, reason: String },
    #[error("feed {feed} is stale: last update {age_secs}s ago, limit {max_age_secs}s")]
    Stale {
        feed: FeedRef,
        age_secs: u64,
        max_age_secs: u64,
    },
}

/// Failure to load a feed snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("feed {0} appears more than once")]
    DuplicateFeed(FeedRef),
    #[error("feed {0} has a timestamp before the unix epoch")]
    InvalidTimestamp(FeedRef),
}
