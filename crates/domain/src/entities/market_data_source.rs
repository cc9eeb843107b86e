use crate::value_objects::identifiers::FeedRef;
use serde::{Deserialize, Serialize};

/// Volatility feeds registered for a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketDataSource {
    /// Feed whose latest reading drives the fee.
    pub short_term_feed: FeedRef,
    /// Read alongside the short-term feed; not part of the fee formula yet.
    pub long_term_feed: FeedRef,
    /// Precision hint supplied at registration. Stored, not consulted.
    pub precision: u8,
}

impl MarketDataSource {
    pub fn new(short_term_feed: FeedRef, long_term_feed: FeedRef, precision: u8) -> Self {
        Self {
            short_term_feed,
            long_term_feed,
            precision,
        }
    }
}
