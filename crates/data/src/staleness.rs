use crate::{OracleError, VolatilityOracle};
use chrono::Utc;
use dynfee_domain::value_objects::{FeedRef, VolatilityReading};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Source of the current unix time in seconds.
pub type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

/// Rejects readings older than a maximum age.
///
/// The fee engine itself never checks freshness; wrap the host's oracle in a
/// guard when stale data must block trading.
pub struct StalenessGuard<O> {
    inner: O,
    max_age: Duration,
    clock: Clock,
}

impl<O: VolatilityOracle> StalenessGuard<O> {
    /// Guard using the system clock.
    pub fn new(inner: O, max_age: Duration) -> Self {
        Self::with_clock(inner, max_age, || {
            u64::try_from(Utc::now().timestamp()).unwrap_or_default()
        })
    }

    /// Guard using a custom clock.
    pub fn with_clock(
        inner: O,
        max_age: Duration,
        clock: impl Fn() -> u64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner,
            max_age,
            clock: Arc::new(clock),
        }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }
}

impl<O: VolatilityOracle> VolatilityOracle for StalenessGuard<O> {
    fn latest_reading(&self, feed: &FeedRef) -> Result<VolatilityReading, OracleError> {
        let reading = self.inner.latest_reading(feed)?;
        let age_secs = reading.age((self.clock)());
        let max_age_secs = self.max_age.as_secs();
        if age_secs > max_age_secs {
            warn!(feed = %feed, age_secs, max_age_secs, "Rejecting stale reading");
            return Err(OracleError::Stale {
                feed: feed.clone(),
                age_secs,
                max_age_secs,
            });
        }
        Ok(reading)
    }
}

impl<O: fmt::Debug> fmt::Debug for StalenessGuard<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StalenessGuard")
            .field("inner", &self.inner)
            .field("max_age", &self.max_age)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::InMemoryOracle;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn setup() -> (Arc<AtomicU64>, StalenessGuard<InMemoryOracle>) {
        let oracle = InMemoryOracle::new();
        oracle.set_reading(FeedRef::new("vol"), VolatilityReading::new(42, 1_000));

        let now = Arc::new(AtomicU64::new(1_000));
        let clock = now.clone();
        let guard = StalenessGuard::with_clock(oracle, Duration::from_secs(60), move || {
            clock.load(Ordering::SeqCst)
        });
        (now, guard)
    }

    #[test]
    fn test_fresh_reading_passes() {
        let (now, guard) = setup();
        assert_eq!(guard.latest_reading(&FeedRef::new("vol")).unwrap().value, 42);

        now.store(1_060, Ordering::SeqCst);
        assert!(guard.latest_reading(&FeedRef::new("vol")).is_ok());
    }

    #[test]
    fn test_stale_reading_rejected() {
        let (now, guard) = setup();
        now.store(1_061, Ordering::SeqCst);

        assert_eq!(
            guard.latest_reading(&FeedRef::new("vol")),
            Err(OracleError::Stale {
                feed: FeedRef::new("vol"),
                age_secs: 61,
                max_age_secs: 60,
            })
        );
    }

    #[test]
    fn test_future_reading_is_fresh() {
        let (now, guard) = setup();
        now.store(10, Ordering::SeqCst);
        assert!(guard.latest_reading(&FeedRef::new("vol")).is_ok());
    }

    #[test]
    fn test_inner_errors_pass_through() {
        let (_, guard) = setup();
        assert_eq!(
            guard.latest_reading(&FeedRef::new("other")),
            Err(OracleError::UnknownFeed(FeedRef::new("other")))
        );
    }
}
