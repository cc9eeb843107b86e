//! Scenario files for `dynfee simulate`.
//!
//! ```json
//! {
//!   "feeds": [
//!     { "feed": "eth-usdc-1h", "value": 500000, "updated-at": "2026-01-01T00:00:00Z" }
//!   ],
//!   "pools": [
//!     { "pool": "eth-usdc", "market-data": { "short-term-feed": "eth-usdc-1h", "long-term-feed": "eth-usdc-30d" } },
//!     { "pool": "usdc-usdt", "fee-mode": { "static": 100 } }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use dynfee_data::VolatilityOracle;
use dynfee_data::snapshot::{FeedEntry, FeedSnapshot};
use dynfee_domain::entities::PoolKey;
use dynfee_domain::enums::FeeMode;
use dynfee_domain::value_objects::{Fee, FeedRef, PoolId};
use dynfee_registry::PoolFeeRegistry;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub feeds: Vec<FeedEntry>,
    #[serde(default)]
    pub pools: Vec<PoolEntry>,
}

/// A pool to activate, optionally with feeds to register.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PoolEntry {
    pub pool: PoolId,
    #[serde(default = "dynamic_fee_mode")]
    pub fee_mode: FeeMode,
    #[serde(default)]
    pub market_data: Option<MarketDataEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct MarketDataEntry {
    pub short_term_feed: FeedRef,
    pub long_term_feed: FeedRef,
    /// Defaults to the curve's feed decimals.
    #[serde(default)]
    pub precision: Option<u8>,
}

fn dynamic_fee_mode() -> FeeMode {
    FeeMode::Dynamic
}

/// What happened to one pool of the scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PoolOutcome {
    pub pool: PoolId,
    pub fee_mode: FeeMode,
    pub registered: bool,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "status")]
pub enum Outcome {
    Charged { fee: Fee },
    Rejected { reason: String },
    Failed { reason: String },
}

impl Scenario {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let scenario: Self = serde_json::from_str(json).context("parsing scenario")?;
        scenario.snapshot().validate()?;
        Ok(scenario)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::from_json_str(&contents)
    }

    /// Feed values of the scenario.
    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            feeds: self.feeds.clone(),
        }
    }

    /// Activates every pool in order, registers its feeds and computes the
    /// fee of one trade.
    pub fn run<O: VolatilityOracle>(&self, registry: &PoolFeeRegistry<O>) -> Vec<PoolOutcome> {
        self.pools
            .iter()
            .map(|entry| {
                let key = PoolKey::new(entry.pool.clone(), entry.fee_mode);
                let outcome = match registry.on_pool_activate(&key) {
                    Err(err) => Outcome::Rejected {
                        reason: err.to_string(),
                    },
                    Ok(()) => {
                        if let Some(market_data) = &entry.market_data {
                            registry.update_market_data(
                                entry.pool.clone(),
                                market_data.short_term_feed.clone(),
                                market_data.long_term_feed.clone(),
                                market_data
                                    .precision
                                    .unwrap_or_else(|| registry.curve().decimals()),
                            );
                        }
                        match registry.compute_fee(&entry.pool) {
                            Ok(fee) => Outcome::Charged { fee },
                            Err(err) => Outcome::Failed {
                                reason: err.to_string(),
                            },
                        }
                    }
                };
                PoolOutcome {
                    pool: entry.pool.clone(),
                    fee_mode: entry.fee_mode,
                    registered: registry.is_configured(&entry.pool),
                    outcome,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynfee_data::staleness::StalenessGuard;
    use dynfee_registry::RegistryConfig;
    use std::io::Write;
    use std::time::Duration;

    const SCENARIO: &str = r#"{
        "feeds": [
            { "feed": "eth-1h", "value": 500000, "updated-at": "2026-01-01T00:00:00Z" },
            { "feed": "eth-30d", "value": 4000000, "updated-at": "2026-01-01T00:00:00Z" }
        ],
        "pools": [
            { "pool": "eth-usdc", "market-data": { "short-term-feed": "eth-1h", "long-term-feed": "eth-30d" } },
            { "pool": "wbtc-usdc" },
            { "pool": "usdc-usdt", "fee-mode": { "static": 100 } },
            { "pool": "sol-usdc", "market-data": { "short-term-feed": "sol-1h", "long-term-feed": "eth-30d", "precision": 5 } }
        ]
    }"#;

    fn outcome(outcomes: &[PoolOutcome], pool: &str) -> PoolOutcome {
        outcomes
            .iter()
            .find(|o| o.pool.as_str() == pool)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_run_scenario() {
        let scenario = Scenario::from_json_str(SCENARIO).unwrap();
        let oracle = scenario.snapshot().into_oracle().unwrap();
        let registry = PoolFeeRegistry::from_config(&RegistryConfig::default(), oracle).unwrap();

        let outcomes = scenario.run(&registry);
        assert_eq!(outcomes.len(), 4);

        let eth = outcome(&outcomes, "eth-usdc");
        assert!(eth.registered);
        assert_eq!(eth.outcome, Outcome::Charged { fee: Fee::new(6500) });

        let wbtc = outcome(&outcomes, "wbtc-usdc");
        assert!(!wbtc.registered);
        assert_eq!(wbtc.outcome, Outcome::Charged { fee: Fee::new(3000) });

        let stable = outcome(&outcomes, "usdc-usdt");
        assert!(!stable.registered);
        assert!(matches!(stable.outcome, Outcome::Rejected { .. }));

        let sol = outcome(&outcomes, "sol-usdc");
        assert!(sol.registered);
        match sol.outcome {
            Outcome::Failed { reason } => assert!(reason.contains("sol-1h"), "{reason}"),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_stale_feeds_fail_under_guard() {
        let scenario = Scenario::from_json_str(SCENARIO).unwrap();
        let oracle = scenario.snapshot().into_oracle().unwrap();
        // 2026-01-01T02:00:00Z
        let guard = StalenessGuard::with_clock(oracle, Duration::from_secs(3_600), || 1_767_232_800);
        let registry = PoolFeeRegistry::from_config(&RegistryConfig::default(), guard).unwrap();

        let eth = outcome(&scenario.run(&registry), "eth-usdc");
        assert!(matches!(eth.outcome, Outcome::Failed { .. }));
    }

    #[test]
    fn test_outcome_json() {
        let outcome = PoolOutcome {
            pool: PoolId::new("eth-usdc"),
            fee_mode: FeeMode::Dynamic,
            registered: true,
            outcome: Outcome::Charged { fee: Fee::new(6500) },
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "charged");
        assert_eq!(json["fee"], 6500);
        assert_eq!(json["fee-mode"], "dynamic");
    }

    #[test]
    fn test_duplicate_feeds_rejected() {
        let json = r#"{
            "feeds": [
                { "feed": "a", "value": 1, "updated-at": "2026-01-01T00:00:00Z" },
                { "feed": "a", "value": 2, "updated-at": "2026-01-01T00:00:00Z" }
            ]
        }"#;
        assert!(Scenario::from_json_str(json).is_err());
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{SCENARIO}").unwrap();
        let scenario = Scenario::from_path(file.path()).unwrap();
        assert_eq!(scenario.pools.len(), 4);
        assert_eq!(scenario.pools[2].fee_mode, FeeMode::Static(100));
    }
}
