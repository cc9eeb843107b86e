//! Command Line Interface for the dynamic fee engine.
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use dynfee_data::staleness::StalenessGuard;
use dynfee_domain::fee_curve::CurvePoint;
use dynfee_domain::value_objects::VolatilityReading;
use dynfee_registry::{PoolFeeRegistry, RegistryConfig};
use rust_decimal::Decimal;
use scenario::{Outcome, PoolOutcome, Scenario};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod scenario;

#[derive(Parser)]
#[command(name = "dynfee")]
#[command(about = "Volatility-driven sigmoid fee engine", long_about = None)]
struct Cli {
    #[command(flatten)]
    curve: CurveArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Curve options. Flags override values read from `--config`.
#[derive(Args, Debug, Default)]
struct CurveArgs {
    /// TOML registry configuration file
    #[arg(short, long, global = true, env = "DYNFEE_CONFIG")]
    config: Option<PathBuf>,

    /// Lower fee bound, in hundredths of a basis point
    #[arg(long, global = true, env = "DYNFEE_MIN_FEE")]
    min_fee: Option<u32>,

    /// Upper fee bound, in hundredths of a basis point
    #[arg(long, global = true, env = "DYNFEE_MAX_FEE")]
    max_fee: Option<u32>,

    /// Sigmoid steepness (0 for the default)
    #[arg(long, global = true, env = "DYNFEE_STEEPNESS")]
    steepness: Option<Decimal>,

    /// Volatility at the curve's midpoint (0 for the default)
    #[arg(long, global = true, env = "DYNFEE_MIDPOINT")]
    midpoint: Option<Decimal>,

    /// Decimal precision of raw feed values
    #[arg(long, global = true, env = "DYNFEE_DECIMALS")]
    decimals: Option<u8>,

    /// Fee for pools without market data
    #[arg(long, global = true, env = "DYNFEE_DEFAULT_FEE")]
    default_fee: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fee for a single volatility value
    Quote {
        /// Volatility in whole units (e.g. 12.5 for 12.5%)
        #[arg(short, long, allow_hyphen_values = true)]
        volatility: Decimal,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Tabulate the fee curve over a volatility range
    Sweep {
        /// First volatility, in whole units
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        from: Decimal,

        /// Last volatility (inclusive), in whole units
        #[arg(long, default_value = "100")]
        to: Decimal,

        /// Increment, in whole units
        #[arg(long, default_value = "5")]
        step: Decimal,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Activate the pools of a scenario file and compute their fees
    Simulate {
        /// JSON scenario with feeds and pools
        #[arg(short, long)]
        scenario: PathBuf,

        /// Reject readings older than this many seconds
        #[arg(long, env = "DYNFEE_MAX_AGE")]
        max_age: Option<u64>,

        /// Time used for staleness checks (RFC 3339), defaults to now
        #[arg(long, requires = "max_age")]
        as_of: Option<DateTime<Utc>>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

impl CurveArgs {
    fn resolve(&self) -> Result<RegistryConfig> {
        let mut config = match &self.config {
            Some(path) => RegistryConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => RegistryConfig::default(),
        };
        if let Some(min_fee) = self.min_fee {
            config.curve.min_fee = min_fee;
        }
        if let Some(max_fee) = self.max_fee {
            config.curve.max_fee = max_fee;
        }
        if let Some(steepness) = self.steepness {
            config.curve.steepness = steepness;
        }
        if let Some(midpoint) = self.midpoint {
            config.curve.midpoint = midpoint;
        }
        if let Some(decimals) = self.decimals {
            config.volatility_decimals = decimals;
        }
        if let Some(default_fee) = self.default_fee {
            config.default_fee = default_fee;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.curve.resolve()?;

    match cli.command {
        Commands::Quote { volatility, json } => quote(&config, volatility, json),
        Commands::Sweep {
            from,
            to,
            step,
            json,
        } => sweep(&config, from, to, step, json),
        Commands::Simulate {
            scenario,
            max_age,
            as_of,
            json,
        } => simulate(&config, &scenario, max_age, as_of, json),
    }
}

fn to_reading(volatility: Decimal, decimals: u8) -> Result<i128> {
    VolatilityReading::from_decimal(volatility, decimals, 0)
        .map(|reading| reading.value)
        .with_context(|| format!("volatility {volatility} does not fit {decimals} decimals"))
}

fn quote(config: &RegistryConfig, volatility: Decimal, json: bool) -> Result<()> {
    let curve = config.fee_curve()?;
    let reading = to_reading(volatility, curve.decimals())?;
    let fee = curve.fee_for_reading(reading);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&CurvePoint { reading, fee })?
        );
    } else {
        println!(
            "Volatility {} ({} raw) -> fee {} ({})",
            volatility,
            reading,
            fee.value(),
            fee
        );
    }
    Ok(())
}

fn sweep(config: &RegistryConfig, from: Decimal, to: Decimal, step: Decimal, json: bool) -> Result<()> {
    let curve = config.fee_curve()?;
    let decimals = curve.decimals();
    let step = to_reading(step, decimals)?;
    if step <= 0 {
        bail!("step must be at least one raw feed unit");
    }

    let points = curve.sweep(to_reading(from, decimals)?, to_reading(to, decimals)?, step);
    info!(points = points.len(), "Swept fee curve");

    if json {
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }

    println!("{:<14} | {:<10} | {:<10}", "Volatility", "Fee", "Percent");
    println!("{}", "-".repeat(40));
    for point in points {
        let volatility = VolatilityReading::new(point.reading, 0)
            .to_decimal(decimals)
            .map(|v| v.normalize().to_string())
            .unwrap_or_else(|| point.reading.to_string());
        println!(
            "{:<14} | {:<10} | {:<10}",
            volatility,
            point.fee.value(),
            point.fee.to_string()
        );
    }
    Ok(())
}

fn simulate(
    config: &RegistryConfig,
    path: &Path,
    max_age: Option<u64>,
    as_of: Option<DateTime<Utc>>,
    json: bool,
) -> Result<()> {
    let scenario = Scenario::from_path(path)?;
    let oracle = scenario.snapshot().into_oracle()?;

    let outcomes = match max_age {
        Some(secs) => {
            let max_age = Duration::from_secs(secs);
            let guard = match as_of {
                Some(as_of) => {
                    let now = u64::try_from(as_of.timestamp())
                        .context("--as-of must not be before the unix epoch")?;
                    StalenessGuard::with_clock(oracle, max_age, move || now)
                }
                None => StalenessGuard::new(oracle, max_age),
            };
            scenario.run(&PoolFeeRegistry::from_config(config, guard)?)
        }
        None => scenario.run(&PoolFeeRegistry::from_config(config, oracle)?),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        print_outcomes(&outcomes);
    }
    Ok(())
}

fn print_outcomes(outcomes: &[PoolOutcome]) {
    println!(
        "{:<16} | {:<12} | {:<10} | {:<8} | {}",
        "Pool", "Mode", "Feeds", "Fee", "Status"
    );
    println!("{}", "-".repeat(70));
    for outcome in outcomes {
        let feeds = if outcome.registered { "registered" } else { "default" };
        let (fee, status) = match &outcome.outcome {
            Outcome::Charged { fee } => (fee.value().to_string(), format!("charged {fee}")),
            Outcome::Rejected { reason } => ("-".to_string(), format!("rejected: {reason}")),
            Outcome::Failed { reason } => ("-".to_string(), format!("failed: {reason}")),
        };
        println!(
            "{:<16} | {:<12} | {:<10} | {:<8} | {}",
            outcome.pool.as_str(),
            format!("{:?}", outcome.fee_mode),
            feeds,
            fee,
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default-fee = 500\n[curve]\nmin-fee = 100\nmax-fee = 900").unwrap();

        let args = CurveArgs {
            config: Some(file.path().to_path_buf()),
            max_fee: Some(2000),
            decimals: Some(8),
            ..CurveArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.default_fee, 500);
        assert_eq!(config.curve.min_fee, 100);
        assert_eq!(config.curve.max_fee, 2000);
        assert_eq!(config.volatility_decimals, 8);
    }

    #[test]
    fn test_defaults_without_config() {
        let config = CurveArgs::default().resolve().unwrap();
        assert_eq!(config, RegistryConfig::default());
    }

    #[test]
    fn test_to_reading() {
        assert_eq!(to_reading(Decimal::new(125, 1), 5).unwrap(), 1_250_000);
        assert_eq!(to_reading(Decimal::new(-1, 0), 0).unwrap(), -1);
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["dynfee", "quote", "--volatility", "12.5", "--min-fee", "100"])
            .unwrap();
        assert_eq!(cli.curve.min_fee, Some(100));
        assert!(matches!(cli.command, Commands::Quote { json: false, .. }));

        assert!(Cli::try_parse_from(["dynfee", "simulate", "-s", "x.json", "--as-of", "2026-01-01T00:00:00Z"]).is_err());
    }
}
