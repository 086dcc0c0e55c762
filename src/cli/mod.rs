use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub mod formatters;
pub mod runner;

#[derive(Parser)]
#[command(name = "yieldline")]
#[command(
    version,
    about = "Historical value, hold baseline and harvested fees for DeFi positions"
)]
#[command(
    long_about = "Rebuild fixed-cadence charts of a position's value in underlying units and USD from its transaction log and sparse price history."
)]
pub struct Cli {
    /// Config file (defaults to <config dir>/yieldline/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ChartArgs {
    /// Bucket identifier (1h_1d, 1h_1w, 1d_1M, 1d_1Y, 1d_all)
    #[arg(short, long)]
    pub bucket: Option<String>,

    /// Chart end as unix seconds (defaults to the current time)
    #[arg(long)]
    pub now: Option<i64>,

    /// Also write the chart to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available chart buckets
    Buckets,

    /// Chart a single-asset position
    Standard {
        /// Path to the JSON input document
        input: PathBuf,

        #[command(flatten)]
        chart: ChartArgs,

        /// Trailing moving-average window for the USD column
        #[arg(long)]
        ma: Option<usize>,
    },

    /// Chart a concentrated-liquidity pool or vault position against holding
    Concentrated {
        /// Path to the JSON input document
        input: PathBuf,

        #[command(flatten)]
        chart: ChartArgs,

        /// Trailing moving-average window for the USD columns
        #[arg(long)]
        ma: Option<usize>,

        /// Include every intermediate ratio and balance
        #[arg(long)]
        debug_breakdown: bool,
    },

    /// Chart cumulative harvested fees
    Fees {
        /// Path to the JSON input document
        input: PathBuf,

        #[command(flatten)]
        chart: ChartArgs,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_concentrated_with_flags() {
        let cli = Cli::try_parse_from([
            "yieldline",
            "--json",
            "concentrated",
            "input.json",
            "--bucket",
            "1h_1w",
            "--now",
            "1700000000",
            "--ma",
            "3",
            "--debug-breakdown",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Concentrated {
                input,
                chart,
                ma,
                debug_breakdown,
            } => {
                assert_eq!(input, PathBuf::from("input.json"));
                assert_eq!(chart.bucket.as_deref(), Some("1h_1w"));
                assert_eq!(chart.now, Some(1_700_000_000));
                assert_eq!(ma, Some(3));
                assert!(debug_breakdown);
            }
            _ => panic!("expected concentrated command"),
        }
    }
}
