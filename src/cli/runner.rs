use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use yieldline::buckets::{BucketKey, BucketSpec};
use yieldline::config::AppConfig;
use yieldline::generators::{generate_chart, generate_fees_chart, ChartOptions, ChartRequest, ChartSeries};
use yieldline::input;
use yieldline::models::Timestamp;
use yieldline::smoothing::smooth_column;
use yieldline::summary::ChartSummary;

use crate::cli::formatters;
use crate::cli::{ChartArgs, Commands};

/// Run one CLI command with the loaded configuration
pub fn run(command: &Commands, config: &AppConfig, json_output: bool) -> Result<()> {
    match command {
        Commands::Buckets => {
            if json_output {
                let ids: Vec<&str> = BucketKey::ALL.iter().map(|k| k.as_str()).collect();
                println!("{}", serde_json::to_string_pretty(&ids)?);
            } else {
                println!("{}", formatters::format_buckets_table());
            }
            Ok(())
        }
        Commands::Standard { input, chart, ma } => {
            run_standard(input, chart, window(*ma, config), config, json_output)
        }
        Commands::Concentrated {
            input,
            chart,
            ma,
            debug_breakdown,
        } => {
            let options = ChartOptions {
                include_debug_breakdown: *debug_breakdown || config.include_debug_breakdown,
            };
            run_concentrated(input, chart, window(*ma, config), options, config, json_output)
        }
        Commands::Fees { input, chart } => run_fees(input, chart, config, json_output),
    }
}

/// Moving-average window from the command line, else from config; 0 disables
fn window(cli_window: Option<usize>, config: &AppConfig) -> usize {
    cli_window.unwrap_or(config.moving_average_window)
}

fn resolve(chart: &ChartArgs, config: &AppConfig) -> Result<(BucketSpec, Timestamp)> {
    let key: BucketKey = match chart.bucket.as_deref() {
        Some(id) => id.parse()?,
        None => config.bucket()?,
    };
    let now = chart.now.unwrap_or_else(|| Utc::now().timestamp());
    info!("Charting bucket {} ending at {}", key, now);
    Ok((key.spec(), now))
}

fn run_standard(
    path: &Path,
    chart: &ChartArgs,
    ma_window: usize,
    config: &AppConfig,
    json_output: bool,
) -> Result<()> {
    let (bucket, now) = resolve(chart, config)?;
    let request = ChartRequest::Standard(input::load_standard(path)?);

    let ChartSeries::Standard(mut points) =
        generate_chart(&request, bucket, now, ChartOptions::default())?
    else {
        anyhow::bail!("unexpected chart kind for standard position");
    };

    if ma_window > 0 {
        smooth_column(&mut points, ma_window, |p| &mut p.usd_balance)?;
    }

    if let Some(csv_path) = &chart.csv {
        formatters::write_standard_csv(csv_path, &points)
            .with_context(|| format!("failed to export chart to {}", csv_path.display()))?;
    }

    let summary = ChartSummary::standard(&points);
    if json_output {
        println!("{}", formatters::format_chart_json(&points, summary.as_ref()));
    } else if points.is_empty() {
        print!("{}", formatters::format_empty_chart());
    } else {
        println!("{}", formatters::format_standard_table(&points, summary.as_ref()));
    }
    Ok(())
}

fn run_concentrated(
    path: &Path,
    chart: &ChartArgs,
    ma_window: usize,
    options: ChartOptions,
    config: &AppConfig,
    json_output: bool,
) -> Result<()> {
    let (bucket, now) = resolve(chart, config)?;
    let request = ChartRequest::Concentrated(input::load_concentrated(path)?);
    info!("Position kind: {}", request.kind().as_str());

    let ChartSeries::Concentrated(mut points) = generate_chart(&request, bucket, now, options)?
    else {
        anyhow::bail!("unexpected chart kind for concentrated position");
    };

    if ma_window > 0 {
        smooth_column(&mut points, ma_window, |p| &mut p.underlying_usd)?;
        smooth_column(&mut points, ma_window, |p| &mut p.held_usd)?;
    }

    if let Some(csv_path) = &chart.csv {
        formatters::write_concentrated_csv(csv_path, &points)
            .with_context(|| format!("failed to export chart to {}", csv_path.display()))?;
    }

    let summary = ChartSummary::concentrated(&points);
    if json_output {
        println!("{}", formatters::format_chart_json(&points, summary.as_ref()));
    } else if points.is_empty() {
        print!("{}", formatters::format_empty_chart());
    } else {
        println!(
            "{}",
            formatters::format_concentrated_table(&points, summary.as_ref())
        );
    }
    Ok(())
}

fn run_fees(path: &Path, chart: &ChartArgs, config: &AppConfig, json_output: bool) -> Result<()> {
    let (bucket, now) = resolve(chart, config)?;
    let fees_input = input::load_fees(path)?;

    // No harvests yet is a normal state for the user, not a failure
    if fees_input.harvests.is_empty() {
        if json_output {
            println!("{}", formatters::format_chart_json::<()>(&[], None));
        } else {
            print!("{}", formatters::format_empty_chart());
        }
        return Ok(());
    }

    let points = generate_fees_chart(&fees_input, bucket, now)?;

    if let Some(csv_path) = &chart.csv {
        formatters::write_fees_csv(csv_path, &points)
            .with_context(|| format!("failed to export chart to {}", csv_path.display()))?;
    }

    let summary = ChartSummary::fees(&points);
    if json_output {
        println!("{}", formatters::format_chart_json(&points, summary.as_ref()));
    } else {
        println!("{}", formatters::format_fees_table(&points, summary.as_ref()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_window_overrides_config() {
        let config = AppConfig {
            moving_average_window: 5,
            ..AppConfig::default()
        };
        assert_eq!(window(Some(2), &config), 2);
        assert_eq!(window(None, &config), 5);
    }

    #[test]
    fn test_resolve_uses_config_bucket() {
        let config = AppConfig {
            default_bucket: "1h_1d".to_string(),
            ..AppConfig::default()
        };
        let args = ChartArgs {
            now: Some(1_000),
            ..ChartArgs::default()
        };
        let (bucket, now) = resolve(&args, &config).unwrap();
        assert_eq!(bucket, BucketKey::OneHourOneDay.spec());
        assert_eq!(now, 1_000);
    }

    #[test]
    fn test_resolve_rejects_unknown_bucket() {
        let args = ChartArgs {
            bucket: Some("3d_1w".to_string()),
            ..ChartArgs::default()
        };
        let err = resolve(&args, &AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("unknown bucket"));
    }
}
