//! Output formatting module for CLI display
//!
//! Handles terminal tables, JSON and CSV output, separating presentation
//! from chart generation.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use itertools::Itertools;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use yieldline::buckets::{BucketKey, TotalRange};
use yieldline::models::{to_datetime, ConcentratedPoint, FeesPoint, StandardPoint, Timestamp};
use yieldline::summary::ChartSummary;
use yieldline::utils::{format_pct, format_token, format_usd};

fn format_time(t: Timestamp) -> String {
    to_datetime(t)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| t.to_string())
}

fn colored_change(value: Decimal, text: String) -> String {
    if value >= Decimal::ZERO {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

/// Serialize a chart and its summary as pretty JSON
pub fn format_chart_json<T: Serialize>(points: &[T], summary: Option<&ChartSummary>) -> String {
    #[derive(Serialize)]
    struct JsonChart<'a, T: Serialize> {
        #[serde(skip_serializing_if = "Option::is_none")]
        summary: Option<&'a ChartSummary>,
        points: &'a [T],
    }

    serde_json::to_string_pretty(&JsonChart { summary, points })
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

pub fn format_buckets_table() -> String {
    #[derive(Tabled)]
    struct BucketRow {
        #[tabled(rename = "Bucket")]
        id: String,
        #[tabled(rename = "Description")]
        label: String,
        #[tabled(rename = "Interval (s)")]
        interval: String,
        #[tabled(rename = "Range (s)")]
        range: String,
    }

    let rows: Vec<BucketRow> = BucketKey::ALL
        .iter()
        .map(|key| {
            let spec = key.spec();
            BucketRow {
                id: key.as_str().to_string(),
                label: key.label().to_string(),
                interval: spec.sample_interval.to_string(),
                range: match spec.total_range {
                    TotalRange::Bounded(range) => range.to_string(),
                    TotalRange::AllTime => "all".to_string(),
                },
            }
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(2..), Alignment::right());
    table.to_string()
}

fn format_summary(summary: &ChartSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n\n{} Summary", "━".repeat(60).bright_black()));
    output.push_str(&format!(
        "\n{:<20} {}",
        "Start Value:".bold(),
        format_usd(summary.start_value)
    ));
    output.push_str(&format!(
        "\n{:<20} {}",
        "End Value:".bold(),
        format_usd(summary.end_value)
    ));
    output.push_str(&format!(
        "\n{:<20} {}",
        "Change:".bold(),
        colored_change(summary.change, format_usd(summary.change))
    ));
    output.push_str(&format!(
        "\n{:<20} {}",
        "Change %:".bold(),
        colored_change(summary.change_pct, format_pct(summary.change_pct))
    ));
    if let Some(pnl) = summary.pnl_vs_hold {
        output.push_str(&format!(
            "\n{:<20} {}",
            "PnL vs Hold:".bold(),
            colored_change(pnl, format_usd(pnl))
        ));
    }
    output.push('\n');
    output
}

pub fn format_standard_table(points: &[StandardPoint], summary: Option<&ChartSummary>) -> String {
    #[derive(Tabled)]
    struct StandardRow {
        #[tabled(rename = "Time")]
        time: String,
        #[tabled(rename = "Shares")]
        shares: String,
        #[tabled(rename = "Underlying")]
        underlying: String,
        #[tabled(rename = "USD")]
        usd: String,
    }

    let rows: Vec<StandardRow> = points
        .iter()
        .map(|p| StandardRow {
            time: format_time(p.t),
            shares: format_token(p.share_balance),
            underlying: format_token(p.underlying_balance),
            usd: format_usd(p.usd_balance),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());

    let mut output = format!("\n{} Position Value\n\n", "📈".cyan().bold());
    output.push_str(&table.to_string());
    if let Some(summary) = summary {
        output.push_str(&format_summary(summary));
    }
    output
}

pub fn format_concentrated_table(
    points: &[ConcentratedPoint],
    summary: Option<&ChartSummary>,
) -> String {
    #[derive(Tabled)]
    struct ConcentratedRow {
        #[tabled(rename = "Time")]
        time: String,
        #[tabled(rename = "Shares")]
        shares: String,
        #[tabled(rename = "Underlying")]
        underlying: String,
        #[tabled(rename = "Position USD")]
        underlying_usd: String,
        #[tabled(rename = "Held USD")]
        held_usd: String,
        #[tabled(rename = "vs Hold")]
        pnl: String,
    }

    let rows: Vec<ConcentratedRow> = points
        .iter()
        .map(|p| {
            let pnl = p.pnl_vs_hold();
            ConcentratedRow {
                time: format_time(p.t),
                shares: format_token(p.shares),
                underlying: format_token(p.underlying),
                underlying_usd: format_usd(p.underlying_usd),
                held_usd: format_usd(p.held_usd),
                pnl: colored_change(pnl, format_usd(pnl)),
            }
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());

    let mut output = format!("\n{} Position vs Hold\n\n", "📈".cyan().bold());
    output.push_str(&table.to_string());
    if let Some(summary) = summary {
        output.push_str(&format_summary(summary));
    }
    output
}

pub fn format_fees_table(points: &[FeesPoint], summary: Option<&ChartSummary>) -> String {
    #[derive(Tabled)]
    struct FeesRow {
        #[tabled(rename = "Time")]
        time: String,
        #[tabled(rename = "Claimed")]
        amounts: String,
        #[tabled(rename = "Claimed USD")]
        values: String,
        #[tabled(rename = "Total USD")]
        total: String,
    }

    let rows: Vec<FeesRow> = points
        .iter()
        .map(|p| FeesRow {
            time: format_time(p.t),
            amounts: p.amounts.iter().map(|a| format_token(*a)).join(" / "),
            values: p.values.iter().map(|v| format_usd(*v)).join(" / "),
            total: format_usd(p.values.iter().copied().sum()),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());

    let mut output = format!("\n{} Harvested Fees\n\n", "🌾".cyan().bold());
    output.push_str(&table.to_string());
    if let Some(summary) = summary {
        output.push_str(&format_summary(summary));
    }
    output
}

/// Empty-chart message shown instead of a table
pub fn format_empty_chart() -> String {
    format!(
        "{} No chart points yet\nThe position has no history in the selected window\n",
        "ℹ".blue().bold()
    )
}

fn write_csv(path: &Path, header: &[String], rows: Vec<Vec<String>>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create CSV file {}", path.display()))?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_standard_csv(path: &Path, points: &[StandardPoint]) -> Result<()> {
    let header = ["t", "share_balance", "underlying_balance", "usd_balance"].map(String::from);
    let rows = points
        .iter()
        .map(|p| {
            vec![
                p.t.to_string(),
                p.share_balance.to_string(),
                p.underlying_balance.to_string(),
                p.usd_balance.to_string(),
            ]
        })
        .collect();
    write_csv(path, &header, rows)
}

pub fn write_concentrated_csv(path: &Path, points: &[ConcentratedPoint]) -> Result<()> {
    let header = ["t", "shares", "underlying", "underlying_usd", "held_usd"].map(String::from);
    let rows = points
        .iter()
        .map(|p| {
            vec![
                p.t.to_string(),
                p.shares.to_string(),
                p.underlying.to_string(),
                p.underlying_usd.to_string(),
                p.held_usd.to_string(),
            ]
        })
        .collect();
    write_csv(path, &header, rows)
}

pub fn write_fees_csv(path: &Path, points: &[FeesPoint]) -> Result<()> {
    let tokens = points.first().map(|p| p.amounts.len()).unwrap_or(0);
    let mut header = vec!["t".to_string()];
    header.extend((0..tokens).map(|i| format!("amount_{}", i)));
    header.extend((0..tokens).map(|i| format!("value_{}", i)));

    let rows = points
        .iter()
        .map(|p| {
            std::iter::once(p.t.to_string())
                .chain(p.amounts.iter().map(|a| a.to_string()))
                .chain(p.values.iter().map(|v| v.to_string()))
                .collect::<Vec<String>>()
        })
        .collect();
    write_csv(path, &header, rows)
}
