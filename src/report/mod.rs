//! Rendering of finalized summaries as text tables or JSON.
mod table;


use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::metrics::{LatencyStats, Metrics, Status};

use table::Table;

/// Render the four summary tables: totals, status codes, latencies over
/// every outcome, and latencies over successes only.
#[must_use]
pub fn render_text(summaries: &BTreeMap<String, Metrics>) -> String {
    let mut lines = Vec::new();

    lines.push("Summaries:".to_owned());
    lines.extend(summary_table(summaries).render());
    lines.push(String::new());

    lines.push("Status Codes:".to_owned());
    lines.extend(status_table(summaries).render());
    lines.push(String::new());

    lines.push("Latencies:".to_owned());
    lines.extend(latency_table(summaries, |metrics| &metrics.latencies).render());
    lines.push(String::new());

    lines.push("Latencies (Success Only):".to_owned());
    lines.extend(latency_table(summaries, |metrics| &metrics.latencies_success).render());

    lines.join("\n")
}

pub fn print_text(summaries: &BTreeMap<String, Metrics>) {
    println!("{}", render_text(summaries));
}

/// Pretty-printed JSON object keyed by label.
///
/// # Errors
///
/// Returns an error when serialization fails.
pub fn render_json(summaries: &BTreeMap<String, Metrics>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(summaries)
}

fn summary_table(summaries: &BTreeMap<String, Metrics>) -> Table {
    let mut table = Table::new([
        "Name",
        "Total Requests",
        "Success %",
        "Total Errors",
        "Errors",
    ]);
    for (label, metrics) in summaries {
        table.push_row(vec![
            label.clone(),
            metrics.requests.to_string(),
            format!("{}%", format_x100(success_x100(metrics))),
            metrics.failures().to_string(),
            metrics.errors.join("; "),
        ]);
    }
    table
}

fn status_table(summaries: &BTreeMap<String, Metrics>) -> Table {
    let statuses: BTreeSet<Status> = summaries
        .values()
        .flat_map(|metrics| metrics.status_codes.keys().copied())
        .collect();
    let mut headers = vec!["Name".to_owned()];
    headers.extend(statuses.iter().map(ToString::to_string));

    let mut table = Table::new(headers);
    for (label, metrics) in summaries {
        let mut row = vec![label.clone()];
        row.extend(statuses.iter().map(|status| {
            metrics
                .status_codes
                .get(status)
                .copied()
                .unwrap_or(0)
                .to_string()
        }));
        table.push_row(row);
    }
    table
}

fn latency_table<F>(summaries: &BTreeMap<String, Metrics>, select: F) -> Table
where
    F: Fn(&Metrics) -> &LatencyStats,
{
    let mut table = Table::new(["Name", "P50", "P90", "P95", "P99", "Avg", "Max", "Min"]);
    for (label, metrics) in summaries {
        let stats = select(metrics);
        table.push_row(vec![
            label.clone(),
            format_ms(stats.p50),
            format_ms(stats.p90),
            format_ms(stats.p95),
            format_ms(stats.p99),
            format_ms(stats.mean),
            format_ms(stats.max),
            format_ms(stats.min),
        ]);
    }
    table
}

fn success_x100(metrics: &Metrics) -> u64 {
    if metrics.requests == 0 {
        return 0;
    }
    let scaled = u128::from(metrics.successes)
        .saturating_mul(10_000)
        .checked_div(u128::from(metrics.requests))
        .unwrap_or(0);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

/// Milliseconds with two decimals.
fn format_ms(value: Duration) -> String {
    let hundredths = value.as_nanos().checked_div(10_000).unwrap_or(0);
    format!("{}ms", format_x100(u64::try_from(hundredths).unwrap_or(u64::MAX)))
}

fn format_x100(value: u64) -> String {
    format!(
        "{}.{:02}",
        value.checked_div(100).unwrap_or(0),
        value.checked_rem(100).unwrap_or(0)
    )
}
