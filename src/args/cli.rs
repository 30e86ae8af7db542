use clap::Parser;
use std::time::Duration;

use crate::metrics::DEFAULT_PRECISION;

use super::parsers::{parse_duration_arg, parse_header, parse_positive_usize};
use super::types::{HttpMethod, OutputFormat, PositiveUsize};

pub const DEFAULT_LABEL: &str = "request";

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Open-loop HTTP load generator: fires requests at a fixed rate for a fixed duration and reports per-label latency percentiles."
)]
pub struct RunArgs {
    /// Target URL
    #[arg(long, short)]
    pub url: Option<String>,

    /// HTTP method to use
    #[arg(long, short = 'X', default_value = "get", ignore_case = true)]
    pub method: HttpMethod,

    /// HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Request body
    #[arg(long, short)]
    pub data: Option<String>,

    /// Name the outcomes are reported under
    #[arg(long, short, default_value = DEFAULT_LABEL)]
    pub label: String,

    /// Requests fired every period
    #[arg(long = "rate", short = 'r', default_value = "10", value_parser = parse_positive_usize)]
    pub rate: PositiveUsize,

    /// Length of one rate period (supports ms/s/m/h)
    #[arg(long = "per", default_value = "1s", value_parser = parse_duration_arg)]
    pub per: Duration,

    /// How long to keep firing (supports ms/s/m/h)
    #[arg(long = "duration", short = 't', default_value = "10s", value_parser = parse_duration_arg)]
    pub duration: Duration,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long = "timeout", default_value = "30s", value_parser = parse_duration_arg)]
    pub timeout: Duration,

    /// Skip slots while this many requests are still running
    #[arg(long = "max-in-flight", value_parser = parse_positive_usize)]
    pub max_in_flight: Option<PositiveUsize>,

    /// Significant digits kept by the latency estimator (1-5)
    #[arg(
        long,
        default_value_t = DEFAULT_PRECISION,
        value_parser = clap::value_parser!(u8).range(1..=5)
    )]
    pub precision: u8,

    /// Report format
    #[arg(long, short = 'o', default_value = "text", value_enum)]
    pub output: OutputFormat,

    /// Path to config file (TOML or JSON)
    #[arg(long, short)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
