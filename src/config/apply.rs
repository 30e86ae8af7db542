use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveUsize, RunArgs, parse_header};
use crate::error::{AppError, AppResult, ConfigError};
use crate::metrics::check_precision;

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments.
///
/// Options passed explicitly on the command line win; config values replace
/// defaults only.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut RunArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if !is_cli(matches, "method")
        && let Some(method) = config.method
    {
        args.method = method;
    }

    if !is_cli(matches, "headers")
        && let Some(headers) = config.headers.as_ref()
    {
        args.headers = parse_headers(headers)?;
    }

    if !is_cli(matches, "data")
        && let Some(data) = config.data.clone()
    {
        args.data = Some(data);
    }

    if !is_cli(matches, "label")
        && let Some(label) = config.label.clone()
    {
        args.label = label;
    }

    if !is_cli(matches, "rate")
        && let Some(rate) = config.rate
    {
        args.rate = ensure_positive_usize(rate, "rate")?;
    }

    if !is_cli(matches, "per")
        && let Some(per) = config.per.as_ref()
    {
        args.per = per.to_duration("per")?;
    }

    if !is_cli(matches, "duration")
        && let Some(duration) = config.duration.as_ref()
    {
        args.duration = duration.to_duration("duration")?;
    }

    if !is_cli(matches, "timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.timeout = timeout.to_duration("timeout")?;
    }

    if !is_cli(matches, "max_in_flight")
        && let Some(limit) = config.max_in_flight
    {
        args.max_in_flight = Some(ensure_positive_usize(limit, "max_in_flight")?);
    }

    if !is_cli(matches, "precision")
        && let Some(precision) = config.precision
    {
        args.precision = check_precision(precision).map_err(AppError::validation)?;
    }

    if !is_cli(matches, "output")
        && let Some(output) = config.output
    {
        args.output = output;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive_usize(value: usize, field: &str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn parse_headers(headers: &[String]) -> AppResult<Vec<(String, String)>> {
    let mut parsed = Vec::with_capacity(headers.len());
    for header in headers {
        parsed.push(
            parse_header(header)
                .map_err(|err| AppError::config(ConfigError::InvalidHeader { source: err }))?,
        );
    }
    Ok(parsed)
}
