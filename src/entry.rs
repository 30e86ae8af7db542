use std::ffi::OsString;
use std::path::Path;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::{info, warn};

use ratestorm::args::{OutputFormat, RunArgs};
use ratestorm::config::{DEFAULT_CONFIG_FILES, apply_config, load_config};
use ratestorm::error::{AppError, AppResult, ValidationError};
use ratestorm::http::{HttpClient, HttpClientOptions, HttpRequest, SingleRequestWork};
use ratestorm::report;
use ratestorm::runner::{Rate, RunStats, Runner, RunnerOptions};
use ratestorm::shutdown::CancelToken;

use crate::shutdown_handlers::setup_signal_cancel_handler;

/// Environment variable that disables colored log output when set.
const NO_COLOR_ENV: &str = "NO_COLOR";

pub(crate) fn run() -> AppResult<()> {
    let Some((mut args, matches)) = parse_args()? else {
        return Ok(());
    };

    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }

    let no_color = args.no_color || std::env::var_os(NO_COLOR_ENV).is_some();
    crate::logger::init_logging(args.verbose, no_color);

    let Some(url) = args.url.as_deref() else {
        tracing::error!("Missing URL (set --url or provide in config).");
        return Err(AppError::validation(ValidationError::MissingUrl));
    };
    let request = build_request(&args, url)?;
    let client = HttpClient::with_options(&HttpClientOptions {
        timeout: args.timeout,
        ..HttpClientOptions::default()
    })?;
    let work = SingleRequestWork::new(client, request, &args.label);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|source| AppError::validation(ValidationError::RuntimeBuildFailed { source }))?;

    let runner = Runner::with_options(RunnerOptions {
        precision: args.precision,
        max_in_flight: args.max_in_flight.map(|limit| limit.as_non_zero()),
    })?;
    let rate = Rate::new(args.rate.get(), args.per);

    let stats = runtime.block_on(async {
        let cancel = CancelToken::new();
        let signals = setup_signal_cancel_handler(&cancel);
        let result = runner.start(rate, args.duration, &cancel, work).await;
        signals.abort();
        result
    })?;
    log_stats(&stats);

    let summaries = runner.summaries();
    match args.output {
        OutputFormat::Text => report::print_text(&summaries),
        OutputFormat::Json => println!("{}", report::render_json(&summaries)?),
    }
    Ok(())
}

fn parse_args() -> AppResult<Option<(RunArgs, ArgMatches)>> {
    let mut cmd = RunArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = RunArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

fn build_request(args: &RunArgs, url: &str) -> AppResult<HttpRequest> {
    let mut request = HttpRequest::new(args.method.into(), url)?.headers(args.headers.clone());
    if let Some(data) = args.data.as_ref() {
        request = request.body(data.as_bytes().to_vec());
    }
    Ok(request)
}

fn log_stats(stats: &RunStats) {
    if stats.cancelled {
        warn!(
            "Run cancelled after {:?}; {} requests were launched.",
            stats.elapsed, stats.launched
        );
    } else {
        info!(
            "Launched {} requests over {} ticks in {:?}.",
            stats.launched, stats.ticks, stats.elapsed
        );
    }
    if stats.panicked > 0 {
        warn!("{} requests panicked and were not recorded.", stats.panicked);
    }
}
