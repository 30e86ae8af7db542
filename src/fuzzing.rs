use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::RunArgs;
use crate::config::apply_config;
use crate::config::types::ConfigFile;
use crate::error::{AppError, AppResult, ConfigError};

thread_local! {
    static BASE_MATCHES: ArgMatches = RunArgs::command().get_matches_from(["ratestorm"]);
}

/// Parses TOML config content and applies it to default CLI arguments.
///
/// # Errors
///
/// Returns an error when parsing fails or any config value is invalid.
pub fn apply_config_from_toml(input: &str) -> AppResult<RunArgs> {
    let config: ConfigFile = toml::from_str(input).map_err(|err| {
        AppError::config(ConfigError::ParseToml {
            path: "<fuzz>.toml".into(),
            source: err,
        })
    })?;
    apply_to_defaults(&config)
}

/// Parses JSON config content and applies it to default CLI arguments.
///
/// # Errors
///
/// Returns an error when parsing fails or any config value is invalid.
pub fn apply_config_from_json(input: &[u8]) -> AppResult<RunArgs> {
    let config: ConfigFile = serde_json::from_slice(input)?;
    apply_to_defaults(&config)
}

fn apply_to_defaults(config: &ConfigFile) -> AppResult<RunArgs> {
    BASE_MATCHES.with(|matches| {
        let mut args = RunArgs::from_arg_matches(matches)?;
        apply_config(&mut args, matches, config)?;
        Ok(args)
    })
}
