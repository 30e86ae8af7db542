use super::types::{ConfigFile, DurationValue};
use super::{apply_config, load_config, load_config_file};
use clap::{CommandFactory, FromArgMatches};
use std::time::Duration;
use tempfile::tempdir;

use crate::args::{HttpMethod, OutputFormat, RunArgs};
use crate::error::{AppError, ConfigError, ValidationError};

fn args_from(argv: &[&str]) -> Result<(RunArgs, clap::ArgMatches), String> {
    let matches = RunArgs::command()
        .try_get_matches_from(argv)
        .map_err(|err| format!("parse args failed: {}", err))?;
    let args =
        RunArgs::from_arg_matches(&matches).map_err(|err| format!("parse args failed: {}", err))?;
    Ok((args, matches))
}

#[test]
fn parse_toml_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("ratestorm.toml");
    let content = r#"
url = "http://localhost:3000/health"
method = "post"
headers = ["Accept: application/json"]
data = "{}"
label = "health"
rate = 50
per = "500ms"
duration = 60
timeout = "5s"
max_in_flight = 200
precision = 4
output = "json"
"#;
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    if config.url.as_deref() != Some("http://localhost:3000/health")
        || config.method != Some(HttpMethod::Post)
        || config.label.as_deref() != Some("health")
    {
        return Err(format!("Unexpected request fields {:?}", config));
    }
    if config.rate != Some(50)
        || config.per != Some(DurationValue::Text("500ms".to_owned()))
        || config.duration != Some(DurationValue::Seconds(60))
    {
        return Err(format!("Unexpected rate fields {:?}", config));
    }
    if config.max_in_flight != Some(200)
        || config.precision != Some(4)
        || config.output != Some(OutputFormat::Json)
    {
        return Err(format!("Unexpected run fields {:?}", config));
    }
    Ok(())
}

#[test]
fn parse_json_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("ratestorm.json");
    let content = r#"{
        "url": "http://localhost:3000",
        "rate": 5,
        "per": 2,
        "duration": "1m",
        "headers": ["X-Env: staging"]
    }"#;
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    if config.rate != Some(5)
        || config.per != Some(DurationValue::Seconds(2))
        || config.duration != Some(DurationValue::Text("1m".to_owned()))
    {
        return Err(format!("Unexpected config {:?}", config));
    }
    if config.headers.as_deref() != Some(&["X-Env: staging".to_owned()][..]) {
        return Err(format!("Unexpected headers {:?}", config.headers));
    }
    Ok(())
}

#[test]
fn unsupported_and_missing_extensions_are_rejected() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let yaml = dir.path().join("ratestorm.yaml");
    let bare = dir.path().join("ratestorm");
    for path in [&yaml, &bare] {
        std::fs::write(path, "url: x").map_err(|err| format!("write failed: {}", err))?;
    }

    if !matches!(
        load_config_file(&yaml),
        Err(AppError::Config(ConfigError::UnsupportedExtension { .. }))
    ) {
        return Err("Expected UnsupportedExtension".to_owned());
    }
    if !matches!(
        load_config_file(&bare),
        Err(AppError::Config(ConfigError::MissingExtension))
    ) {
        return Err("Expected MissingExtension".to_owned());
    }
    Ok(())
}

#[test]
fn unreadable_and_malformed_files_report_their_path() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let missing = dir.path().join("missing.toml");
    if !matches!(
        load_config(missing.to_str()),
        Err(AppError::Config(ConfigError::ReadConfig { .. }))
    ) {
        return Err("Expected ReadConfig".to_owned());
    }

    let broken = dir.path().join("broken.toml");
    std::fs::write(&broken, "rate = [").map_err(|err| format!("write failed: {}", err))?;
    let result = load_config_file(&broken);
    if !matches!(&result, Err(AppError::Config(ConfigError::ParseToml { path, .. })) if *path == broken)
    {
        return Err(format!("Expected ParseToml, got {:?}", result));
    }

    let broken_json = dir.path().join("broken.json");
    std::fs::write(&broken_json, "{\"rate\": \"many\"}")
        .map_err(|err| format!("write failed: {}", err))?;
    if !matches!(
        load_config_file(&broken_json),
        Err(AppError::Config(ConfigError::ParseJson { .. }))
    ) {
        return Err("Expected ParseJson".to_owned());
    }
    Ok(())
}

#[test]
fn config_fills_options_not_set_on_cli() -> Result<(), String> {
    let config = ConfigFile {
        url: Some("http://config.local".to_owned()),
        method: Some(HttpMethod::Put),
        headers: Some(vec!["X-From: config".to_owned()]),
        label: Some("from-config".to_owned()),
        rate: Some(7),
        per: Some(DurationValue::Text("250ms".to_owned())),
        duration: Some(DurationValue::Seconds(30)),
        timeout: Some(DurationValue::Text("2s".to_owned())),
        max_in_flight: Some(16),
        precision: Some(2),
        output: Some(OutputFormat::Json),
        ..ConfigFile::default()
    };
    let (mut args, matches) = args_from(&["ratestorm"])?;
    apply_config(&mut args, &matches, &config).map_err(|err| err.to_string())?;

    if args.url.as_deref() != Some("http://config.local")
        || args.method != HttpMethod::Put
        || args.label != "from-config"
        || args.headers != vec![("X-From".to_owned(), "config".to_owned())]
    {
        return Err(format!("Request options not applied: {:?}", args));
    }
    if args.rate.get() != 7
        || args.per != Duration::from_millis(250)
        || args.duration != Duration::from_secs(30)
        || args.timeout != Duration::from_secs(2)
    {
        return Err(format!("Timing options not applied: {:?}", args));
    }
    if args.max_in_flight.map(|limit| limit.get()) != Some(16)
        || args.precision != 2
        || args.output != OutputFormat::Json
    {
        return Err(format!("Run options not applied: {:?}", args));
    }
    Ok(())
}

#[test]
fn cli_values_win_over_config() -> Result<(), String> {
    let config = ConfigFile {
        url: Some("http://config.local".to_owned()),
        rate: Some(7),
        duration: Some(DurationValue::Seconds(30)),
        label: Some("from-config".to_owned()),
        ..ConfigFile::default()
    };
    let (mut args, matches) = args_from(&[
        "ratestorm",
        "-u",
        "http://cli.local",
        "--rate",
        "3",
        "--label",
        "from-cli",
    ])?;
    apply_config(&mut args, &matches, &config).map_err(|err| err.to_string())?;

    if args.url.as_deref() != Some("http://cli.local")
        || args.rate.get() != 3
        || args.label != "from-cli"
    {
        return Err(format!("CLI values were overridden: {:?}", args));
    }
    // Defaults are not explicit, so the config still applies.
    if args.duration != Duration::from_secs(30) {
        return Err(format!("Config duration not applied: {:?}", args.duration));
    }
    Ok(())
}

#[test]
fn invalid_config_values_are_rejected() -> Result<(), String> {
    let cases = [
        ConfigFile {
            rate: Some(0),
            ..ConfigFile::default()
        },
        ConfigFile {
            max_in_flight: Some(0),
            ..ConfigFile::default()
        },
        ConfigFile {
            duration: Some(DurationValue::Seconds(0)),
            ..ConfigFile::default()
        },
        ConfigFile {
            per: Some(DurationValue::Text("soon".to_owned())),
            ..ConfigFile::default()
        },
        ConfigFile {
            headers: Some(vec!["no separator".to_owned()]),
            ..ConfigFile::default()
        },
        ConfigFile {
            precision: Some(9),
            ..ConfigFile::default()
        },
    ];
    for config in cases {
        let (mut args, matches) = args_from(&["ratestorm"])?;
        let result = apply_config(&mut args, &matches, &config);
        let expected = matches!(
            result,
            Err(AppError::Config(
                ConfigError::FieldMustBePositive { .. }
                    | ConfigError::InvalidDuration { .. }
                    | ConfigError::InvalidHeader { .. }
            )) | Err(AppError::Validation(ValidationError::InvalidPrecision { value: 9 }))
        );
        if !expected {
            return Err(format!("Expected rejection of {:?}, got {:?}", config, result));
        }
    }
    Ok(())
}
