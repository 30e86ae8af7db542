use std::time::Duration;

use serde::Deserialize;

use crate::args::{HttpMethod, OutputFormat, parse_duration_arg};
use crate::error::{ConfigError, ValidationError};

/// Contents of `ratestorm.toml` / `ratestorm.json`. Every field is optional
/// and only fills options not given on the command line.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub method: Option<HttpMethod>,
    pub headers: Option<Vec<String>>,
    pub data: Option<String>,
    pub label: Option<String>,
    pub rate: Option<usize>,
    pub per: Option<DurationValue>,
    pub duration: Option<DurationValue>,
    pub timeout: Option<DurationValue>,
    pub max_in_flight: Option<usize>,
    pub precision: Option<u8>,
    pub output: Option<OutputFormat>,
}

/// A duration given either as whole seconds or as a suffixed string
/// (`"250ms"`, `"2m"`).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self, field: &str) -> Result<Duration, ConfigError> {
        let parsed = match self {
            DurationValue::Seconds(0) => Err(ValidationError::DurationZero),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_arg(text),
        };
        parsed.map_err(|source| ConfigError::InvalidDuration {
            field: field.to_owned(),
            source,
        })
    }
}
