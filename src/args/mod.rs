//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{DEFAULT_LABEL, RunArgs};
pub use parsers::{parse_duration_arg, parse_header};
pub use types::{HttpMethod, OutputFormat, PositiveUsize};
