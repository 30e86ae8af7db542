mod app;
mod config;
mod http;
mod validation;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use http::HttpError;
pub use validation::ValidationError;

#[cfg(test)]
mod tests;
