use super::*;

#[test]
fn domain_errors_convert_into_matching_app_variants() -> Result<(), String> {
    let http = AppError::from(HttpError::Cancelled);
    if !matches!(http, AppError::Http(HttpError::Cancelled)) {
        return Err(format!("Unexpected conversion {:?}", http));
    }

    let validation = AppError::validation(ValidationError::MissingUrl);
    if !matches!(validation, AppError::Validation(ValidationError::MissingUrl)) {
        return Err(format!("Unexpected conversion {:?}", validation));
    }

    let config = AppError::config(ConfigError::MissingExtension);
    if !matches!(config, AppError::Config(ConfigError::MissingExtension)) {
        return Err(format!("Unexpected conversion {:?}", config));
    }
    Ok(())
}

#[test]
fn app_errors_prefix_their_source() -> Result<(), String> {
    let message = AppError::from(HttpError::Cancelled).to_string();
    if !message.starts_with("HTTP error: ") {
        return Err(format!("Unexpected message '{}'", message));
    }
    let message = AppError::validation(ValidationError::RunDurationZero).to_string();
    if !message.starts_with("Validation error: ") {
        return Err(format!("Unexpected message '{}'", message));
    }
    Ok(())
}
