use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid header format: '{value}'. Expected 'Key: Value'")]
    InvalidHeaderFormat { value: String },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid number: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Rate frequency must be >= 1.")]
    RateFrequencyZero,
    #[error("Rate period must be > 0.")]
    RatePeriodZero,
    #[error("Run duration must be > 0.")]
    RunDurationZero,
    #[error("Estimator precision must be between 1 and 5 significant digits, got {value}.")]
    InvalidPrecision { value: u8 },
    #[error("Failed to create latency estimator: {message}")]
    EstimatorCreation { message: String },
    #[error("Scheduler was already started; a runner drives exactly one run.")]
    AlreadyStarted,
    #[error("Missing URL (set --url or provide it in the config file).")]
    MissingUrl,
    #[error("Failed to build runtime: {source}")]
    RuntimeBuildFailed {
        #[source]
        source: std::io::Error,
    },
}
