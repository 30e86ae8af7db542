use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to serialize request body: {source}")]
    SerializeBody {
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to build HTTP client: {source}")]
    BuildClient {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to build request: {source}")]
    BuildRequest {
        #[source]
        source: reqwest::Error,
    },
    #[error("Request failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to read response body: {source}")]
    ReadBody {
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected status code {status}, response body: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("Failed to decode response body: {source}, response body: {body}")]
    DecodeBody {
        body: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("request cancelled")]
    Cancelled,
}
