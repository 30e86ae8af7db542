use std::time::Duration;

use reqwest::{Client, redirect};
use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tracing::debug;

use crate::error::HttpError;
use crate::metrics::Status;
use crate::runner::WorkContext;

use super::request::HttpRequest;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_REDIRECT_LIMIT: usize = 10;
/// Characters of a non-2xx body kept in the recorded error.
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientOptions {
    /// Whole-exchange timeout, body included.
    pub timeout: Duration,
    /// Redirects followed before giving up; 0 disables redirects.
    pub redirect_limit: usize,
    pub pool_max_idle_per_host: Option<usize>,
    pub user_agent: Option<String>,
}

impl Default for HttpClientOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            redirect_limit: DEFAULT_REDIRECT_LIMIT,
            pool_max_idle_per_host: None,
            user_agent: Some(concat!("ratestorm/", env!("CARGO_PKG_VERSION")).to_owned()),
        }
    }
}

/// A completed exchange with a 2xx status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Pooled HTTP client that records one outcome per exchange.
///
/// Cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// # Errors
    ///
    /// Returns an error when the underlying client cannot be built.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_options(&HttpClientOptions::default())
    }

    /// # Errors
    ///
    /// Returns an error when the underlying client cannot be built.
    pub fn with_options(options: &HttpClientOptions) -> Result<Self, HttpError> {
        let mut builder = Client::builder().timeout(options.timeout);
        builder = if options.redirect_limit == 0 {
            builder.redirect(redirect::Policy::none())
        } else {
            builder.redirect(redirect::Policy::limited(options.redirect_limit))
        };
        if let Some(max_idle) = options.pool_max_idle_per_host {
            builder = builder.pool_max_idle_per_host(max_idle);
        }
        if let Some(agent) = options.user_agent.as_ref() {
            builder = builder.user_agent(agent.as_str());
        }
        let client = builder
            .build()
            .map_err(|source| HttpError::BuildClient { source })?;
        Ok(Self { client })
    }

    /// Perform `request` and record its outcome under `label`.
    ///
    /// The recorded status is the response code when a response arrived, or
    /// [`Status::Failure`] when the exchange failed or `ctx.cancel` fired
    /// first. Latency covers sending the request and reading the full body.
    ///
    /// # Errors
    ///
    /// Returns the same failure that was recorded: transport errors,
    /// cancellation, or a non-2xx status carrying a truncated body.
    pub async fn send(
        &self,
        ctx: &WorkContext,
        label: &str,
        request: &HttpRequest,
    ) -> Result<HttpResponse, HttpError> {
        let started = Instant::now();
        let result = tokio::select! {
            biased;
            () = ctx.cancel.cancelled() => Err(HttpError::Cancelled),
            result = self.exchange(request) => result,
        };
        let latency = started.elapsed();

        match result {
            Ok(response) => {
                let status = Status::Code(response.status);
                if status.is_success() {
                    ctx.recorder.record(label, status, latency, None);
                    Ok(response)
                } else {
                    let err = HttpError::UnexpectedStatus {
                        status: response.status,
                        body: truncate_body(&response.body),
                    };
                    ctx.recorder
                        .record(label, status, latency, Some(err.to_string()));
                    Err(err)
                }
            }
            Err(err) => {
                debug!("Request '{}' failed: {}", label, err);
                ctx.recorder
                    .record(label, Status::Failure, latency, Some(err.to_string()));
                Err(err)
            }
        }
    }

    /// [`HttpClient::send`], then decode the body as JSON.
    ///
    /// A body that fails to decode does not change the recorded outcome.
    ///
    /// # Errors
    ///
    /// Returns the exchange error, or a decode error with the raw body.
    pub async fn send_json<TResponse>(
        &self,
        ctx: &WorkContext,
        label: &str,
        request: &HttpRequest,
    ) -> Result<TResponse, HttpError>
    where
        TResponse: DeserializeOwned,
    {
        let response = self.send(ctx, label, request).await?;
        serde_json::from_slice(&response.body).map_err(|source| HttpError::DecodeBody {
            body: truncate_body(&response.body),
            source,
        })
    }

    async fn exchange(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = request.body.as_ref() {
            builder = builder.body(body.clone());
        }
        let built = builder
            .build()
            .map_err(|source| HttpError::BuildRequest { source })?;

        let response = self
            .client
            .execute(built)
            .await
            .map_err(|source| HttpError::Transport { source })?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|source| HttpError::ReadBody { source })?;
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn truncate_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.chars().count() <= MAX_ERROR_BODY_CHARS {
        return text.into_owned();
    }
    let mut truncated: String = text.chars().take(MAX_ERROR_BODY_CHARS).collect();
    truncated.push_str("...");
    truncated
}
