use reqwest::Method;
use serde::Serialize;
use url::Url;

use crate::args::HttpMethod;
use crate::error::HttpError;

/// Description of one HTTP exchange, reusable across invocations.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub(super) method: Method,
    pub(super) url: Url,
    pub(super) headers: Vec<(String, String)>,
    pub(super) query: Vec<(String, String)>,
    pub(super) body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// # Errors
    ///
    /// Returns an error when `url` is not an absolute URL.
    pub fn new(method: Method, url: &str) -> Result<Self, HttpError> {
        let url = Url::parse(url).map_err(|source| HttpError::InvalidUrl {
            url: url.to_owned(),
            source,
        })?;
        Ok(Self {
            method,
            url,
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        })
    }

    /// # Errors
    ///
    /// Returns an error when `url` is not an absolute URL.
    pub fn get(url: &str) -> Result<Self, HttpError> {
        Self::new(Method::GET, url)
    }

    /// # Errors
    ///
    /// Returns an error when `url` is not an absolute URL.
    pub fn post(url: &str) -> Result<Self, HttpError> {
        Self::new(Method::POST, url)
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers.extend(
            headers
                .into_iter()
                .map(|(name, value)| (name.into(), value.into())),
        );
        self
    }

    /// Append a query parameter; existing parameters in the URL are kept.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `payload` as the JSON body and set `Content-Type`.
    ///
    /// # Errors
    ///
    /// Returns an error when `payload` cannot be serialized.
    pub fn json<TPayload>(self, payload: &TPayload) -> Result<Self, HttpError>
    where
        TPayload: Serialize + ?Sized,
    {
        let body =
            serde_json::to_vec(payload).map_err(|source| HttpError::SerializeBody { source })?;
        Ok(self.header("Content-Type", "application/json").body(body))
    }

    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
        }
    }
}
