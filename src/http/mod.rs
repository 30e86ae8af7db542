//! HTTP transport for work invocations.
//!
//! [`HttpClient::send`] performs one exchange and records exactly one outcome
//! for it, so work functions can chain requests and still get a complete
//! picture in the summaries.
mod client;
mod request;
mod work;


pub use client::{DEFAULT_REDIRECT_LIMIT, DEFAULT_TIMEOUT, HttpClient, HttpClientOptions, HttpResponse};
pub use request::HttpRequest;
pub use work::SingleRequestWork;
