use std::sync::Arc;

use async_trait::async_trait;

use crate::runner::{Work, WorkContext};

use super::client::HttpClient;
use super::request::HttpRequest;

/// Work that sends the same request once per slot.
#[derive(Debug, Clone)]
pub struct SingleRequestWork {
    client: HttpClient,
    request: Arc<HttpRequest>,
    label: Arc<str>,
}

impl SingleRequestWork {
    #[must_use]
    pub fn new(client: HttpClient, request: HttpRequest, label: &str) -> Self {
        Self {
            client,
            request: Arc::new(request),
            label: Arc::from(label),
        }
    }
}

#[async_trait]
impl Work for SingleRequestWork {
    async fn execute(&self, ctx: WorkContext) {
        // Already recorded; nothing else to do with the error here.
        drop(self.client.send(&ctx, &self.label, &self.request).await);
    }
}
