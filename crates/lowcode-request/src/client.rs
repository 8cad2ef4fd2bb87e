//! Request client
//!
//! Issues one HTTP call per request, normalizes the response, and optionally
//! races it against a client-side timer. No retries and no backoff.

use crate::error::{RequestError, RequestResult};
use crate::normalize::normalize;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{HttpRequest, Method, RequestOptions};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Normalizing HTTP client
#[derive(Clone)]
pub struct RequestClient {
    transport: Arc<dyn Transport>,
    base_url: Option<String>,
}

impl std::fmt::Debug for RequestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Default for RequestClient {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestTransport::new()))
    }
}

impl RequestClient {
    /// Create client over a transport
    #[inline]
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            base_url: None,
        }
    }

    /// Resolve relative urls against `base_url`
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Underlying transport
    #[inline]
    #[must_use]
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Resolve a possibly relative url
    #[must_use]
    pub fn resolve_url(&self, url: &str) -> String {
        match &self.base_url {
            Some(base) if !is_absolute(url) => {
                format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/'))
            }
            _ => url.to_string(),
        }
    }

    /// Issue a request and normalize its response
    ///
    /// When `options.timeout` is set the exchange runs on its own task. If
    /// the timer fires first the caller gets `RequestError::Timeout`; the
    /// exchange keeps running and its outcome is discarded.
    ///
    /// # Errors
    /// - `RequestError::Status` / `RequestError::Flagged` for normalized failures
    /// - `RequestError::Timeout` if the timer wins the race
    /// - `RequestError::Transport` / `RequestError::Decode` for raw failures
    pub async fn request(
        &self,
        mut request: HttpRequest,
        options: RequestOptions,
    ) -> RequestResult<Value> {
        request.url = self.resolve_url(&request.url);
        tracing::debug!(method = %request.method, url = %request.url, "issuing request");

        let transport = Arc::clone(&self.transport);
        let method = request.method;
        let exchange = async move {
            let response = transport.send(request).await?;
            normalize(method, &response)
        };

        match options.timeout {
            None => exchange.await,
            Some(timeout) => race(exchange, timeout).await,
        }
    }

    /// GET a JSON document
    ///
    /// # Errors
    /// See [`RequestClient::request`].
    pub async fn get_json(&self, url: &str, options: RequestOptions) -> RequestResult<Value> {
        self.request(HttpRequest::new(Method::Get, url), options)
            .await
    }

    /// POST a JSON-serialized body
    ///
    /// # Errors
    /// `RequestError::InvalidRequest` if `body` cannot be encoded, plus
    /// everything [`RequestClient::request`] returns.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
        options: RequestOptions,
    ) -> RequestResult<Value> {
        let body = serde_json::to_vec(body).map_err(|e| {
            RequestError::InvalidRequest(format!("unencodable body for {url}: {e}"))
        })?;
        let request = HttpRequest::new(Method::Post, url)
            .with_header("Content-Type", "application/json")
            .with_body(body);
        self.request(request, options).await
    }
}

async fn race<F>(exchange: F, timeout: Duration) -> RequestResult<Value>
where
    F: std::future::Future<Output = RequestResult<Value>> + Send + 'static,
{
    let handle = tokio::spawn(exchange);
    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(RequestError::transport(format!(
            "request task failed: {join_err}"
        ))),
        Err(_) => {
            let after_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            tracing::warn!(after_ms, "request timed out");
            Err(RequestError::Timeout { after_ms })
        }
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
