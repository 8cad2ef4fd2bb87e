//! Transport seam
//!
//! A transport performs exactly one HTTP exchange and reports the raw status
//! and body. It never interprets the status; that is the normalizer's job.

use crate::error::{RequestError, RequestResult};
use crate::types::{HttpRequest, Method, RawResponse};
use async_trait::async_trait;
use std::time::Duration;

/// Performs a single HTTP exchange
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the raw response
    ///
    /// # Errors
    /// Network failures and unbuildable requests.
    async fn send(&self, request: HttpRequest) -> RequestResult<RawResponse>;
}

/// Transport backed by `reqwest`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create transport with a default client
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create transport around an existing client
    #[inline]
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Create transport with a hard connection-level timeout
    ///
    /// # Errors
    /// Returns an error if the client cannot be constructed.
    pub fn with_connect_timeout(timeout: Duration) -> RequestResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
        Method::Head => reqwest::Method::HEAD,
        Method::Options => reqwest::Method::OPTIONS,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> RequestResult<RawResponse> {
        let url = reqwest::Url::parse(&request.url)
            .map_err(|e| RequestError::InvalidRequest(format!("{}: {e}", request.url)))?;

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(status, bytes = body.len(), "transport exchange finished");
        Ok(RawResponse { status, body })
    }
}
