//! Remote schema server
//!
//! Writes go straight through the transport to the save endpoint as
//! `{"page": key, "schema": value}`; any non-2xx status fails the write.
//! Reads fetch the published `{key}.json` document through the normalizing
//! client.

use crate::config::PersistConfig;
use crate::error::PersistResult;
use lowcode_request::{
    HttpFailure, HttpRequest, Method, RequestClient, RequestError, RequestOptions,
};
use serde::Serialize;
use serde_json::Value;

/// Body of a save call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavePayload<'a> {
    /// Storage key the document is saved under
    pub page: &'a str,
    /// Document
    pub schema: &'a Value,
}

/// Client for the schema save service and the published document store
#[derive(Debug, Clone)]
pub struct RemoteSchemaStore {
    client: RequestClient,
    config: PersistConfig,
    read_options: RequestOptions,
}

impl RemoteSchemaStore {
    /// Create store from configuration
    #[must_use]
    pub fn new(client: RequestClient, config: &PersistConfig) -> Self {
        let read_options = match config.request_timeout() {
            Some(timeout) => RequestOptions::new().with_timeout(timeout),
            None => RequestOptions::new(),
        };
        Self {
            client,
            config: config.clone(),
            read_options,
        }
    }

    /// Save a document under `key`, returning the 2xx status of the server
    ///
    /// # Errors
    /// - `RequestError::InvalidRequest` if the payload cannot be encoded
    /// - `RequestError::Status` for any non-2xx status, with the body as
    ///   `data` when it is JSON
    /// - transport failures
    pub async fn save(&self, key: &str, schema: &Value) -> PersistResult<u16> {
        let body = serde_json::to_vec(&SavePayload { page: key, schema }).map_err(|e| {
            RequestError::InvalidRequest(format!("unencodable payload for {key}: {e}"))
        })?;
        let request = HttpRequest::new(Method::Post, self.config.save_url())
            .with_header("Content-Type", "application/json")
            .with_body(body);

        let response = self.client.transport().send(request).await?;
        if !response.is_success() {
            tracing::warn!(key, status = response.status, "schema server rejected save");
            let failure = match serde_json::from_slice::<Value>(&response.body) {
                Ok(data) => HttpFailure::with_data(response.status, data),
                Err(_) => HttpFailure::new(response.status),
            };
            return Err(RequestError::from(failure).into());
        }
        tracing::info!(key, status = response.status, "schema saved to server");
        Ok(response.status)
    }

    /// Fetch the published document stored under `key`
    ///
    /// # Errors
    /// Every normalized request failure.
    pub async fn fetch(&self, key: &str) -> PersistResult<Value> {
        let url = self.config.document_url(key);
        Ok(self.client.get_json(&url, self.read_options).await?)
    }
}
