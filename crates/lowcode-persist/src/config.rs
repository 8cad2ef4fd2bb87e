//! Persistence configuration
//!
//! Loaded from TOML or built in code. Every field has a default, so an
//! empty document is a valid configuration.

use crate::error::PersistResult;
use crate::schema::DEFAULT_SCHEMA_VERSION;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Locale used when none is stored
pub const DEFAULT_LOCALE: &str = "zh-CN";

/// Path of the save endpoint under `server_base_url`
pub const SAVE_ENDPOINT: &str = "/api/v1/schemas";

/// Path prefix of stored documents under `object_storage_url`
pub const PORTAL_PREFIX: &str = "portal";

/// Localized user-facing strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Shown after a server save
    pub saved_to_server: String,
    /// Shown after a local save
    pub saved_to_local: String,
    /// Shown after a confirmed reset
    pub reset_done: String,
    /// Reset confirmation prompt
    pub reset_confirm: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            saved_to_server: "成功保存到服务器".to_string(),
            saved_to_local: "成功保存到本地".to_string(),
            reset_done: "成功重置页面".to_string(),
            reset_confirm: "确定要重置吗？您所有的修改都将消失！".to_string(),
        }
    }
}

/// Persistence configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistConfig {
    /// Base url of the schema save service
    pub server_base_url: String,
    /// Base url of the object storage holding published documents
    pub object_storage_url: String,
    /// Locale returned when none is stored
    pub default_locale: String,
    /// Version stamped into assembled project schemas
    pub schema_version: String,
    /// Client-side timeout for server reads
    pub request_timeout_ms: Option<u64>,
    /// Notification strings
    pub messages: Messages,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            server_base_url: "http://localhost:7001".to_string(),
            object_storage_url: "http://localhost:7002".to_string(),
            default_locale: DEFAULT_LOCALE.to_string(),
            schema_version: DEFAULT_SCHEMA_VERSION.to_string(),
            request_timeout_ms: None,
            messages: Messages::default(),
        }
    }
}

impl PersistConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML
    ///
    /// # Errors
    /// `PersistError::Config` on malformed TOML or mistyped fields.
    pub fn from_toml_str(source: &str) -> PersistResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// With server base url
    #[inline]
    #[must_use]
    pub fn with_server_base_url(mut self, url: impl Into<String>) -> Self {
        self.server_base_url = url.into();
        self
    }

    /// With object storage url
    #[inline]
    #[must_use]
    pub fn with_object_storage_url(mut self, url: impl Into<String>) -> Self {
        self.object_storage_url = url.into();
        self
    }

    /// With default locale
    #[inline]
    #[must_use]
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    /// With server read timeout
    #[inline]
    #[must_use]
    pub fn with_request_timeout_ms(mut self, millis: u64) -> Self {
        self.request_timeout_ms = Some(millis);
        self
    }

    /// With notification strings
    #[inline]
    #[must_use]
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Server read timeout
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Full save endpoint url
    #[must_use]
    pub fn save_url(&self) -> String {
        format!("{}{SAVE_ENDPOINT}", self.server_base_url.trim_end_matches('/'))
    }

    /// Object storage url of a stored document
    #[must_use]
    pub fn document_url(&self, storage_key: &str) -> String {
        format!(
            "{}/{PORTAL_PREFIX}/{storage_key}.json",
            self.object_storage_url.trim_end_matches('/')
        )
    }
}
