//! Project schema model
//!
//! The page tree, the components map and the i18n document are owned by the
//! editor engine. This layer only moves them around as opaque JSON.

use lowcode_request::is_truthy;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Schema version stamped into assembled project schemas
pub const DEFAULT_SCHEMA_VERSION: &str = "1.0.0";

static DEFAULT_PAGE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../assets/default_page_schema.json"))
        .unwrap_or(Value::Null)
});

static DEFAULT_I18N_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../assets/default_i18n_schema.json"))
        .unwrap_or(Value::Null)
});

/// Bundled default page schema
#[must_use]
pub fn default_page_schema() -> Value {
    DEFAULT_PAGE_SCHEMA.clone()
}

/// Bundled default i18n document
#[must_use]
pub fn default_i18n_schema() -> Value {
    DEFAULT_I18N_SCHEMA.clone()
}

/// Export mode passed to the editor engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformStage {
    /// Live preview rendering
    Render,
    /// Plain serialization
    Serialize,
    /// Persisting
    Save,
    /// Node cloning
    Clone,
    /// Initial load
    Init,
    /// Schema upgrade
    Upgrade,
}

/// Complete project document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSchema {
    /// Page trees; assembled schemas hold exactly one
    pub components_tree: Vec<Value>,
    /// Component name → descriptor
    #[serde(default)]
    pub components_map: Value,
    /// Schema version
    #[serde(default = "default_version")]
    pub version: String,
    /// Internationalization data
    #[serde(default)]
    pub i18n: Value,
}

fn default_version() -> String {
    DEFAULT_SCHEMA_VERSION.to_string()
}

impl ProjectSchema {
    /// Assemble from a page, a components map and i18n data
    #[must_use]
    pub fn new(page: Value, components_map: Value, i18n: Value) -> Self {
        Self {
            components_tree: vec![page],
            components_map,
            version: default_version(),
            i18n,
        }
    }

    /// With version
    #[inline]
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Root page, if present
    #[inline]
    #[must_use]
    pub fn page(&self) -> Option<&Value> {
        self.components_tree.first()
    }

    /// As JSON value
    ///
    /// # Errors
    /// Fails only if a contained value cannot be represented as JSON.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// Extract `componentsTree[0]` from a stored project document
///
/// Returns `None` for anything without a truthy root page, so that callers
/// can substitute the bundled default.
#[must_use]
pub fn page_from_project(project: &Value) -> Option<Value> {
    project
        .get("componentsTree")
        .and_then(|tree| tree.get(0))
        .filter(|page| is_truthy(page))
        .cloned()
}

/// Empty package document used when nothing is stored locally
#[must_use]
pub fn empty_packages() -> Value {
    Value::Object(Map::new())
}
