//! Scenario storage keys
//!
//! Every persisted entry lives under `{scenario}-{namespace}`. The same key
//! is used for local storage entries, the `page` field of server saves, and
//! the object name of server reads.

use crate::error::PersistError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between scenario name and namespace
pub const KEY_SEPARATOR: char = '-';

/// Scenario used when the caller has none
pub const DEFAULT_SCENARIO: &str = "unknown";

/// Namespace suffix distinguishing the entries of one scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Namespace {
    /// Exported project schema
    #[default]
    ProjectSchema,
    /// Filtered asset package list
    Packages,
    /// Preview locale preference
    PreviewLocale,
}

impl Namespace {
    /// All namespaces
    pub const ALL: [Self; 3] = [Self::ProjectSchema, Self::Packages, Self::PreviewLocale];

    /// Suffix as stored
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProjectSchema => "projectSchema",
            Self::Packages => "packages",
            Self::PreviewLocale => "previewLocale",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive the storage key for a scenario and namespace
#[inline]
#[must_use]
pub fn derive_key(scenario: &str, namespace: Namespace) -> String {
    format!("{scenario}{KEY_SEPARATOR}{}", namespace.as_str())
}

/// Validated `(scenario, namespace)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScenarioKey {
    scenario: String,
    namespace: Namespace,
}

impl ScenarioKey {
    /// Create key; `None` when the scenario name is empty
    #[must_use]
    pub fn new(scenario: &str, namespace: Namespace) -> Option<Self> {
        if scenario.is_empty() {
            return None;
        }
        Some(Self {
            scenario: scenario.to_string(),
            namespace,
        })
    }

    /// Create key, logging the usage error when the scenario name is empty
    #[must_use]
    pub fn required(scenario: &str, namespace: Namespace) -> Option<Self> {
        let key = Self::new(scenario, namespace);
        if key.is_none() {
            tracing::error!(namespace = %namespace, "scenario name is required");
        }
        key
    }

    /// Scenario name
    #[inline]
    #[must_use]
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// Namespace
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Same scenario under another namespace
    #[must_use]
    pub fn with_namespace(&self, namespace: Namespace) -> Self {
        Self {
            scenario: self.scenario.clone(),
            namespace,
        }
    }

    /// Storage key string
    #[inline]
    #[must_use]
    pub fn storage_key(&self) -> String {
        derive_key(&self.scenario, self.namespace)
    }
}

impl fmt::Display for ScenarioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{KEY_SEPARATOR}{}", self.scenario, self.namespace)
    }
}

/// Where a scenario is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveTarget {
    /// Remote schema server
    #[default]
    Server,
    /// Local key-value storage
    Local,
}

impl SaveTarget {
    /// Target name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for SaveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaveTarget {
    type Err = PersistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "server" => Ok(Self::Server),
            "local" => Ok(Self::Local),
            other => Err(PersistError::InvalidTarget(other.to_string())),
        }
    }
}
