//! Interfaces of the editor engine and UI this layer drives
//!
//! The live editor state is owned elsewhere; the facade only ever reaches it
//! through these traits, so tests can substitute fakes.

use crate::schema::{ProjectSchema, TransformStage};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Live editor project
#[cfg_attr(test, mockall::automock)]
pub trait Project: Send + Sync {
    /// Export the current schema for the given stage
    fn export_schema(&self, stage: TransformStage) -> Value;

    /// Replace the current state with `schema`
    fn import_schema(&self, schema: &ProjectSchema);

    /// Attached preview host, if any
    fn simulator_host(&self) -> Option<Arc<dyn SimulatorHost>>;
}

/// Live preview renderer
#[cfg_attr(test, mockall::automock)]
pub trait SimulatorHost: Send + Sync {
    /// Re-render the preview from the current editor state
    fn rerender(&self);
}

/// Component material registry
#[cfg_attr(test, mockall::automock)]
pub trait Material: Send + Sync {
    /// Component name → descriptor mapping
    fn components_map(&self) -> Value;

    /// Package descriptors of the loaded assets
    fn asset_packages(&self) -> Vec<Value>;
}

/// Narrows asset packages down to the ones worth persisting
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageFilter: Send + Sync {
    /// Filter packages
    async fn filter_packages(&self, packages: Vec<Value>) -> Vec<Value>;
}

/// Passes every package through
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepAllPackages;

#[async_trait]
impl PackageFilter for KeepAllPackages {
    async fn filter_packages(&self, packages: Vec<Value>) -> Vec<Value> {
        packages
    }
}

/// Blocking confirmation dialog
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Dialog: Send + Sync {
    /// `true` on confirm, `false` on cancel
    async fn confirm(&self, content: &str) -> bool;
}

/// Toast notifications
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Fire-and-forget success message
    fn success(&self, message: &str);
}

/// Hosting page
#[cfg_attr(test, mockall::automock)]
pub trait PageReloader: Send + Sync {
    /// Full page reload
    fn reload(&self);
}
