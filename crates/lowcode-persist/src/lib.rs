//! Lowcode Persist
//!
//! Persists a page's component tree and dependency package list for a named
//! scenario, either to local key-value storage or to a remote schema server.
//!
//! # Core Operations
//!
//! - **Save**: export the live editor schema and packages to a target
//! - **Reset**: replace the editor state with bundled defaults after confirmation
//! - **Read**: load a stored page, falling back to the bundled default page
//! - **Locale**: read and write the preview locale of a scenario
//!
//! # Storage keys
//!
//! ```text
//! {scenario}-projectSchema   exported project schema (JSON)
//! {scenario}-packages        filtered package list (JSON)
//! {scenario}-previewLocale   locale string
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use lowcode_persist::{SchemaService, SaveTarget};
//!
//! # async fn example(service: SchemaService) -> Result<(), Box<dyn std::error::Error>> {
//! service.save_schema("general", SaveTarget::Local).await?;
//! let page = service.get_page_schema("general", SaveTarget::Local).await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod collaborators;
pub mod config;
pub mod error;
pub mod key;
pub mod remote;
pub mod schema;
pub mod service;
pub mod storage;

pub use collaborators::{
    Dialog, KeepAllPackages, Material, Notifier, PackageFilter, PageReloader, Project,
    SimulatorHost,
};
pub use config::{Messages, PersistConfig, DEFAULT_LOCALE};
pub use error::{PersistError, PersistResult, StorageError};
pub use key::{derive_key, Namespace, SaveTarget, ScenarioKey, DEFAULT_SCENARIO};
pub use remote::RemoteSchemaStore;
pub use schema::{default_i18n_schema, default_page_schema, ProjectSchema, TransformStage};
pub use service::{Collaborators, ResetOutcome, SchemaService};
pub use storage::{FileStorage, LocalStorage, MemoryStorage};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for wiring the persistence facade
    pub use crate::{
        Collaborators, LocalStorage, Namespace, PersistConfig, ProjectSchema, ResetOutcome,
        SaveTarget, SchemaService,
    };
    pub use lowcode_request::{RequestClient, RequestOptions};
}
