//! Low-code page persistence
//!
//! Umbrella crate over the workspace:
//!
//! - [`request`]: HTTP calls with status-code based result normalization
//! - [`persist`]: scenario-scoped schema and package persistence to local
//!   storage or a remote schema server
//!
//! # Architecture
//!
//! ```text
//! SchemaService ──► LocalStorage (memory / file)
//!       │
//!       └────────► RemoteSchemaStore ──► RequestClient ──► Transport (reqwest)
//! ```

#![warn(missing_docs)]

pub use lowcode_persist as persist;
pub use lowcode_request as request;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
