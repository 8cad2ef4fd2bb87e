//! Lowcode Request
//!
//! Generic HTTP helper that maps raw responses into a uniform
//! success/failure shape.
//!
//! # Core Operations
//!
//! - **Send**: a [`Transport`] performs one exchange and reports status + body
//! - **Normalize**: [`normalize`] turns the status code into a JSON value or a
//!   [`RequestError`] carrying `{code, data?}`
//! - **Race**: [`RequestClient::request`] optionally races the exchange
//!   against a client-side timer
//!
//! # Example
//!
//! ```rust,ignore
//! use lowcode_request::{RequestClient, RequestOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RequestClient::default();
//! let schema = client
//!     .get_json("https://cdn.example.com/portal/demo-projectSchema.json",
//!               RequestOptions::new().with_timeout_ms(5_000))
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod client;
pub mod error;
pub mod normalize;
pub mod transport;
pub mod types;

pub use client::RequestClient;
pub use error::{HttpFailure, RequestError, RequestResult};
pub use normalize::{is_truthy, normalize, SUCCESS_MARKER};
pub use transport::{ReqwestTransport, Transport};
pub use types::{HttpRequest, Method, RawResponse, RequestOptions};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
