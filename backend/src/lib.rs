//! GameConnect backend library modules.
//!
//! The binary in `main.rs` only parses settings and starts the server; every
//! component it wires together lives here so integration tests can build the
//! same application against in-memory adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod wiring;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
