// nifictl-api: Async Rust client for the Apache NiFi REST API
//
// Token-authenticated transport with retry and TLS policy, the wire
// models for resources, process groups, processors and flow status, and
// a parsing layer with an explicit unknown-field policy. Domain types and
// orchestration live in `nifictl-core`.

pub mod auth;
pub mod client;
pub mod error;
pub mod flow;
pub mod models;
pub mod parse;
pub mod process_groups;
pub mod processors;
pub mod resources;
pub mod transport;

pub use auth::{AccessToken, AuthSession};
pub use client::NifiClient;
pub use error::Error;
pub use parse::FieldPolicy;
pub use transport::{RetryPolicy, TlsMode, TransportConfig};
