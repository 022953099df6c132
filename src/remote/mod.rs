//! Remote collection access for the tracker's REST-like API.
//!
//! The registries never talk HTTP directly. They consume the
//! [`RemoteCollectionClient`] port with resource-scoped [`ResourcePath`]s
//! and raw JSON records, so transports can be swapped without touching the
//! synchronisation logic:
//!
//! - [`adapters::memory::InMemoryRemoteCollection`]: deterministic server
//!   double with failure injection, used by tests and local flows
//! - [`adapters::http::HttpRemoteCollection`]: blocking `ureq` agent driven
//!   from the async runtime

pub mod adapters;
mod client;
mod path;
pub mod record;

pub use client::{RemoteCollectionClient, RemoteError, RemoteResult};
#[cfg(test)]
pub use client::MockRemoteCollectionClient;
pub use path::{RemoteMethod, Resource, ResourcePath};
