//! mlight-remote — NeuronBrowser metadata-service client
//!
//! Thin typed client over the service's two query shapes. Fetch methods
//! return the row types `mlight-core` builds its indices from; wire structs
//! stay internal.

pub mod client;
pub mod error;
mod wire;

pub use client::{ClientConfig, NeuronBrowserClient, BRAIN_AREAS_QUERY, INJECTIONS_QUERY};
pub use error::RemoteError;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
