//! HTTP client for the routemix API.
//!
//! [`RoutemixClient`] implements [`routemix_core::store::AllocationStore`],
//! so an [`routemix_core::editor::AllocationEditor`] can drive a remote
//! server exactly as it drives a local store.

pub mod api;
pub mod config;
pub mod error;
pub mod notify;

pub use api::RoutemixClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use notify::TracingNotifier;
