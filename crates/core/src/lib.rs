//! Domain layer for trunk load-balance ("routemix") allocations.
//!
//! Holds the allocation rules (quantized percentages that must sum to 100),
//! the editable row working set, and the seams ([`store::AllocationStore`],
//! [`notify::Notifier`]) through which the editor reaches persistence and
//! the operator.

pub mod allocation;
pub mod editor;
pub mod error;
pub mod notify;
pub mod roles;
pub mod store;
pub mod types;
