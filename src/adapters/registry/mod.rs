//! Registry adapters - Application state for the approval workflow.
//!
//! - `InMemoryApplicationRegistry` - Process-lifetime store with per-token locks
//! - `ShortIdPurger` - Background expiry of the short-id index

mod in_memory;
mod purge_task;

pub use in_memory::{InMemoryApplicationRegistry, MAX_SHORT_ID_ATTEMPTS};
pub use purge_task::ShortIdPurger;
