//! # deck-cache
//!
//! Optimistic client cache for taskdeck.
//!
//! Maintains per-status paginated list entries and per-task detail entries
//! over the REST API, applying mutations optimistically with verbatim
//! rollback. The cache is an explicit object with a defined lifecycle:
//! created at application start, dropped on logout, and is injected into
//! consumers rather than reached as ambient global state.
//!
//! The mutation pipeline and its per-kind policy live in [`coordinator`];
//! the snapshot/patch/restore substrate lives in [`store`].

mod coordinator;
mod error;
mod store;
mod transport;

pub use coordinator::TaskCache;
pub use error::CacheError;
pub use store::{CacheSnapshot, CacheStore, ListEntry, ListKey};
pub use transport::TaskTransport;
