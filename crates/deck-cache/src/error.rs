//! Cache layer error types.

use thiserror::Error;
use uuid::Uuid;

use deck_api::ApiError;

/// Errors surfaced by the cache coordinator.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The underlying network call failed; any optimistic patch has
    /// already been rolled back when this is returned from a mutation.
    #[error(transparent)]
    Transport(#[from] ApiError),

    /// A quick action was requested for a task the cache has never seen.
    #[error("task {0} is not cached; fetch its detail first")]
    UnknownTask(Uuid),

    /// A quick-action transition violated the status state machine.
    #[error(transparent)]
    Core(#[from] deck_core::errors::CoreError),
}
