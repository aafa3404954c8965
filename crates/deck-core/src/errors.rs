//! Cross-cutting error types for taskdeck.
//!
//! Domain-specific errors (`ApiError`, `CacheError`, `ServerError`) live in
//! their respective crates; `anyhow` converges everything at the CLI.

use thiserror::Error;

use crate::enums::TaskStatus;

/// Errors raised by the domain rules themselves.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A quick-action transition was attempted that is not allowed.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: TaskStatus, to: TaskStatus },
}
