//! # deck-core
//!
//! Core types for taskdeck.
//!
//! This crate provides the foundational types shared across all taskdeck
//! crates:
//! - Entity structs for the domain objects (tasks, users, sessions)
//! - The task status enum with its quick-action state machine
//! - Transition side effects (timestamps, unblock bookkeeping)
//! - The response envelope and RFC 9457 problem details wire shapes
//! - Partial-update payloads (drafts and patches)
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod envelope;
pub mod errors;
pub mod patch;
pub mod problem;
pub mod transitions;
