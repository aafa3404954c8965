//! Row-level persistence. One module per table; services and handlers
//! compose these, repositories never validate.

pub mod sessions;
pub mod tasks;
pub mod users;
