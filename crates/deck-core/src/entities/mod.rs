//! Entity structs for the taskdeck domain.

mod session;
mod task;
mod user;

pub use session::Session;
pub use task::{EFFORT_RANGE, NAME_MAX_LEN, PRIORITY_RANGE, Task};
pub use user::User;
