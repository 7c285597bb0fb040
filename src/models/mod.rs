//! Asana resource types.

mod project;
mod task;
mod user;
mod workspace;

pub use project::*;
pub use task::*;
pub use user::*;
pub use workspace::*;
