//! Trait definitions shared by every resource type.
//!
//! Each resource type declares its discriminator and path segment through
//! [`Resource`], then opts into the operations its endpoints support.

mod get;
mod list;
mod resource;

pub use get::Get;
pub use list::List;
pub(crate) use list::paginate;
pub use resource::Resource;
