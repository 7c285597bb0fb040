//! The resource contract.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A typed, read-oriented projection of one server-side entity.
///
/// Implementors declare their decodable fields statically through serde;
/// every optional field is `Option` so an absent value stays unset.
pub trait Resource: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    /// Discriminator value the server uses for this type (`resource_type`).
    const RESOURCE_TYPE: &'static str;

    /// Collection path segment, e.g. `users`.
    const PLURAL_NAME: &'static str;

    /// Opaque stable identifier.
    fn gid(&self) -> &str;

    /// Discriminator as received from the server.
    fn resource_type(&self) -> Option<&str>;
}
