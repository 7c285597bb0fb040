//! Resource factory: maps parsed JSON objects onto typed resources.
//!
//! Dispatch is driven by the `resource_type` discriminator through a
//! [`ResourceRegistry`]. Unknown discriminators fall back to the expected
//! type (typed builds) or to [`GenericResource`] (untyped builds), unless
//! the factory runs in [`TypeMode::Strict`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AsanaError, Result};
use crate::models::{Project, Task, User, Workspace};
use crate::response::RawObject;
use crate::traits::Resource;

/// How discriminator conflicts are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeMode {
    /// Decode anyway; keep the server's discriminator on the value.
    #[default]
    Lenient,
    /// Reject a discriminator that contradicts the expected type.
    Strict,
}

/// Read the discriminator of a raw object.
pub fn discriminator(raw: &RawObject) -> Option<&str> {
    raw.get("resource_type")
        .or_else(|| raw.get("resourceType"))
        .and_then(Value::as_str)
}

/// Remove `resourceType` wherever `resource_type` is also present, at any depth.
///
/// Models accept either spelling, and serde rejects an object carrying both.
fn drop_duplicate_discriminators(value: &mut Value) {
    match value {
        Value::Object(object) => {
            if object.contains_key("resource_type") {
                object.remove("resourceType");
            }
            object.values_mut().for_each(drop_duplicate_discriminators);
        }
        Value::Array(items) => items.iter_mut().for_each(drop_duplicate_discriminators),
        _ => {}
    }
}

/// Decoder registered for one discriminator value.
pub type Decoder = fn(&ResourceFactory, RawObject) -> Result<AnyResource>;

fn decode_as<T>(factory: &ResourceFactory, raw: RawObject) -> Result<AnyResource>
where
    T: Resource,
    AnyResource: From<T>,
{
    factory.build::<T>(raw).map(AnyResource::from)
}

/// Discriminator → decoder table.
#[derive(Clone)]
pub struct ResourceRegistry {
    decoders: HashMap<String, Decoder>,
}

impl ResourceRegistry {
    /// A registry with no entries; everything decodes as generic.
    pub fn empty() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Add or replace the decoder for a discriminator. Returns the previous one.
    pub fn register(&mut self, resource_type: impl Into<String>, decoder: Decoder) -> Option<Decoder> {
        self.decoders.insert(resource_type.into(), decoder)
    }

    pub fn get(&self, resource_type: &str) -> Option<Decoder> {
        self.decoders.get(resource_type).copied()
    }

    pub fn contains(&self, resource_type: &str) -> bool {
        self.decoders.contains_key(resource_type)
    }

    /// Registered discriminators, sorted.
    pub fn resource_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(User::RESOURCE_TYPE, decode_as::<User>);
        registry.register(Workspace::RESOURCE_TYPE, decode_as::<Workspace>);
        registry.register(Project::RESOURCE_TYPE, decode_as::<Project>);
        registry.register(Task::RESOURCE_TYPE, decode_as::<Task>);
        registry
    }
}

impl fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("resource_types", &self.resource_types())
            .finish()
    }
}

/// Stateless mapping from raw objects to resources.
#[derive(Debug, Clone, Default)]
pub struct ResourceFactory {
    registry: ResourceRegistry,
    mode: TypeMode,
}

impl ResourceFactory {
    pub fn new(registry: ResourceRegistry, mode: TypeMode) -> Self {
        Self { registry, mode }
    }

    pub fn mode(&self) -> TypeMode {
        self.mode
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Build a resource of the expected type `T`.
    ///
    /// Declared fields are populated when present and left unset otherwise;
    /// undeclared fields are ignored.
    ///
    /// # Errors
    ///
    /// - [`AsanaError::ResourceTypeMismatch`] in strict mode when the discriminator names another type
    /// - [`AsanaError::ParseError`] when a declared field has the wrong JSON type
    pub fn build<T: Resource>(&self, raw: RawObject) -> Result<T> {
        if let Some(found) = discriminator(&raw) {
            if found != T::RESOURCE_TYPE {
                if self.mode == TypeMode::Strict {
                    return Err(AsanaError::ResourceTypeMismatch {
                        expected: T::RESOURCE_TYPE.to_string(),
                        found: found.to_string(),
                    });
                }
                tracing::debug!(
                    expected = T::RESOURCE_TYPE,
                    found,
                    "discriminator differs from expected type, decoding leniently"
                );
            }
        }
        let mut value = Value::Object(raw);
        drop_duplicate_discriminators(&mut value);
        Ok(serde_json::from_value(value)?)
    }

    /// Build whichever registered variant the discriminator names.
    ///
    /// # Errors
    ///
    /// In strict mode, an unregistered discriminator fails with
    /// [`AsanaError::ResourceTypeMismatch`]; an absent one still decodes as generic.
    pub fn build_any(&self, raw: RawObject) -> Result<AnyResource> {
        let decoder = discriminator(&raw).map(|tag| (tag.to_string(), self.registry.get(tag)));
        match decoder {
            Some((_, Some(decode))) => decode(self, raw),
            Some((found, None)) if self.mode == TypeMode::Strict => {
                Err(AsanaError::ResourceTypeMismatch {
                    expected: format!("one of [{}]", self.registry.resource_types().join(", ")),
                    found,
                })
            }
            _ => Ok(AnyResource::Generic(GenericResource::from(raw))),
        }
    }
}

/// Conversion from a raw object, given the factory in effect.
///
/// Implemented for every [`Resource`] and for [`AnyResource`]; collections
/// are generic over it.
pub trait Decode: Sized + Send {
    /// # Errors
    ///
    /// Returns an error if the object cannot be decoded under the factory's mode.
    fn decode(factory: &ResourceFactory, raw: RawObject) -> Result<Self>;
}

impl<T: Resource> Decode for T {
    fn decode(factory: &ResourceFactory, raw: RawObject) -> Result<Self> {
        factory.build(raw)
    }
}

impl Decode for AnyResource {
    fn decode(factory: &ResourceFactory, raw: RawObject) -> Result<Self> {
        factory.build_any(raw)
    }
}

/// A resource whose discriminator has no registered variant.
///
/// The raw payload is kept as-is and can be enumerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenericResource {
    fields: RawObject,
}

impl GenericResource {
    pub fn gid(&self) -> Option<&str> {
        self.fields.get("gid").and_then(Value::as_str)
    }

    pub fn resource_type(&self) -> Option<&str> {
        discriminator(&self.fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &RawObject {
        &self.fields
    }

    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.fields.iter()
    }

    /// Build a nested object field through the factory.
    pub fn nested(&self, factory: &ResourceFactory, field: &str) -> Option<Result<AnyResource>> {
        match self.fields.get(field)? {
            Value::Object(object) => Some(factory.build_any(object.clone())),
            _ => None,
        }
    }

    /// Build each object of a nested array field; non-object elements are skipped.
    pub fn nested_list(
        &self,
        factory: &ResourceFactory,
        field: &str,
    ) -> Option<Result<Vec<AnyResource>>> {
        match self.fields.get(field)? {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(Value::as_object)
                    .map(|object| factory.build_any(object.clone()))
                    .collect(),
            ),
            _ => None,
        }
    }
}

impl From<RawObject> for GenericResource {
    fn from(fields: RawObject) -> Self {
        Self { fields }
    }
}

impl<'a> IntoIterator for &'a GenericResource {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Any resource the factory can produce.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnyResource {
    User(User),
    Workspace(Workspace),
    Project(Project),
    Task(Task),
    Generic(GenericResource),
}

impl AnyResource {
    pub fn gid(&self) -> Option<&str> {
        match self {
            Self::User(r) => Some(r.gid()),
            Self::Workspace(r) => Some(r.gid()),
            Self::Project(r) => Some(r.gid()),
            Self::Task(r) => Some(r.gid()),
            Self::Generic(r) => r.gid(),
        }
    }

    pub fn resource_type(&self) -> Option<&str> {
        match self {
            Self::User(r) => r.resource_type(),
            Self::Workspace(r) => r.resource_type(),
            Self::Project(r) => r.resource_type(),
            Self::Task(r) => r.resource_type(),
            Self::Generic(r) => r.resource_type(),
        }
    }

    /// Display name, when the resource has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::User(r) => r.name.as_deref(),
            Self::Workspace(r) => r.name.as_deref(),
            Self::Project(r) => r.name.as_deref(),
            Self::Task(r) => r.name.as_deref(),
            Self::Generic(r) => r.get("name").and_then(Value::as_str),
        }
    }

    pub fn as_user(&self) -> Option<&User> {
        match self {
            Self::User(user) => Some(user),
            _ => None,
        }
    }

    pub fn as_project(&self) -> Option<&Project> {
        match self {
            Self::Project(project) => Some(project),
            _ => None,
        }
    }

    pub fn as_generic(&self) -> Option<&GenericResource> {
        match self {
            Self::Generic(generic) => Some(generic),
            _ => None,
        }
    }
}

impl From<User> for AnyResource {
    fn from(user: User) -> Self {
        Self::User(user)
    }
}

impl From<Workspace> for AnyResource {
    fn from(workspace: Workspace) -> Self {
        Self::Workspace(workspace)
    }
}

impl From<Project> for AnyResource {
    fn from(project: Project) -> Self {
        Self::Project(project)
    }
}

impl From<Task> for AnyResource {
    fn from(task: Task) -> Self {
        Self::Task(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> RawObject {
        match value {
            Value::Object(object) => object,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_build_known_type_copies_fields() {
        let factory = ResourceFactory::default();
        let user: User = factory
            .build(object(json!({
                "gid": "123",
                "resource_type": "user",
                "name": "Greg",
                "email": "greg@example.com",
                "unknown_future_field": 42
            })))
            .unwrap();
        assert_eq!(user.gid, "123");
        assert_eq!(user.resource_type.as_deref(), Some("user"));
        assert_eq!(user.name.as_deref(), Some("Greg"));
        assert_eq!(user.email.as_deref(), Some("greg@example.com"));
        assert!(user.photo.is_none());
        assert!(user.workspaces.is_none());
    }

    #[test]
    fn test_camel_case_discriminator_is_accepted() {
        let factory = ResourceFactory::default();
        let any = factory
            .build_any(object(json!({"gid": "1", "resourceType": "user", "name": "A"})))
            .unwrap();
        let user = any.as_user().expect("user variant");
        assert_eq!(user.resource_type.as_deref(), Some("user"));
    }

    #[test]
    fn test_both_discriminator_spellings_decode() {
        let factory = ResourceFactory::new(ResourceRegistry::default(), TypeMode::Strict);
        let user: User = factory
            .build(object(json!({
                "gid": "1",
                "resource_type": "user",
                "resourceType": "user",
                "workspaces": [
                    {"gid": "10", "resource_type": "workspace", "resourceType": "workspace"}
                ]
            })))
            .unwrap();
        assert_eq!(user.resource_type.as_deref(), Some("user"));
        assert_eq!(user.workspace_gids(), vec!["10"]);

        let any = factory
            .build_any(object(json!({"gid": "2", "resource_type": "task", "resourceType": "task"})))
            .unwrap();
        assert!(matches!(any, AnyResource::Task(ref t) if t.gid == "2"));
    }

    #[test]
    fn test_lenient_mismatch_keeps_discriminator() {
        let factory = ResourceFactory::default();
        let user: User = factory
            .build(object(json!({"gid": "9", "resource_type": "bot", "name": "Robo"})))
            .unwrap();
        assert_eq!(user.resource_type.as_deref(), Some("bot"));
    }

    #[test]
    fn test_strict_mismatch_fails() {
        let factory = ResourceFactory::new(ResourceRegistry::default(), TypeMode::Strict);
        let err = factory
            .build::<User>(object(json!({"gid": "9", "resource_type": "project"})))
            .unwrap_err();
        match err {
            AsanaError::ResourceTypeMismatch { expected, found } => {
                assert_eq!(expected, "user");
                assert_eq!(found, "project");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_strict_without_discriminator_decodes() {
        let factory = ResourceFactory::new(ResourceRegistry::default(), TypeMode::Strict);
        let user: User = factory.build(object(json!({"gid": "9"}))).unwrap();
        assert!(user.resource_type.is_none());
    }

    #[test]
    fn test_unknown_type_falls_back_to_generic() {
        let factory = ResourceFactory::default();
        let any = factory
            .build_any(object(json!({
                "gid": "77",
                "resource_type": "portfolio",
                "name": "Roadmap",
                "color": "blue"
            })))
            .unwrap();
        let generic = any.as_generic().expect("generic fallback");
        assert_eq!(generic.gid(), Some("77"));
        assert_eq!(generic.resource_type(), Some("portfolio"));
        let keys: Vec<&str> = generic.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys.len(), 4);
        assert!(keys.contains(&"color"));
    }

    #[test]
    fn test_strict_unknown_type_fails() {
        let factory = ResourceFactory::new(ResourceRegistry::default(), TypeMode::Strict);
        let result = factory.build_any(object(json!({"gid": "77", "resource_type": "portfolio"})));
        assert!(matches!(result, Err(AsanaError::ResourceTypeMismatch { .. })));
    }

    #[test]
    fn test_generic_nested_values_are_built() {
        let factory = ResourceFactory::default();
        let any = factory
            .build_any(object(json!({
                "gid": "5",
                "resource_type": "portfolio",
                "owner": {"gid": "1", "resource_type": "user", "name": "A"},
                "members": [
                    {"gid": "1", "resource_type": "user"},
                    {"gid": "2", "resource_type": "team"},
                    "not-an-object"
                ]
            })))
            .unwrap();
        let generic = any.as_generic().unwrap();

        let owner = generic.nested(&factory, "owner").unwrap().unwrap();
        assert_eq!(owner.as_user().map(|u| u.gid.as_str()), Some("1"));

        let members = generic.nested_list(&factory, "members").unwrap().unwrap();
        assert_eq!(members.len(), 2);
        assert!(members[0].as_user().is_some());
        assert!(members[1].as_generic().is_some());

        assert!(generic.nested(&factory, "missing").is_none());
    }

    #[test]
    fn test_registry_register_replaces() {
        let mut registry = ResourceRegistry::empty();
        assert!(registry.register("user", decode_as::<User>).is_none());
        assert!(registry.register("user", decode_as::<User>).is_some());
        assert_eq!(registry.resource_types(), vec!["user"]);

        let factory = ResourceFactory::new(registry, TypeMode::Lenient);
        let any = factory
            .build_any(object(json!({"gid": "1", "resource_type": "project"})))
            .unwrap();
        assert!(any.as_generic().is_some());
    }

    #[test]
    fn test_wrong_field_type_is_parse_error() {
        let factory = ResourceFactory::default();
        let result = factory.build::<User>(object(json!({"gid": "1", "name": 12})));
        assert!(matches!(result, Err(AsanaError::ParseError(_))));
    }
}
