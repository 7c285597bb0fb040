//! Workspace model and operations.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::request::RequestBuilder;
use crate::traits::{Get, List, Resource};

/// A workspace or organization: the top-level container of all other objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub gid: String,

    #[serde(default, alias = "resourceType", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Whether this workspace is an organization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_organization: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_domains: Option<Vec<String>>,
}

impl Resource for Workspace {
    const RESOURCE_TYPE: &'static str = "workspace";
    const PLURAL_NAME: &'static str = "workspaces";

    fn gid(&self) -> &str {
        &self.gid
    }

    fn resource_type(&self) -> Option<&str> {
        self.resource_type.as_deref()
    }
}

impl Get for Workspace {}

impl List for Workspace {
    type Query = ();

    fn list_request(_query: &()) -> Result<RequestBuilder> {
        Ok(RequestBuilder::get("/workspaces"))
    }
}

impl Workspace {
    pub fn is_organization(&self) -> bool {
        self.is_organization.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_workspace_deserialize() {
        let workspace: Workspace = serde_json::from_value(json!({
            "gid": "1",
            "resource_type": "workspace",
            "name": "Acme",
            "is_organization": true,
            "email_domains": ["acme.com"]
        }))
        .unwrap();
        assert!(workspace.is_organization());
        assert_eq!(workspace.email_domains, Some(vec!["acme.com".to_string()]));
    }

    #[test]
    fn test_compact_workspace() {
        let workspace: Workspace = serde_json::from_value(json!({"gid": "1"})).unwrap();
        assert!(!workspace.is_organization());
        assert!(workspace.name.is_none());
    }
}
