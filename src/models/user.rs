//! User model and operations.

use serde::{Deserialize, Serialize};

use crate::client::AsanaClient;
use crate::collection::Collection;
use crate::error::Result;
use crate::factory::AnyResource;
use crate::models::Workspace;
use crate::params::{require, RequestOptions};
use crate::request::RequestBuilder;
use crate::traits::{paginate, Get, List, Resource};

/// An account that can be given access to workspaces, projects and tasks.
///
/// The special identifier `me` can be used anywhere a user gid is
/// accepted, to refer to the authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub gid: String,

    #[serde(default, alias = "resourceType", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Profile photo URLs by size. `null` when the user has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<UserPhoto>,

    /// Workspaces and organizations the user belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspaces: Option<Vec<Workspace>>,
}

/// Profile photo URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPhoto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_21x21: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_27x27: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_36x36: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_60x60: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_128x128: Option<String>,
}

impl Resource for User {
    const RESOURCE_TYPE: &'static str = "user";
    const PLURAL_NAME: &'static str = "users";

    fn gid(&self) -> &str {
        &self.gid
    }

    fn resource_type(&self) -> Option<&str> {
        self.resource_type.as_deref()
    }
}

impl Get for User {}

/// Filters for [`User::find_all`](List::find_all).
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    /// Restrict to one workspace or organization.
    pub workspace: Option<String>,
}

impl List for User {
    type Query = UserListQuery;

    fn list_request(query: &Self::Query) -> Result<RequestBuilder> {
        Ok(RequestBuilder::get("/users").query("workspace", query.workspace.clone()))
    }
}

impl User {
    /// The full record of the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is not a user.
    pub async fn me(client: &AsanaClient, options: RequestOptions) -> Result<Self> {
        Self::find_by_id(client, "me", options).await
    }

    /// Users in a workspace or organization.
    ///
    /// # Errors
    ///
    /// Fails with [`AsanaError::MissingParameter`](crate::AsanaError::MissingParameter)
    /// before any request when `workspace` is `None`.
    #[tracing::instrument(skip(client, workspace, options))]
    pub async fn find_by_workspace<'c, 'w>(
        client: &'c AsanaClient,
        workspace: impl Into<Option<&'w str>>,
        options: RequestOptions,
    ) -> Result<Collection<'c, Self>> {
        let workspace = require("User::find_by_workspace", "workspace", workspace.into())?;
        let builder = RequestBuilder::get("/workspaces/{workspace_gid}/users")
            .path_param("workspace_gid", workspace);
        paginate(client, builder, &options).await
    }

    /// The user's favorites of one resource type in a workspace, in sidebar order.
    ///
    /// Items are decoded by their own discriminator, so a `project` favorite
    /// comes back as [`AnyResource::Project`].
    ///
    /// # Errors
    ///
    /// Fails with [`AsanaError::MissingParameter`](crate::AsanaError::MissingParameter)
    /// before any request when `workspace` or `resource_type` is `None`.
    #[tracing::instrument(skip(self, client, workspace, resource_type, options), fields(user = %self.gid))]
    pub async fn favorites<'c, 'a>(
        &self,
        client: &'c AsanaClient,
        workspace: impl Into<Option<&'a str>>,
        resource_type: impl Into<Option<&'a str>>,
        options: RequestOptions,
    ) -> Result<Collection<'c, AnyResource>> {
        let workspace = require("User::favorites", "workspace", workspace.into())?;
        let resource_type = require("User::favorites", "resource_type", resource_type.into())?;
        let builder = RequestBuilder::get("/users/{user_gid}/favorites")
            .path_param("user_gid", self.gid.as_str())
            .query("workspace", workspace)
            .query("resource_type", resource_type);
        paginate(client, builder, &options).await
    }

    /// Gids of the workspaces embedded in this record.
    pub fn workspace_gids(&self) -> Vec<&str> {
        self.workspaces
            .iter()
            .flatten()
            .map(|w| w.gid.as_str())
            .collect()
    }
}
