//! Project model and operations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::client::AsanaClient;
use crate::collection::Collection;
use crate::error::{AsanaError, Result};
use crate::models::{Task, User, Workspace};
use crate::params::{require, RequestOptions};
use crate::request::RequestBuilder;
use crate::traits::{paginate, Get, List, Resource};

/// A project: a prioritized list of tasks in a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub gid: String,

    #[serde(default, alias = "resourceType", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_on: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<User>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<Workspace>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<User>>,
}

impl Resource for Project {
    const RESOURCE_TYPE: &'static str = "project";
    const PLURAL_NAME: &'static str = "projects";

    fn gid(&self) -> &str {
        &self.gid
    }

    fn resource_type(&self) -> Option<&str> {
        self.resource_type.as_deref()
    }
}

impl Get for Project {}

/// Filters for listing projects. Either `workspace` or `team` is required.
#[derive(Debug, Clone, Default)]
pub struct ProjectListQuery {
    pub workspace: Option<String>,
    pub team: Option<String>,
    /// Only archived (`true`) or unarchived (`false`) projects.
    pub archived: Option<bool>,
}

impl List for Project {
    type Query = ProjectListQuery;

    fn list_request(query: &Self::Query) -> Result<RequestBuilder> {
        if query.workspace.is_none() && query.team.is_none() {
            return Err(AsanaError::MissingParameter {
                operation: "Project::find_all",
                name: "workspace",
            });
        }
        Ok(RequestBuilder::get("/projects")
            .query("workspace", query.workspace.clone())
            .query("team", query.team.clone())
            .query("archived", query.archived))
    }
}

impl Project {
    /// Projects in a workspace.
    ///
    /// # Errors
    ///
    /// Fails with [`AsanaError::MissingParameter`] before any request when
    /// `workspace` is `None`.
    #[tracing::instrument(skip(client, workspace, options))]
    pub async fn find_by_workspace<'c, 'w>(
        client: &'c AsanaClient,
        workspace: impl Into<Option<&'w str>>,
        archived: Option<bool>,
        options: RequestOptions,
    ) -> Result<Collection<'c, Self>> {
        let workspace = require("Project::find_by_workspace", "workspace", workspace.into())?;
        let builder = RequestBuilder::get("/workspaces/{workspace_gid}/projects")
            .path_param("workspace_gid", workspace)
            .query("archived", archived);
        paginate(client, builder, &options).await
    }

    /// Tasks in this project.
    ///
    /// # Errors
    ///
    /// Returns the first page's request error.
    pub async fn tasks<'c>(
        &self,
        client: &'c AsanaClient,
        options: RequestOptions,
    ) -> Result<Collection<'c, Task>> {
        Task::find_by_project(client, self.gid.as_str(), options).await
    }

    pub fn is_archived(&self) -> bool {
        self.archived.unwrap_or(false)
    }
}
