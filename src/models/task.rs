//! Task model and operations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::client::AsanaClient;
use crate::collection::Collection;
use crate::error::Result;
use crate::models::{Project, User, Workspace};
use crate::params::{require, RequestOptions};
use crate::request::RequestBuilder;
use crate::traits::{paginate, Get, List, Resource};

/// A unit of work, assignable to one user and listed in any number of projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub gid: String,

    #[serde(default, alias = "resourceType", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_on: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<User>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<Workspace>,

    /// Parent task, for subtasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<Task>>,
}

impl Resource for Task {
    const RESOURCE_TYPE: &'static str = "task";
    const PLURAL_NAME: &'static str = "tasks";

    fn gid(&self) -> &str {
        &self.gid
    }

    fn resource_type(&self) -> Option<&str> {
        self.resource_type.as_deref()
    }
}

impl Get for Task {}

/// Filters for listing tasks: a `project`, or an `assignee` within a `workspace`.
#[derive(Debug, Clone, Default)]
pub struct TaskListQuery {
    pub project: Option<String>,
    pub assignee: Option<String>,
    pub workspace: Option<String>,
    /// Only tasks incomplete or completed since this time (ISO 8601 or `now`).
    pub completed_since: Option<String>,
}

impl List for Task {
    type Query = TaskListQuery;

    fn list_request(query: &Self::Query) -> Result<RequestBuilder> {
        let builder = RequestBuilder::get("/tasks")
            .query("completed_since", query.completed_since.clone());

        if let Some(project) = &query.project {
            return Ok(builder.query("project", project.as_str()));
        }
        let assignee = require("Task::find_all", "assignee", query.assignee.as_deref())?;
        let workspace = require("Task::find_all", "workspace", query.workspace.as_deref())?;
        Ok(builder
            .query("assignee", assignee)
            .query("workspace", workspace))
    }
}

impl Task {
    /// Tasks in a project, in project order.
    ///
    /// # Errors
    ///
    /// Fails with [`AsanaError::MissingParameter`](crate::AsanaError::MissingParameter)
    /// before any request when `project` is `None`.
    #[tracing::instrument(skip(client, project, options))]
    pub async fn find_by_project<'c, 'p>(
        client: &'c AsanaClient,
        project: impl Into<Option<&'p str>>,
        options: RequestOptions,
    ) -> Result<Collection<'c, Self>> {
        let project = require("Task::find_by_project", "project", project.into())?;
        let builder = RequestBuilder::get("/projects/{project_gid}/tasks")
            .path_param("project_gid", project);
        paginate(client, builder, &options).await
    }

    /// Tasks assigned to a user within a workspace. `assignee` may be `me`.
    ///
    /// # Errors
    ///
    /// Fails with [`AsanaError::MissingParameter`](crate::AsanaError::MissingParameter)
    /// before any request when either argument is `None`.
    pub async fn find_by_assignee<'c, 'a>(
        client: &'c AsanaClient,
        assignee: impl Into<Option<&'a str>>,
        workspace: impl Into<Option<&'a str>>,
        options: RequestOptions,
    ) -> Result<Collection<'c, Self>> {
        let query = TaskListQuery {
            assignee: Some(require("Task::find_by_assignee", "assignee", assignee.into())?.to_string()),
            workspace: Some(require("Task::find_by_assignee", "workspace", workspace.into())?.to_string()),
            ..Default::default()
        };
        Self::find_all(client, &query, options).await
    }

    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AsanaError;
    use serde_json::json;

    #[test]
    fn test_task_with_parent_and_projects() {
        let task: Task = serde_json::from_value(json!({
            "gid": "t2",
            "resource_type": "task",
            "name": "Write docs",
            "completed": true,
            "completed_at": "2024-05-01T12:30:00Z",
            "assignee": {"gid": "1", "resource_type": "user"},
            "projects": [{"gid": "p1", "resource_type": "project", "name": "Launch"}],
            "parent": {"gid": "t1", "resource_type": "task", "name": "Release"}
        }))
        .unwrap();

        assert!(task.is_completed());
        assert_eq!(task.parent.as_ref().map(|p| p.gid.as_str()), Some("t1"));
        assert_eq!(
            task.projects.as_ref().and_then(|p| p[0].name.as_deref()),
            Some("Launch")
        );
    }

    #[test]
    fn test_list_request_by_project() {
        let request = Task::list_request(&TaskListQuery {
            project: Some("p1".to_string()),
            ..Default::default()
        })
        .unwrap()
        .build()
        .unwrap();
        assert_eq!(request.query_value("project"), Some("p1"));
        assert_eq!(request.query_value("completed_since"), None);
    }

    #[test]
    fn test_list_request_requires_assignee_and_workspace() {
        let err = Task::list_request(&TaskListQuery {
            assignee: Some("me".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            AsanaError::MissingParameter { name: "workspace", .. }
        ));
    }
}
