//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{AnyResource, GenericResource, Project, Task, User, Workspace};

/// Trait for human-readable key-value output.
///
/// Implemented by resource types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn header(kind: &str, gid: &str) -> Vec<String> {
    let title = format!("{kind}: {gid}");
    let divider = "─".repeat(title.chars().count().max(30));
    vec![title, divider]
}

impl PrettyPrint for User {
    fn pretty_print(&self) -> String {
        let mut lines = header("User", &self.gid);

        if let Some(ref name) = self.name {
            lines.push(format!("Name:           {name}"));
        }

        if let Some(ref email) = self.email {
            lines.push(format!("Email:          {email}"));
        }

        let workspaces = self.workspace_gids();
        if !workspaces.is_empty() {
            lines.push(format!("Workspaces:     {}", workspaces.join(", ")));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Workspace {
    fn pretty_print(&self) -> String {
        let mut lines = header("Workspace", &self.gid);

        if let Some(ref name) = self.name {
            lines.push(format!("Name:           {name}"));
        }

        lines.push(format!(
            "Organization:   {}",
            if self.is_organization() { "yes" } else { "no" }
        ));

        lines.join("\n")
    }
}

impl PrettyPrint for Project {
    fn pretty_print(&self) -> String {
        let mut lines = header("Project", &self.gid);

        if let Some(ref name) = self.name {
            lines.push(format!("Name:           {name}"));
        }

        if let Some(ref owner) = self.owner {
            lines.push(format!(
                "Owner:          {}",
                owner.name.as_deref().unwrap_or(&owner.gid)
            ));
        }

        if let Some(ref due_on) = self.due_on {
            lines.push(format!("Due:            {due_on}"));
        }

        if let Some(ref created) = self.created_at {
            lines.push(format!("Created:        {}", created.format("%Y-%m-%d %H:%M:%S UTC")));
        }

        if self.is_archived() {
            lines.push("Status:         archived".to_string());
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Task {
    fn pretty_print(&self) -> String {
        let mut lines = header("Task", &self.gid);

        if let Some(ref name) = self.name {
            lines.push(format!("Name:           {name}"));
        }

        lines.push(format!(
            "Completed:      {}",
            if self.is_completed() { "yes" } else { "no" }
        ));

        if let Some(ref assignee) = self.assignee {
            lines.push(format!(
                "Assignee:       {}",
                assignee.name.as_deref().unwrap_or(&assignee.gid)
            ));
        }

        if let Some(ref due_on) = self.due_on {
            lines.push(format!("Due:            {due_on}"));
        }

        if let Some(ref parent) = self.parent {
            lines.push(format!("Parent:         {}", parent.gid));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for GenericResource {
    fn pretty_print(&self) -> String {
        let kind = self.resource_type().unwrap_or("Resource");
        let mut lines = header(kind, self.gid().unwrap_or("?"));
        for (key, value) in self.iter() {
            if key == "gid" || key == "resource_type" || key == "resourceType" {
                continue;
            }
            lines.push(format!("{:<16}{value}", format!("{key}:")));
        }
        lines.join("\n")
    }
}

impl PrettyPrint for AnyResource {
    fn pretty_print(&self) -> String {
        match self {
            Self::User(user) => user.pretty_print(),
            Self::Workspace(workspace) => workspace.pretty_print(),
            Self::Project(project) => project.pretty_print(),
            Self::Task(task) => task.pretty_print(),
            Self::Generic(generic) => generic.pretty_print(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_pretty_print_format() {
        let user: User = serde_json::from_value(json!({
            "gid": "123",
            "name": "Greg",
            "email": "greg@example.com",
            "workspaces": [{"gid": "1"}, {"gid": "2"}]
        }))
        .unwrap();

        let output = user.pretty_print();
        assert!(output.starts_with("User: 123"));
        assert!(output.contains("Email:          greg@example.com"));
        assert!(output.contains("Workspaces:     1, 2"));
    }

    #[test]
    fn test_any_resource_dispatches_by_variant() {
        let task: Task =
            serde_json::from_value(json!({"gid": "t1", "name": "Ship", "completed": true})).unwrap();
        let output = AnyResource::from(task).pretty_print();
        assert!(output.starts_with("Task: t1"));
        assert!(output.contains("Completed:      yes"));

        let tag: GenericResource =
            serde_json::from_value(json!({"gid": "g1", "resource_type": "tag", "color": "red"}))
                .unwrap();
        let output = AnyResource::Generic(tag).pretty_print();
        assert!(output.starts_with("tag: g1"));
        assert!(output.contains("color:"));
        assert!(!output.contains("resource_type"));
    }
}
