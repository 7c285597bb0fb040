//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the asanapi binary.

use clap::{Parser, Subcommand, ValueEnum};

/// Asana API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "asanapi", about = "Asana API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Log requests to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the authenticated user.
    Me,

    /// Get a single resource by gid.
    Get {
        /// The type of resource to get.
        entity: Entity,

        /// The resource gid (`me` is accepted for users).
        gid: String,
    },

    /// List resources, following pagination.
    List {
        /// The type of resource to list.
        entity: Entity,

        /// Workspace gid (users, projects, tasks by assignee).
        #[arg(long, env = "ASANA_WORKSPACE")]
        workspace: Option<String>,

        /// Project gid (tasks).
        #[arg(long)]
        project: Option<String>,

        /// Assignee gid or `me` (tasks).
        #[arg(long)]
        assignee: Option<String>,

        /// Number of items per page.
        #[arg(long)]
        per_page: Option<u32>,

        /// Stop after this many items.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List the authenticated user's favorites.
    Favorites {
        /// Workspace gid.
        #[arg(long, env = "ASANA_WORKSPACE")]
        workspace: String,

        /// Resource type of the favorites, e.g. `project`.
        #[arg(long = "type", default_value = "project")]
        resource_type: String,
    },
}

/// Resource types that can be operated on.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    /// An Asana user.
    #[value(alias = "users")]
    User,
    /// A workspace or organization.
    #[value(alias = "workspaces")]
    Workspace,
    /// A project.
    #[value(alias = "projects")]
    Project,
    /// A task.
    #[value(alias = "tasks")]
    Task,
}
