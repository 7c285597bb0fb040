//! Asana API CLI binary.
//!
//! A command-line interface for browsing Asana resources.

use asanapi::cli::{Cli, Command, Entity};
use asanapi::output::PrettyPrint;
use asanapi::{
    AnyResource, AsanaClient, Collection, Decode, Get, List, Project, RequestOptions, Task, User,
    UserListQuery, Workspace,
};
use clap::Parser;
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let client = match AsanaClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set ASANA_ACCESS_TOKEN environment variable");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if let Some(secs) = rate_limit_hint(&e) {
                eprintln!("Hint: Rate limited, retry in {secs}s");
            }
            ExitCode::FAILURE
        }
    }
}

fn rate_limit_hint(error: &asanapi::AsanaError) -> Option<u64> {
    match error {
        asanapi::AsanaError::Api {
            retry_after_secs, ..
        } if error.is_rate_limited() => *retry_after_secs,
        _ => None,
    }
}

async fn run(client: &AsanaClient, cli: Cli) -> asanapi::Result<()> {
    match cli.command {
        Command::Me => {
            let me = User::me(client, RequestOptions::new()).await?;
            output_single(&me, cli.json)
        }
        Command::Get { entity, gid } => handle_get(client, entity, &gid, cli.json).await,
        Command::List {
            entity,
            workspace,
            project,
            assignee,
            per_page,
            limit,
        } => {
            let mut options = RequestOptions::new();
            if let Some(per_page) = per_page {
                options = options.per_page(per_page);
            }
            let filters = Filters {
                workspace: workspace.as_deref(),
                project: project.as_deref(),
                assignee: assignee.as_deref(),
            };
            handle_list(client, entity, filters, options, limit, cli.json).await
        }
        Command::Favorites {
            workspace,
            resource_type,
        } => {
            let me = User::me(client, RequestOptions::new()).await?;
            let favorites = me
                .favorites(client, workspace.as_str(), resource_type.as_str(), RequestOptions::new())
                .await?
                .collect_all()
                .await?;
            output_list(&favorites, cli.json, |r| ResourceRow::from(r))
        }
    }
}

async fn handle_get(
    client: &AsanaClient,
    entity: Entity,
    gid: &str,
    json: bool,
) -> asanapi::Result<()> {
    let options = RequestOptions::new();
    match entity {
        Entity::User => output_single(&User::find_by_id(client, gid, options).await?, json),
        Entity::Workspace => {
            output_single(&Workspace::find_by_id(client, gid, options).await?, json)
        }
        Entity::Project => output_single(&Project::find_by_id(client, gid, options).await?, json),
        Entity::Task => output_single(&Task::find_by_id(client, gid, options).await?, json),
    }
}

struct Filters<'a> {
    workspace: Option<&'a str>,
    project: Option<&'a str>,
    assignee: Option<&'a str>,
}

async fn handle_list(
    client: &AsanaClient,
    entity: Entity,
    filters: Filters<'_>,
    options: RequestOptions,
    limit: Option<usize>,
    json: bool,
) -> asanapi::Result<()> {
    match entity {
        Entity::User => {
            let users = match filters.workspace {
                Some(workspace) => User::find_by_workspace(client, workspace, options).await?,
                None => User::find_all(client, &UserListQuery::default(), options).await?,
            };
            output_list(&drain(users, limit).await?, json, |u: &User| {
                ResourceRow::from(&AnyResource::from(u.clone()))
            })
        }
        Entity::Workspace => {
            let workspaces = Workspace::find_all(client, &(), options).await?;
            output_list(&drain(workspaces, limit).await?, json, |w: &Workspace| {
                ResourceRow::from(&AnyResource::from(w.clone()))
            })
        }
        Entity::Project => {
            let projects =
                Project::find_by_workspace(client, filters.workspace, None, options).await?;
            output_list(&drain(projects, limit).await?, json, |p: &Project| {
                ResourceRow::from(&AnyResource::from(p.clone()))
            })
        }
        Entity::Task => {
            let tasks = match filters.project {
                Some(project) => Task::find_by_project(client, project, options).await?,
                None => {
                    Task::find_by_assignee(client, filters.assignee, filters.workspace, options)
                        .await?
                }
            };
            output_list(&drain(tasks, limit).await?, json, |t| TaskRow::from(t))
        }
    }
}

async fn drain<T: Decode + Clone>(
    collection: Collection<'_, T>,
    limit: Option<usize>,
) -> asanapi::Result<Vec<T>> {
    match limit {
        Some(n) => collection.take(n).await,
        None => collection.collect_all().await,
    }
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> asanapi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_list<T, R, F>(items: &[T], json: bool, to_row: F) -> asanapi::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} items", items.len());
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct ResourceRow {
    gid: String,
    #[tabled(rename = "type")]
    resource_type: String,
    name: String,
}

impl From<&AnyResource> for ResourceRow {
    fn from(r: &AnyResource) -> Self {
        Self {
            gid: r.gid().unwrap_or_default().to_string(),
            resource_type: r.resource_type().unwrap_or_default().to_string(),
            name: r.name().unwrap_or_default().to_string(),
        }
    }
}

#[derive(Tabled)]
struct TaskRow {
    gid: String,
    name: String,
    completed: String,
    due: String,
}

impl From<&Task> for TaskRow {
    fn from(t: &Task) -> Self {
        Self {
            gid: t.gid.clone(),
            name: t.name.clone().unwrap_or_default(),
            completed: if t.is_completed() { "yes" } else { "no" }.to_string(),
            due: t.due_on.map(|d| d.to_string()).unwrap_or_default(),
        }
    }
}
