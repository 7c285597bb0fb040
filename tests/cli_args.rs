//! CLI argument parsing tests.

use asanapi::cli::{Cli, Command, Entity};
use clap::Parser;

#[test]
fn test_cli_parses_me() {
    let cli = Cli::parse_from(["asanapi", "me"]);
    assert!(!cli.json);
    assert!(matches!(cli.command, Command::Me));
}

#[test]
fn test_cli_parses_get_subcommand() {
    let cli = Cli::parse_from(["asanapi", "get", "task", "1204"]);

    match cli.command {
        Command::Get { entity, gid } => {
            assert_eq!(entity, Entity::Task);
            assert_eq!(gid, "1204");
        }
        _ => panic!("Expected Get command"),
    }
}

#[test]
fn test_cli_parses_list_with_plural_alias() {
    let cli = Cli::parse_from([
        "asanapi",
        "list",
        "tasks",
        "--project",
        "p1",
        "--per-page",
        "50",
        "--limit",
        "10",
    ]);

    match cli.command {
        Command::List {
            entity,
            project,
            per_page,
            limit,
            ..
        } => {
            assert_eq!(entity, Entity::Task);
            assert_eq!(project.as_deref(), Some("p1"));
            assert_eq!(per_page, Some(50));
            assert_eq!(limit, Some(10));
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_cli_parses_favorites() {
    let cli = Cli::parse_from(["asanapi", "favorites", "--workspace", "10", "--type", "task"]);

    match cli.command {
        Command::Favorites {
            workspace,
            resource_type,
        } => {
            assert_eq!(workspace, "10");
            assert_eq!(resource_type, "task");
        }
        _ => panic!("Expected Favorites command"),
    }
}

#[test]
fn test_json_flag_is_global() {
    let cli = Cli::parse_from(["asanapi", "list", "workspaces", "--json"]);
    assert!(cli.json);
    assert!(matches!(
        cli.command,
        Command::List {
            entity: Entity::Workspace,
            ..
        }
    ));
}

#[test]
fn test_unknown_entity_is_rejected() {
    assert!(Cli::try_parse_from(["asanapi", "get", "portfolio", "1"]).is_err());
}
