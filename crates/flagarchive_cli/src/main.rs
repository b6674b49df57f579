//! Command-line front end for the flag archive.
//!
//! # Responsibility
//! - Parse arguments and JSON bodies, then call the dispatch layer.
//! - Print the response envelope as JSON; exit non-zero on failure statuses.

use clap::{Parser, Subcommand};
use flagarchive_api::api::{self, decode_body, ApiContext, ApiResponse};
use flagarchive_core::{init_logging, AppConfig};
use log::info;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "flagarchive", version, about = "Manage flag archive resources")]
struct Cli {
    /// SQLite database file (overrides FLAGARCHIVE_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Absolute directory for rolling log files (overrides FLAGARCHIVE_LOG_DIR).
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error (overrides FLAGARCHIVE_LOG_LEVEL).
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Health check.
    Ping,
    /// Flag entities.
    Entity {
        #[command(subcommand)]
        action: ResourceAction,
    },
    /// Users.
    User {
        #[command(subcommand)]
        action: ResourceAction,
    },
}

#[derive(Debug, Subcommand)]
enum ResourceAction {
    Create {
        /// JSON request body.
        #[arg(long)]
        json: String,
    },
    Get {
        id: i64,
    },
    List {
        /// Zero-based page index.
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long)]
        size: Option<u32>,
    },
    Update {
        id: i64,
        /// JSON body with only the fields to change.
        #[arg(long)]
        json: String,
    },
    Delete {
        id: i64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => apply_overrides(config, &cli),
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::from(2);
        }
    };

    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(&config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("logging disabled: {err}");
        }
    }

    let response = run(&cli.command, &ApiContext::from_config(&config));
    info!(
        "event=cli_command module=cli status={} command={}",
        response.status,
        command_name(&cli.command)
    );
    let envelope = json!({ "status": response.status, "body": response.body });
    match serde_json::to_string_pretty(&envelope) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("failed to encode response: {err}"),
    }

    if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn apply_overrides(mut config: AppConfig, cli: &Cli) -> AppConfig {
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config
}

fn command_name(command: &Command) -> &'static str {
    let action = match command {
        Command::Ping => return "ping",
        Command::Entity { action } | Command::User { action } => action,
    };
    match action {
        ResourceAction::Create { .. } => "create",
        ResourceAction::Get { .. } => "get",
        ResourceAction::List { .. } => "list",
        ResourceAction::Update { .. } => "update",
        ResourceAction::Delete { .. } => "delete",
    }
}

fn run(command: &Command, ctx: &ApiContext) -> ApiResponse {
    match command {
        Command::Ping => ApiResponse {
            status: api::STATUS_OK,
            body: json!({
                "ping": flagarchive_core::ping(),
                "version": flagarchive_core::core_version(),
            }),
        },
        Command::Entity { action } => run_entity(action, ctx),
        Command::User { action } => run_user(action, ctx),
    }
}

fn run_entity(action: &ResourceAction, ctx: &ApiContext) -> ApiResponse {
    match action {
        ResourceAction::Create { json } => match decode_body(json) {
            Ok(request) => api::entity_create(ctx, &request),
            Err(response) => response,
        },
        ResourceAction::Get { id } => api::entity_get(ctx, *id),
        ResourceAction::List { page, size } => api::entity_list(ctx, *page, *size),
        ResourceAction::Update { id, json } => match decode_body(json) {
            Ok(request) => api::entity_update(ctx, *id, &request),
            Err(response) => response,
        },
        ResourceAction::Delete { id } => api::entity_delete(ctx, *id),
    }
}

fn run_user(action: &ResourceAction, ctx: &ApiContext) -> ApiResponse {
    match action {
        ResourceAction::Create { json } => match decode_body(json) {
            Ok(request) => api::user_create(ctx, &request),
            Err(response) => response,
        },
        ResourceAction::Get { id } => api::user_get(ctx, *id),
        ResourceAction::List { page, size } => api::user_list(ctx, *page, *size),
        ResourceAction::Update { id, json } => match decode_body(json) {
            Ok(request) => api::user_update(ctx, *id, &request),
            Err(response) => response,
        },
        ResourceAction::Delete { id } => api::user_delete(ctx, *id),
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_overrides, command_name, run, Cli, Command, ResourceAction};
    use clap::Parser;
    use flagarchive_api::ApiContext;
    use flagarchive_core::AppConfig;
    use std::path::PathBuf;

    #[test]
    fn parses_entity_list_with_global_db_flag() {
        let cli = Cli::try_parse_from([
            "flagarchive",
            "entity",
            "list",
            "--page",
            "2",
            "--size",
            "500",
            "--db",
            "/tmp/flags.db",
        ])
        .unwrap();

        assert_eq!(cli.db, Some(PathBuf::from("/tmp/flags.db")));
        match cli.command {
            Command::Entity {
                action: ResourceAction::List { page, size },
            } => {
                assert_eq!(page, 2);
                assert_eq!(size, Some(500));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["flagarchive", "user", "get", "abc"]).is_err());
    }

    #[test]
    fn overrides_take_precedence_over_environment() {
        let cli = Cli::try_parse_from([
            "flagarchive",
            "--db",
            "/srv/a.db",
            "--log-level",
            "warn",
            "ping",
        ])
        .unwrap();
        let config = apply_overrides(AppConfig::default(), &cli);
        assert_eq!(config.db_path, PathBuf::from("/srv/a.db"));
        assert_eq!(config.log_level, "warn");
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn create_then_get_through_commands() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ApiContext::new(dir.path().join("cli.db"));

        let create = Cli::try_parse_from([
            "flagarchive",
            "entity",
            "create",
            "--json",
            r#"{"name":"Japan","uniqueId":"JP","type":"country"}"#,
        ])
        .unwrap();
        let created = run(&create.command, &ctx);
        assert_eq!(created.status, 201);
        assert_eq!(command_name(&create.command), "create");

        let get = Cli::try_parse_from(["flagarchive", "entity", "get", "1"]).unwrap();
        let loaded = run(&get.command, &ctx);
        assert_eq!(loaded.status, 200);
        assert_eq!(loaded.body["type"], "country");

        let broken =
            Cli::try_parse_from(["flagarchive", "entity", "update", "1", "--json", "{"]).unwrap();
        assert_eq!(run(&broken.command, &ctx).status, 400);
    }

    #[test]
    fn ping_reports_version() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ApiContext::new(dir.path().join("unused.db"));
        let cli = Cli::try_parse_from(["flagarchive", "ping"]).unwrap();
        let response = run(&cli.command, &ctx);
        assert!(response.is_success());
        assert_eq!(response.body["ping"], "pong");
    }
}
