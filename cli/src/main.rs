//! Command-line front end for the todo service.
//!
//! Builds one `TodoClient` from flags/environment and runs a single
//! operation per invocation, printing the result as JSON on stdout.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use todo_core::{NewTodo, TodoClient, TodoId, TodoPatch, Transport, DEFAULT_BASE_URL};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "todo", version, about = "Manage todos on a remote todo service")]
struct Cli {
    /// Base address of the todo service.
    #[arg(long, env = "TODO_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand, PartialEq)]
enum Command {
    /// List every todo.
    List,
    /// Show one todo.
    Get { id: TodoId },
    /// Create a todo.
    Add {
        title: String,
        /// Extra `key=value` fields sent with the todo.
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Change the title and/or completion of a todo.
    Update {
        id: TodoId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Delete a todo.
    Delete { id: TodoId },
    /// Mark a todo as done or not done.
    Toggle {
        id: TodoId,
        #[arg(action = clap::ArgAction::Set)]
        completed: bool,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = TodoClient::new(&cli.base_url)
        .with_context(|| format!("building client for {}", cli.base_url))?;
    tracing::debug!(base_url = client.base_url(), "client ready");

    run(&client, cli.command).await
}

async fn run<T: Transport>(client: &TodoClient<T>, command: Command) -> Result<()> {
    match command {
        Command::List => print(&client.get_all_todos().await?),
        Command::Get { id } => print(&client.get_todo(id).await?),
        Command::Add { title, fields } => {
            let todo = fields
                .into_iter()
                .fold(NewTodo::new(title), |todo, (k, v)| todo.with_field(k, v));
            print(&client.create_todo(&todo).await?)
        }
        Command::Update {
            id,
            title,
            completed,
        } => {
            let updates = TodoPatch {
                title,
                completed,
                ..TodoPatch::default()
            };
            anyhow::ensure!(!updates.is_empty(), "nothing to update: pass --title and/or --completed");
            print(&client.update_todo(id, &updates).await?)
        }
        Command::Delete { id } => print(&client.delete_todo(id).await?),
        Command::Toggle { id, completed } => print(&client.toggle_todo(id, completed).await?),
    }
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("todo").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn default_base_url() {
        let cli = parse(&["list"]);
        assert_eq!(cli.command, Command::List);
        if std::env::var_os("TODO_API_URL").is_none() {
            assert_eq!(cli.base_url, "http://localhost:3001");
        }
    }

    #[test]
    fn base_url_flag_after_subcommand() {
        let cli = parse(&["delete", "42", "--base-url", "http://example.test"]);
        assert_eq!(cli.base_url, "http://example.test");
        assert_eq!(
            cli.command,
            Command::Delete {
                id: TodoId::Number(42)
            }
        );
    }

    #[test]
    fn toggle_takes_explicit_state() {
        let cli = parse(&["toggle", "7", "false"]);
        assert_eq!(
            cli.command,
            Command::Toggle {
                id: TodoId::Number(7),
                completed: false
            }
        );
    }

    #[test]
    fn add_collects_extra_fields() {
        let cli = parse(&["add", "Buy milk", "--field", "priority=high", "--field", "list=home"]);
        assert_eq!(
            cli.command,
            Command::Add {
                title: "Buy milk".to_string(),
                fields: vec![
                    ("priority".to_string(), "high".to_string()),
                    ("list".to_string(), "home".to_string()),
                ],
            }
        );
    }

    #[test]
    fn malformed_field_is_rejected() {
        let result = Cli::try_parse_from(["todo", "add", "x", "--field", "oops"]);
        assert!(result.is_err());
    }

    #[test]
    fn update_accepts_partial_flags() {
        let cli = parse(&["update", "5", "--title", "y"]);
        assert_eq!(
            cli.command,
            Command::Update {
                id: TodoId::Number(5),
                title: Some("y".to_string()),
                completed: None
            }
        );
    }

    #[test]
    fn non_numeric_id_is_kept_as_text() {
        let cli = parse(&["get", "a1b2"]);
        assert_eq!(
            cli.command,
            Command::Get {
                id: TodoId::Text("a1b2".to_string())
            }
        );
    }
}
