//! `rusty-n8n` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve`    — start the action server with the built-in nodes.
//! - `validate` — check a workflow JSON file's connection graph.
//! - `workflows`, `executions`, `credentials`, `tags`, `variables`,
//!   `projects`, `users`, `audit`, `pull` — call the remote platform and
//!   print the result as JSON.

mod commands;

use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use client::{Client, ClientConfig};
use models::{validate_connections, Workflow};
use nodes::NodeRegistry;
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::{
    CredentialsCommand, ExecutionsCommand, ProjectsCommand, TagsCommand, UsersCommand, VariablesCommand,
    WorkflowsCommand,
};

#[derive(Parser)]
#[command(
    name = "rusty-n8n",
    about = "Typed n8n client and local action server",
    version
)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Command,
}

/// Remote platform settings. Unset flags fall back to `N8N_*` variables,
/// then to the client defaults.
#[derive(Args)]
struct ConnectionArgs {
    #[arg(long, global = true, env = "N8N_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long, global = true, env = "N8N_HOST")]
    host: Option<String>,
    #[arg(long, global = true, env = "N8N_PORT")]
    port: Option<u16>,
    #[arg(long, global = true, env = "N8N_PROTOCOL")]
    protocol: Option<String>,
    #[arg(long, global = true, env = "N8N_BASE_PATH")]
    base_path: Option<String>,
    /// Full base URL; overrides protocol, host, port and base path.
    #[arg(long, global = true, env = "N8N_BASE_URL")]
    base_url: Option<String>,
    #[arg(long, global = true, env = "N8N_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

impl ConnectionArgs {
    fn client(self) -> anyhow::Result<Client> {
        let mut builder = ClientConfig::builder();
        if let Some(v) = self.api_key {
            builder = builder.api_key(v);
        }
        if let Some(v) = self.host {
            builder = builder.host(v);
        }
        if let Some(v) = self.port {
            builder = builder.port(v);
        }
        if let Some(v) = self.protocol {
            builder = builder.protocol(v);
        }
        if let Some(v) = self.base_path {
            builder = builder.base_path(v);
        }
        if let Some(v) = self.base_url {
            builder = builder.base_url(v);
        }
        if let Some(v) = self.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(v));
        }
        Ok(Client::new(builder.build()?)?)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Start the action server.
    Serve {
        #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
        bind: String,
    },
    /// Validate a workflow definition JSON file.
    Validate {
        /// Path to the workflow JSON file.
        path: std::path::PathBuf,
    },
    #[command(subcommand)]
    Workflows(WorkflowsCommand),
    #[command(subcommand)]
    Executions(ExecutionsCommand),
    #[command(subcommand)]
    Credentials(CredentialsCommand),
    #[command(subcommand)]
    Tags(TagsCommand),
    #[command(subcommand)]
    Variables(VariablesCommand),
    #[command(subcommand)]
    Projects(ProjectsCommand),
    #[command(subcommand)]
    Users(UsersCommand),
    /// Generate a security audit.
    Audit {
        #[arg(long)]
        days_abandoned_workflow: Option<u32>,
        /// Risk categories to include (credentials, database, nodes, filesystem, instance).
        #[arg(long = "category")]
        categories: Vec<String>,
    },
    /// Pull changes from the connected source-control repository.
    Pull {
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { bind } => {
            let mut registry = NodeRegistry::new();
            nodes::builtin::register_builtin(&mut registry)?;
            info!("Starting action server on {bind} with actions {:?}", registry.names());
            api::serve(&bind, Arc::new(registry)).await?;
        }
        Command::Validate { path } => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read file {}", path.display()))?;
            let workflow: Workflow = serde_json::from_str(&content).context("invalid workflow JSON")?;
            validate_connections(&workflow).context("validation failed")?;
            println!(
                "✅ Workflow '{}' is valid ({} nodes).",
                workflow.name,
                workflow.nodes.len()
            );
        }
        remote => {
            let client = cli.connection.client()?;
            let result = run_remote(&client, remote).await;
            client.shutdown();
            println!("{}", serde_json::to_string_pretty(&result?)?);
        }
    }

    Ok(())
}

async fn run_remote(client: &Client, command: Command) -> anyhow::Result<serde_json::Value> {
    match command {
        Command::Workflows(cmd) => commands::workflows(client, cmd).await,
        Command::Executions(cmd) => commands::executions(client, cmd).await,
        Command::Credentials(cmd) => commands::credentials(client, cmd).await,
        Command::Tags(cmd) => commands::tags(client, cmd).await,
        Command::Variables(cmd) => commands::variables(client, cmd).await,
        Command::Projects(cmd) => commands::projects(client, cmd).await,
        Command::Users(cmd) => commands::users(client, cmd).await,
        Command::Audit {
            days_abandoned_workflow,
            categories,
        } => commands::audit(client, days_abandoned_workflow, categories).await,
        Command::Pull { force } => commands::pull(client, force).await,
        Command::Serve { .. } | Command::Validate { .. } => {
            anyhow::bail!("not a remote command")
        }
    }
}
