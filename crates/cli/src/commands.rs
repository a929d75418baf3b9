//! Remote sub-commands. Each maps to exactly one client call and returns
//! the decoded result as JSON for printing.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand};
use client::{Client, ExecutionQuery, PageQuery, UserQuery, WorkflowQuery};
use models::{
    AuditOptions, Credential, ExecutionStatus, GlobalRole, Project, PullRequest, RiskCategory, Tag, Variable,
    Workflow,
};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Args)]
pub struct PageArgs {
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long)]
    cursor: Option<String>,
}

impl From<PageArgs> for PageQuery {
    fn from(args: PageArgs) -> Self {
        PageQuery {
            limit: args.limit,
            cursor: args.cursor,
        }
    }
}

fn flag(set: bool) -> Option<bool> {
    set.then_some(true)
}

fn to_json<T: Serialize>(value: T) -> anyhow::Result<Value> {
    Ok(serde_json::to_value(value)?)
}

fn done() -> anyhow::Result<Value> {
    Ok(json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// workflows
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum WorkflowsCommand {
    List {
        #[arg(long)]
        active: Option<bool>,
        /// Comma-separated tag names.
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        project_id: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    Get {
        id: String,
    },
    /// Create a workflow from a JSON file.
    Create {
        path: PathBuf,
    },
    Delete {
        id: String,
    },
    Activate {
        id: String,
    },
    Deactivate {
        id: String,
    },
    /// Move a workflow to another project.
    Transfer {
        id: String,
        #[arg(long = "to")]
        destination_project_id: String,
    },
}

pub async fn workflows(client: &Client, cmd: WorkflowsCommand) -> anyhow::Result<Value> {
    match cmd {
        WorkflowsCommand::List {
            active,
            tags,
            name,
            project_id,
            page,
        } => {
            let query = WorkflowQuery {
                active,
                tags,
                name,
                project_id,
                limit: page.limit,
                cursor: page.cursor,
            };
            to_json(client.list_workflows(&query).await?)
        }
        WorkflowsCommand::Get { id } => to_json(client.get_workflow(&id).await?),
        WorkflowsCommand::Create { path } => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read file {}", path.display()))?;
            let workflow: Workflow = serde_json::from_str(&content).context("invalid workflow JSON")?;
            to_json(client.create_workflow(&workflow).await?)
        }
        WorkflowsCommand::Delete { id } => to_json(client.delete_workflow(&id).await?),
        WorkflowsCommand::Activate { id } => to_json(client.activate_workflow(&id).await?),
        WorkflowsCommand::Deactivate { id } => to_json(client.deactivate_workflow(&id).await?),
        WorkflowsCommand::Transfer {
            id,
            destination_project_id,
        } => {
            client.transfer_workflow(&id, &destination_project_id).await?;
            done()
        }
    }
}

// ---------------------------------------------------------------------------
// executions
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ExecutionsCommand {
    List {
        #[arg(long)]
        status: Option<ExecutionStatus>,
        #[arg(long)]
        workflow_id: Option<String>,
        #[arg(long)]
        project_id: Option<String>,
        #[arg(long)]
        include_data: bool,
        #[command(flatten)]
        page: PageArgs,
    },
    Get {
        id: String,
        #[arg(long)]
        include_data: bool,
    },
    Delete {
        id: String,
    },
}

pub async fn executions(client: &Client, cmd: ExecutionsCommand) -> anyhow::Result<Value> {
    match cmd {
        ExecutionsCommand::List {
            status,
            workflow_id,
            project_id,
            include_data,
            page,
        } => {
            let query = ExecutionQuery {
                include_data: flag(include_data),
                status,
                workflow_id,
                project_id,
                limit: page.limit,
                cursor: page.cursor,
            };
            to_json(client.list_executions(&query).await?)
        }
        ExecutionsCommand::Get { id, include_data } => {
            to_json(client.get_execution(&id, flag(include_data)).await?)
        }
        ExecutionsCommand::Delete { id } => to_json(client.delete_execution(&id).await?),
    }
}

// ---------------------------------------------------------------------------
// credentials
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum CredentialsCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long = "type")]
        credential_type: String,
        /// Secret fields as a JSON object.
        #[arg(long)]
        data: String,
    },
    /// Show the data schema of a credential type.
    Schema {
        credential_type: String,
    },
    Delete {
        id: String,
    },
    Transfer {
        id: String,
        #[arg(long = "to")]
        destination_project_id: String,
    },
}

pub async fn credentials(client: &Client, cmd: CredentialsCommand) -> anyhow::Result<Value> {
    match cmd {
        CredentialsCommand::List { page } => to_json(client.list_credentials(&page.into()).await?),
        CredentialsCommand::Create {
            name,
            credential_type,
            data,
        } => {
            let data: serde_json::Map<String, Value> =
                serde_json::from_str(&data).context("--data must be a JSON object")?;
            let credential = Credential::new(name, credential_type, data);
            to_json(client.create_credential(&credential).await?)
        }
        CredentialsCommand::Schema { credential_type } => {
            client.get_credential_schema(&credential_type).await.map_err(Into::into)
        }
        CredentialsCommand::Delete { id } => to_json(client.delete_credential(&id).await?),
        CredentialsCommand::Transfer {
            id,
            destination_project_id,
        } => {
            client.transfer_credential(&id, &destination_project_id).await?;
            done()
        }
    }
}

// ---------------------------------------------------------------------------
// tags, variables, projects
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum TagsCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    Create {
        name: String,
    },
    Delete {
        id: String,
    },
    /// Tags attached to a workflow.
    ForWorkflow {
        workflow_id: String,
    },
}

pub async fn tags(client: &Client, cmd: TagsCommand) -> anyhow::Result<Value> {
    match cmd {
        TagsCommand::List { page } => to_json(client.list_tags(&page.into()).await?),
        TagsCommand::Create { name } => to_json(client.create_tag(&Tag::new(name)).await?),
        TagsCommand::Delete { id } => to_json(client.delete_tag(&id).await?),
        TagsCommand::ForWorkflow { workflow_id } => to_json(client.get_workflow_tags(&workflow_id).await?),
    }
}

#[derive(Subcommand)]
pub enum VariablesCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    Create {
        key: String,
        value: String,
    },
    Delete {
        id: String,
    },
}

pub async fn variables(client: &Client, cmd: VariablesCommand) -> anyhow::Result<Value> {
    match cmd {
        VariablesCommand::List { page } => to_json(client.list_variables(&page.into()).await?),
        VariablesCommand::Create { key, value } => {
            to_json(client.create_variable(&Variable::new(key, value)).await?)
        }
        VariablesCommand::Delete { id } => {
            client.delete_variable(&id).await?;
            done()
        }
    }
}

#[derive(Subcommand)]
pub enum ProjectsCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    Create {
        name: String,
    },
    Delete {
        id: String,
    },
}

pub async fn projects(client: &Client, cmd: ProjectsCommand) -> anyhow::Result<Value> {
    match cmd {
        ProjectsCommand::List { page } => to_json(client.list_projects(&page.into()).await?),
        ProjectsCommand::Create { name } => to_json(client.create_project(&Project::new(name)).await?),
        ProjectsCommand::Delete { id } => {
            client.delete_project(&id).await?;
            done()
        }
    }
}

// ---------------------------------------------------------------------------
// users
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum UsersCommand {
    List {
        #[arg(long)]
        include_role: bool,
        #[arg(long)]
        project_id: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    Get {
        id_or_email: String,
    },
    /// Change a user's global role (owner, admin, member).
    SetRole {
        id_or_email: String,
        role: GlobalRole,
    },
}

pub async fn users(client: &Client, cmd: UsersCommand) -> anyhow::Result<Value> {
    match cmd {
        UsersCommand::List {
            include_role,
            project_id,
            page,
        } => {
            let query = UserQuery {
                limit: page.limit,
                cursor: page.cursor,
                include_role: flag(include_role),
                project_id,
            };
            to_json(client.list_users(&query).await?)
        }
        UsersCommand::Get { id_or_email } => to_json(client.get_user(&id_or_email, None).await?),
        UsersCommand::SetRole { id_or_email, role } => {
            client.change_user_role(&id_or_email, role).await?;
            done()
        }
    }
}

// ---------------------------------------------------------------------------
// audit, source control
// ---------------------------------------------------------------------------

pub async fn audit(
    client: &Client,
    days_abandoned_workflow: Option<u32>,
    categories: Vec<String>,
) -> anyhow::Result<Value> {
    let categories = categories
        .into_iter()
        .map(|c| {
            serde_json::from_value::<RiskCategory>(Value::String(c.clone()))
                .with_context(|| format!("unknown risk category '{c}'"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let options = (days_abandoned_workflow.is_some() || !categories.is_empty()).then(|| AuditOptions {
        days_abandoned_workflow,
        categories: (!categories.is_empty()).then_some(categories),
    });
    to_json(client.generate_audit(options.as_ref()).await?)
}

pub async fn pull(client: &Client, force: bool) -> anyhow::Result<Value> {
    let request = PullRequest {
        force: flag(force),
        variables: None,
    };
    to_json(client.pull(&request).await?)
}
