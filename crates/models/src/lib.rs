//! `models` crate — wire models for the n8n public REST API.
//!
//! These types mirror the JSON the remote service accepts and returns.
//! Every field the caller may leave unset is an `Option` that is skipped
//! when `None`, so "never set" and "explicitly set to the default" stay
//! distinguishable on the wire.

pub mod connections;
pub mod entities;
pub mod error;
pub mod list;
pub mod payload;
mod serde_ext;
pub mod workflow;

pub use connections::{validate_connections, ConnectionTarget, Connections, NodeConnections};
pub use entities::{
    AuditOptions, AuditReport, CreatedUser, Credential, Execution, ExecutionStatus, GlobalRole,
    NewUser, Project, PullRequest, PullResult, RiskCategory, Tag, TagId, TransferRequest, User,
    Variable,
};
pub use error::ModelError;
pub use list::Paginated;
pub use payload::Payload;
pub use workflow::{CredentialRef, OnError, Workflow, WorkflowNode, WorkflowSettings};

pub type WorkflowList = Paginated<Workflow>;
pub type ExecutionList = Paginated<Execution>;
pub type CredentialList = Paginated<Credential>;
pub type TagList = Paginated<Tag>;
pub type VariableList = Paginated<Variable>;
pub type ProjectList = Paginated<Project>;
pub type UserList = Paginated<User>;
