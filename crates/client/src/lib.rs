//! `client` crate — typed client for the n8n public REST API.
//!
//! One method per remote operation, grouped by resource under
//! [`resources`]. Every method issues exactly one request and either
//! decodes the success body or returns a [`ClientError`]; nothing is
//! retried or cached.

pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod resources;

pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::ClientError;
pub use query::{ExecutionQuery, PageQuery, UserQuery, WorkflowQuery};
