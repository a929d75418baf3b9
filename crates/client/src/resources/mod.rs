//! Remote operations, one `impl Client` block per resource.
//!
//! Every method issues exactly one request. Create/update bodies are built
//! with [`models::Payload`], so server-assigned fields never leave the
//! process.

pub mod audit;
pub mod credentials;
pub mod executions;
pub mod projects;
pub mod source_control;
pub mod tags;
pub mod users;
pub mod variables;
pub mod workflows;
