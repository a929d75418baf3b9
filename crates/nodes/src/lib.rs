//! `nodes` crate — registry of local functions exposed as remote actions.
//!
//! A handler is any `Fn(I) -> anyhow::Result<O>` where `I` deserializes
//! from the request body and `O` serializes into the response. Registering
//! it pairs it with an input and output [`Schema`] under an action name;
//! [`RegisteredNode::dispatch`] validates, calls and validates again.
//!
//! The registry is built once at startup and then frozen behind an `Arc`
//! by the server; nothing registers after the routes are published.

pub mod builtin;
pub mod error;
pub mod handler;
pub mod mock;
pub mod registry;
pub mod schema;

pub use error::{NodeError, RegistryError};
pub use handler::NodeHandler;
pub use registry::{NodeRegistry, RegisteredNode};
pub use schema::{Constraint, FieldError, FieldKind, FieldSpec, Schema, ValidationErrors};
