//! Action registry and dispatch.

use std::any::type_name;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::handler::{NodeHandler, TypedHandler};
use crate::schema::{Schema, ValidationErrors};
use crate::{NodeError, RegistryError};

// ---------------------------------------------------------------------------
// RegisteredNode
// ---------------------------------------------------------------------------

/// One published action: a handler plus its input and output schemas.
pub struct RegisteredNode {
    name: String,
    input: Schema,
    output: Schema,
    handler: Arc<dyn NodeHandler>,
}

impl std::fmt::Debug for RegisteredNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredNode")
            .field("name", &self.name)
            .field("input", &self.input)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl RegisteredNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input_schema(&self) -> &Schema {
        &self.input
    }

    pub fn output_schema(&self) -> &Schema {
        &self.output
    }

    /// Decode a raw request body and [`invoke`](Self::invoke) the handler.
    pub fn dispatch(&self, body: &[u8]) -> Result<Value, NodeError> {
        let raw: Value = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Default::default())
        } else {
            serde_json::from_slice(body).map_err(|e| {
                NodeError::InvalidInput(ValidationErrors::single("body", format!("malformed JSON: {e}")))
            })?
        };
        self.invoke(&raw)
    }

    /// Validate `input`, call the handler once, validate its output.
    ///
    /// The handler is never called when input validation fails. A panic in
    /// the handler is caught and reported as [`NodeError::Panicked`].
    #[instrument(skip(self, input), fields(action = %self.name))]
    pub fn invoke(&self, input: &Value) -> Result<Value, NodeError> {
        let validated = self.input.validate(input).map_err(NodeError::InvalidInput)?;

        let handler = &self.handler;
        let returned = catch_unwind(AssertUnwindSafe(|| handler.call(validated)))
            .map_err(|payload| NodeError::Panicked(panic_message(payload.as_ref())))??;

        let output = self.output.validate(&returned).map_err(NodeError::InvalidOutput)?;
        debug!("action completed");
        Ok(Value::Object(output))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

// ---------------------------------------------------------------------------
// NodeRegistry
// ---------------------------------------------------------------------------

/// Action name → registered node.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: HashMap<String, Arc<RegisteredNode>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed handler and hand it back unchanged, so the caller
    /// can keep using it as a plain function.
    ///
    /// With `name = None` the action takes the handler's own function name
    /// (`fn factorial` publishes `factorial`). Closures have no usable
    /// name and must be registered with an explicit one.
    ///
    /// Registering a name twice replaces the earlier handler.
    pub fn register<F, I, O>(
        &mut self,
        name: Option<&str>,
        input: Schema,
        output: Schema,
        handler: F,
    ) -> Result<F, RegistryError>
    where
        F: Fn(I) -> anyhow::Result<O> + Clone + Send + Sync + 'static,
        I: DeserializeOwned + 'static,
        O: Serialize + 'static,
    {
        let name = match name {
            Some(explicit) => explicit.to_string(),
            None => default_name::<F>()?,
        };
        let typed = TypedHandler::new(handler.clone());
        self.register_handler(&name, input, output, Arc::new(typed))?;
        Ok(handler)
    }

    /// Register an untyped [`NodeHandler`] under `name`.
    pub fn register_handler(
        &mut self,
        name: &str,
        input: Schema,
        output: Schema,
        handler: Arc<dyn NodeHandler>,
    ) -> Result<(), RegistryError> {
        validate_name(name)?;
        let node = RegisteredNode {
            name: name.to_string(),
            input,
            output,
            handler,
        };
        if self.nodes.insert(name.to_string(), Arc::new(node)).is_some() {
            warn!(action = %name, "action registered twice; keeping the latest handler");
        } else {
            debug!(action = %name, "action registered");
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<RegisteredNode>> {
        self.nodes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered nodes in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RegisteredNode>> {
        let mut nodes: Vec<&Arc<RegisteredNode>> = self.nodes.values().collect();
        nodes.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        nodes.into_iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Last path segment of the handler's type name, e.g. `factorial` for
/// `nodes::builtin::factorial`.
fn default_name<F>() -> Result<String, RegistryError> {
    let full = type_name::<F>();
    let base = full.split('<').next().unwrap_or(full);
    let last = base.rsplit("::").next().unwrap_or(base);
    if last.is_empty() || last.contains('{') || last.contains(' ') {
        return Err(RegistryError::UnnamedHandler(full.to_string()));
    }
    Ok(last.to_string())
}

fn validate_name(name: &str) -> Result<(), RegistryError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(RegistryError::InvalidName(name.to_string()))
    }
}

// ============================================================
// Unit tests
// ============================================================
