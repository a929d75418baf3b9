//! The `NodeHandler` trait — the contract every registered action fulfils.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::schema::ValidationErrors;
use crate::NodeError;

/// Object-safe form of a handler, as stored in the registry.
///
/// `input` has already passed the input schema; the returned value is
/// checked against the output schema by the caller.
pub trait NodeHandler: Send + Sync {
    fn call(&self, input: Map<String, Value>) -> Result<Value, NodeError>;
}

/// Adapts a typed `Fn(I) -> anyhow::Result<O>` to [`NodeHandler`].
pub(crate) struct TypedHandler<F, I, O> {
    f: F,
    _types: PhantomData<fn(I) -> O>,
}

impl<F, I, O> TypedHandler<F, I, O> {
    pub(crate) fn new(f: F) -> Self {
        Self { f, _types: PhantomData }
    }
}

impl<F, I, O> NodeHandler for TypedHandler<F, I, O>
where
    F: Fn(I) -> anyhow::Result<O> + Send + Sync,
    I: DeserializeOwned,
    O: Serialize,
{
    fn call(&self, input: Map<String, Value>) -> Result<Value, NodeError> {
        let typed: I = serde_json::from_value(Value::Object(input))
            .map_err(|e| NodeError::InvalidInput(ValidationErrors::single("body", e.to_string())))?;

        let output = (self.f)(typed).map_err(|e| NodeError::Handler(format!("{e:#}")))?;

        serde_json::to_value(output)
            .map_err(|e| NodeError::InvalidOutput(ValidationErrors::single("body", e.to_string())))
    }
}
