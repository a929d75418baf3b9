//! `MockHandler` — a test double for `NodeHandler`.
//!
//! Records every validated input it receives and answers with a
//! programmer-specified result.

use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};

use crate::{NodeError, NodeHandler};

/// Behaviour injected into `MockHandler` at construction time.
pub enum MockBehaviour {
    /// Return a specific JSON value.
    ReturnValue(Value),
    /// Fail with a handler error.
    Fail(String),
    /// Panic with the given message.
    Panic(String),
}

pub struct MockHandler {
    pub behaviour: MockBehaviour,
    /// All inputs seen by this handler (in call order).
    pub calls: Arc<Mutex<Vec<Map<String, Value>>>>,
}

impl MockHandler {
    pub fn returning(value: Value) -> Self {
        Self::with(MockBehaviour::ReturnValue(value))
    }

    pub fn failing(msg: impl Into<String>) -> Self {
        Self::with(MockBehaviour::Fail(msg.into()))
    }

    pub fn panicking(msg: impl Into<String>) -> Self {
        Self::with(MockBehaviour::Panic(msg.into()))
    }

    fn with(behaviour: MockBehaviour) -> Self {
        Self {
            behaviour,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the call log, usable after the handler is moved
    /// into a registry.
    pub fn call_log(&self) -> Arc<Mutex<Vec<Map<String, Value>>>> {
        Arc::clone(&self.calls)
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl NodeHandler for MockHandler {
    fn call(&self, input: Map<String, Value>) -> Result<Value, NodeError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(input);
        }

        match &self.behaviour {
            MockBehaviour::ReturnValue(v) => Ok(v.clone()),
            MockBehaviour::Fail(msg)      => Err(NodeError::Handler(msg.clone())),
            MockBehaviour::Panic(msg)     => panic!("{msg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldKind, FieldSpec, NodeRegistry, Schema};
    use serde_json::json;

    #[test]
    fn records_only_validated_calls() {
        let mock = MockHandler::returning(json!({ "ok": true }));
        let log = mock.call_log();

        let mut reg = NodeRegistry::new();
        let input = Schema::new().field(FieldSpec::required("n", FieldKind::Integer));
        let output = Schema::new().field(FieldSpec::required("ok", FieldKind::Boolean));
        reg.register_handler("mock", input, output, Arc::new(mock)).unwrap();

        let node = reg.get("mock").unwrap();
        assert!(node.invoke(&json!({ "n": "nope" })).is_err());
        assert_eq!(node.invoke(&json!({ "n": 1, "x": 2 })).unwrap(), json!({ "ok": true }));

        let calls = log.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(Value::Object(calls[0].clone()), json!({ "n": 1 }));
    }

    #[test]
    fn panic_message_is_preserved() {
        let mut reg = NodeRegistry::new();
        reg.register_handler("boom", Schema::new(), Schema::new(), Arc::new(MockHandler::panicking("bad state")))
            .unwrap();
        let err = reg.get("boom").unwrap().invoke(&json!({})).unwrap_err();
        assert!(matches!(err, NodeError::Panicked(msg) if msg == "bad state"));
    }
}
