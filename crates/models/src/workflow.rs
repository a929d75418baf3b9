//! Workflow, node and settings models.
//!
//! A workflow as the remote service sees it: an ordered node list plus a
//! connection graph keyed by node name (see [`crate::connections`]).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::connections::{ConnectionTarget, Connections};
use crate::payload::Payload;
use crate::serde_ext;

// ---------------------------------------------------------------------------
// OnError
// ---------------------------------------------------------------------------

/// What the remote engine does when a node fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OnError {
    StopWorkflow,
    /// Older workflows spell this `continue`.
    #[serde(alias = "continue")]
    ContinueRegularOutput,
    ContinueErrorOutput,
}

// ---------------------------------------------------------------------------
// CredentialRef
// ---------------------------------------------------------------------------

/// Reference from a node to a stored credential, keyed by credential type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRef {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_ext::opt_id"
    )]
    pub id: Option<String>,
    pub name: String,
}

// ---------------------------------------------------------------------------
// WorkflowNode
// ---------------------------------------------------------------------------

/// A single node inside a workflow definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Node kind, e.g. `n8n-nodes-base.set`.
    #[serde(rename = "type")]
    pub node_type: String,
    pub type_version: f64,
    /// Editor canvas position `[x, y]`.
    pub position: [f64; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<BTreeMap<String, CredentialRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes_in_flow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execute_once: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub always_output_data: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_on_fail: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tries: Option<u32>,
    /// Milliseconds between retry attempts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_between_tries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_error: Option<OnError>,
}

impl WorkflowNode {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        node_type: impl Into<String>,
        type_version: f64,
        position: [f64; 2],
    ) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            node_type: node_type.into(),
            type_version,
            position,
            ..Default::default()
        }
    }

    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = match parameters {
            Value::Object(map) => Some(map),
            _ => Some(Map::new()),
        };
        self
    }

    pub fn with_credential(mut self, credential_type: impl Into<String>, credential: CredentialRef) -> Self {
        self.credentials
            .get_or_insert_with(BTreeMap::new)
            .insert(credential_type.into(), credential);
        self
    }

    /// Enable retry-on-fail with the given attempt budget and delay.
    pub fn with_retry(mut self, max_tries: u32, wait_between_tries: u32) -> Self {
        self.retry_on_fail = Some(true);
        self.max_tries = Some(max_tries);
        self.wait_between_tries = Some(wait_between_tries);
        self
    }
}

// ---------------------------------------------------------------------------
// WorkflowSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_execution_progress: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_manual_executions: Option<bool>,
    /// `"all"` or `"none"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_data_error_execution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_data_success_execution: Option<String>,
    /// Seconds; `-1` disables the timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_workflow: Option<String>,
    /// `"v0"` or `"v1"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_order: Option<String>,
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// A complete workflow definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_ext::opt_id"
    )]
    pub id: Option<String>,
    pub name: String,
    /// Managed through activate/deactivate; never sent on create or update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
    #[serde(default)]
    pub connections: Connections,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<WorkflowSettings>,
    /// Tag names. Tags are attached through the workflow-tags endpoint.
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "serde_ext::tag_names"
    )]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Workflow {
    pub fn new(name: impl Into<String>, nodes: Vec<WorkflowNode>) -> Self {
        Self {
            name: name.into(),
            nodes,
            ..Default::default()
        }
    }

    /// Wire `from`'s first main output into `to`'s first main input.
    ///
    /// Both ends are referenced by node name, the way the editor does.
    pub fn connect(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        let outputs = self
            .connections
            .entry(from.into())
            .or_default()
            .entry("main".to_string())
            .or_default();
        if outputs.is_empty() {
            outputs.push(Vec::new());
        }
        outputs[0].push(ConnectionTarget::main(to));
        self
    }

    pub fn node(&self, reference: &str) -> Option<&WorkflowNode> {
        self.nodes
            .iter()
            .find(|n| n.name == reference || n.id.as_deref() == Some(reference))
    }
}

impl Payload for Workflow {
    const SERVER_ASSIGNED: &'static [&'static str] =
        &["id", "active", "tags", "createdAt", "updatedAt"];
}
