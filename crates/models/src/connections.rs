//! Connection graph validation — run this before sending a workflow.
//!
//! Rules enforced:
//! 1. Node IDs and node names must be unique within the workflow.
//! 2. Every connection must reference existing nodes on both ends.
//!
//! A reference resolves against either a node's name (what the editor
//! writes) or its ID. Cycles are allowed; the remote engine supports loops.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{workflow::Workflow, ModelError};

/// Source node → output kind (`"main"`, `"ai_tool"`, …) → output index → targets.
pub type Connections = BTreeMap<String, NodeConnections>;

pub type NodeConnections = BTreeMap<String, Vec<Vec<ConnectionTarget>>>;

/// One edge endpoint: which node, which input kind, which input index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionTarget {
    pub node: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub index: u32,
}

impl ConnectionTarget {
    pub fn main(node: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            kind: "main".to_string(),
            index: 0,
        }
    }
}

/// Validate the workflow's connection graph.
///
/// # Errors
/// - [`ModelError::DuplicateNodeId`] if two nodes share an ID.
/// - [`ModelError::DuplicateNodeName`] if two nodes share a name.
/// - [`ModelError::UnknownNodeReference`] if a connection references a missing node.
pub fn validate_connections(workflow: &Workflow) -> Result<(), ModelError> {
    // -----------------------------------------------------------------------
    // 1. Ensure node IDs and names are unique
    // -----------------------------------------------------------------------
    let mut seen_ids: HashSet<&str> = HashSet::new();
    let mut seen_names: HashSet<&str> = HashSet::new();
    for node in &workflow.nodes {
        if let Some(id) = node.id.as_deref() {
            if !seen_ids.insert(id) {
                return Err(ModelError::DuplicateNodeId(id.to_owned()));
            }
        }
        if !seen_names.insert(node.name.as_str()) {
            return Err(ModelError::DuplicateNodeName(node.name.clone()));
        }
    }

    let known = |reference: &str| seen_names.contains(reference) || seen_ids.contains(reference);

    // -----------------------------------------------------------------------
    // 2. Validate both ends of every connection
    // -----------------------------------------------------------------------
    for (source, outputs) in &workflow.connections {
        if !known(source) {
            return Err(ModelError::UnknownNodeReference {
                node: source.clone(),
                side: "source",
            });
        }
        let targets = outputs.values().flatten().flatten();
        for target in targets {
            if !known(&target.node) {
                return Err(ModelError::UnknownNodeReference {
                    node: target.node.clone(),
                    side: "target",
                });
            }
        }
    }

    Ok(())
}
