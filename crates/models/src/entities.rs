//! Credentials, executions, tags, variables, projects, users, audit and
//! source-control models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::payload::Payload;
use crate::serde_ext;

// ---------------------------------------------------------------------------
// credentials
// ---------------------------------------------------------------------------

/// A stored credential. `data` is type-specific and write-only on the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_ext::opt_id"
    )]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub credential_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Credential {
    pub fn new(name: impl Into<String>, credential_type: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            credential_type: credential_type.into(),
            data: Some(data),
            ..Default::default()
        }
    }
}

impl Payload for Credential {}

/// Body of the transfer endpoints for workflows and credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub destination_project_id: String,
}

// ---------------------------------------------------------------------------
// executions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Canceled,
    Crashed,
    Error,
    New,
    Running,
    Success,
    Unknown,
    Waiting,
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Canceled => write!(f, "canceled"),
            Self::Crashed  => write!(f, "crashed"),
            Self::Error    => write!(f, "error"),
            Self::New      => write!(f, "new"),
            Self::Running  => write!(f, "running"),
            Self::Success  => write!(f, "success"),
            Self::Unknown  => write!(f, "unknown"),
            Self::Waiting  => write!(f, "waiting"),
        }
    }
}

impl FromStr for ExecutionStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "canceled" => Ok(Self::Canceled),
            "crashed"  => Ok(Self::Crashed),
            "error"    => Ok(Self::Error),
            "new"      => Ok(Self::New),
            "running"  => Ok(Self::Running),
            "success"  => Ok(Self::Success),
            "unknown"  => Ok(Self::Unknown),
            "waiting"  => Ok(Self::Waiting),
            other      => Err(format!("unknown execution status: {other}")),
        }
    }
}

/// A single run of a workflow on the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    #[serde(deserialize_with = "serde_ext::id")]
    pub id: String,
    pub finished: bool,
    /// How the run was started (`manual`, `trigger`, `webhook`, …).
    pub mode: String,
    #[serde(default, deserialize_with = "serde_ext::opt_id")]
    pub retry_of: Option<String>,
    #[serde(default, deserialize_with = "serde_ext::opt_id")]
    pub retry_success_id: Option<String>,
    #[serde(default)]
    pub status: Option<ExecutionStatus>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stopped_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "serde_ext::id")]
    pub workflow_id: String,
    /// Set when the run is parked until a delayed resume.
    #[serde(default)]
    pub wait_till: Option<DateTime<Utc>>,
    /// Only present when requested with `includeData`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

// ---------------------------------------------------------------------------
// tags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_ext::opt_id"
    )]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Payload for Tag {}

/// Element of the body sent to `PUT /workflows/{id}/tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagId {
    pub id: String,
}

// ---------------------------------------------------------------------------
// variables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_ext::opt_id"
    )]
    pub id: Option<String>,
    pub key: String,
    pub value: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub variable_type: Option<String>,
}

impl Variable {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ..Default::default()
        }
    }
}

impl Payload for Variable {
    const SERVER_ASSIGNED: &'static [&'static str] = &["id", "type"];
}

// ---------------------------------------------------------------------------
// projects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_ext::opt_id"
    )]
    pub id: Option<String>,
    pub name: String,
    /// `personal` or `team`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Payload for Project {
    const SERVER_ASSIGNED: &'static [&'static str] = &["id", "type"];
}

// ---------------------------------------------------------------------------
// users
// ---------------------------------------------------------------------------

/// Instance-wide role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlobalRole {
    #[serde(rename = "global:owner")]
    Owner,
    #[serde(rename = "global:admin")]
    Admin,
    #[serde(rename = "global:member")]
    Member,
}

impl fmt::Display for GlobalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner  => write!(f, "global:owner"),
            Self::Admin  => write!(f, "global:admin"),
            Self::Member => write!(f, "global:member"),
        }
    }
}

impl FromStr for GlobalRole {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global:owner" | "owner"   => Ok(Self::Owner),
            "global:admin" | "admin"   => Ok(Self::Admin),
            "global:member" | "member" => Ok(Self::Member),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_ext::opt_id"
    )]
    pub id: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_pending: Option<bool>,
    /// Only returned when listing with `includeRole`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One entry of a bulk user invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<GlobalRole>,
}

/// Per-user outcome of a bulk invitation; `error` is set when that user failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUser {
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// audit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Credentials,
    Database,
    Nodes,
    Filesystem,
    Instance,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditOptions {
    /// Days without execution after which a workflow counts as abandoned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_abandoned_workflow: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<RiskCategory>>,
}

/// Security audit result. Each sub-report is opaque.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    #[serde(default, alias = "Credentials Risk Report", skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Map<String, Value>>,
    #[serde(default, alias = "Database Risk Report", skip_serializing_if = "Option::is_none")]
    pub database: Option<Map<String, Value>>,
    #[serde(default, alias = "Filesystem Risk Report", skip_serializing_if = "Option::is_none")]
    pub filesystem: Option<Map<String, Value>>,
    #[serde(default, alias = "Nodes Risk Report", skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Map<String, Value>>,
    #[serde(default, alias = "Instance Risk Report", skip_serializing_if = "Option::is_none")]
    pub instance: Option<Map<String, Value>>,
}

// ---------------------------------------------------------------------------
// source control
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
    /// Values that override variables in the pulled changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Map<String, Value>>,
}

/// What a pull imported; each section is opaque.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflows: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn execution_accepts_numeric_ids() {
        let exec: Execution = serde_json::from_value(json!({
            "id": 1000,
            "finished": true,
            "mode": "manual",
            "retryOf": null,
            "retrySuccessId": "2",
            "startedAt": "2024-05-01T10:00:00.000Z",
            "stoppedAt": "2024-05-01T10:00:02.000Z",
            "workflowId": 1000,
            "waitTill": null,
            "status": "success"
        }))
        .unwrap();

        assert_eq!(exec.id, "1000");
        assert_eq!(exec.workflow_id, "1000");
        assert_eq!(exec.retry_of, None);
        assert_eq!(exec.retry_success_id.as_deref(), Some("2"));
        assert_eq!(exec.status, Some(ExecutionStatus::Success));
        assert!(exec.wait_till.is_none());
    }

    #[test]
    fn audit_report_accepts_platform_keys() {
        let report: AuditReport = serde_json::from_value(json!({
            "Credentials Risk Report": { "risk": "credentials", "sections": [] },
            "instance": { "risk": "instance" }
        }))
        .unwrap();

        assert_eq!(report.credentials.unwrap()["risk"], "credentials");
        assert!(report.instance.is_some());
        assert!(report.database.is_none());
    }

    #[test]
    fn roles_round_trip_through_strings() {
        assert_eq!("admin".parse::<GlobalRole>().unwrap(), GlobalRole::Admin);
        assert_eq!(GlobalRole::Member.to_string(), "global:member");
        assert_eq!(serde_json::to_value(GlobalRole::Owner).unwrap(), json!("global:owner"));
        assert!("superuser".parse::<GlobalRole>().is_err());
    }

    #[test]
    fn audit_options_omit_unset() {
        let opts = AuditOptions {
            categories: Some(vec![RiskCategory::Credentials, RiskCategory::Nodes]),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(opts).unwrap(),
            json!({ "categories": ["credentials", "nodes"] })
        );
    }
}
