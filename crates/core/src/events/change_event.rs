//! Change event type and channel grammar.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which kind of record a change event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Account,
    Flow,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Account => write!(f, "account"),
            ResourceKind::Flow => write!(f, "flow"),
        }
    }
}

/// What happened to the record. Creates and updates share one kind; a
/// subscriber re-reads either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Save,
    Delete,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Save => write!(f, "save"),
            ChangeKind::Delete => write!(f, "delete"),
        }
    }
}

/// A change to one account or flow, published to the owning user's channel
/// after the mutation and its cache invalidation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub owner_id: String,
    pub resource: ResourceKind,
    pub kind: ChangeKind,
    pub resource_id: String,
}

impl ChangeEvent {
    pub fn account_saved(owner_id: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            resource: ResourceKind::Account,
            kind: ChangeKind::Save,
            resource_id: account_id.into(),
        }
    }

    pub fn account_deleted(owner_id: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            resource: ResourceKind::Account,
            kind: ChangeKind::Delete,
            resource_id: account_id.into(),
        }
    }

    pub fn flow_saved(owner_id: impl Into<String>, flow_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            resource: ResourceKind::Flow,
            kind: ChangeKind::Save,
            resource_id: flow_id.into(),
        }
    }

    pub fn flow_deleted(owner_id: impl Into<String>, flow_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            resource: ResourceKind::Flow,
            kind: ChangeKind::Delete,
            resource_id: flow_id.into(),
        }
    }

    /// Channel the event is published on: `<ownerId>:<resourceType>:<eventType>`.
    pub fn channel(&self) -> String {
        format!("{}:{}:{}", self.owner_id, self.resource, self.kind)
    }
}
