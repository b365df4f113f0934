use crate::{ExecutionRecord, SubscriptionRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An execution as it appears in the forest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionNode {
    pub id: String,
    pub parent_id: Option<String>,
    pub process_instance_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_instance_id: Option<String>,
    pub active: bool,
    pub concurrent: bool,
    pub scope: bool,
}

impl From<&ExecutionRecord> for ExecutionNode {
    fn from(record: &ExecutionRecord) -> Self {
        Self {
            id: record.id.clone(),
            parent_id: record.parent_id.clone(),
            process_instance_id: record.process_instance_id.clone(),
            activity_instance_id: record.activity_instance_id.clone(),
            active: record.is_active,
            concurrent: record.is_concurrent,
            scope: record.is_scope,
        }
    }
}

/// An event subscription attached to an execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionNode {
    pub id: String,
    pub execution_id: String,
    pub event_type: String,
    pub event_name: String,
}

impl From<&SubscriptionRecord> for SubscriptionNode {
    fn from(record: &SubscriptionRecord) -> Self {
        Self {
            id: record.id.clone(),
            execution_id: record.execution_id.clone(),
            event_type: record.event_type.clone(),
            event_name: record.event_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexKind {
    Execution,
    Subscription,
}

/// A vertex of the forest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeVertex {
    Execution(ExecutionNode),
    Subscription(SubscriptionNode),
}

impl TreeVertex {
    pub fn id(&self) -> &str {
        match self {
            TreeVertex::Execution(e) => &e.id,
            TreeVertex::Subscription(s) => &s.id,
        }
    }
    
    pub fn kind(&self) -> VertexKind {
        match self {
            TreeVertex::Execution(_) => VertexKind::Execution,
            TreeVertex::Subscription(_) => VertexKind::Subscription,
        }
    }
    
    /// Display label, "EX <id>" or "ES <id>"
    pub fn label(&self) -> String {
        match self {
            TreeVertex::Execution(e) => format!("EX {}", e.id),
            TreeVertex::Subscription(s) => format!("ES {}", s.id),
        }
    }
    
    pub fn as_execution(&self) -> Option<&ExecutionNode> {
        match self {
            TreeVertex::Execution(e) => Some(e),
            _ => None,
        }
    }
    
    pub fn as_subscription(&self) -> Option<&SubscriptionNode> {
        match self {
            TreeVertex::Subscription(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for TreeVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
