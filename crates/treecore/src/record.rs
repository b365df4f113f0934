use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the runtime execution table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    #[serde(alias = "ID_")]
    pub id: String,
    #[serde(default, alias = "PARENT_ID_")]
    pub parent_id: Option<String>,
    #[serde(default, alias = "PROC_INST_ID_")]
    pub process_instance_id: String,
    #[serde(default, alias = "ACT_INST_ID_")]
    pub activity_instance_id: Option<String>,
    #[serde(default, alias = "IS_ACTIVE_")]
    pub is_active: bool,
    #[serde(default, alias = "IS_CONCURRENT_")]
    pub is_concurrent: bool,
    #[serde(default, alias = "IS_SCOPE_")]
    pub is_scope: bool,
}

impl ExecutionRecord {
    /// A record without a parent reference
    pub fn root(id: impl Into<String>, process_instance_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            process_instance_id: process_instance_id.into(),
            activity_instance_id: None,
            is_active: false,
            is_concurrent: false,
            is_scope: false,
        }
    }
    
    pub fn child(
        id: impl Into<String>,
        parent_id: impl Into<String>,
        process_instance_id: impl Into<String>,
    ) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            ..Self::root(id, process_instance_id)
        }
    }
    
    pub fn with_activity_instance(mut self, activity_instance_id: impl Into<String>) -> Self {
        self.activity_instance_id = Some(activity_instance_id.into());
        self
    }
    
    pub fn with_flags(mut self, active: bool, concurrent: bool, scope: bool) -> Self {
        self.is_active = active;
        self.is_concurrent = concurrent;
        self.is_scope = scope;
        self
    }
    
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// One row of the runtime event subscription table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    #[serde(alias = "ID_")]
    pub id: String,
    #[serde(alias = "EXECUTION_ID_")]
    pub execution_id: String,
    #[serde(default, alias = "EVENT_TYPE_")]
    pub event_type: String,
    #[serde(default, alias = "EVENT_NAME_")]
    pub event_name: String,
}

impl SubscriptionRecord {
    pub fn new(
        id: impl Into<String>,
        execution_id: impl Into<String>,
        event_type: impl Into<String>,
        event_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            execution_id: execution_id.into(),
            event_type: event_type.into(),
            event_name: event_name.into(),
        }
    }
}

/// A point-in-time dump of the runtime tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub captured_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub executions: Vec<ExecutionRecord>,
    #[serde(default)]
    pub subscriptions: Vec<SubscriptionRecord>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }
    
    pub fn with_execution(mut self, record: ExecutionRecord) -> Self {
        self.executions.push(record);
        self
    }
    
    pub fn with_subscription(mut self, record: SubscriptionRecord) -> Self {
        self.subscriptions.push(record);
        self
    }
    
    /// Partition executions into (roots, children), keeping input order
    pub fn split_executions(&self) -> (Vec<ExecutionRecord>, Vec<ExecutionRecord>) {
        self.executions.iter().cloned().partition(ExecutionRecord::is_root)
    }
}
