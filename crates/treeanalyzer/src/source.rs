use async_trait::async_trait;
use std::path::{Path, PathBuf};
use treecore::{ExecutionRecord, Result, Snapshot, SourceError, SubscriptionRecord};

/// Supplier of already materialized runtime records
///
/// The builder never talks to a source; the analyzer fetches all three
/// record sets up front and hands them over as plain slices.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Executions without a parent
    async fn root_executions(&self) -> Result<Vec<ExecutionRecord>>;
    
    /// Executions with a parent
    async fn child_executions(&self) -> Result<Vec<ExecutionRecord>>;
    
    async fn event_subscriptions(&self) -> Result<Vec<SubscriptionRecord>>;
    
    /// Human readable description used in logs
    fn describe(&self) -> String;
}

/// Source backed by a snapshot held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    snapshot: Snapshot,
}

impl InMemorySource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }
    
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

#[async_trait]
impl RecordSource for InMemorySource {
    async fn root_executions(&self) -> Result<Vec<ExecutionRecord>> {
        Ok(self.snapshot.split_executions().0)
    }
    
    async fn child_executions(&self) -> Result<Vec<ExecutionRecord>> {
        Ok(self.snapshot.split_executions().1)
    }
    
    async fn event_subscriptions(&self) -> Result<Vec<SubscriptionRecord>> {
        Ok(self.snapshot.subscriptions.clone())
    }
    
    fn describe(&self) -> String {
        format!(
            "in-memory snapshot ({} executions, {} subscriptions)",
            self.snapshot.executions.len(),
            self.snapshot.subscriptions.len()
        )
    }
}

/// Source reading a JSON snapshot file once at open time
#[derive(Debug, Clone)]
pub struct JsonSnapshotSource {
    path: PathBuf,
    inner: InMemorySource,
}

impl JsonSnapshotSource {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let shown = path.display().to_string();
        
        let contents = tokio::fs::read_to_string(&path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                SourceError::NotFound(shown.clone())
            } else {
                SourceError::Read {
                    path: shown.clone(),
                    source,
                }
            }
        })?;
        
        let snapshot: Snapshot = serde_json::from_str(&contents).map_err(|source| {
            SourceError::Parse {
                path: shown.clone(),
                source,
            }
        })?;
        
        tracing::info!(
            "Loaded snapshot {} ({} executions, {} subscriptions)",
            shown,
            snapshot.executions.len(),
            snapshot.subscriptions.len()
        );
        
        Ok(Self {
            path,
            inner: InMemorySource::new(snapshot),
        })
    }
    
    pub fn path(&self) -> &Path {
        &self.path
    }
    
    pub fn snapshot(&self) -> &Snapshot {
        self.inner.snapshot()
    }
}

#[async_trait]
impl RecordSource for JsonSnapshotSource {
    async fn root_executions(&self) -> Result<Vec<ExecutionRecord>> {
        self.inner.root_executions().await
    }
    
    async fn child_executions(&self) -> Result<Vec<ExecutionRecord>> {
        self.inner.child_executions().await
    }
    
    async fn event_subscriptions(&self) -> Result<Vec<SubscriptionRecord>> {
        self.inner.event_subscriptions().await
    }
    
    fn describe(&self) -> String {
        format!("snapshot file {}", self.path.display())
    }
}
