use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),
    
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Structural faults found while assembling a forest
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Unresolved reference: {edge} edge from '{from}' targets unknown execution '{target}'")]
    UnresolvedReference {
        edge: EdgeKind,
        from: String,
        target: String,
    },
    
    #[error("Duplicate {namespace} identifier: {id}")]
    DuplicateIdentifier {
        namespace: Namespace,
        id: String,
    },
    
    #[error("Child execution '{0}' has no parent reference")]
    MissingParentReference(String),
}

impl TreeError {
    /// The identifier the error is about
    pub fn identifier(&self) -> &str {
        match self {
            TreeError::UnresolvedReference { target, .. } => target,
            TreeError::DuplicateIdentifier { id, .. } => id,
            TreeError::MissingParentReference(id) => id,
        }
    }
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Snapshot not found: {0}")]
    NotFound(String),
    
    #[error("Failed to read snapshot '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    
    #[error("Failed to parse snapshot '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Identifier namespace; ids only need to be unique within one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    Execution,
    Subscription,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Execution => write!(f, "execution"),
            Namespace::Subscription => write!(f, "subscription"),
        }
    }
}

/// Category of a forest edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Child execution to parent execution
    Child,
    /// Event subscription to owning execution
    Subscription,
}

impl EdgeKind {
    /// Prefix prepended to the source id to form the edge label
    pub fn prefix(&self) -> &'static str {
        match self {
            EdgeKind::Child => "c",
            EdgeKind::Subscription => "s",
        }
    }
    
    pub fn label_for(&self, source_id: &str) -> String {
        format!("{}{}", self.prefix(), source_id)
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Child => write!(f, "child"),
            EdgeKind::Subscription => write!(f, "subscription"),
        }
    }
}
