//! Core abstractions for the execution tree analyzer
//! 
//! This crate provides the record types, the vertex model, the `Forest`
//! and the `TreeBuilder` that reassembles flat execution and subscription
//! records into a rooted forest. It performs no I/O.

mod builder;
mod error;
mod forest;
mod node;
mod record;

pub use builder::TreeBuilder;
pub use error::{AnalyzerError, EdgeKind, Namespace, SourceError, TreeError};
pub use forest::{Forest, ForestEdge, ForestView, EdgeView, VertexView};
pub use node::{ExecutionNode, SubscriptionNode, TreeVertex, VertexKind};
pub use record::{ExecutionRecord, Snapshot, SubscriptionRecord};

/// Result type for analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;
