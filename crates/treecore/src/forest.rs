use crate::{
    EdgeKind, ExecutionNode, Namespace, SubscriptionNode, TreeError, TreeVertex, VertexKind,
};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Weight of a forest edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForestEdge {
    pub label: String,
    pub kind: EdgeKind,
}

/// Reconstructed execution forest
///
/// Edges point from a child execution to its parent, and from a
/// subscription to the execution that owns it. Vertices and edges are kept
/// in insertion order. Only `TreeBuilder` can populate a forest.
#[derive(Debug, Default)]
pub struct Forest {
    graph: StableDiGraph<TreeVertex, ForestEdge>,
    executions: HashMap<String, NodeIndex>,
    subscriptions: HashMap<String, NodeIndex>,
    roots: Vec<NodeIndex>,
}

impl Forest {
    pub(crate) fn new() -> Self {
        Self::default()
    }
    
    pub(crate) fn insert_execution(
        &mut self,
        node: ExecutionNode,
        root: bool,
    ) -> Result<NodeIndex, TreeError> {
        if self.executions.contains_key(&node.id) {
            return Err(TreeError::DuplicateIdentifier {
                namespace: Namespace::Execution,
                id: node.id,
            });
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(TreeVertex::Execution(node));
        self.executions.insert(id, idx);
        if root {
            self.roots.push(idx);
        }
        Ok(idx)
    }
    
    pub(crate) fn insert_subscription(
        &mut self,
        node: SubscriptionNode,
    ) -> Result<NodeIndex, TreeError> {
        if self.subscriptions.contains_key(&node.id) {
            return Err(TreeError::DuplicateIdentifier {
                namespace: Namespace::Subscription,
                id: node.id,
            });
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(TreeVertex::Subscription(node));
        self.subscriptions.insert(id, idx);
        Ok(idx)
    }
    
    pub(crate) fn execution_index(&self, id: &str) -> Option<NodeIndex> {
        self.executions.get(id).copied()
    }
    
    pub(crate) fn link(&mut self, from: NodeIndex, to: NodeIndex, kind: EdgeKind) {
        let label = kind.label_for(self.graph[from].id());
        self.graph.add_edge(from, to, ForestEdge { label, kind });
    }
    
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }
    
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
    
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
    
    /// All vertices in insertion order
    pub fn vertices(&self) -> impl Iterator<Item = &TreeVertex> + '_ {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }
    
    /// All edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = EdgeView> + '_ {
        self.graph.edge_references().map(move |edge| EdgeView {
            label: edge.weight().label.clone(),
            kind: edge.weight().kind,
            source: self.graph[edge.source()].id().to_string(),
            target: self.graph[edge.target()].id().to_string(),
        })
    }
    
    pub fn roots(&self) -> impl Iterator<Item = &ExecutionNode> + '_ {
        self.roots
            .iter()
            .filter_map(move |idx| self.graph[*idx].as_execution())
    }
    
    pub fn execution(&self, id: &str) -> Option<&ExecutionNode> {
        self.executions
            .get(id)
            .and_then(|idx| self.graph[*idx].as_execution())
    }
    
    pub fn subscription(&self, id: &str) -> Option<&SubscriptionNode> {
        self.subscriptions
            .get(id)
            .and_then(|idx| self.graph[*idx].as_subscription())
    }
    
    /// Parent of an execution, `None` for roots and unknown ids
    pub fn parent_of(&self, id: &str) -> Option<&ExecutionNode> {
        let idx = self.execution_index(id)?;
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .find(|edge| edge.weight().kind == EdgeKind::Child)
            .and_then(|edge| self.graph[edge.target()].as_execution())
    }
    
    /// Direct child executions, in insertion order
    pub fn children_of(&self, id: &str) -> Vec<&ExecutionNode> {
        self.incoming(id, EdgeKind::Child)
            .into_iter()
            .filter_map(|idx| self.graph[idx].as_execution())
            .collect()
    }
    
    /// Subscriptions owned by an execution, in insertion order
    pub fn subscriptions_of(&self, id: &str) -> Vec<&SubscriptionNode> {
        self.incoming(id, EdgeKind::Subscription)
            .into_iter()
            .filter_map(|idx| self.graph[idx].as_subscription())
            .collect()
    }
    
    /// Number of execution levels below and including the deepest root
    pub fn depth(&self) -> usize {
        let mut stack: Vec<(NodeIndex, usize)> = self.roots.iter().map(|idx| (*idx, 1)).collect();
        let mut deepest = 0;
        while let Some((idx, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(
                self.incoming_at(idx, EdgeKind::Child)
                    .into_iter()
                    .map(|child| (child, level + 1)),
            );
        }
        deepest
    }
    
    /// Executions not reachable from any root, which only happens for cyclic input
    pub fn unreachable_executions(&self) -> Vec<&ExecutionNode> {
        let mut reached: HashSet<NodeIndex> = HashSet::new();
        let mut stack = self.roots.clone();
        while let Some(idx) = stack.pop() {
            if reached.insert(idx) {
                stack.extend(self.incoming_at(idx, EdgeKind::Child));
            }
        }
        self.graph
            .node_indices()
            .filter(|idx| !reached.contains(idx))
            .filter_map(|idx| self.graph[idx].as_execution())
            .collect()
    }
    
    pub fn has_edge_label(&self, label: &str) -> bool {
        self.graph
            .edge_references()
            .any(|edge| edge.weight().label == label)
    }
    
    fn incoming(&self, id: &str, kind: EdgeKind) -> Vec<NodeIndex> {
        match self.execution_index(id) {
            Some(idx) => self.incoming_at(idx, kind),
            None => Vec::new(),
        }
    }
    
    // StableGraph walks adjacency newest-first, so sort back to insertion order
    fn incoming_at(&self, idx: NodeIndex, kind: EdgeKind) -> Vec<NodeIndex> {
        let mut sources: Vec<NodeIndex> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .filter(|edge| edge.weight().kind == kind)
            .map(|edge| edge.source())
            .collect();
        sources.sort();
        sources
    }
    
    /// Serializable snapshot of the forest for external renderers
    pub fn to_view(&self) -> ForestView {
        ForestView {
            roots: self.roots().map(|root| root.id.clone()).collect(),
            vertices: self.vertices().map(VertexView::from).collect(),
            edges: self.edges().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestView {
    pub roots: Vec<String>,
    pub vertices: Vec<VertexView>,
    pub edges: Vec<EdgeView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexView {
    pub id: String,
    pub label: String,
    pub kind: VertexKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution: Option<ExecutionNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<SubscriptionNode>,
}

impl From<&TreeVertex> for VertexView {
    fn from(vertex: &TreeVertex) -> Self {
        Self {
            id: vertex.id().to_string(),
            label: vertex.label(),
            kind: vertex.kind(),
            execution: vertex.as_execution().cloned(),
            subscription: vertex.as_subscription().cloned(),
        }
    }
}

/// A directed, labelled edge between two vertex ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeView {
    pub label: String,
    pub kind: EdgeKind,
    pub source: String,
    pub target: String,
}
