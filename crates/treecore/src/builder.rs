use crate::{
    EdgeKind, ExecutionNode, ExecutionRecord, Forest, SubscriptionNode, SubscriptionRecord,
    TreeError,
};

/// Reassembles flat execution and subscription records into a `Forest`
///
/// Building is always two-pass: every execution is registered before any
/// edge is wired, so the order of `children` does not matter. Identifiers
/// that still resolve to nothing after registration abort the build.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeBuilder;

impl TreeBuilder {
    pub fn new() -> Self {
        Self
    }
    
    pub fn build(
        &self,
        roots: &[ExecutionRecord],
        children: &[ExecutionRecord],
        subscriptions: &[SubscriptionRecord],
    ) -> Result<Forest, TreeError> {
        let mut forest = Forest::new();
        
        // Register all executions
        for root in roots {
            tracing::debug!("Root execution {}", root.id);
            forest.insert_execution(ExecutionNode::from(root), true)?;
        }
        let mut child_indices = Vec::with_capacity(children.len());
        for child in children {
            tracing::debug!("Child execution {} of {:?}", child.id, child.parent_id);
            let idx = forest.insert_execution(ExecutionNode::from(child), false)?;
            child_indices.push(idx);
        }
        
        // Wire child -> parent
        for (child, idx) in children.iter().zip(child_indices) {
            let parent_id = child
                .parent_id
                .as_deref()
                .ok_or_else(|| TreeError::MissingParentReference(child.id.clone()))?;
            let parent = forest.execution_index(parent_id).ok_or_else(|| {
                TreeError::UnresolvedReference {
                    edge: EdgeKind::Child,
                    from: child.id.clone(),
                    target: parent_id.to_string(),
                }
            })?;
            forest.link(idx, parent, EdgeKind::Child);
        }
        
        // Attach subscriptions to their owners
        for subscription in subscriptions {
            tracing::debug!(
                "Subscription {} on execution {}",
                subscription.id,
                subscription.execution_id
            );
            let owner = forest
                .execution_index(&subscription.execution_id)
                .ok_or_else(|| TreeError::UnresolvedReference {
                    edge: EdgeKind::Subscription,
                    from: subscription.id.clone(),
                    target: subscription.execution_id.clone(),
                })?;
            let idx = forest.insert_subscription(SubscriptionNode::from(subscription))?;
            forest.link(idx, owner, EdgeKind::Subscription);
        }
        
        tracing::debug!(
            "Built forest with {} vertices and {} edges",
            forest.vertex_count(),
            forest.edge_count()
        );
        
        Ok(forest)
    }
}
