// crates/treecore/tests/builder_test.rs

use std::collections::HashSet;
use treecore::{
    EdgeKind, ExecutionRecord, Namespace, SubscriptionRecord, TreeBuilder, TreeError,
};

/// Initialize tracing for tests
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("debug"))
        )
        .with_test_writer()
        .try_init();
}

fn sample() -> (Vec<ExecutionRecord>, Vec<ExecutionRecord>, Vec<SubscriptionRecord>) {
    let roots = vec![ExecutionRecord::root("1", "pi-1")];
    let children = vec![
        ExecutionRecord::child("2", "1", "pi-1"),
        ExecutionRecord::child("3", "2", "pi-1"),
    ];
    let subscriptions = vec![SubscriptionRecord::new("s1", "3", "message", "order-received")];
    (roots, children, subscriptions)
}

#[test]
fn test_builds_documented_example() {
    init_tracing();
    let (roots, children, subscriptions) = sample();
    
    let forest = TreeBuilder::new()
        .build(&roots, &children, &subscriptions)
        .expect("build should succeed");
    
    let labels: Vec<String> = forest.vertices().map(|v| v.label()).collect();
    assert_eq!(labels, vec!["EX 1", "EX 2", "EX 3", "ES s1"]);
    
    let edges: Vec<(String, String, String)> = forest
        .edges()
        .map(|e| (e.label, e.source, e.target))
        .collect();
    assert_eq!(
        edges,
        vec![
            ("c2".to_string(), "2".to_string(), "1".to_string()),
            ("c3".to_string(), "3".to_string(), "2".to_string()),
            ("ss1".to_string(), "s1".to_string(), "3".to_string()),
        ]
    );
    
    let root_ids: Vec<&str> = forest.roots().map(|r| r.id.as_str()).collect();
    assert_eq!(root_ids, vec!["1"]);
    assert!(forest.children_of("3").is_empty());
    let subs: Vec<&str> = forest.subscriptions_of("3").iter().map(|s| s.id.as_str()).collect();
    assert_eq!(subs, vec!["s1"]);
    assert_eq!(forest.depth(), 3);
}

#[test]
fn test_counts_match_inputs() {
    let roots = vec![
        ExecutionRecord::root("a", "pi-a"),
        ExecutionRecord::root("b", "pi-b"),
    ];
    let children = vec![
        ExecutionRecord::child("a1", "a", "pi-a"),
        ExecutionRecord::child("a2", "a", "pi-a"),
        ExecutionRecord::child("b1", "b", "pi-b"),
    ];
    let subscriptions = vec![
        SubscriptionRecord::new("x", "a1", "signal", "alarm"),
        SubscriptionRecord::new("y", "a1", "message", "ping"),
        SubscriptionRecord::new("z", "b", "compensate", ""),
    ];
    
    let forest = TreeBuilder::new().build(&roots, &children, &subscriptions).unwrap();
    
    assert_eq!(forest.vertex_count(), roots.len() + children.len() + subscriptions.len());
    assert_eq!(forest.edge_count(), children.len() + subscriptions.len());
    
    let labels: HashSet<String> = forest.edges().map(|e| e.label).collect();
    assert_eq!(labels.len(), forest.edge_count());
}

#[test]
fn test_child_order_does_not_matter() {
    let roots = vec![ExecutionRecord::root("1", "pi")];
    // grandchild listed before its parent
    let children = vec![
        ExecutionRecord::child("3", "2", "pi"),
        ExecutionRecord::child("2", "1", "pi"),
    ];
    
    let forest = TreeBuilder::new().build(&roots, &children, &[]).unwrap();
    
    assert_eq!(forest.parent_of("3").map(|p| p.id.as_str()), Some("2"));
    assert_eq!(forest.parent_of("2").map(|p| p.id.as_str()), Some("1"));
    assert!(forest.parent_of("1").is_none());
}

#[test]
fn test_every_edge_points_at_declared_parent() {
    let (roots, children, subscriptions) = sample();
    let forest = TreeBuilder::new().build(&roots, &children, &subscriptions).unwrap();
    
    for child in &children {
        let outgoing: Vec<_> = forest.edges().filter(|e| e.source == child.id).collect();
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].kind, EdgeKind::Child);
        assert_eq!(Some(&outgoing[0].target), child.parent_id.as_ref());
    }
    for root in &roots {
        assert!(forest.edges().all(|e| e.source != root.id));
    }
    for subscription in &subscriptions {
        let outgoing: Vec<_> = forest
            .edges()
            .filter(|e| e.kind == EdgeKind::Subscription && e.source == subscription.id)
            .collect();
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].target, subscription.execution_id);
    }
}

#[test]
fn test_unresolved_parent_aborts() {
    let children = vec![ExecutionRecord::child("2", "99", "pi")];
    
    let err = TreeBuilder::new().build(&[], &children, &[]).unwrap_err();
    
    assert_eq!(
        err,
        TreeError::UnresolvedReference {
            edge: EdgeKind::Child,
            from: "2".to_string(),
            target: "99".to_string(),
        }
    );
    assert_eq!(err.identifier(), "99");
}

#[test]
fn test_unresolved_subscription_owner_aborts() {
    let roots = vec![ExecutionRecord::root("1", "pi")];
    let subscriptions = vec![SubscriptionRecord::new("s1", "missing", "message", "m")];
    
    let err = TreeBuilder::new().build(&roots, &[], &subscriptions).unwrap_err();
    
    assert!(matches!(
        err,
        TreeError::UnresolvedReference { edge: EdgeKind::Subscription, ref target, .. }
            if target == "missing"
    ));
}

#[test]
fn test_duplicate_execution_rejected() {
    let roots = vec![ExecutionRecord::root("1", "pi")];
    let children = vec![ExecutionRecord::child("1", "1", "pi")];
    
    let err = TreeBuilder::new().build(&roots, &children, &[]).unwrap_err();
    
    assert_eq!(
        err,
        TreeError::DuplicateIdentifier {
            namespace: Namespace::Execution,
            id: "1".to_string(),
        }
    );
}

#[test]
fn test_duplicate_subscription_rejected() {
    let roots = vec![ExecutionRecord::root("1", "pi")];
    let subscriptions = vec![
        SubscriptionRecord::new("s", "1", "message", "a"),
        SubscriptionRecord::new("s", "1", "message", "b"),
    ];
    
    let err = TreeBuilder::new().build(&roots, &[], &subscriptions).unwrap_err();
    
    assert_eq!(
        err,
        TreeError::DuplicateIdentifier {
            namespace: Namespace::Subscription,
            id: "s".to_string(),
        }
    );
}

#[test]
fn test_shared_id_across_namespaces_is_allowed() {
    let roots = vec![ExecutionRecord::root("7", "pi")];
    let subscriptions = vec![SubscriptionRecord::new("7", "7", "timer", "")];
    
    let forest = TreeBuilder::new().build(&roots, &[], &subscriptions).unwrap();
    
    assert!(forest.has_edge_label("s7"));
    assert!(!forest.has_edge_label("c7"));
    assert_eq!(forest.vertex_count(), 2);
}

#[test]
fn test_child_without_parent_reference() {
    let children = vec![ExecutionRecord::root("orphan", "pi")];
    
    let err = TreeBuilder::new().build(&[], &children, &[]).unwrap_err();
    
    assert_eq!(err, TreeError::MissingParentReference("orphan".to_string()));
}

#[test]
fn test_build_is_repeatable() {
    let (roots, children, subscriptions) = sample();
    let builder = TreeBuilder::new();
    
    let first = builder.build(&roots, &children, &subscriptions).unwrap();
    let second = builder.build(&roots, &children, &subscriptions).unwrap();
    
    assert_eq!(first.to_view(), second.to_view());
}

#[test]
fn test_empty_input_builds_empty_forest() {
    let forest = TreeBuilder::new().build(&[], &[], &[]).unwrap();
    
    assert!(forest.is_empty());
    assert_eq!(forest.edge_count(), 0);
    assert_eq!(forest.depth(), 0);
}

#[test]
fn test_deep_chain_depth() {
    let n = 100_000;
    let roots = vec![ExecutionRecord::root("0", "pi")];
    let children: Vec<ExecutionRecord> = (1..n)
        .map(|i| ExecutionRecord::child(i.to_string(), (i - 1).to_string(), "pi"))
        .collect();
    
    let forest = TreeBuilder::new().build(&roots, &children, &[]).unwrap();
    
    assert_eq!(forest.vertex_count(), n);
    assert_eq!(forest.depth(), n);
    assert!(forest.unreachable_executions().is_empty());
}

#[test]
fn test_self_parented_child_is_wired_but_unreachable() {
    let children = vec![ExecutionRecord::child("2", "2", "pi")];
    
    let forest = TreeBuilder::new().build(&[], &children, &[]).unwrap();
    
    assert!(forest.has_edge_label("c2"));
    assert_eq!(forest.parent_of("2").map(|p| p.id.as_str()), Some("2"));
    assert_eq!(forest.roots().count(), 0);
    assert_eq!(forest.depth(), 0);
    let unreachable: Vec<&str> =
        forest.unreachable_executions().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(unreachable, vec!["2"]);
}

#[test]
fn test_two_node_cycle_does_not_hang() {
    let roots = vec![ExecutionRecord::root("1", "pi")];
    let children = vec![
        ExecutionRecord::child("2", "1", "pi"),
        ExecutionRecord::child("a", "b", "pi"),
        ExecutionRecord::child("b", "a", "pi"),
    ];
    
    let forest = TreeBuilder::new().build(&roots, &children, &[]).unwrap();
    
    assert_eq!(forest.edge_count(), 3);
    assert_eq!(forest.depth(), 2);
    let unreachable: Vec<&str> =
        forest.unreachable_executions().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(unreachable, vec!["a", "b"]);
}

#[test]
fn test_root_with_parent_reference_stays_root() {
    let roots = vec![ExecutionRecord::child("1", "elsewhere", "pi")];
    let children = vec![ExecutionRecord::child("2", "1", "pi")];
    
    let forest = TreeBuilder::new().build(&roots, &children, &[]).unwrap();
    
    let root_ids: Vec<&str> = forest.roots().map(|r| r.id.as_str()).collect();
    assert_eq!(root_ids, vec!["1"]);
    assert!(forest.parent_of("1").is_none());
    assert!(forest.edges().all(|e| e.source != "1"));
    assert_eq!(forest.execution("1").unwrap().parent_id.as_deref(), Some("elsewhere"));
}
