//! Property-based tests for the graph model using proptest.

use proptest::prelude::*;

use polyloop_common::entities::{ChemicalAttrs, NodeAttrs, Relation, RelationKind};
use polyloop_kg::KnowledgeGraph;

fn chem(name: &str) -> NodeAttrs {
    NodeAttrs::Chemical(ChemicalAttrs { name: Some(name.to_string()), ..Default::default() })
}

fn node_id() -> impl Strategy<Value = String> {
    (0u8..12).prop_map(|n| format!("N{n}"))
}

// --- Node merge properties ---

proptest! {
    #[test]
    fn repeated_ids_never_duplicate_nodes(
        ids in prop::collection::vec(node_id(), 0..40),
    ) {
        let mut g = KnowledgeGraph::new();
        for (i, id) in ids.iter().enumerate() {
            g.add_node(id, chem(&format!("name{i}")));
        }
        let distinct: std::collections::HashSet<&String> = ids.iter().collect();
        prop_assert_eq!(g.node_count(), distinct.len());
    }

    #[test]
    fn last_name_wins(
        names in prop::collection::vec("[a-z]{1,8}", 1..10),
    ) {
        let mut g = KnowledgeGraph::new();
        for name in &names {
            g.add_node("X", chem(name));
        }
        prop_assert_eq!(g.node("X").unwrap().label(), names.last().unwrap().clone());
    }
}

// --- Edge properties ---

proptest! {
    #[test]
    fn dangling_edges_leave_edge_count_unchanged(
        present in prop::collection::hash_set(node_id(), 0..6),
        edges in prop::collection::vec((node_id(), node_id()), 0..30),
    ) {
        let mut g = KnowledgeGraph::new();
        for id in &present {
            g.add_node(id, chem(id));
        }
        for (src, dst) in &edges {
            let before = g.edge_count();
            let added = g.add_edge(src, dst, Relation::new(RelationKind::Cites));
            if !(present.contains(src) && present.contains(dst)) {
                prop_assert!(!added);
                prop_assert_eq!(g.edge_count(), before);
            }
        }
        prop_assert_eq!(g.node_count(), present.len());
    }

    #[test]
    fn pruning_leaves_no_isolated_nodes(
        ids in prop::collection::hash_set(node_id(), 0..12),
        edges in prop::collection::vec((node_id(), node_id()), 0..20),
    ) {
        let mut g = KnowledgeGraph::new();
        for id in &ids {
            g.add_node(id, chem(id));
        }
        for (src, dst) in &edges {
            g.add_edge(src, dst, Relation::new(RelationKind::Cites));
        }
        let edges_before = g.edge_count();
        g.prune_isolated();
        for id in g.node_ids() {
            prop_assert!(g.in_degree(id) + g.out_degree(id) > 0);
        }
        prop_assert_eq!(g.edge_count(), edges_before);
    }

    #[test]
    fn descendants_exclude_start_and_terminate(
        edges in prop::collection::vec((node_id(), node_id()), 0..40),
        start in node_id(),
    ) {
        let mut g = KnowledgeGraph::new();
        for (src, dst) in &edges {
            g.add_node(src, chem(src));
            g.add_node(dst, chem(dst));
            g.add_edge(src, dst, Relation::new(RelationKind::Cites));
        }
        let desc: Vec<&str> = g.descendants(&start).collect();
        prop_assert!(!desc.contains(&start.as_str()));
        prop_assert!(desc.len() <= g.node_count());
        let unique: std::collections::HashSet<&&str> = desc.iter().collect();
        prop_assert_eq!(unique.len(), desc.len());
    }
}
