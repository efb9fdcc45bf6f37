//! Typed directed multigraph keyed by entity identifier.
//!
//! Uses petgraph's StableDiGraph so node removal does not invalidate the
//! identifier index. Iteration follows insertion order, which keeps candidate
//! enumeration and serialisation reproducible.

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use polyloop_common::entities::{Entity, NodeAttrs, Relation, RelationKind};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    graph: StableDiGraph<Entity, Relation>,
    index: HashMap<String, NodeIndex>,
    /// Live node indices in insertion order.
    order: Vec<NodeIndex>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Construction ─────────────────────────────────────────────────────────

    /// Insert a node, or merge `attrs` into the existing node with this id.
    /// Returns true when a new node was created.
    pub fn add_node(&mut self, id: &str, attrs: NodeAttrs) -> bool {
        if let Some(&idx) = self.index.get(id) {
            let entity = &mut self.graph[idx];
            let previous = entity.kind();
            if !entity.attrs.merge(attrs) {
                warn!(id, from = previous.as_str(), to = entity.kind().as_str(), "Node kind replaced on merge");
            }
            return false;
        }
        let idx = self.graph.add_node(Entity::new(id, attrs));
        self.index.insert(id.to_string(), idx);
        self.order.push(idx);
        true
    }

    /// Add a `src → dst` relation. A no-op when either endpoint is absent.
    ///
    /// Edge identity is (src, dst, kind): re-adding an existing relation keeps
    /// one edge and takes the new label when one is given. Returns true when
    /// the relation exists after the call.
    pub fn add_edge(&mut self, src: &str, dst: &str, relation: Relation) -> bool {
        let (Some(&a), Some(&b)) = (self.index.get(src), self.index.get(dst)) else {
            debug!(src, dst, kind = relation.kind.as_str(), "Dropped edge with missing endpoint");
            return false;
        };
        if let Some(existing) = self.find_edge(a, b, relation.kind) {
            if relation.label.is_some() {
                self.graph[existing].label = relation.label;
            }
            return true;
        }
        self.graph.add_edge(a, b, relation);
        true
    }

    /// Delete a node and every incident edge.
    pub fn remove_node(&mut self, id: &str) -> Option<Entity> {
        let idx = self.index.remove(id)?;
        self.order.retain(|&i| i != idx);
        self.graph.remove_node(idx)
    }

    /// Remove every node with neither incoming nor outgoing edges.
    /// Returns the removed identifiers in iteration order.
    pub fn prune_isolated(&mut self) -> Vec<String> {
        let isolated: Vec<NodeIndex> = self
            .order
            .iter()
            .copied()
            .filter(|&idx| self.degree(idx, Direction::Incoming) == 0 && self.degree(idx, Direction::Outgoing) == 0)
            .collect();
        if isolated.is_empty() {
            return Vec::new();
        }
        let removed: HashSet<NodeIndex> = isolated.iter().copied().collect();
        self.order.retain(|idx| !removed.contains(idx));
        let mut ids = Vec::with_capacity(isolated.len());
        for idx in isolated {
            if let Some(entity) = self.graph.remove_node(idx) {
                self.index.remove(&entity.id);
                ids.push(entity.id);
            }
        }
        ids
    }

    /// Replace the rendered label of a node.
    pub fn set_display_label(&mut self, id: &str, label: impl Into<String>) -> bool {
        match self.index.get(id) {
            Some(&idx) => {
                self.graph[idx].display_label = Some(label.into());
                true
            }
            None => false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Entity> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Incoming edge count; zero for an unknown id.
    pub fn in_degree(&self, id: &str) -> usize {
        self.index.get(id).map_or(0, |&idx| self.degree(idx, Direction::Incoming))
    }

    /// Outgoing edge count; zero for an unknown id.
    pub fn out_degree(&self, id: &str) -> usize {
        self.index.get(id).map_or(0, |&idx| self.degree(idx, Direction::Outgoing))
    }

    fn degree(&self, idx: NodeIndex, dir: Direction) -> usize {
        self.graph.edges_directed(idx, dir).count()
    }

    pub fn edge(&self, src: &str, dst: &str, kind: RelationKind) -> Option<&Relation> {
        let (&a, &b) = (self.index.get(src)?, self.index.get(dst)?);
        self.find_edge(a, b, kind).map(|e| &self.graph[e])
    }

    pub fn has_edge(&self, src: &str, dst: &str, kind: RelationKind) -> bool {
        self.edge(src, dst, kind).is_some()
    }

    fn find_edge(&self, a: NodeIndex, b: NodeIndex, kind: RelationKind) -> Option<EdgeIndex> {
        self.graph
            .edges_directed(a, Direction::Outgoing)
            .find(|e| e.target() == b && e.weight().kind == kind)
            .map(|e| e.id())
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.order.iter().map(move |&idx| &self.graph[idx])
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes().map(|e| e.id.as_str())
    }

    /// Edges grouped by source in node order, then by creation order.
    pub fn edges(&self) -> Vec<(&str, &str, &Relation)> {
        let mut out = Vec::with_capacity(self.graph.edge_count());
        for &idx in &self.order {
            let mut outgoing: Vec<_> = self.graph.edges_directed(idx, Direction::Outgoing).collect();
            outgoing.sort_by_key(|e| e.id());
            for e in outgoing {
                out.push((
                    self.graph[e.source()].id.as_str(),
                    self.graph[e.target()].id.as_str(),
                    e.weight(),
                ));
            }
        }
        out
    }

    /// Every node reachable from `id` along directed edges, excluding `id`.
    /// Lazy; terminates on cyclic graphs.
    pub fn descendants(&self, id: &str) -> Traversal<'_> {
        Traversal::new(self, id, Direction::Outgoing)
    }

    /// Every node that can reach `id`, excluding `id`.
    pub fn ancestors(&self, id: &str) -> Traversal<'_> {
        Traversal::new(self, id, Direction::Incoming)
    }

    /// A new graph with exactly the listed nodes that exist here and every edge
    /// between them. Node order follows this graph.
    pub fn induced_subgraph<I, S>(&self, ids: I) -> KnowledgeGraph
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keep: HashSet<NodeIndex> = ids
            .into_iter()
            .filter_map(|id| self.index.get(id.as_ref()).copied())
            .collect();

        let mut sub = KnowledgeGraph::new();
        for &idx in self.order.iter().filter(|idx| keep.contains(*idx)) {
            let entity = self.graph[idx].clone();
            let new_idx = sub.graph.add_node(entity);
            sub.index.insert(self.graph[idx].id.clone(), new_idx);
            sub.order.push(new_idx);
        }
        for (src, dst, relation) in self.edges() {
            let (Some(&a), Some(&b)) = (sub.index.get(src), sub.index.get(dst)) else {
                continue;
            };
            sub.graph.add_edge(a, b, relation.clone());
        }
        sub
    }
}

// ── Traversal ────────────────────────────────────────────────────────────────

/// Breadth-first reachability iterator.
pub struct Traversal<'a> {
    kg: &'a KnowledgeGraph,
    direction: Direction,
    queue: VecDeque<NodeIndex>,
    seen: HashSet<NodeIndex>,
}

impl<'a> Traversal<'a> {
    fn new(kg: &'a KnowledgeGraph, id: &str, direction: Direction) -> Self {
        let mut queue = VecDeque::new();
        let mut seen = HashSet::new();
        if let Some(&start) = kg.index.get(id) {
            seen.insert(start);
            queue.push_back(start);
        }
        let mut traversal = Self { kg, direction, queue, seen };
        // Expand the start node eagerly so it is never yielded itself.
        if let Some(start) = traversal.queue.pop_front() {
            traversal.expand(start);
        }
        traversal
    }

    fn expand(&mut self, idx: NodeIndex) {
        let mut next: Vec<NodeIndex> = self.kg.graph.neighbors_directed(idx, self.direction).collect();
        next.sort();
        for n in next {
            if self.seen.insert(n) {
                self.queue.push_back(n);
            }
        }
    }
}

impl<'a> Iterator for Traversal<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.queue.pop_front()?;
        self.expand(idx);
        Some(self.kg.graph[idx].id.as_str())
    }
}

// ── Cluster views ────────────────────────────────────────────────────────────

/// Named membership tag over graph nodes, drawn as a boxed cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterView {
    pub name: String,
    pub label: String,
    pub color: String,
    pub members: Vec<String>,
}

impl ClusterView {
    pub fn new(name: impl Into<String>, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            color: color.into(),
            members: Vec::new(),
        }
    }

    /// Add a member once.
    pub fn add(&mut self, id: &str) {
        if !self.contains(id) {
            self.members.push(id.to_string());
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|m| m == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyloop_common::entities::{ChemicalAttrs, PublicationAttrs};

    fn chem(name: &str) -> NodeAttrs {
        NodeAttrs::Chemical(ChemicalAttrs { name: Some(name.to_string()), ..Default::default() })
    }

    fn paper(year: i32) -> NodeAttrs {
        NodeAttrs::Publication(PublicationAttrs {
            title: format!("paper {year}"),
            year,
            professors: vec!["Smith".into()],
        })
    }

    fn cites() -> Relation {
        Relation::new(RelationKind::Cites)
    }

    #[test]
    fn test_add_node_is_idempotent() {
        let mut g = KnowledgeGraph::new();
        assert!(g.add_node("X", chem("old")));
        assert!(!g.add_node("X", chem("new")));
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.node("X").unwrap().label(), "new");
    }

    #[test]
    fn test_dangling_edge_dropped() {
        let mut g = KnowledgeGraph::new();
        g.add_node("A", paper(2020));
        assert!(!g.add_edge("A", "B", cites()));
        assert!(!g.add_edge("B", "A", cites()));
        assert_eq!(g.edge_count(), 0);
        assert!(!g.contains("B"));
    }

    #[test]
    fn test_edge_identity_includes_kind() {
        let mut g = KnowledgeGraph::new();
        g.add_node("A", chem("a"));
        g.add_node("B", chem("b"));
        g.add_edge("A", "B", Relation::new(RelationKind::IsA));
        g.add_edge("A", "B", Relation::labelled(RelationKind::IsA, "is-a"));
        g.add_edge("A", "B", Relation::new(RelationKind::SubstrateOf));
        assert_eq!(g.edge_count(), 2);
        assert_eq!(
            g.edge("A", "B", RelationKind::IsA).unwrap().label.as_deref(),
            Some("is-a")
        );
        assert_eq!(g.out_degree("A"), 2);
        assert_eq!(g.in_degree("B"), 2);
    }

    #[test]
    fn test_descendants_terminates_on_cycle() {
        let mut g = KnowledgeGraph::new();
        for id in ["A", "B", "C", "D"] {
            g.add_node(id, paper(2022));
        }
        g.add_edge("A", "B", cites());
        g.add_edge("B", "C", cites());
        g.add_edge("C", "A", cites());
        g.add_edge("D", "A", cites());
        let desc: HashSet<&str> = g.descendants("A").collect();
        assert_eq!(desc, HashSet::from(["B", "C"]));
        let anc: HashSet<&str> = g.ancestors("A").collect();
        assert_eq!(anc, HashSet::from(["B", "C", "D"]));
        assert_eq!(g.descendants("missing").count(), 0);
    }

    #[test]
    fn test_induced_subgraph_does_not_mutate_source() {
        let mut g = KnowledgeGraph::new();
        for id in ["A", "B", "C"] {
            g.add_node(id, paper(2022));
        }
        g.add_edge("A", "B", cites());
        g.add_edge("B", "C", cites());
        let sub = g.induced_subgraph(["A", "B", "Z"]);
        assert_eq!(sub.node_count(), 2);
        assert_eq!(sub.edge_count(), 1);
        assert!(sub.has_edge("A", "B", RelationKind::Cites));
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_remove_node_drops_incident_edges() {
        let mut g = KnowledgeGraph::new();
        for id in ["A", "B", "C"] {
            g.add_node(id, paper(2022));
        }
        g.add_edge("A", "B", cites());
        g.add_edge("B", "C", cites());
        assert!(g.remove_node("B").is_some());
        assert_eq!(g.edge_count(), 0);
        assert!(g.remove_node("B").is_none());
        assert_eq!(g.node_ids().collect::<Vec<_>>(), vec!["A", "C"]);
    }

    #[test]
    fn test_insertion_order_survives_slot_reuse() {
        let mut g = KnowledgeGraph::new();
        for id in ["A", "B", "C"] {
            g.add_node(id, paper(2022));
        }
        g.remove_node("A");
        g.add_node("D", paper(2023));
        assert_eq!(g.node_ids().collect::<Vec<_>>(), vec!["B", "C", "D"]);
    }

    #[test]
    fn test_prune_isolated() {
        let mut g = KnowledgeGraph::new();
        for id in ["A", "B", "C"] {
            g.add_node(id, paper(2022));
        }
        g.add_edge("A", "B", cites());
        assert_eq!(g.prune_isolated(), vec!["C".to_string()]);
        assert_eq!(g.node_count(), 2);
    }

    #[test]
    fn test_prune_isolated_keeps_order_and_index() {
        let mut g = KnowledgeGraph::new();
        for id in ["A", "X", "B", "Y", "C", "Z"] {
            g.add_node(id, paper(2022));
        }
        g.add_edge("A", "B", cites());
        g.add_edge("C", "A", cites());
        assert_eq!(g.prune_isolated(), vec!["X", "Y", "Z"]);
        assert_eq!(g.node_ids().collect::<Vec<_>>(), vec!["A", "B", "C"]);
        assert!(!g.contains("Y"));
        assert!(g.prune_isolated().is_empty());

        g.add_node("Y", paper(2023));
        assert_eq!(g.node_ids().collect::<Vec<_>>(), vec!["A", "B", "C", "Y"]);
    }

    #[test]
    fn test_cluster_members_unique() {
        let mut cluster = ClusterView::new("cluster_0", "Closed Loop", "blue");
        cluster.add("X");
        cluster.add("X");
        assert_eq!(cluster.members, vec!["X".to_string()]);
    }
}
