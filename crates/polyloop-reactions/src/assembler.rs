//! Reaction Graph Assembler.
//!
//! Builds one directed graph per kingdom: chemical and reaction nodes,
//! substrate/product/reagent edges, optional "is-a" hierarchy overlays and the
//! closed-loop cluster view over the highlight set.

use polyloop_common::config::{RankDirection, ReactionGraphOptions};
use polyloop_common::entities::{
    ChemicalAttrs, NodeAttrs, ReactionAttrs, Relation, RelationKind, IS_A_LABEL,
};
use polyloop_kg::{ClusterView, KnowledgeGraph, RenderScene};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info};

use crate::conditions::ConditionGroups;
use crate::images::StructureImageSource;
use crate::tables::{HierarchyRow, ReactionRow};

/// Cluster name, label and border colour of the closed-loop view.
pub const CLOSED_LOOP_CLUSTER: (&str, &str, &str) = ("cluster_0", "Closed Loop", "blue");

/// One assembled reaction graph plus its cluster view.
#[derive(Debug, Clone)]
pub struct ReactionNetwork {
    /// Partition key; `None` for a graph over an ad-hoc row selection.
    pub kingdom: Option<String>,
    pub graph: KnowledgeGraph,
    pub closed_loop: Option<ClusterView>,
    pub direction: RankDirection,
}

impl ReactionNetwork {
    /// Scene handed to a renderer.
    pub fn scene(&self) -> RenderScene<'_> {
        RenderScene::new(&self.graph)
            .with_clusters(self.closed_loop.as_slice())
            .with_direction(self.direction)
    }

    pub fn in_closed_loop(&self, id: &str) -> bool {
        self.closed_loop.as_ref().is_some_and(|c| c.contains(id))
    }
}

pub struct ReactionGraphAssembler<'a> {
    options: &'a ReactionGraphOptions,
    conditions: &'a ConditionGroups,
    images: &'a dyn StructureImageSource,
    chemical_hierarchy: &'a [HierarchyRow],
    reaction_hierarchy: &'a [HierarchyRow],
}

impl<'a> ReactionGraphAssembler<'a> {
    pub fn new(
        options: &'a ReactionGraphOptions,
        conditions: &'a ConditionGroups,
        images: &'a dyn StructureImageSource,
    ) -> Self {
        Self {
            options,
            conditions,
            images,
            chemical_hierarchy: &[],
            reaction_hierarchy: &[],
        }
    }

    pub fn with_hierarchy(mut self, chemical: &'a [HierarchyRow], reaction: &'a [HierarchyRow]) -> Self {
        self.chemical_hierarchy = chemical;
        self.reaction_hierarchy = reaction;
        self
    }

    /// One network per distinct kingdom, sorted by kingdom. Rows without a
    /// kingdom belong to no partition.
    pub fn assemble_by_kingdom(&self, rows: &[ReactionRow]) -> Vec<ReactionNetwork> {
        let mut partitions: BTreeMap<&str, Vec<ReactionRow>> = BTreeMap::new();
        for row in rows {
            match row.kingdom.as_deref() {
                Some(kingdom) => partitions.entry(kingdom).or_default().push(row.clone()),
                None => debug!(reaction = %row.reaction, "Reaction without kingdom left unpartitioned"),
            }
        }

        let partitions: Vec<(&str, Vec<ReactionRow>)> = partitions.into_iter().collect();
        partitions
            .par_iter()
            .map(|(kingdom, rows)| {
                let mut network = self.assemble(rows);
                network.kingdom = Some(kingdom.to_string());
                network
            })
            .collect()
    }

    /// Assemble a single graph over `rows`.
    pub fn assemble(&self, rows: &[ReactionRow]) -> ReactionNetwork {
        let opts = self.options;
        let mut graph = KnowledgeGraph::new();

        // Chemicals
        let node_set = self.node_set(rows);
        let mut missing_names = 0usize;
        for (curie, name) in candidate_chemicals(rows) {
            let image = if curie.starts_with(opts.image_prefix.as_str()) {
                self.images.resolve(curie)
            } else {
                None
            };
            if !node_set.contains(curie) {
                continue;
            }
            if name.is_none() {
                missing_names += 1;
                debug!(curie, "Chemical without display name");
            }
            graph.add_node(
                curie,
                NodeAttrs::Chemical(ChemicalAttrs {
                    name: name.map(String::from),
                    image,
                    highlighted: opts.highlight.contains(curie),
                }),
            );
        }

        let mut closed_loop = opts.group_closed_loop.then(|| {
            let (name, label, color) = CLOSED_LOOP_CLUSTER;
            let mut cluster = ClusterView::new(name, label, color);
            for member in opts.highlight.iter().filter(|m| graph.contains(m)) {
                cluster.add(member);
            }
            cluster
        });

        // Reactions
        for row in rows {
            graph.add_node(
                &row.reaction,
                NodeAttrs::Reaction(ReactionAttrs {
                    method: row.type_name.clone(),
                    condition_groups: self.conditions.segments(&row.reaction),
                }),
            );
            self.link(&mut graph, row);

            if let (Some(cluster), Some(input), Some(output)) =
                (closed_loop.as_mut(), row.input.as_deref(), row.output.as_deref())
            {
                if opts.highlight.contains(input) && opts.highlight.contains(output) {
                    cluster.add(&row.reaction);
                }
            }
        }

        if opts.add_hierarchy {
            self.overlay_hierarchy(&mut graph);
        }

        info!(
            reactions = rows.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            missing_names,
            closed_loop = closed_loop.as_ref().map_or(0, |c| c.members.len()),
            "Reaction network assembled"
        );

        ReactionNetwork { kingdom: None, graph, closed_loop, direction: opts.direction }
    }

    /// Chemical identifiers that become nodes: inputs, outputs, and the
    /// optional columns whose toggles are on.
    fn node_set<'r>(&self, rows: &'r [ReactionRow]) -> HashSet<&'r str> {
        let mut set = HashSet::new();
        for row in rows {
            set.extend(row.input.as_deref());
            set.extend(row.output.as_deref());
            if self.options.add_output_2 {
                set.extend(row.output_2.as_deref());
            }
            if self.options.add_reagent {
                set.extend(row.reagent.as_deref());
            }
        }
        set
    }

    fn link(&self, graph: &mut KnowledgeGraph, row: &ReactionRow) {
        let reaction = row.reaction.as_str();
        match row.input.as_deref() {
            Some(input) => {
                graph.add_edge(input, reaction, Relation::new(RelationKind::SubstrateOf));
            }
            None => debug!(reaction, "Reaction without input"),
        }
        match row.output.as_deref() {
            Some(output) => {
                graph.add_edge(reaction, output, Relation::new(RelationKind::ProductOf));
            }
            None => debug!(reaction, "Reaction without output"),
        }
        if self.options.add_reagent {
            if let Some(reagent) = row.reagent.as_deref() {
                graph.add_edge(reagent, reaction, Relation::new(RelationKind::ReagentOf));
            }
        }
        if self.options.add_output_2 {
            if let Some(output_2) = row.output_2.as_deref() {
                graph.add_edge(reaction, output_2, Relation::new(RelationKind::ProductOf));
            }
        }
    }

    fn overlay_hierarchy(&self, graph: &mut KnowledgeGraph) {
        let mut added = 0usize;
        let mut dropped = 0usize;
        for row in self.chemical_hierarchy.iter().chain(self.reaction_hierarchy) {
            if graph.add_edge(&row.child, &row.parent, Relation::labelled(RelationKind::IsA, IS_A_LABEL)) {
                added += 1;
            } else {
                dropped += 1;
            }
        }
        debug!(added, dropped, "Hierarchy overlay applied");
    }
}

/// Every chemical referenced by any column, in first-seen order, with the
/// last non-empty display name seen for it.
fn candidate_chemicals(rows: &[ReactionRow]) -> Vec<(&str, Option<&str>)> {
    let mut out: Vec<(&str, Option<&str>)> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        for (curie, name) in row.chemicals() {
            let Some(curie) = curie else { continue };
            match position.get(curie) {
                Some(&i) => {
                    if name.is_some() {
                        out[i].1 = name;
                    }
                }
                None => {
                    position.insert(curie, out.len());
                    out.push((curie, name));
                }
            }
        }
    }
    out
}
