//! Citation Subgraph Selector.
//!
//! Each paper published after the anchor year anchors a region: itself plus
//! everything it reaches through citations. Regions below the size floor score
//! zero; the others score distinct contributors per paper. The best region is
//! extracted as an induced subgraph.

use polyloop_common::config::LiteratureOptions;
use polyloop_common::{PolyloopError, Result};
use polyloop_kg::KnowledgeGraph;
use rayon::prelude::*;
use std::cmp::{Ordering, Reverse};
use std::collections::HashSet;
use tracing::{debug, info};

/// Distinct contributors per member, or 0 below `min_size`.
pub fn score_region<S: AsRef<str>>(graph: &KnowledgeGraph, region: &[S], min_size: usize) -> f64 {
    if region.is_empty() || region.len() < min_size {
        return 0.0;
    }
    let contributors: HashSet<&str> = region
        .iter()
        .filter_map(|id| graph.node(id.as_ref()))
        .filter_map(|e| e.as_publication())
        .flat_map(|p| p.professors.iter().map(|s| s.trim()))
        .filter(|s| !s.is_empty())
        .collect();
    contributors.len() as f64 / region.len() as f64
}

/// An anchored region and its score.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub anchor: String,
    /// Anchor first, then descendants in traversal order.
    pub members: Vec<String>,
    pub score: f64,
}

impl Candidate {
    /// Higher score, then larger region, then smaller anchor id.
    fn rank(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then(self.members.len().cmp(&other.members.len()))
            .then_with(|| Reverse(&self.anchor).cmp(&Reverse(&other.anchor)))
    }
}

#[derive(Debug, Clone)]
pub struct SelectedRegion {
    pub anchor: String,
    pub score: f64,
    pub candidates: usize,
    /// Induced subgraph over the region; node order follows the source graph.
    pub subgraph: KnowledgeGraph,
}

pub struct CitationSubgraphSelector {
    anchor_after_year: i32,
    min_region_size: usize,
}

impl CitationSubgraphSelector {
    pub fn new(options: &LiteratureOptions) -> Self {
        Self {
            anchor_after_year: options.anchor_after_year,
            min_region_size: options.min_region_size,
        }
    }

    /// Every anchored region, in node order.
    pub fn candidates(&self, graph: &KnowledgeGraph) -> Vec<Candidate> {
        let anchors: Vec<&str> = graph
            .nodes()
            .filter(|e| e.as_publication().is_some_and(|p| p.year > self.anchor_after_year))
            .map(|e| e.id.as_str())
            .collect();

        anchors
            .par_iter()
            .map(|&anchor| {
                let mut members = vec![anchor.to_string()];
                members.extend(graph.descendants(anchor).map(String::from));
                let score = score_region(graph, &members, self.min_region_size);
                Candidate { anchor: anchor.to_string(), members, score }
            })
            .collect()
    }

    /// The best qualifying region, or `NoEligibleSubgraph` when no anchored
    /// region reaches the size floor.
    pub fn select(&self, graph: &KnowledgeGraph) -> Result<SelectedRegion> {
        let candidates = self.candidates(graph);
        let total = candidates.len();
        for c in &candidates {
            debug!(anchor = %c.anchor, size = c.members.len(), score = c.score, "Candidate region");
        }

        let best = candidates
            .into_iter()
            .filter(|c| c.members.len() >= self.min_region_size)
            .max_by(|a, b| a.rank(b))
            .ok_or(PolyloopError::NoEligibleSubgraph { candidates: total })?;

        let subgraph = graph.induced_subgraph(&best.members);
        info!(
            anchor = %best.anchor,
            score = best.score,
            nodes = subgraph.node_count(),
            edges = subgraph.edge_count(),
            candidates = total,
            "Selected citation region"
        );
        Ok(SelectedRegion { anchor: best.anchor, score: best.score, candidates: total, subgraph })
    }
}
