//! Descriptive statistics over a citation graph.

use polyloop_common::Result;
use polyloop_kg::KnowledgeGraph;
use serde::Serialize;
use std::collections::BTreeMap;

/// Two contributors sharing papers.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CoContribution {
    pub first: String,
    pub second: String,
    pub papers: usize,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
    /// in-degree → number of papers
    pub in_degree: BTreeMap<usize, usize>,
    /// out-degree → number of papers
    pub out_degree: BTreeMap<usize, usize>,
    pub papers_per_year: BTreeMap<i32, usize>,
    pub contributor_frequency: BTreeMap<String, usize>,
    /// Pairs ordered by shared paper count, descending.
    pub co_contributors: Vec<CoContribution>,
}

impl GraphSummary {
    pub fn from_graph(graph: &KnowledgeGraph) -> Self {
        let mut summary = Self {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            ..Default::default()
        };
        let mut pairs: BTreeMap<(String, String), usize> = BTreeMap::new();

        for entity in graph.nodes() {
            *summary.in_degree.entry(graph.in_degree(&entity.id)).or_default() += 1;
            *summary.out_degree.entry(graph.out_degree(&entity.id)).or_default() += 1;

            let Some(paper) = entity.as_publication() else { continue };
            *summary.papers_per_year.entry(paper.year).or_default() += 1;
            for name in &paper.professors {
                *summary.contributor_frequency.entry(name.clone()).or_default() += 1;
            }
            let mut names: Vec<&String> = paper.professors.iter().collect();
            names.sort();
            names.dedup();
            for (i, a) in names.iter().enumerate() {
                for b in &names[i + 1..] {
                    *pairs.entry(((*a).clone(), (*b).clone())).or_default() += 1;
                }
            }
        }

        let mut co: Vec<CoContribution> = pairs
            .into_iter()
            .map(|((first, second), papers)| CoContribution { first, second, papers })
            .collect();
        co.sort_by(|a, b| b.papers.cmp(&a.papers));
        summary.co_contributors = co;
        summary
    }

    /// Contributors by paper count, descending, then by name.
    pub fn top_contributors(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .contributor_frequency
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        ranked.truncate(n);
        ranked
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
