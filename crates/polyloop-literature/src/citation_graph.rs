//! Citation graph construction: year-filtered paper nodes, citing → cited
//! edges between known papers, then isolation pruning.

use polyloop_common::config::LiteratureOptions;
use polyloop_common::entities::{NodeAttrs, PublicationAttrs, Relation, RelationKind, MISSING_NAME};
use polyloop_kg::KnowledgeGraph;
use tracing::{debug, info};

use crate::tables::{CitationPair, PaperRow};

/// Display surnames from a comma-joined contributor cell: the last
/// whitespace-separated token of each name, first occurrence kept.
pub fn surnames(professors: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in professors.split(',') {
        let Some(surname) = name.split_whitespace().last() else {
            continue;
        };
        if !out.iter().any(|s| s == surname) {
            out.push(surname.to_string());
        }
    }
    out
}

pub struct CitationGraphBuilder {
    minimum_year: i32,
}

impl CitationGraphBuilder {
    pub fn new(options: &LiteratureOptions) -> Self {
        Self { minimum_year: options.minimum_year }
    }

    /// Papers, citations and pruning in one pass.
    pub fn build(&self, papers: &[PaperRow], citations: &[CitationPair]) -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new();
        self.add_papers(&mut graph, papers);
        let linked = add_citations(&mut graph, citations);
        let pruned = graph.prune_isolated();
        info!(
            papers = papers.len(),
            citations = citations.len(),
            linked,
            pruned = pruned.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Citation graph built"
        );
        graph
    }

    /// Add a node for each paper from `minimum_year` on that names at least
    /// one contributor. Returns the number of rows accepted.
    pub fn add_papers(&self, graph: &mut KnowledgeGraph, papers: &[PaperRow]) -> usize {
        let mut accepted = 0usize;
        for paper in papers {
            let Some(pubmed) = paper.identifier() else {
                debug!(title = ?paper.title, "Paper without identifier");
                continue;
            };
            let Some(year) = paper.year().filter(|y| *y >= self.minimum_year) else {
                debug!(pubmed, "Paper outside year range");
                continue;
            };
            let professors = paper.professors.as_deref().map(surnames).unwrap_or_default();
            if professors.is_empty() {
                debug!(pubmed, "Paper without contributors");
                continue;
            }
            graph.add_node(
                pubmed,
                NodeAttrs::Publication(PublicationAttrs {
                    title: paper.title.clone().unwrap_or_else(|| MISSING_NAME.to_string()),
                    year,
                    professors,
                }),
            );
            accepted += 1;
        }
        accepted
    }
}

/// Add citing → cited edges whose endpoints are both present.
/// Returns the number of edges linked.
pub fn add_citations(graph: &mut KnowledgeGraph, citations: &[CitationPair]) -> usize {
    citations
        .iter()
        .filter(|pair| graph.add_edge(&pair.source, &pair.target, Relation::new(RelationKind::Cites)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(id: &str, year: &str, professors: &str) -> PaperRow {
        PaperRow {
            pubmed: Some(id.into()),
            year: Some(year.into()),
            title: Some(format!("title {id}")),
            professors: (!professors.is_empty()).then(|| professors.to_string()),
            ..Default::default()
        }
    }

    fn cite(a: &str, b: &str) -> CitationPair {
        CitationPair { source: a.into(), target: b.into() }
    }

    #[test]
    fn test_surnames() {
        assert_eq!(surnames("Dr. Jane Smith,Prof. Bo Jones"), vec!["Smith", "Jones"]);
        assert_eq!(surnames("Smith, Smith ,"), vec!["Smith"]);
        assert!(surnames("").is_empty());
    }

    #[test]
    fn test_papers_filtered_by_year_and_contributors() {
        let builder = CitationGraphBuilder::new(&LiteratureOptions::default());
        let mut g = KnowledgeGraph::new();
        let accepted = builder.add_papers(
            &mut g,
            &[paper("1", "2015", "Dr. A Smith"), paper("2", "2014", "Dr. B Lee"), paper("3", "2020", "")],
        );
        assert_eq!(accepted, 1);
        assert!(g.contains("1"));
        assert!(!g.contains("2"));
        assert!(!g.contains("3"));
    }

    #[test]
    fn test_build_drops_unknown_citations_and_prunes() {
        let builder = CitationGraphBuilder::new(&LiteratureOptions::default());
        let g = builder.build(
            &[
                paper("1", "2022", "Dr. A Smith"),
                paper("2", "2020", "Dr. B Lee"),
                paper("3", "2019", "Dr. C Chen"),
            ],
            &[cite("1", "2"), cite("1", "99"), cite("98", "3")],
        );
        assert_eq!(g.node_ids().collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_missing_title_gets_placeholder() {
        let builder = CitationGraphBuilder::new(&LiteratureOptions::default());
        let mut g = KnowledgeGraph::new();
        let row = PaperRow { title: None, ..paper("1", "2022", "Dr. A Smith") };
        builder.add_papers(&mut g, &[row]);
        assert_eq!(g.node("1").and_then(|e| e.as_publication()).unwrap().title, MISSING_NAME);
    }

    #[test]
    fn test_paper_identifier_falls_back_to_id() {
        let builder = CitationGraphBuilder::new(&LiteratureOptions::default());
        let mut g = KnowledgeGraph::new();
        let by_id = PaperRow { pubmed: None, id: Some("7".into()), ..paper("x", "2022", "Dr. A Smith") };
        let anonymous = PaperRow { pubmed: None, ..paper("x", "2022", "Dr. B Jones") };
        assert_eq!(builder.add_papers(&mut g, &[by_id, anonymous]), 1);
        assert_eq!(g.node_ids().collect::<Vec<_>>(), vec!["7"]);
    }
}
