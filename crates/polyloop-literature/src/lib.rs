//! polyloop-literature: Citation graph construction and selection of the
//! most contributor-diverse anchored region for rendering.

pub mod tables;
pub mod citation_graph;
pub mod selector;
pub mod labels;
pub mod analytics;

pub use analytics::GraphSummary;
pub use citation_graph::{add_citations, surnames, CitationGraphBuilder};
pub use labels::relabel_for_render;
pub use selector::{score_region, Candidate, CitationSubgraphSelector, SelectedRegion};
pub use tables::{CitationPair, PaperRow};
