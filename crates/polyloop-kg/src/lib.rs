//! polyloop-kg: Typed directed knowledge graph, subgraph extraction and
//! the text serialisations handed to external renderers.

pub mod graph;
pub mod mermaid;
pub mod render;

pub use graph::{ClusterView, KnowledgeGraph, Traversal};
pub use mermaid::to_mermaid;
pub use render::{DotRenderer, GraphRenderer, RenderScene};
