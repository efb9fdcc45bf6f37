//! Plain-text Mermaid flowchart listing for lightweight inspection.
//!
//! One line per labelled node (`id["label"]`), one line per edge
//! (`source --> target` or `source -- label --> target`), after a
//! `flowchart LR` header. Body lines are tab-indented.

use crate::graph::KnowledgeGraph;

pub const MERMAID_HEADER: &str = "flowchart LR";

pub fn to_mermaid(graph: &KnowledgeGraph) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(graph.node_count() + graph.edge_count());

    for entity in graph.nodes() {
        let label = entity.label();
        if !label.is_empty() {
            lines.push(format!("{}[\"{}\"]", entity.id, escape(&label)));
        }
    }
    for (src, dst, relation) in graph.edges() {
        match relation.label.as_deref() {
            Some(label) if !label.is_empty() => lines.push(format!("{src} -- {} --> {dst}", escape(label))),
            _ => lines.push(format!("{src} --> {dst}")),
        }
    }

    let mut out = String::from(MERMAID_HEADER);
    for line in lines {
        out.push_str("\n\t");
        out.push_str(&line);
    }
    out
}

/// Keep each entry on one line and inside its quotes.
fn escape(text: &str) -> String {
    text.replace('"', "#quot;").replace('\n', "<br/>")
}
