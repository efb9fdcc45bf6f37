//! Render labels for publication nodes: wrapped title, surnames and year.

use polyloop_kg::KnowledgeGraph;

/// `"{wrapped title}\n{surnames} ({year})"`
pub fn publication_label(title: &str, professors: &[String], year: i32, width: usize) -> String {
    format!("{}\n{} ({})", textwrap::fill(title, width), professors.join(", "), year)
}

/// Set the display label of every publication node. Returns the number of
/// nodes relabelled.
pub fn relabel_for_render(graph: &mut KnowledgeGraph, width: usize) -> usize {
    let labels: Vec<(String, String)> = graph
        .nodes()
        .filter_map(|e| {
            let p = e.as_publication()?;
            Some((e.id.clone(), publication_label(&p.title, &p.professors, p.year, width)))
        })
        .collect();
    let count = labels.len();
    for (id, label) in labels {
        graph.set_display_label(&id, label);
    }
    count
}
