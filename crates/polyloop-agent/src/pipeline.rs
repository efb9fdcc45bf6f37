//! Artifact writers for both pipelines.

use polyloop_common::config::LiteratureOptions;
use polyloop_common::Result;
use polyloop_kg::{to_mermaid, GraphRenderer, RenderScene};
use polyloop_literature::tables::{read_citations_file, read_papers};
use polyloop_literature::{relabel_for_render, CitationGraphBuilder, CitationSubgraphSelector, GraphSummary};
use polyloop_reactions::CurationContext;
use std::path::{Path, PathBuf};
use tracing::info;

/// Render one diagram per kingdom as `reactions_<kingdom>.<ext>`.
pub fn write_reaction_diagrams(
    ctx: &CurationContext,
    renderer: &dyn GraphRenderer,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for network in ctx.kingdom_networks() {
        let kingdom = network.kingdom.as_deref().unwrap_or("all");
        let path = out_dir.join(format!("reactions_{}.{}", file_stem(kingdom), renderer.extension()));
        std::fs::write(&path, renderer.render(&network.scene())?)?;
        info!(kingdom, path = %path.display(), "Wrote reaction diagram");
        written.push(path);
    }
    Ok(written)
}

/// Build the citation graph, write its listing and statistics, then select
/// and render the best region. Fails with `NoEligibleSubgraph` after the
/// full-graph artifacts are written.
pub fn write_literature(
    papers: &Path,
    citations: &Path,
    options: &LiteratureOptions,
    renderer: &dyn GraphRenderer,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let papers = read_papers(papers)?;
    let citations = read_citations_file(citations)?;
    let graph = CitationGraphBuilder::new(options).build(&papers, &citations);

    let mut written = Vec::new();
    written.push(write_text(out_dir, "literature_full.mmd", &to_mermaid(&graph))?);
    written.push(write_text(
        out_dir,
        "literature_stats.json",
        &GraphSummary::from_graph(&graph).to_json_pretty()?,
    )?);

    let mut selected = CitationSubgraphSelector::new(options).select(&graph)?;
    written.push(write_text(out_dir, "literature_subgraph.mmd", &to_mermaid(&selected.subgraph))?);

    relabel_for_render(&mut selected.subgraph, options.wrap_width);
    let path = out_dir.join(format!("literature_subgraph.{}", renderer.extension()));
    std::fs::write(&path, renderer.render(&RenderScene::new(&selected.subgraph))?)?;
    written.push(path);

    info!(anchor = %selected.anchor, files = written.len(), "Wrote literature artifacts");
    Ok(written)
}

fn write_text(out_dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = out_dir.join(name);
    std::fs::write(&path, content)?;
    Ok(path)
}

/// Kingdom names become file name segments.
fn file_stem(kingdom: &str) -> String {
    kingdom
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
