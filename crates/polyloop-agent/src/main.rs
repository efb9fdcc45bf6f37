//! Polyloop: reaction network and citation subgraph diagrams
//! Entry point for the pipeline binary.

mod pipeline;

use anyhow::Context;
use polyloop_common::PipelineConfig;
use polyloop_kg::DotRenderer;
use polyloop_reactions::{CurationContext, ImageCacheDirectory};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Polyloop {}", env!("CARGO_PKG_VERSION"));

    let config = PipelineConfig::load().context("loading configuration")?;
    let out_dir = &config.output.directory;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    // Tables are loaded and joined once, then only read.
    let images = ImageCacheDirectory::new(&config.images.cache_dir, config.reactions.image_prefix.clone());
    let ctx = CurationContext::load(&config.curation, config.reactions.clone(), Box::new(images))
        .context("loading curation tables")?;
    info!(kingdoms = ?ctx.kingdoms(), "Curation tables loaded");

    let renderer = DotRenderer::default();
    let written = pipeline::write_reaction_diagrams(&ctx, &renderer, out_dir)
        .context("writing reaction diagrams")?;
    info!(files = written.len(), "Reaction diagrams done");

    match config.literature_tables() {
        Some((papers, citations)) => {
            pipeline::write_literature(papers, citations, &config.literature, &renderer, out_dir)
                .context("selecting citation subgraph")?;
        }
        None => info!("No paper/citation tables configured, skipping literature pipeline"),
    }

    Ok(())
}
