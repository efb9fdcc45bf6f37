//! Pipeline configuration.
//!
//! Read from `polyloop.toml` in the current directory, or from the path in the
//! `POLYLOOP_CONFIG` env var. Every field has a default, so a config file only
//! needs the sections it changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{PolyloopError, Result};

/// Complete pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Locations of the curated input tables
    #[serde(default)]
    pub curation: CurationPaths,

    /// Reaction graph assembly toggles
    #[serde(default)]
    pub reactions: ReactionGraphOptions,

    /// Citation subgraph selection parameters
    #[serde(default)]
    pub literature: LiteratureOptions,

    /// Structure image cache
    #[serde(default)]
    pub images: ImageConfig,

    /// Artifact output options
    #[serde(default)]
    pub output: OutputConfig,
}

// ── Curation tables ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurationPaths {
    #[serde(default = "default_labs")]
    pub labs: PathBuf,
    #[serde(default = "default_reactions")]
    pub reactions: PathBuf,
    #[serde(default = "default_conditions")]
    pub conditions: PathBuf,
    #[serde(default = "default_chemical_hierarchy")]
    pub chemical_hierarchy: PathBuf,
    #[serde(default = "default_reaction_hierarchy")]
    pub reaction_hierarchy: PathBuf,
    /// Paper table; the literature pipeline is skipped when unset
    pub papers: Option<PathBuf>,
    /// Citation pairs; the literature pipeline is skipped when unset
    pub citations: Option<PathBuf>,
}

fn default_labs()               -> PathBuf { PathBuf::from("curation/labs.tsv") }
fn default_reactions()          -> PathBuf { PathBuf::from("curation/reactions.tsv") }
fn default_conditions()         -> PathBuf { PathBuf::from("curation/conditions.tsv") }
fn default_chemical_hierarchy() -> PathBuf { PathBuf::from("curation/chemical_hierarchy.tsv") }
fn default_reaction_hierarchy() -> PathBuf { PathBuf::from("curation/reaction_hierarchy.tsv") }

impl Default for CurationPaths {
    fn default() -> Self {
        Self {
            labs: default_labs(),
            reactions: default_reactions(),
            conditions: default_conditions(),
            chemical_hierarchy: default_chemical_hierarchy(),
            reaction_hierarchy: default_reaction_hierarchy(),
            papers: None,
            citations: None,
        }
    }
}

// ── Reaction graph ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RankDirection {
    /// Top to bottom
    #[default]
    TD,
    /// Left to right
    LR,
}

impl RankDirection {
    /// Graphviz `rankdir` value.
    pub fn as_rankdir(&self) -> &'static str {
        match self {
            RankDirection::TD => "TB",
            RankDirection::LR => "LR",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionGraphOptions {
    /// Materialize reagents as nodes with reagent → reaction edges
    #[serde(default)]
    pub add_reagent: bool,

    /// Materialize secondary outputs with reaction → output edges
    #[serde(default = "default_true")]
    pub add_output_2: bool,

    /// Build the "Closed Loop" cluster view from the highlight set
    #[serde(default = "default_true")]
    pub group_closed_loop: bool,

    /// Overlay chemical and reaction "is-a" hierarchy edges
    #[serde(default = "default_true")]
    pub add_hierarchy: bool,

    /// Structurally significant chemicals
    #[serde(default = "default_highlight")]
    pub highlight: BTreeSet<String>,

    /// Identifier prefix for which structure images are resolved
    #[serde(default = "default_image_prefix")]
    pub image_prefix: String,

    #[serde(default)]
    pub direction: RankDirection,
}

fn default_true() -> bool { true }
fn default_image_prefix() -> String { "CHEBI:".to_string() }

fn default_highlight() -> BTreeSet<String> {
    [
        "CHEBI:53259",  // PET
        "CHEBI:231672", // BHET
        "CHEBI:156286", // DMT
        "CHEBI:15702",  // TPA
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for ReactionGraphOptions {
    fn default() -> Self {
        Self {
            add_reagent: false,
            add_output_2: true,
            group_closed_loop: true,
            add_hierarchy: true,
            highlight: default_highlight(),
            image_prefix: default_image_prefix(),
            direction: RankDirection::default(),
        }
    }
}

impl ReactionGraphOptions {
    /// Options for a single-chemical diagram: no closed-loop cluster.
    pub fn focused(&self) -> Self {
        Self { group_closed_loop: false, ..self.clone() }
    }
}

// ── Literature ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiteratureOptions {
    /// Papers published before this year are not added to the graph
    #[serde(default = "default_minimum_year")]
    pub minimum_year: i32,

    /// Only papers published strictly after this year anchor candidate regions
    #[serde(default = "default_anchor_after_year")]
    pub anchor_after_year: i32,

    /// Regions with fewer members score zero
    #[serde(default = "default_min_region_size")]
    pub min_region_size: usize,

    /// Title wrap width for rendered labels
    #[serde(default = "default_wrap_width")]
    pub wrap_width: usize,
}

fn default_minimum_year()      -> i32   { 2015 }
fn default_anchor_after_year() -> i32   { 2021 }
fn default_min_region_size()   -> usize { 5 }
fn default_wrap_width()        -> usize { 60 }

impl Default for LiteratureOptions {
    fn default() -> Self {
        Self {
            minimum_year: default_minimum_year(),
            anchor_after_year: default_anchor_after_year(),
            min_region_size: default_min_region_size(),
            wrap_width: default_wrap_width(),
        }
    }
}

// ── Images / Output ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Directory holding cached `chebi_<id>.png` structure images
    #[serde(default = "default_image_dir")]
    pub cache_dir: PathBuf,
}

fn default_image_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("polyloop")
        .join("img")
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self { cache_dir: default_image_dir() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
}

fn default_output_dir() -> PathBuf { PathBuf::from("output") }

impl Default for OutputConfig {
    fn default() -> Self {
        Self { directory: default_output_dir() }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl PipelineConfig {
    /// Load configuration from polyloop.toml.
    /// Checks POLYLOOP_CONFIG env var first, then current directory.
    pub fn load() -> Result<Self> {
        let path = std::env::var("POLYLOOP_CONFIG")
            .unwrap_or_else(|_| "polyloop.toml".to_string());

        if !Path::new(&path).exists() {
            return Err(PolyloopError::Config(format!(
                "Config file not found: {path}\n\
                 Copy polyloop.example.toml to polyloop.toml and edit it."
            )));
        }
        Self::from_toml_file(&path)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| PolyloopError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from JSON file
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let lit = &self.literature;
        if lit.min_region_size == 0 {
            return Err(PolyloopError::Config("literature.min_region_size must be at least 1".into()));
        }
        if lit.wrap_width == 0 {
            return Err(PolyloopError::Config("literature.wrap_width must be at least 1".into()));
        }
        if lit.anchor_after_year < lit.minimum_year {
            return Err(PolyloopError::Config(format!(
                "literature.anchor_after_year ({}) is earlier than literature.minimum_year ({})",
                lit.anchor_after_year, lit.minimum_year
            )));
        }
        Ok(())
    }

    /// Literature pipeline inputs, when both tables are configured.
    pub fn literature_tables(&self) -> Option<(&Path, &Path)> {
        match (&self.curation.papers, &self.curation.citations) {
            (Some(papers), Some(citations)) => Some((papers.as_path(), citations.as_path())),
            _ => None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
