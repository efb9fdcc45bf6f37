//! polyloop-common: Shared types, errors, configuration and table reading
//! used across all Polyloop crates.

pub mod error;
pub mod entities;
pub mod config;
pub mod tsv;

// Re-export commonly used types
pub use config::{
    CurationPaths, ImageConfig, LiteratureOptions, OutputConfig, PipelineConfig,
    RankDirection, ReactionGraphOptions,
};
pub use entities::{
    ChemicalAttrs, Entity, NodeAttrs, NodeKind, PublicationAttrs, ReactionAttrs, Relation,
    RelationKind,
};
pub use error::{PolyloopError, Result};
