//! polyloop-reactions: Reaction network assembly from the curated
//! reaction, condition, lab and hierarchy tables.

pub mod tables;
pub mod conditions;
pub mod images;
pub mod assembler;
pub mod context;

pub use assembler::{ReactionGraphAssembler, ReactionNetwork, CLOSED_LOOP_CLUSTER};
pub use conditions::{lab_display_names, ConditionGroups, EXTERNAL_GROUP};
pub use context::{CurationContext, CurationTables};
pub use images::{ImageCacheDirectory, MockImageSource, NoImages, StructureImageSource};
pub use tables::{ConditionRow, HierarchyRow, LabRow, ReactionRow};
