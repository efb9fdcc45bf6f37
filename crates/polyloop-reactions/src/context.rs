//! Curation context: every curation table loaded and joined once, then
//! shared read-only by each diagram request.

use polyloop_common::config::{CurationPaths, ReactionGraphOptions};
use polyloop_common::Result;
use std::collections::{BTreeSet, HashMap};
use tracing::info;

use crate::assembler::{ReactionGraphAssembler, ReactionNetwork};
use crate::conditions::{lab_display_names, ConditionGroups};
use crate::images::StructureImageSource;
use crate::tables::{self, ConditionRow, HierarchyRow, LabRow, ReactionRow};

/// Raw curation tables.
#[derive(Debug, Clone, Default)]
pub struct CurationTables {
    pub reactions: Vec<ReactionRow>,
    pub conditions: Vec<ConditionRow>,
    pub labs: Vec<LabRow>,
    pub chemical_hierarchy: Vec<HierarchyRow>,
    pub reaction_hierarchy: Vec<HierarchyRow>,
}

impl CurationTables {
    pub fn read(paths: &CurationPaths) -> Result<Self> {
        Ok(Self {
            reactions: tables::read_reactions(&paths.reactions)?,
            conditions: tables::read_conditions(&paths.conditions)?,
            labs: tables::read_labs(&paths.labs)?,
            chemical_hierarchy: tables::read_hierarchy(&paths.chemical_hierarchy)?,
            reaction_hierarchy: tables::read_hierarchy(&paths.reaction_hierarchy)?,
        })
    }
}

pub struct CurationContext {
    tables: CurationTables,
    lab_names: HashMap<String, String>,
    conditions: ConditionGroups,
    options: ReactionGraphOptions,
    images: Box<dyn StructureImageSource>,
}

impl CurationContext {
    /// Read the tables named in `paths` and build the context.
    pub fn load(
        paths: &CurationPaths,
        options: ReactionGraphOptions,
        images: Box<dyn StructureImageSource>,
    ) -> Result<Self> {
        let tables = CurationTables::read(paths)?;
        Ok(Self::from_tables(tables, options, images))
    }

    pub fn from_tables(
        tables: CurationTables,
        options: ReactionGraphOptions,
        images: Box<dyn StructureImageSource>,
    ) -> Self {
        let lab_names = lab_display_names(&tables.labs);
        let conditions = ConditionGroups::fold(&tables.conditions, &lab_names);
        info!(
            reactions = tables.reactions.len(),
            conditions = tables.conditions.len(),
            labs = lab_names.len(),
            "Curation context ready"
        );
        Self { tables, lab_names, conditions, options, images }
    }

    pub fn tables(&self) -> &CurationTables {
        &self.tables
    }

    pub fn options(&self) -> &ReactionGraphOptions {
        &self.options
    }

    pub fn lab_name(&self, group: &str) -> Option<&str> {
        self.lab_names.get(group).map(String::as_str)
    }

    pub fn condition_groups(&self) -> &ConditionGroups {
        &self.conditions
    }

    /// Distinct kingdoms, sorted.
    pub fn kingdoms(&self) -> Vec<&str> {
        let kingdoms: BTreeSet<&str> = self
            .tables
            .reactions
            .iter()
            .filter_map(|r| r.kingdom.as_deref())
            .collect();
        kingdoms.into_iter().collect()
    }

    fn assembler<'a>(&'a self, options: &'a ReactionGraphOptions) -> ReactionGraphAssembler<'a> {
        ReactionGraphAssembler::new(options, &self.conditions, &*self.images)
            .with_hierarchy(&self.tables.chemical_hierarchy, &self.tables.reaction_hierarchy)
    }

    /// One network per kingdom with the configured options.
    pub fn kingdom_networks(&self) -> Vec<ReactionNetwork> {
        self.assembler(&self.options).assemble_by_kingdom(&self.tables.reactions)
    }

    /// Reactions consuming `curie`, without the closed-loop cluster.
    pub fn substrate_network(&self, curie: &str) -> ReactionNetwork {
        self.focused_network(|row| row.input.as_deref() == Some(curie))
    }

    /// Reactions producing `curie` as primary output, without the closed-loop cluster.
    pub fn product_network(&self, curie: &str) -> ReactionNetwork {
        self.focused_network(|row| row.output.as_deref() == Some(curie))
    }

    fn focused_network(&self, keep: impl Fn(&ReactionRow) -> bool) -> ReactionNetwork {
        let rows: Vec<ReactionRow> = self.tables.reactions.iter().filter(|r| keep(r)).cloned().collect();
        let options = self.options.focused();
        self.assembler(&options).assemble(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::NoImages;
    use polyloop_common::entities::RelationKind;

    fn reaction(id: &str, input: &str, output: &str) -> ReactionRow {
        ReactionRow {
            reaction: id.into(),
            input: Some(input.into()),
            output: Some(output.into()),
            kingdom: Some("PET".into()),
            ..Default::default()
        }
    }

    fn context() -> CurationContext {
        let tables = CurationTables {
            reactions: vec![
                reaction("R1", "CHEBI:53259", "CHEBI:231672"),
                reaction("R2", "CHEBI:231672", "CHEBI:15702"),
                reaction("R3", "CHEBI:53259", "CHEBI:15702"),
            ],
            chemical_hierarchy: vec![HierarchyRow { child: "CHEBI:231672".into(), parent: "CHEBI:53259".into() }],
            ..Default::default()
        };
        CurationContext::from_tables(tables, ReactionGraphOptions::default(), Box::new(NoImages))
    }

    #[test]
    fn test_substrate_network_selects_by_input() {
        let ctx = context();
        let net = ctx.substrate_network("CHEBI:53259");
        let reactions: Vec<&str> = net.graph.node_ids().filter(|id| id.starts_with('R')).collect();
        assert_eq!(reactions, vec!["R1", "R3"]);
        assert!(net.closed_loop.is_none());
        assert!(net.graph.has_edge("CHEBI:231672", "CHEBI:53259", RelationKind::IsA));
    }

    #[test]
    fn test_product_network_selects_by_output() {
        let ctx = context();
        let net = ctx.product_network("CHEBI:15702");
        assert!(net.graph.contains("R2"));
        assert!(net.graph.contains("R3"));
        assert!(!net.graph.contains("R1"));
    }

    #[test]
    fn test_unknown_chemical_gives_empty_network() {
        let ctx = context();
        assert!(ctx.substrate_network("CHEBI:0").graph.is_empty());
    }

    #[test]
    fn test_kingdom_networks_keep_closed_loop() {
        let ctx = context();
        assert_eq!(ctx.kingdoms(), vec!["PET"]);
        let nets = ctx.kingdom_networks();
        assert_eq!(nets.len(), 1);
        let cluster = nets[0].closed_loop.as_ref().unwrap();
        assert!(cluster.contains("R1") && cluster.contains("R2") && cluster.contains("R3"));
    }
}
