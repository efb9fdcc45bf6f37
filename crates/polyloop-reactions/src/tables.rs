//! Row types for the curation tables.

use polyloop_common::tsv::{self, nullable, TableSpec};
use polyloop_common::Result;
use serde::Deserialize;
use std::path::Path;

pub const REACTIONS_TABLE: TableSpec = TableSpec {
    name: "reactions",
    columns: &[
        &["reaction"],
        &["input"],
        &["input name"],
        &["output"],
        &["output name"],
        &["output 2"],
        &["output 2 name"],
        &["reagent"],
        &["reagent name"],
        &["type name"],
        &["kingdom"],
    ],
};

pub const CONDITIONS_TABLE: TableSpec = TableSpec {
    name: "conditions",
    columns: &[&["reaction"], &["method", "type"], &["group"]],
};

pub const LABS_TABLE: TableSpec = TableSpec {
    name: "labs",
    columns: &[&["group"], &["Professor"]],
};

pub const HIERARCHY_TABLE: TableSpec = TableSpec {
    name: "hierarchy",
    columns: &[&["child"], &["parent"]],
};

/// One curated reaction: a single input, up to two outputs, an optional reagent.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ReactionRow {
    pub reaction: String,
    #[serde(default, deserialize_with = "nullable")]
    pub input: Option<String>,
    #[serde(rename = "input name", default, deserialize_with = "nullable")]
    pub input_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub output: Option<String>,
    #[serde(rename = "output name", default, deserialize_with = "nullable")]
    pub output_name: Option<String>,
    #[serde(rename = "output 2", default, deserialize_with = "nullable")]
    pub output_2: Option<String>,
    #[serde(rename = "output 2 name", default, deserialize_with = "nullable")]
    pub output_2_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub reagent: Option<String>,
    #[serde(rename = "reagent name", default, deserialize_with = "nullable")]
    pub reagent_name: Option<String>,
    #[serde(rename = "type name", default, deserialize_with = "nullable")]
    pub type_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub kingdom: Option<String>,
}

impl ReactionRow {
    /// (identifier, display name) pairs for every chemical column, in
    /// input, output, output 2, reagent order.
    pub fn chemicals(&self) -> [(Option<&str>, Option<&str>); 4] {
        [
            (self.input.as_deref(), self.input_name.as_deref()),
            (self.output.as_deref(), self.output_name.as_deref()),
            (self.output_2.as_deref(), self.output_2_name.as_deref()),
            (self.reagent.as_deref(), self.reagent_name.as_deref()),
        ]
    }
}

/// Experimental condition record; only the columns used for labels are read.
/// Tables carry the method under `method`, `type`, or both.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ConditionRow {
    pub reaction: String,
    #[serde(default, deserialize_with = "nullable")]
    pub method: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub condition_type: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub group: Option<String>,
}

impl ConditionRow {
    /// `method` when set, otherwise `type`.
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref().or(self.condition_type.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LabRow {
    pub group: String,
    #[serde(rename = "Professor", default, deserialize_with = "nullable")]
    pub professor: Option<String>,
}

/// A child → parent "is-a" pair.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct HierarchyRow {
    pub child: String,
    pub parent: String,
}

pub fn read_reactions(path: impl AsRef<Path>) -> Result<Vec<ReactionRow>> {
    tsv::read_table_file(path, &REACTIONS_TABLE)
}

pub fn read_conditions(path: impl AsRef<Path>) -> Result<Vec<ConditionRow>> {
    tsv::read_table_file(path, &CONDITIONS_TABLE)
}

pub fn read_labs(path: impl AsRef<Path>) -> Result<Vec<LabRow>> {
    tsv::read_table_file(path, &LABS_TABLE)
}

pub fn read_hierarchy(path: impl AsRef<Path>) -> Result<Vec<HierarchyRow>> {
    tsv::read_table_file(path, &HIERARCHY_TABLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyloop_common::tsv::read_table;

    #[test]
    fn test_reaction_row_columns() {
        let data = "reaction\tinput\tinput name\toutput\toutput name\toutput 2\toutput 2 name\treagent\treagent name\ttype name\tkingdom\tdesc.\n\
                    R1\tCHEBI:53259\tPET\tCHEBI:15702\tTPA\t\t\tCHEBI:29228\tsodium hydroxide\thydrolysis\tPET\tsome text\n";
        let rows: Vec<ReactionRow> = read_table(data.as_bytes(), &REACTIONS_TABLE).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.input.as_deref(), Some("CHEBI:53259"));
        assert_eq!(row.output_2, None);
        assert_eq!(row.reagent_name.as_deref(), Some("sodium hydroxide"));
        assert_eq!(row.type_name.as_deref(), Some("hydrolysis"));
        assert_eq!(row.kingdom.as_deref(), Some("PET"));
    }

    #[test]
    fn test_conditions_accept_method_column() {
        let data = "reaction\tmethod\tgroup\tchemist\nR1\tenzymatic\t\t0000-0001\n";
        let rows: Vec<ConditionRow> = read_table(data.as_bytes(), &CONDITIONS_TABLE).unwrap();
        assert_eq!(rows[0].method(), Some("enzymatic"));
        assert_eq!(rows[0].group, None);
    }

    #[test]
    fn test_conditions_with_method_and_type_columns() {
        let data = "reaction\tmethod\ttype\tgroup\n\
                    R1\tenzymatic\thydrolysis\t7\n\
                    R2\t\tglycolysis\t8\n\
                    R3\tNA\t\t9\n";
        let rows: Vec<ConditionRow> = read_table(data.as_bytes(), &CONDITIONS_TABLE).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].method(), Some("enzymatic"));
        assert_eq!(rows[1].method(), Some("glycolysis"));
        assert_eq!(rows[2].method(), None);
        assert_eq!(rows[0].group.as_deref(), Some("7"));
    }

    #[test]
    fn test_conditions_accept_type_column() {
        let data = "reaction\ttype\tgroup\nR1\thydrolysis\t7\n";
        let rows: Vec<ConditionRow> = read_table(data.as_bytes(), &CONDITIONS_TABLE).unwrap();
        assert_eq!(rows[0].method, None);
        assert_eq!(rows[0].method(), Some("hydrolysis"));
    }
}
