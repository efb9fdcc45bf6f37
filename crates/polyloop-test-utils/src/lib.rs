//! polyloop-test-utils: Curation and literature fixtures for integration tests.
//!
//! The tables describe a small PET recycling network and a citation graph whose
//! best anchored region is known: paper 1001 with five descendants and six
//! distinct contributors.

use polyloop_common::config::{CurationPaths, PipelineConfig};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const REACTIONS_TSV: &str = "\
reaction\tinput\tinput name\toutput\toutput name\toutput 2\toutput 2 name\treagent\treagent name\ttype name\tkingdom\tdesc.
R1\tCHEBI:53259\tPET\tCHEBI:231672\tBHET\t\t\tCHEBI:30742\tethylene glycol\tglycolysis\tPET\t
R2\tCHEBI:231672\tBHET\tCHEBI:15702\tTPA\tCHEBI:30742\tethylene glycol\t\t\thydrolysis\tPET\t
R3\tCHEBI:53259\tPET\tCHEBI:156286\tDMT\t\t\tCHEBI:17790\tmethanol\tmethanolysis\tPET\t
R4\tCHEBI:156286\tDMT\tCHEBI:15702\tTPA\t\t\t\t\thydrolysis\tPET\t
R5\tCHEBI:53259\tPET\tCHEBI:15702\tTPA\tCHEBI:30742\tethylene glycol\t\t\tNA\tPET\tenzymatic
R6\tCHEBI:53227\tpolyethylene\tCHEBI:90001\t\t\t\t\t\tpyrolysis\tPE\t
";

pub const CONDITIONS_TSV: &str = "\
reaction\ttype\tgroup\tchemist\tcatalyst
R1\tglycolysis\t7\t0000-0001-0000-0001\tzinc acetate
R1\tglycolysis\t8\t\t
R2\thydrolysis\t\t\t
R3\tmethanolysis\t8.0\t\t
R4\thydrolysis\t7\t\t
R5\tenzymatic hydrolysis\t9\t\tLCC-ICCG
";

pub const LABS_TSV: &str = "\
group\tProfessor\tinstitution
7\tDr. Smith\tLeiden
8\tProf. Jones\tDelft
9\tDr. Ada Lee\tBonn
";

pub const CHEMICAL_HIERARCHY_TSV: &str = "\
child\tparent
CHEBI:231672\tCHEBI:53259
CHEBI:15702\tCHEBI:33575
";

pub const REACTION_HIERARCHY_TSV: &str = "\
child\tparent
R4\tR2
R2\tR99
";

pub const PAPERS_TSV: &str = "\
pubmed\tyear\ttitle\tprofessors
1001\t2023\tEnzymatic depolymerisation of post-consumer PET at industrial scale\tDr. Jane Smith,Prof. Bo Jones
1002\t2022\tGlycolysis of PET with ionic liquids\tDr. Ada Lee
1003\t2020\tPurification of BHET\tDr. Ana Garcia
1004\t2019\tRecovery of DMT from methanolysis\tProf. Wei Chen
1005\t2018\tCrystallisation of TPA\tDr. Jane Smith
1006\t2016\tPET hydrolases\tDr. Ravi Kumar
1007\t2014\tEarly PET recycling\tDr. Old Timer
1008\t2021\tAn unconnected paper\tDr. Solo Author
1009\t2022\tA paper without contributors\t
";

/// Headerless citing → cited pairs.
pub const CITATIONS_TSV: &str = "\
1001\t1002
1001\t1003
1002\t1004
1003\t1005
1004\t1006
1002\t1007
1001\t9999
1009\t1001
";

/// Anchored at 1001: 1001..=1006.
pub const BEST_REGION: [&str; 6] = ["1001", "1002", "1003", "1004", "1005", "1006"];

/// Curation and literature tables written into a temporary directory.
pub struct CurationFixture {
    dir: TempDir,
}

impl CurationFixture {
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let curation = dir.path().join("curation");
        std::fs::create_dir_all(&curation)?;
        for (name, content) in [
            ("reactions.tsv", REACTIONS_TSV),
            ("conditions.tsv", CONDITIONS_TSV),
            ("labs.tsv", LABS_TSV),
            ("chemical_hierarchy.tsv", CHEMICAL_HIERARCHY_TSV),
            ("reaction_hierarchy.tsv", REACTION_HIERARCHY_TSV),
            ("literature.tsv", PAPERS_TSV),
            ("citations.tsv", CITATIONS_TSV),
        ] {
            std::fs::write(curation.join(name), content)?;
        }
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.path().join("curation").join(file)
    }

    pub fn curation_paths(&self) -> CurationPaths {
        CurationPaths {
            labs: self.path("labs.tsv"),
            reactions: self.path("reactions.tsv"),
            conditions: self.path("conditions.tsv"),
            chemical_hierarchy: self.path("chemical_hierarchy.tsv"),
            reaction_hierarchy: self.path("reaction_hierarchy.tsv"),
            papers: Some(self.path("literature.tsv")),
            citations: Some(self.path("citations.tsv")),
        }
    }

    /// Defaults with every path pointing into the fixture and output under it.
    pub fn config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.curation = self.curation_paths();
        config.images.cache_dir = self.dir.path().join("img");
        config.output.directory = self.dir.path().join("output");
        config
    }
}
