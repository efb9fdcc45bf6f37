//! Paper and citation tables.

use polyloop_common::tsv::{self, nullable, TableSpec};
use polyloop_common::Result;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::debug;

pub const PAPERS_TABLE: TableSpec = TableSpec {
    name: "papers",
    columns: &[&["pubmed", "id"], &["year"], &["title"], &["professors"]],
};

/// One paper record. The identifier sits under `pubmed`, `id`, or both.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PaperRow {
    #[serde(default, deserialize_with = "nullable")]
    pub pubmed: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub title: Option<String>,
    /// Comma-joined contributor names.
    #[serde(default, deserialize_with = "nullable")]
    pub professors: Option<String>,
}

impl PaperRow {
    /// `pubmed` when set, otherwise `id`.
    pub fn identifier(&self) -> Option<&str> {
        self.pubmed.as_deref().or(self.id.as_deref())
    }

    pub fn year(&self) -> Option<i32> {
        self.year.as_deref().and_then(tsv::parse_year)
    }
}

/// citing → cited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationPair {
    pub source: String,
    pub target: String,
}

pub fn read_papers(path: impl AsRef<Path>) -> Result<Vec<PaperRow>> {
    tsv::read_table_file(path, &PAPERS_TABLE)
}

/// Read tab-separated citation pairs. The file is usually headerless; a
/// leading `source\ttarget` row is skipped when present.
pub fn read_citations<R: Read>(reader: R) -> Result<Vec<CitationPair>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut pairs = Vec::new();
    let mut skipped = 0usize;
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let (Some(source), Some(target)) = (record.get(0), record.get(1)) else {
            skipped += 1;
            continue;
        };
        let (source, target) = (source.trim(), target.trim());
        if i == 0 && source == "source" && target == "target" {
            continue;
        }
        if source.is_empty() || target.is_empty() {
            skipped += 1;
            continue;
        }
        pairs.push(CitationPair { source: source.to_string(), target: target.to_string() });
    }
    debug!(pairs = pairs.len(), skipped, "Loaded citations");
    Ok(pairs)
}

pub fn read_citations_file(path: impl AsRef<Path>) -> Result<Vec<CitationPair>> {
    let file = std::fs::File::open(path.as_ref())?;
    read_citations(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyloop_common::tsv::read_table;

    #[test]
    fn test_papers_accept_id_column() {
        let data = "id\tyear\ttitle\tprofessors\n42\t2019.0\tA title\tDr. A Smith\n43\t\tNo year\t\n";
        let rows: Vec<PaperRow> = read_table(data.as_bytes(), &PAPERS_TABLE).unwrap();
        assert_eq!(rows[0].identifier(), Some("42"));
        assert_eq!(rows[0].year(), Some(2019));
        assert_eq!(rows[1].year(), None);
        assert_eq!(rows[1].professors, None);
    }

    #[test]
    fn test_papers_with_pubmed_and_id_columns() {
        let data = "pubmed\tid\tyear\ttitle\tprofessors\n\
                    42\t7\t2020\tBoth ids\tDr. A Smith\n\
                    \t8\t2021\tOnly id\tDr. B Jones\n\
                    NA\t\t2022\tNo id\tDr. C Lee\n";
        let rows: Vec<PaperRow> = read_table(data.as_bytes(), &PAPERS_TABLE).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].identifier(), Some("42"));
        assert_eq!(rows[1].identifier(), Some("8"));
        assert_eq!(rows[2].identifier(), None);
    }

    #[test]
    fn test_citations_headerless_and_headed() {
        let bare = read_citations("1\t2\n2\t3\n".as_bytes()).unwrap();
        assert_eq!(bare.len(), 2);
        assert_eq!(bare[0], CitationPair { source: "1".into(), target: "2".into() });

        let headed = read_citations("source\ttarget\n1\t2\n".as_bytes()).unwrap();
        assert_eq!(headed, vec![CitationPair { source: "1".into(), target: "2".into() }]);
    }

    #[test]
    fn test_short_citation_rows_skipped() {
        let pairs = read_citations("1\n1\t\n3\t4\n".as_bytes()).unwrap();
        assert_eq!(pairs, vec![CitationPair { source: "3".into(), target: "4".into() }]);
    }
}
