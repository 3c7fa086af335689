//! Reader for tab-separated contig tables.
//!
//! Autometa passes per-contig data between stages as TSV files indexed by a
//! `contig` column (coverage, GC content, taxonomy, cluster assignments).

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::{Error, Result};

/// Name of the column every contig table is indexed by.
pub const CONTIG_COLUMN: &str = "contig";

#[derive(Debug, Clone)]
pub struct ContigTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    contig_idx: usize,
}

impl ContigTable {
    /// Opens a table from disk, decompressing when the name ends in `.gz`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let is_gz = path.extension().is_some_and(|ext| ext == "gz");
        if is_gz {
            Self::from_reader(BufReader::new(GzDecoder::new(file)))
        } else {
            Self::from_reader(BufReader::new(file))
        }
    }

    /// Parses a table whose first non-empty line is the header.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader.lines().enumerate();

        let columns: Vec<String> = loop {
            match lines.next() {
                Some((_, line)) => {
                    let line = line?;
                    let line = line.trim_end_matches(['\r', '\n']);
                    if line.trim().is_empty() {
                        continue;
                    }
                    break line.split('\t').map(|c| c.trim().to_string()).collect();
                }
                None => return Err(Error::table_format("table is empty: no header line")),
            }
        };

        let mut seen = HashSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(Error::table_format(format!(
                    "duplicate column in header: {name}"
                )));
            }
        }

        let contig_idx = columns
            .iter()
            .position(|c| c == CONTIG_COLUMN)
            .ok_or_else(|| {
                Error::table_format(format!("missing required column: {CONTIG_COLUMN}"))
            })?;

        let mut rows = Vec::new();
        for (idx, line) in lines {
            let line = line?;
            let line = line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<String> = line.split('\t').map(str::to_string).collect();
            if fields.len() != columns.len() {
                return Err(Error::table_format(format!(
                    "line {} has {} fields, expected {}",
                    idx + 1,
                    fields.len(),
                    columns.len()
                )));
            }
            rows.push(fields);
        }

        tracing::debug!(columns = columns.len(), rows = rows.len(), "parsed contig table");

        Ok(Self {
            columns,
            rows,
            contig_idx,
        })
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn contigs(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row[self.contig_idx].as_str())
    }

    /// Values of a column in row order, or `None` if the column is absent.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Like [`column`](Self::column) but a missing column is a format error.
    pub fn require_column(&self, name: &str) -> Result<Vec<&str>> {
        self.column(name)
            .ok_or_else(|| Error::table_format(format!("missing required column: {name}")))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
