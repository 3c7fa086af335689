//! Loader for the NCBI taxdump files and the consistency check between them.
//!
//! Lines in `*.dmp` files are `\t|\t` delimited and terminated by `\t|`:
//!
//! ```text
//! 562\t|\t561\t|\tspecies\t|\t...\t|
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};

pub const NODES_DMP: &str = "nodes.dmp";
pub const NAMES_DMP: &str = "names.dmp";
pub const MERGED_DMP: &str = "merged.dmp";

/// Number of offending taxids quoted in an out-of-sync message.
const MAX_REPORTED_TAXIDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub parent: u32,
    pub rank: String,
}

#[derive(Debug, Clone, Default)]
pub struct TaxonomyDumps {
    nodes: HashMap<u32, Node>,
    names: HashMap<u32, String>,
    merged: HashMap<u32, u32>,
}

impl TaxonomyDumps {
    /// Loads `nodes.dmp`, `names.dmp` and `merged.dmp` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let open = |name: &str| -> Result<BufReader<File>> {
            Ok(BufReader::new(File::open(dir.join(name))?))
        };
        let dumps = Self::from_readers(open(NODES_DMP)?, open(NAMES_DMP)?, open(MERGED_DMP)?)?;
        tracing::debug!(
            dir = %dir.display(),
            nodes = dumps.nodes.len(),
            names = dumps.names.len(),
            merged = dumps.merged.len(),
            "loaded taxdump"
        );
        Ok(dumps)
    }

    pub fn from_readers<N, M, G>(nodes: N, names: M, merged: G) -> Result<Self>
    where
        N: BufRead,
        M: BufRead,
        G: BufRead,
    {
        let mut dumps = Self::default();

        for_each_record(nodes, NODES_DMP, 3, |fields| {
            let taxid = parse_taxid(fields[0], NODES_DMP)?;
            let parent = parse_taxid(fields[1], NODES_DMP)?;
            dumps.nodes.insert(
                taxid,
                Node {
                    parent,
                    rank: fields[2].to_string(),
                },
            );
            Ok(())
        })?;

        for_each_record(names, NAMES_DMP, 4, |fields| {
            if fields[3] == "scientific name" {
                let taxid = parse_taxid(fields[0], NAMES_DMP)?;
                dumps.names.insert(taxid, fields[1].to_string());
            }
            Ok(())
        })?;

        for_each_record(merged, MERGED_DMP, 2, |fields| {
            let old = parse_taxid(fields[0], MERGED_DMP)?;
            let new = parse_taxid(fields[1], MERGED_DMP)?;
            dumps.merged.insert(old, new);
            Ok(())
        })?;

        Ok(dumps)
    }

    /// Confirms the three dumps describe the same taxonomy release.
    ///
    /// Every merged.dmp target and every parent must be a node, and every node
    /// must have a scientific name. Any violation is reported as
    /// [`Error::DatabaseOutOfSync`].
    pub fn check_sync(&self) -> Result<()> {
        let mut problems = Vec::new();

        let missing_targets: BTreeSet<u32> = self
            .merged
            .values()
            .filter(|new| !self.nodes.contains_key(*new))
            .copied()
            .collect();
        if !missing_targets.is_empty() {
            problems.push(format!(
                "{MERGED_DMP} maps to {} taxids absent from {NODES_DMP} ({})",
                missing_targets.len(),
                sample(&missing_targets)
            ));
        }

        let missing_parents: BTreeSet<u32> = self
            .nodes
            .values()
            .map(|node| node.parent)
            .filter(|parent| !self.nodes.contains_key(parent))
            .collect();
        if !missing_parents.is_empty() {
            problems.push(format!(
                "{NODES_DMP} references {} parent taxids absent from {NODES_DMP} ({})",
                missing_parents.len(),
                sample(&missing_parents)
            ));
        }

        let unnamed: BTreeSet<u32> = self
            .nodes
            .keys()
            .filter(|taxid| !self.names.contains_key(*taxid))
            .copied()
            .collect();
        if !unnamed.is_empty() {
            problems.push(format!(
                "{NAMES_DMP} missing scientific names for {} taxids present in {NODES_DMP} ({})",
                unnamed.len(),
                sample(&unnamed)
            ));
        }

        if problems.is_empty() {
            return Ok(());
        }

        tracing::warn!(problems = problems.len(), "taxdump files out of sync");
        Err(Error::database_out_of_sync(problems.join("\n")))
    }

    /// Current taxid for `taxid`, following merged.dmp when it was retired.
    #[must_use]
    pub fn resolve(&self, taxid: u32) -> Option<u32> {
        if self.nodes.contains_key(&taxid) {
            return Some(taxid);
        }
        self.merged
            .get(&taxid)
            .copied()
            .filter(|new| self.nodes.contains_key(new))
    }

    #[must_use]
    pub fn node(&self, taxid: u32) -> Option<&Node> {
        self.nodes.get(&taxid)
    }

    #[must_use]
    pub fn name(&self, taxid: u32) -> Option<&str> {
        self.names.get(&taxid).map(String::as_str)
    }

    /// Taxids from `taxid` up to the root, inclusive. Empty if `taxid` is unknown.
    #[must_use]
    pub fn lineage(&self, taxid: u32) -> Vec<u32> {
        let mut lineage = Vec::new();
        let mut current = self.resolve(taxid);
        while let Some(id) = current {
            // Guard against cycles in a corrupt dump.
            if lineage.contains(&id) {
                break;
            }
            lineage.push(id);
            current = self
                .nodes
                .get(&id)
                .map(|node| node.parent)
                .filter(|parent| *parent != id);
        }
        lineage
    }

    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
}

fn for_each_record<R, F>(reader: R, file: &str, min_fields: usize, mut f: F) -> Result<()>
where
    R: BufRead,
    F: FnMut(&[&str]) -> Result<()>,
{
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = line.strip_suffix("\t|").unwrap_or(&line);
        let fields: Vec<&str> = record.split("\t|\t").map(str::trim).collect();
        if fields.len() < min_fields {
            return Err(Error::table_format(format!(
                "{file} line {} has {} fields, expected at least {min_fields}",
                idx + 1,
                fields.len()
            )));
        }
        f(&fields)?;
    }
    Ok(())
}

fn parse_taxid(s: &str, file: &str) -> Result<u32> {
    s.parse()
        .map_err(|e| Error::table_format(format!("{file}: invalid taxid '{s}': {e}")))
}

fn sample(taxids: &BTreeSet<u32>) -> String {
    let mut shown: Vec<String> = taxids
        .iter()
        .take(MAX_REPORTED_TAXIDS)
        .map(u32::to_string)
        .collect();
    if taxids.len() > MAX_REPORTED_TAXIDS {
        shown.push("...".to_string());
    }
    shown.join(", ")
}
