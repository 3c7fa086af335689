//! Summary of cluster assignments produced by a binning stage.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::table::ContigTable;

/// Label binning stages write for contigs left out of every cluster.
pub const UNCLUSTERED: &str = "unclustered";

#[derive(Debug, Clone, Default)]
pub struct BinningSummary {
    clusters: BTreeMap<String, Vec<String>>,
    unclustered: Vec<String>,
}

impl BinningSummary {
    /// Groups contigs by cluster. Contigs assigned `None`, an empty label or
    /// [`UNCLUSTERED`] are kept aside.
    ///
    /// Fails with [`Error::Binning`] when no contig landed in a cluster.
    pub fn from_assignments<I, C, L>(assignments: I) -> Result<Self>
    where
        I: IntoIterator<Item = (C, Option<L>)>,
        C: Into<String>,
        L: AsRef<str>,
    {
        let mut summary = Self::default();
        for (contig, label) in assignments {
            let contig = contig.into();
            match label.as_ref().map(|l| l.as_ref().trim()) {
                Some(l) if !l.is_empty() && !l.eq_ignore_ascii_case(UNCLUSTERED) => {
                    summary.clusters.entry(l.to_string()).or_default().push(contig);
                }
                _ => summary.unclustered.push(contig),
            }
        }

        if summary.clusters.is_empty() {
            tracing::warn!(
                unclustered = summary.unclustered.len(),
                "binning recovered no clusters"
            );
            return Err(Error::binning("no clusters recovered"));
        }

        tracing::debug!(
            clusters = summary.clusters.len(),
            unclustered = summary.unclustered.len(),
            "binning summary"
        );
        Ok(summary)
    }

    /// Reads assignments from `column` of a contig table.
    pub fn from_table(table: &ContigTable, column: &str) -> Result<Self> {
        let labels = table.require_column(column)?;
        Self::from_assignments(table.contigs().zip(labels.into_iter().map(Some)))
    }

    #[must_use]
    pub fn num_clusters(&self) -> usize {
        self.clusters.len()
    }

    pub fn cluster_names(&self) -> impl Iterator<Item = &str> {
        self.clusters.keys().map(String::as_str)
    }

    #[must_use]
    pub fn members(&self, cluster: &str) -> Option<&[String]> {
        self.clusters.get(cluster).map(Vec::as_slice)
    }

    #[must_use]
    pub fn unclustered(&self) -> &[String] {
        &self.unclustered
    }
}
