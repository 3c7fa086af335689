//! Error types for the Autometa pipeline.
//!
//! Every failure a pipeline stage can signal is a variant of [`Error`]. Callers
//! that only care that *something* went wrong propagate `autometa::Result`;
//! callers that react to a particular failure match on the variant or on
//! [`Error::kind`].

use std::fmt;

use thiserror::Error;

/// Remediation text appended to every [`Error::DatabaseOutOfSync`] message.
///
/// Lines are flush-left with no leading blank line or trailing newline, so
/// the rendered error reads `context`, a newline, then this block.
pub const NCBI_RESYNC_INSTRUCTIONS: &str = "\
NCBI databases nodes.dmp, names.dmp, merged.dmp, prot.accession2taxid.gz and nr.gz may be out of sync.
Up-to-date databases may be downloaded at:
non-redundant protein database (nr) - ftp://ftp.ncbi.nlm.nih.gov/blast/db/FASTA/nr.gz
prot.accession2taxid.gz - ftp://ftp.ncbi.nlm.nih.gov/pub/taxonomy/accession2taxid/prot.accession2taxid.gz
taxdump.tar.gz - ftp://ftp.ncbi.nlm.nih.gov/pub/taxonomy/taxdump.tar.gz
Required files within taxdump tarball are *nodes.dmp*, *names.dmp* and *merged.dmp*";

/// Errors that can occur during Autometa operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A table is structurally incorrect, usually because the `contig`
    /// column used as the index is missing.
    #[error("{0}")]
    TableFormat(String),

    /// Binning finished without recovering any clusters.
    #[error("{0}")]
    Binning(String),

    /// A computed digest disagrees with the expected one.
    #[error("{0}")]
    ChecksumMismatch(String),

    /// An external program exited unsuccessfully or could not be started.
    #[error("{stderr}\ncommand:\n{command}")]
    ExternalTool { command: String, stderr: String },

    /// The NCBI reference databases disagree with each other.
    #[error("{context}\n{}", NCBI_RESYNC_INSTRUCTIONS)]
    DatabaseOutOfSync { context: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Discriminant of an [`Error`], for handlers that branch on the kind of
/// failure without borrowing the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TableFormat,
    Binning,
    ChecksumMismatch,
    ExternalTool,
    DatabaseOutOfSync,
    Io,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::TableFormat => "TableFormatError",
            ErrorKind::Binning => "BinningError",
            ErrorKind::ChecksumMismatch => "ChecksumMismatchError",
            ErrorKind::ExternalTool => "ExternalToolError",
            ErrorKind::DatabaseOutOfSync => "DatabaseOutOfSyncError",
            ErrorKind::Io => "IoError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    pub fn table_format(msg: impl Into<String>) -> Self {
        Error::TableFormat(msg.into())
    }

    pub fn binning(msg: impl Into<String>) -> Self {
        Error::Binning(msg.into())
    }

    pub fn checksum_mismatch(msg: impl Into<String>) -> Self {
        Error::ChecksumMismatch(msg.into())
    }

    /// `command` is the full command line as invoked; `stderr` is whatever the
    /// tool wrote to its error stream, possibly empty.
    pub fn external_tool(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Error::ExternalTool {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    pub fn database_out_of_sync(context: impl Into<String>) -> Self {
        Error::DatabaseOutOfSync {
            context: context.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TableFormat(_) => ErrorKind::TableFormat,
            Error::Binning(_) => ErrorKind::Binning,
            Error::ChecksumMismatch(_) => ErrorKind::ChecksumMismatch,
            Error::ExternalTool { .. } => ErrorKind::ExternalTool,
            Error::DatabaseOutOfSync { .. } => ErrorKind::DatabaseOutOfSync,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_variants() -> Vec<Error> {
        vec![
            Error::table_format("missing required column: contig"),
            Error::binning("no clusters recovered"),
            Error::checksum_mismatch("nr.gz: expected a, got b"),
            Error::external_tool("samtools sort", "boom"),
            Error::database_out_of_sync("merged.dmp is stale"),
            Error::from(std::io::Error::other("disk full")),
        ]
    }

    #[test]
    fn external_tool_rendering() {
        let err = Error::external_tool(
            "samtools sort -o out.bam in.bam",
            "samtools: command not found",
        );
        assert_eq!(
            err.to_string(),
            "samtools: command not found\ncommand:\nsamtools sort -o out.bam in.bam"
        );
    }

    #[test]
    fn external_tool_empty_stderr() {
        let err = Error::external_tool("prodigal -i in.fna", "");
        assert_eq!(err.to_string(), "\ncommand:\nprodigal -i in.fna");
    }

    #[test]
    fn external_tool_all_empty() {
        let err = Error::external_tool("", "");
        assert_eq!(err.kind(), ErrorKind::ExternalTool);
        assert_eq!(err.to_string(), "\ncommand:\n");
    }

    #[test]
    fn resync_block_is_flush_left() {
        assert!(!NCBI_RESYNC_INSTRUCTIONS.starts_with('\n'));
        assert!(!NCBI_RESYNC_INSTRUCTIONS.ends_with('\n'));
        for line in NCBI_RESYNC_INSTRUCTIONS.lines() {
            assert_eq!(line, line.trim_start());
        }
    }

    #[test]
    fn database_out_of_sync_rendering() {
        let context = "merged.dmp missing 14 taxids present in nodes.dmp";
        let rendered = Error::database_out_of_sync(context).to_string();
        assert_eq!(rendered, format!("{context}\n{NCBI_RESYNC_INSTRUCTIONS}"));
        assert!(rendered.starts_with("merged.dmp missing 14 taxids present in nodes.dmp\n"));
        for needle in ["nr.gz", "prot.accession2taxid.gz", "taxdump.tar.gz"] {
            assert!(rendered.contains(needle), "missing {needle}");
        }
    }

    #[test]
    fn resync_block_independent_of_context() {
        for context in ["", "a", "nodes.dmp\nnames.dmp", "ünïcode"] {
            let rendered = Error::database_out_of_sync(context).to_string();
            let (head, block) = rendered.split_at(context.len() + 1);
            assert_eq!(head, format!("{context}\n"));
            assert_eq!(block, NCBI_RESYNC_INSTRUCTIONS);
        }
    }

    #[test]
    fn resync_block_lists_taxdump_files() {
        for file in ["nodes.dmp", "names.dmp", "merged.dmp"] {
            assert!(NCBI_RESYNC_INSTRUCTIONS.contains(file));
        }
    }

    #[test]
    fn simple_variants_render_message() {
        assert_eq!(
            Error::table_format("missing required column: contig").to_string(),
            "missing required column: contig"
        );
        assert_eq!(Error::binning("").to_string(), "");
    }

    #[test]
    fn kinds_are_distinct() {
        let kinds: Vec<ErrorKind> = all_variants().iter().map(Error::kind).collect();
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn binning_is_not_checksum_mismatch() {
        let result: Result<()> = Err(Error::binning("no clusters recovered"));
        let handled = match result {
            Err(Error::ChecksumMismatch(_)) => "checksum",
            Err(_) => "root",
            Ok(()) => "ok",
        };
        assert_eq!(handled, "root");
    }

    #[test]
    fn every_variant_propagates_through_root() {
        fn raise(err: Error) -> Result<()> {
            Err(err)
        }
        fn stage(err: Error) -> Result<()> {
            raise(err)?;
            Ok(())
        }
        for err in all_variants() {
            let kind = err.kind();
            let caught = stage(err).unwrap_err();
            assert_eq!(caught.kind(), kind);
        }
    }

    #[test]
    fn boxes_as_std_error() {
        let boxed: Box<dyn std::error::Error + Send + Sync> =
            Box::new(Error::table_format("missing required column: contig"));
        let err = boxed.downcast::<Error>().unwrap();
        assert_eq!(err.kind(), ErrorKind::TableFormat);
    }

    #[test]
    fn kind_display_names() {
        assert_eq!(ErrorKind::ExternalTool.to_string(), "ExternalToolError");
        assert_eq!(ErrorKind::DatabaseOutOfSync.to_string(), "DatabaseOutOfSyncError");
    }
}
