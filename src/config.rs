use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::checksum::is_md5_hex;

#[derive(Debug, Clone, Deserialize)]
pub struct FileEntry {
    pub url: String,
    pub md5: String,
}

impl FileEntry {
    /// Local file name: the last path segment of the URL.
    pub fn filename(&self) -> Result<&str> {
        let path = self.url.split(['?', '#']).next().unwrap_or(&self.url);
        let filename = path.rsplit('/').next().unwrap_or("");
        if filename.is_empty() || filename == ".." || filename.contains('\\') {
            bail!("cannot extract filename from URL: '{}'", self.url);
        }
        Ok(filename)
    }
}

/// Locations and digests of the NCBI databases used for taxon assignment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
    pub taxdump: FileEntry,
    pub accession2taxid: FileEntry,
    pub nr: Option<FileEntry>,
}

impl DatabaseConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (name, entry) in self.file_entries() {
            if !is_md5_hex(&entry.md5) {
                bail!(
                    "invalid MD5 for '{name}': expected 32 hex characters, got '{}'",
                    entry.md5
                );
            }
            entry
                .filename()
                .with_context(|| format!("invalid URL for '{name}'"))?;
        }
        Ok(())
    }

    /// Iterate all file entries uniformly as (name, entry) pairs.
    pub fn file_entries(&self) -> impl Iterator<Item = (&str, &FileEntry)> {
        [
            ("taxdump", &self.taxdump),
            ("accession2taxid", &self.accession2taxid),
        ]
        .into_iter()
        .chain(self.nr.as_ref().map(|e| ("nr", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(json.as_bytes()).unwrap();
        f
    }

    #[test]
    fn valid_config_all_fields() {
        let json = r#"{
            "taxdump": { "url": "ftp://ftp.ncbi.nlm.nih.gov/pub/taxonomy/taxdump.tar.gz", "md5": "21f3ac4aa8245a99eb874082051b9dde" },
            "accession2taxid": { "url": "ftp://ftp.ncbi.nlm.nih.gov/pub/taxonomy/accession2taxid/prot.accession2taxid.gz", "md5": "c30471567037b2b2389d43c908c653e1" },
            "nr": { "url": "ftp://ftp.ncbi.nlm.nih.gov/blast/db/FASTA/nr.gz", "md5": "24b731562b9d4cae9e37b23404b5be16" }
        }"#;
        let f = write_config(json);
        let config = DatabaseConfig::from_file(f.path()).unwrap();
        assert_eq!(config.file_entries().count(), 3);
        assert_eq!(config.taxdump.filename().unwrap(), "taxdump.tar.gz");
        assert_eq!(config.nr.unwrap().filename().unwrap(), "nr.gz");
    }

    #[test]
    fn valid_config_nr_omitted() {
        let json = r#"{
            "taxdump": { "url": "https://example.com/taxdump.tar.gz", "md5": "21f3ac4aa8245a99eb874082051b9dde" },
            "accession2taxid": { "url": "https://example.com/prot.accession2taxid.gz", "md5": "c30471567037b2b2389d43c908c653e1" }
        }"#;
        let f = write_config(json);
        let config = DatabaseConfig::from_file(f.path()).unwrap();
        assert!(config.nr.is_none());
        assert_eq!(config.file_entries().count(), 2);
    }

    #[test]
    fn invalid_md5() {
        let json = r#"{
            "taxdump": { "url": "https://example.com/taxdump.tar.gz", "md5": "not_a_valid_md5" },
            "accession2taxid": { "url": "https://example.com/prot.accession2taxid.gz", "md5": "c30471567037b2b2389d43c908c653e1" }
        }"#;
        let f = write_config(json);
        let err = DatabaseConfig::from_file(f.path()).unwrap_err();
        assert!(err.to_string().contains("invalid MD5"));
    }

    #[test]
    fn url_without_filename() {
        let json = r#"{
            "taxdump": { "url": "https://example.com/taxonomy/", "md5": "21f3ac4aa8245a99eb874082051b9dde" },
            "accession2taxid": { "url": "https://example.com/prot.accession2taxid.gz", "md5": "c30471567037b2b2389d43c908c653e1" }
        }"#;
        let f = write_config(json);
        let err = DatabaseConfig::from_file(f.path()).unwrap_err();
        assert!(err.to_string().contains("invalid URL for 'taxdump'"));
    }

    #[test]
    fn filename_strips_query() {
        let entry = FileEntry {
            url: "https://example.com/nr.gz?token=abc".to_string(),
            md5: String::new(),
        };
        assert_eq!(entry.filename().unwrap(), "nr.gz");
    }
}
