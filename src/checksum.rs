//! MD5 verification of downloaded reference files.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use md5::{Digest, Md5};

use crate::error::{Error, Result};

/// Lowercase MD5 hex digest of the file at `path`.
pub fn compute_md5(path: &Path) -> Result<String> {
    let file = File::open(path).inspect_err(|e| {
        tracing::debug!(path = %path.display(), error = %e, "cannot open file for digest");
    })?;
    let mut hasher = Md5::new();
    let bytes = io::copy(&mut BufReader::new(file), &mut hasher)?;
    tracing::debug!(path = %path.display(), bytes, "computed md5");
    Ok(format!("{:x}", hasher.finalize()))
}

/// Path of the `md5sum` sidecar NCBI publishes next to each file, e.g. `nr.gz.md5`.
#[must_use]
pub fn sidecar_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".md5");
    PathBuf::from(name)
}

/// Reads the expected digest from an `md5sum`-style file (`<hex>  <filename>`).
///
/// A sidecar without a valid digest is `InvalidData` I/O, not a mismatch:
/// nothing was compared.
pub fn read_md5_file(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)?;
    let digest = content.split_whitespace().next().unwrap_or("");
    if !is_md5_hex(digest) {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "{}: expected a 32 character hex digest, got '{digest}'",
                path.display()
            ),
        )));
    }
    Ok(digest.to_ascii_lowercase())
}

/// Verifies `path` against `expected`, ignoring hex case.
pub fn verify_md5(path: &Path, expected: &str) -> Result<()> {
    let actual = compute_md5(path)?;
    if !actual.eq_ignore_ascii_case(expected.trim()) {
        tracing::warn!(
            path = %path.display(),
            expected,
            actual = %actual,
            "checksum mismatch"
        );
        return Err(Error::checksum_mismatch(format!(
            "{}: expected {}, got {actual}",
            path.display(),
            expected.trim()
        )));
    }
    tracing::debug!(path = %path.display(), "checksum verified");
    Ok(())
}

/// Verifies `path` against the digest stored in its `.md5` sidecar.
pub fn verify_with_sidecar(path: &Path) -> Result<()> {
    let expected = read_md5_file(&sidecar_path(path))?;
    verify_md5(path, &expected)
}

pub(crate) fn is_md5_hex(s: &str) -> bool {
    s.len() == 32 && s.chars().all(|c| c.is_ascii_hexdigit())
}
