//! Buffered zone-file writer with atomic, change-detecting publication.

use rpz_core::{Result, RpzError};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Comment prefix carrying the embedded content digest.
const DIGEST_PREFIX: &str = "; md5sum: ";

/// Writes zone lines into a temporary file next to the destination and
/// replaces the destination atomically at [`ZoneWriter::finish`] — and only
/// when the content digest differs from the one embedded in the previous
/// artifact. Dropping the writer without finishing discards the temporary
/// file, so an aborted run never touches the destination.
pub struct ZoneWriter {
    destination: PathBuf,
    out: BufWriter<NamedTempFile>,
}

impl ZoneWriter {
    /// Open a temporary file in the destination's directory and write the
    /// header block into it.
    pub fn create(destination: &Path, header: &[String]) -> Result<Self> {
        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = tempfile::Builder::new()
            .prefix(".rpzgen-")
            .tempfile_in(dir)
            .map_err(|e| write_error(destination, format!("cannot create temp file: {e}")))?;
        debug!(path = %temp.path().display(), "temporary file created");

        let mut writer = Self {
            destination: destination.to_path_buf(),
            out: BufWriter::new(temp),
        };
        for line in header {
            writer.write_line(line)?;
        }
        Ok(writer)
    }

    /// Destination path this writer publishes to.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Append one line to the artifact being built.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{line}")
            .map_err(|e| write_error(&self.destination, format!("write failed: {e}")))
    }

    /// Write the digest trailer, then publish the artifact if its digest
    /// differs from the previous run's. Returns whether the destination was
    /// replaced.
    pub fn finish(mut self, digest: &str) -> Result<bool> {
        self.write_line("")?;
        self.write_line(&format!("{DIGEST_PREFIX}{digest}"))?;

        let temp = self
            .out
            .into_inner()
            .map_err(|e| write_error(&self.destination, format!("flush failed: {e}")))?;

        if embedded_digest(&self.destination).as_deref() == Some(digest) {
            info!(
                path = %self.destination.display(),
                "content unchanged, destination left in place"
            );
            return Ok(false);
        }

        temp.persist(&self.destination)
            .map_err(|e| write_error(&self.destination, format!("atomic replace failed: {e}")))?;
        info!(path = %self.destination.display(), "zone file published");
        Ok(true)
    }
}

fn write_error(path: &Path, reason: String) -> RpzError {
    RpzError::Write {
        path: path.display().to_string(),
        reason,
    }
}

/// Extract the 32-hex-digit digest embedded in an existing artifact.
///
/// A missing, unreadable or digest-less file yields `None`, which the
/// publish decision treats as "changed".
#[must_use]
pub fn embedded_digest(path: &Path) -> Option<String> {
    let file = std::fs::File::open(path).ok()?;
    for line in BufReader::new(file).lines() {
        let line = line.ok()?;
        if let Some(rest) = line.strip_prefix(DIGEST_PREFIX) {
            let digest = rest.trim();
            if digest.len() == 32 && digest.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Some(digest.to_string());
            }
        }
    }
    None
}
