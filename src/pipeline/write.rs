//! Incremental writer: persist one text file per document, exactly once.
//!
//! An existing output file marks its document as done; it is never
//! rewritten. Writes go to a `.partial-*` temporary file in the destination
//! directory and are linked into place without clobbering. A crash mid-write
//! leaves only a partial file, which the corpus assembler ignores. When two
//! runs race on the same document, the first rename wins and the second
//! reports [`WriteOutcome::AlreadyProcessed`].

use crate::error::CorpusError;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// File-name prefix of in-flight temporary files.
pub const PARTIAL_PREFIX: &str = ".partial-";

/// Result of [`write_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was created with `bytes` bytes.
    Written { bytes: usize },
    /// A file already existed at the destination; nothing was written.
    AlreadyProcessed,
}

/// Whether `path` already holds a finished output.
pub fn is_processed(path: &Path) -> bool {
    path.exists()
}

/// Whether `path` is a temporary file left by an interrupted write.
pub fn is_partial(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(PARTIAL_PREFIX))
}

/// Remove characters that cannot round-trip through the text file.
///
/// A `&str` is always valid UTF-8, so only NUL is removed. U+FFFD emitted by
/// the PDF engine is ordinary text and is kept.
pub fn strip_unencodable(text: &str) -> String {
    text.chars().filter(|&c| c != '\0').collect()
}

fn partial_file_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    tempfile::Builder::new()
        .prefix(PARTIAL_PREFIX)
        .tempfile_in(dir)
}

/// Atomically create `path` with `text`, unless it already exists.
///
/// The parent directory is created when absent.
pub fn write_text(path: &Path, text: &str) -> Result<WriteOutcome, CorpusError> {
    if is_processed(path) {
        return Ok(WriteOutcome::AlreadyProcessed);
    }
    create_new(path, text)
}

/// Write `text` to a partial file and link it to `path` without clobbering.
fn create_new(path: &Path, text: &str) -> Result<WriteOutcome, CorpusError> {
    let write_err = |source| CorpusError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let cleaned = strip_unencodable(text);
    let mut tmp = partial_file_in(dir).map_err(write_err)?;
    tmp.write_all(cleaned.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;

    match tmp.persist_noclobber(path) {
        Ok(_) => {
            debug!("Wrote {} bytes to {}", cleaned.len(), path.display());
            Ok(WriteOutcome::Written {
                bytes: cleaned.len(),
            })
        }
        Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
            // Another run finished this document between the check and now.
            Ok(WriteOutcome::AlreadyProcessed)
        }
        Err(e) => Err(write_err(e.error)),
    }
}

/// Atomically replace `path` with `bytes` (temp file + rename).
///
/// Used for artefacts that are regenerated on every run, such as the corpus
/// CSV and version metadata.
pub fn replace_file(path: &Path, bytes: &[u8]) -> Result<(), CorpusError> {
    let write_err = |source| CorpusError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let mut tmp = partial_file_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
