//! Source enumeration: list candidate documents in a directory.
//!
//! No extension filtering happens here; stray files are left for the
//! validator to reject with a logged reason. Sub-directories are not
//! candidates. Results are sorted by file name so two runs over the same
//! directory visit documents in the same order on every platform.

use crate::error::CorpusError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// List the regular files directly inside `dir`, sorted by file name.
///
/// # Errors
/// * [`CorpusError::InputDirMissing`] when `dir` does not exist or is not a directory
/// * [`CorpusError::DirectoryUnreadable`] when it cannot be listed
pub fn list_candidates(dir: &Path) -> Result<Vec<PathBuf>, CorpusError> {
    if !dir.is_dir() {
        return Err(CorpusError::InputDirMissing {
            path: dir.to_path_buf(),
        });
    }
    list_files(dir)
}

/// List the regular files directly inside `dir`, sorted by file name.
///
/// Shared by the converter (input directory) and the corpus assembler
/// (text directory).
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>, CorpusError> {
    let unreadable = |source| CorpusError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let path = entry.path();
        // `metadata` follows symlinks, so a link to a PDF is a candidate.
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => {
                debug!("Skipping sub-directory {}", path.display());
            }
            // Unreadable metadata: keep it, the validator logs why it fails.
            _ => files.push(path),
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("Found {} files in {}", files.len(), dir.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dir_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let err = list_candidates(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, CorpusError::InputDirMissing { .. }));
    }

    #[test]
    fn file_instead_of_dir_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("f");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(
            list_candidates(&file),
            Err(CorpusError::InputDirMissing { .. })
        ));
    }

    #[test]
    fn lists_files_sorted_without_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("b.pdf"), b"x").unwrap();
        std::fs::write(tmp.path().join("a.pdf"), b"x").unwrap();
        std::fs::write(tmp.path().join("c.txt"), b"x").unwrap();
        std::fs::create_dir(tmp.path().join("sub")).unwrap();

        let names: Vec<String> = list_candidates(tmp.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf", "c.txt"]);
    }

    #[test]
    fn empty_dir_lists_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(list_candidates(tmp.path()).unwrap().is_empty());
    }
}
