//! Document validation: check the PDF magic bytes before parsing.
//!
//! Candidates come from an uncontrolled download directory and may include
//! HTML error pages or other stray files. Checking `%PDF` up front gives a
//! meaningful skip reason instead of an engine error, and never hands
//! garbage to pdfium.

use crate::error::SkipReason;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Magic signature every PDF starts with.
pub const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// Read the first bytes of `path` and compare them with [`PDF_MAGIC`].
///
/// Returns `Ok(())` to accept, or the reason for rejecting.
pub fn check_pdf_header(path: &Path) -> Result<(), SkipReason> {
    let file = std::fs::File::open(path).map_err(|e| SkipReason::Unreadable {
        detail: e.to_string(),
    })?;

    let mut magic = Vec::with_capacity(PDF_MAGIC.len());
    file.take(PDF_MAGIC.len() as u64)
        .read_to_end(&mut magic)
        .map_err(|e| SkipReason::Unreadable {
            detail: e.to_string(),
        })?;

    check_magic(&magic)?;
    debug!("Valid PDF header: {}", path.display());
    Ok(())
}

/// Compare an in-memory prefix with [`PDF_MAGIC`].
pub fn check_magic(prefix: &[u8]) -> Result<(), SkipReason> {
    if prefix.len() < PDF_MAGIC.len() {
        return Err(SkipReason::TooShort { len: prefix.len() });
    }
    let head = &prefix[..PDF_MAGIC.len()];
    if head != PDF_MAGIC {
        return Err(SkipReason::NotAPdf {
            magic: head.to_vec(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_pdf_header() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("a.pdf");
        std::fs::write(&p, b"%PDF-1.7\n...").unwrap();
        assert_eq!(check_pdf_header(&p), Ok(()));
    }

    #[test]
    fn rejects_wrong_magic() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("c.txt");
        std::fs::write(&p, b"hello world").unwrap();
        assert_eq!(
            check_pdf_header(&p),
            Err(SkipReason::NotAPdf {
                magic: b"hell".to_vec()
            })
        );
    }

    #[test]
    fn rejects_short_file() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("short");
        std::fs::write(&p, b"%P").unwrap();
        assert_eq!(check_pdf_header(&p), Err(SkipReason::TooShort { len: 2 }));
    }

    #[test]
    fn missing_file_is_unreadable() {
        let tmp = tempfile::tempdir().unwrap();
        let err = check_pdf_header(&tmp.path().join("gone.pdf")).unwrap_err();
        assert!(matches!(err, SkipReason::Unreadable { .. }));
    }

    #[test]
    fn magic_is_case_sensitive() {
        assert!(check_magic(b"%pdf-1.4").is_err());
        assert!(check_magic(b"%PDF").is_ok());
    }
}
