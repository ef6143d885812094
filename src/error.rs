//! Error types for the writings-corpus library.
//!
//! Three error types reflect three distinct failure scopes:
//!
//! * [`CorpusError`] is **fatal**. A stage cannot proceed at all (input
//!   directory missing, nothing to convert, corpus cannot be written, version
//!   metadata unreadable). Returned as `Err(CorpusError)` from the top-level
//!   stage functions.
//!
//! * [`SkipReason`] is **non-fatal, per document**. A candidate file is not a
//!   PDF, cannot be read or opened, or its text file cannot be written. The document is skipped and
//!   the run moves on. Stored in [`crate::output::DocumentReport`].
//!
//! * [`PageError`] is **non-fatal, per page**. One page of an otherwise good
//!   document failed to yield text. The page counts as empty. Stored in
//!   [`crate::output::PageOutcome`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the writings-corpus library.
#[derive(Debug, Error)]
pub enum CorpusError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The configured input directory does not exist.
    #[error("Input directory not found: '{path}'\nRun the crawler first or pass --input-dir.")]
    InputDirMissing { path: PathBuf },

    /// The input directory exists but holds no candidate files.
    #[error("No candidate documents found in '{path}'")]
    NoCandidates { path: PathBuf },

    /// A directory could not be listed.
    #[error("Failed to list directory '{path}': {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV writer or reader failed.
    #[error("CSV error for '{path}': {detail}")]
    Csv { path: PathBuf, detail: String },

    // ── Dataset errors ────────────────────────────────────────────────────
    /// A corpus file that a version or upload depends on is missing.
    #[error("Corpus file not found: '{path}'")]
    CorpusMissing { path: PathBuf },

    /// The corpus CSV has no `text` column.
    #[error("'text' column not found in '{path}'")]
    MissingTextColumn { path: PathBuf },

    /// A version tag did not match `v<N>`.
    #[error("Invalid version '{0}': expected v<N>, e.g. v3")]
    InvalidVersion(String),

    /// Version metadata could not be read or parsed.
    #[error("Failed to read version metadata '{path}': {detail}")]
    Metadata { path: PathBuf, detail: String },

    // ── Hub errors ────────────────────────────────────────────────────────
    /// No access token was configured for the dataset hub.
    #[error("HF_TOKEN not found in environment variables.\nExport HF_TOKEN=<token> to publish.")]
    TokenMissing,

    /// The HTTP request could not be sent or timed out.
    #[error("Request to '{url}' failed: {reason}")]
    HubRequest { url: String, reason: String },

    /// The hub answered with a non-success status.
    #[error("Hub returned HTTP {status} for '{url}': {body}")]
    HubStatus {
        url: String,
        status: u16,
        body: String,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium (file or directory).\n\
  • Place libpdfium next to the working directory.\n\
  • Install pdfium system-wide.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why a candidate document was skipped.
///
/// None of these abort the run. A skipped document leaves no output file,
/// so it is attempted again on the next run.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum SkipReason {
    /// The header does not start with `%PDF`.
    #[error("not a PDF (first bytes: {magic:?})")]
    NotAPdf { magic: Vec<u8> },

    /// The file is shorter than the PDF magic signature.
    #[error("too short to be a PDF ({len} bytes)")]
    TooShort { len: usize },

    /// The file could not be read (permission denied, vanished, …).
    #[error("unreadable: {detail}")]
    Unreadable { detail: String },

    /// The PDF engine refused the document (corrupt, encrypted, unsupported).
    #[error("failed to open document: {detail}")]
    OpenFailed { detail: String },

    /// The text file could not be written (name too long, permissions, …).
    /// Nothing is left at the output path, so the next run retries it.
    #[error("failed to write text file: {detail}")]
    WriteFailed { detail: String },
}

/// A non-fatal error for a single page.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// The engine could not produce text for the page.
    #[error("Page {page}: text extraction failed: {detail}")]
    ExtractionFailed { page: usize, detail: String },
}

/// Error raised by a [`crate::pipeline::extract::TextEngine`] implementation.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct EngineError(pub String);

impl EngineError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self(detail.into())
    }
}
