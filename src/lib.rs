//! # writings-corpus
//!
//! Build a versioned plain-text corpus of Turkish student writings from a
//! directory of crawled PDF documents, and publish it to a dataset hub.
//!
//! ## Pipeline Overview
//!
//! ```text
//! data/full/*.pdf
//!  │
//!  ├─ 1. Enumerate  list candidate files, sorted by name
//!  ├─ 2. Check      skip documents whose text file already exists
//!  ├─ 3. Validate   reject files without the %PDF magic bytes
//!  ├─ 4. Extract    page-by-page text via pdfium (spawn_blocking)
//!  ├─ 5. Write      one <name>.txt per document, atomically
//!  ├─ 6. Assemble   data/texts.csv, one row per text file
//!  ├─ 7. Version    versions/v<N>/{texts.csv, metadata.json}
//!  └─ 8. Publish    commit a version to the hub (default or named config)
//! ```
//!
//! Conversion is incremental: a document is converted at most once, and a
//! rerun over an unchanged directory does no extraction at all.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use writings_corpus::{assemble_corpus, convert_pdf_directory, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::default();
//!     let summary = convert_pdf_directory(config.clone()).await?;
//!     eprintln!("{} converted, {} skipped", summary.processed, summary.skipped);
//!
//!     let corpus = assemble_corpus(&config)?;
//!     println!("{} rows in {}", corpus.rows, corpus.path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `writings` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## pdfium
//!
//! The extractor binds a pdfium shared library at runtime. Set
//! `PDFIUM_LIB_PATH` to a library file or its directory, place it in the
//! working directory, or install it system-wide.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod corpus;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod publish;
pub mod update;
pub mod version;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{CorpusLayout, HubConfig, HubConfigBuilder, PipelineConfig, PipelineConfigBuilder};
pub use convert::{convert_directory, convert_document, convert_pdf_directory};
pub use corpus::{assemble_corpus, CorpusRow};
pub use error::{CorpusError, EngineError, PageError, SkipReason};
pub use output::{
    ConversionSummary, CorpusSummary, DocumentOutcome, DocumentReport, ExtractedDocument,
    PageOutcome, PageReport,
};
pub use pipeline::extract::{PageSource, TextEngine};
pub use pipeline::pdfium::PdfiumEngine;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use publish::{load_version_dataset, PublishReport, Publisher, UploadTarget, VersionDataset};
pub use update::{update_dataset, UpdateOptions, UpdateReport};
pub use version::{count_entries, VersionMetadata, VersionStore, VersionTag};
