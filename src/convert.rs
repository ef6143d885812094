//! Conversion stage: turn every PDF in the input directory into a text file.
//!
//! Documents are handled one at a time and independently:
//!
//! ```text
//! for each candidate:
//!   output exists?   → AlreadyProcessed (no extraction)
//!   header != %PDF?  → Skipped
//!   engine can't open → Skipped (retried next run, no output written)
//!   write fails      → Skipped (retried next run, no output written)
//!   else             → extract pages, write text atomically
//! ```
//!
//! Only directory-level problems are fatal: a missing input directory, one
//! with no candidates at all, or a text directory that cannot be created.
//! Everything per document or per page is logged and recorded in the
//! returned [`ConversionSummary`].

use crate::config::PipelineConfig;
use crate::error::{CorpusError, SkipReason};
use crate::output::{ConversionSummary, DocumentOutcome, DocumentReport, PageOutcome};
use crate::pipeline::extract::{extract_document, TextEngine};
use crate::pipeline::pdfium::PdfiumEngine;
use crate::pipeline::{enumerate, validate, write};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert every candidate in `config.input_dir` using `engine`.
///
/// # Errors
/// Returns `Err(CorpusError)` only for fatal errors:
/// - input directory missing or unreadable
/// - no candidate files
/// - the text directory cannot be created
pub fn convert_directory(
    config: &PipelineConfig,
    engine: &dyn TextEngine,
) -> Result<ConversionSummary, CorpusError> {
    let start = Instant::now();
    info!("Converting documents in {}", config.input_dir.display());

    // ── Step 1: Enumerate ────────────────────────────────────────────────
    let candidates = enumerate::list_candidates(&config.input_dir)?;
    if candidates.is_empty() {
        return Err(CorpusError::NoCandidates {
            path: config.input_dir.clone(),
        });
    }
    let total = candidates.len();
    info!("Found {} candidate files", total);

    std::fs::create_dir_all(&config.text_dir).map_err(|source| {
        CorpusError::OutputWriteFailed {
            path: config.text_dir.clone(),
            source,
        }
    })?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(total);
    }

    let mut summary = ConversionSummary {
        candidates: total,
        ..Default::default()
    };

    // ── Step 2: Per-document processing ──────────────────────────────────
    for (i, source) in candidates.iter().enumerate() {
        let index = i + 1;
        let name = display_name(source);

        let Some(output) = config.text_path_for(source) else {
            warn!("Skipping {}: path has no file name", source.display());
            continue;
        };

        if let Some(ref cb) = config.progress_callback {
            cb.on_document_start(&name, index, total);
        }

        let outcome = convert_document(source, &output, engine);

        match &outcome {
            DocumentOutcome::Converted {
                text_len,
                failed_pages,
                empty_pages,
            } => {
                summary.processed += 1;
                summary.failed_pages += failed_pages;
                summary.empty_pages += empty_pages;
                if let Some(ref cb) = config.progress_callback {
                    cb.on_document_converted(
                        &name,
                        index,
                        total,
                        *text_len,
                        *failed_pages,
                        *empty_pages,
                    );
                }
            }
            DocumentOutcome::AlreadyProcessed => {
                summary.already_processed += 1;
                if let Some(ref cb) = config.progress_callback {
                    cb.on_document_existing(&name, index, total);
                }
            }
            DocumentOutcome::Skipped(reason) => {
                summary.skipped += 1;
                if let Some(ref cb) = config.progress_callback {
                    cb.on_document_skipped(&name, index, total, &reason.to_string());
                }
            }
        }

        summary.documents.push(DocumentReport {
            source: source.clone(),
            output,
            outcome,
        });
    }

    summary.duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "Conversion complete: {} processed, {} already processed, {} skipped ({}ms)",
        summary.processed, summary.already_processed, summary.skipped, summary.duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(total, summary.processed, summary.skipped);
    }

    Ok(summary)
}

/// Convert a single document to `output`.
///
/// Every problem with the document itself, including a failed write, comes
/// back as [`DocumentOutcome::Skipped`] and leaves no file at `output`.
pub fn convert_document(source: &Path, output: &Path, engine: &dyn TextEngine) -> DocumentOutcome {
    if write::is_processed(output) {
        info!("Already processed: {}", source.display());
        return DocumentOutcome::AlreadyProcessed;
    }

    if let Err(reason) = validate::check_pdf_header(source) {
        warn!("Skipping {}: {}", source.display(), reason);
        return DocumentOutcome::Skipped(reason);
    }

    let bytes = match std::fs::read(source) {
        Ok(b) => b,
        Err(e) => {
            let reason = SkipReason::Unreadable {
                detail: e.to_string(),
            };
            warn!("Skipping {}: {}", source.display(), reason);
            return DocumentOutcome::Skipped(reason);
        }
    };

    let extracted = match extract_document(engine, &bytes) {
        Ok(doc) => doc,
        Err(reason) => {
            warn!("Skipping {}: {}", source.display(), reason);
            return DocumentOutcome::Skipped(reason);
        }
    };

    for page in &extracted.pages {
        match &page.outcome {
            PageOutcome::Failed(e) => warn!("{}: {}", source.display(), e),
            PageOutcome::Empty => {
                warn!("Extracted text is empty on page {} of {}", page.page_num, source.display())
            }
            PageOutcome::Text(t) => debug!(
                "{}: page {} → {} chars",
                source.display(),
                page.page_num,
                t.chars().count()
            ),
        }
    }

    match write::write_text(output, &extracted.text) {
        Ok(write::WriteOutcome::Written { bytes }) => DocumentOutcome::Converted {
            text_len: bytes,
            failed_pages: extracted.failed_pages(),
            empty_pages: extracted.empty_pages(),
        },
        Ok(write::WriteOutcome::AlreadyProcessed) => {
            info!("Already processed (concurrent run): {}", source.display());
            DocumentOutcome::AlreadyProcessed
        }
        Err(e) => {
            let reason = SkipReason::WriteFailed {
                detail: e.to_string(),
            };
            warn!("Skipping {}: {}", source.display(), reason);
            DocumentOutcome::Skipped(reason)
        }
    }
}

/// Bind pdfium and run [`convert_directory`] on tokio's blocking pool.
///
/// pdfium is synchronous and CPU-bound, so it must not run on an async
/// worker thread. A missing input directory is reported before binding.
pub async fn convert_pdf_directory(
    config: PipelineConfig,
) -> Result<ConversionSummary, CorpusError> {
    if !config.input_dir.is_dir() {
        return Err(CorpusError::InputDirMissing {
            path: config.input_dir.clone(),
        });
    }
    tokio::task::spawn_blocking(move || {
        let engine = PdfiumEngine::bind()?;
        convert_directory(&config, &engine)
    })
    .await
    .map_err(|e| CorpusError::Internal(format!("Conversion task panicked: {}", e)))?
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
