//! Result types produced by the conversion and assembly stages.
//!
//! Every type here is `Serialize` so the CLI can print a whole run report
//! with `--json`.

use crate::error::{PageError, SkipReason};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What one page contributed to its document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageOutcome {
    /// Non-empty text.
    Text(String),
    /// A valid page with no text on it (blank or image-only).
    Empty,
    /// Extraction failed; the page counts as empty.
    Failed(PageError),
}

impl PageOutcome {
    /// Text contributed to the document, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            PageOutcome::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Outcome of a single page, 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReport {
    pub page_num: usize,
    pub outcome: PageOutcome,
}

/// The full result of extracting one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// All page texts concatenated in page order with no separator.
    pub text: String,
    /// One entry per page, in page order.
    pub pages: Vec<PageReport>,
}

impl ExtractedDocument {
    pub fn failed_pages(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| matches!(p.outcome, PageOutcome::Failed(_)))
            .count()
    }

    pub fn empty_pages(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| matches!(p.outcome, PageOutcome::Empty))
            .count()
    }
}

/// What happened to one candidate document during a conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentOutcome {
    /// Text extracted and written.
    Converted {
        text_len: usize,
        failed_pages: usize,
        empty_pages: usize,
    },
    /// An output file already existed; nothing was extracted.
    AlreadyProcessed,
    /// Rejected or unopenable; no output written.
    Skipped(SkipReason),
}

/// Per-document entry in a [`ConversionSummary`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub outcome: DocumentOutcome,
}

/// Statistics for one conversion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionSummary {
    /// Candidate files found in the input directory.
    pub candidates: usize,
    /// Documents extracted and written during this run.
    pub processed: usize,
    /// Documents whose output already existed.
    pub already_processed: usize,
    /// Documents rejected by the validator or the engine.
    pub skipped: usize,
    /// Pages that failed extraction across all processed documents.
    pub failed_pages: usize,
    /// Pages with no text across all processed documents.
    pub empty_pages: usize,
    /// Wall-clock duration of the run.
    pub duration_ms: u64,
    /// One entry per candidate, in enumeration order.
    pub documents: Vec<DocumentReport>,
}

/// Statistics for one corpus assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusSummary {
    /// Path of the written CSV.
    pub path: PathBuf,
    /// Rows written; always equals the number of text files found.
    pub rows: usize,
    /// Files that could not be read or decoded and became empty rows.
    pub decode_failures: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracted_document_counts_page_kinds() {
        let doc = ExtractedDocument {
            text: "ab".into(),
            pages: vec![
                PageReport {
                    page_num: 1,
                    outcome: PageOutcome::Text("a".into()),
                },
                PageReport {
                    page_num: 2,
                    outcome: PageOutcome::Empty,
                },
                PageReport {
                    page_num: 3,
                    outcome: PageOutcome::Failed(PageError::ExtractionFailed {
                        page: 3,
                        detail: "x".into(),
                    }),
                },
                PageReport {
                    page_num: 4,
                    outcome: PageOutcome::Text("b".into()),
                },
            ],
        };
        assert_eq!(doc.failed_pages(), 1);
        assert_eq!(doc.empty_pages(), 1);
        assert_eq!(doc.pages[0].outcome.text(), Some("a"));
        assert_eq!(doc.pages[1].outcome.text(), None);
    }

    #[test]
    fn summary_is_json_serialisable() {
        let summary = ConversionSummary {
            candidates: 1,
            processed: 1,
            documents: vec![DocumentReport {
                source: "data/full/a.pdf".into(),
                output: "data/texts/a.pdf.txt".into(),
                outcome: DocumentOutcome::Converted {
                    text_len: 10,
                    failed_pages: 0,
                    empty_pages: 0,
                },
            }],
            ..Default::default()
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("a.pdf.txt"));
        assert!(json.contains("Converted"));
    }
}
