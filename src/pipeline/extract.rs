//! Text extraction: walk a document's pages and collect their text.
//!
//! The PDF library sits behind [`TextEngine`] so the page-walking policy can
//! be tested without a native pdfium build. The policy:
//!
//! - a page that fails contributes nothing and is reported as
//!   [`PageOutcome::Failed`];
//! - a page with no text contributes nothing and is reported as
//!   [`PageOutcome::Empty`];
//! - the remaining texts are joined in page order with no separator.
//!
//! Nothing is logged here; the caller decides how to report each outcome.
//! The opened document is dropped when [`extract_document`] returns, which
//! releases the engine handle whatever happened in the page loop.

use crate::error::{EngineError, PageError, SkipReason};
use crate::output::{ExtractedDocument, PageOutcome, PageReport};

/// Opens documents for text extraction.
pub trait TextEngine {
    /// Parse `bytes` as a document.
    ///
    /// An error here means the whole document is unusable (corrupt,
    /// encrypted, unsupported).
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn PageSource + 'a>, EngineError>;
}

/// An opened multi-page document.
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Text of the page at 0-based `index`; an empty string for a blank page.
    fn page_text(&self, index: usize) -> Result<String, EngineError>;
}

/// Extract every page of `bytes` through `engine`.
///
/// # Errors
/// [`SkipReason::OpenFailed`] when the engine cannot open the document.
/// Page failures never surface as errors.
pub fn extract_document(
    engine: &dyn TextEngine,
    bytes: &[u8],
) -> Result<ExtractedDocument, SkipReason> {
    let source = engine.open(bytes).map_err(|e| SkipReason::OpenFailed {
        detail: e.to_string(),
    })?;

    let page_count = source.page_count();
    let mut text = String::new();
    let mut pages = Vec::with_capacity(page_count);

    for index in 0..page_count {
        let page_num = index + 1;
        let outcome = match source.page_text(index) {
            Ok(page_text) if page_text.is_empty() => PageOutcome::Empty,
            Ok(page_text) => {
                text.push_str(&page_text);
                PageOutcome::Text(page_text)
            }
            Err(e) => PageOutcome::Failed(PageError::ExtractionFailed {
                page: page_num,
                detail: e.to_string(),
            }),
        };
        pages.push(PageReport { page_num, outcome });
    }

    Ok(ExtractedDocument { text, pages })
}
