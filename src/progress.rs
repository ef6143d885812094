//! Progress-callback trait for per-document conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::PipelineConfigBuilder::progress_callback`] to receive
//! events as the conversion stage walks the input directory.
//!
//! # Example
//!
//! ```rust
//! use writings_corpus::{ConversionProgressCallback, PipelineConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     converted: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_document_converted(
//!         &self,
//!         name: &str,
//!         index: usize,
//!         total: usize,
//!         text_len: usize,
//!         failed_pages: usize,
//!         _empty_pages: usize,
//!     ) {
//!         self.converted.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{index}/{total} {name}: {text_len} bytes, {failed_pages} failed pages");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { converted: AtomicUsize::new(0) });
//!
//! let config = PipelineConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the conversion stage as it processes each candidate document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. `index` is 1-based.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after enumeration, before any document is touched.
    fn on_run_start(&self, total: usize) {
        let _ = total;
    }

    /// Called before a document is checked and extracted.
    fn on_document_start(&self, name: &str, index: usize, total: usize) {
        let _ = (name, index, total);
    }

    /// Called after a document's text file was written.
    ///
    /// `failed_pages` and `empty_pages` count pages that contributed no
    /// text; each one was also logged at `warn` level.
    fn on_document_converted(
        &self,
        name: &str,
        index: usize,
        total: usize,
        text_len: usize,
        failed_pages: usize,
        empty_pages: usize,
    ) {
        let _ = (name, index, total, text_len, failed_pages, empty_pages);
    }

    /// Called when a document's text file already existed.
    fn on_document_existing(&self, name: &str, index: usize, total: usize) {
        let _ = (name, index, total);
    }

    /// Called when a document was rejected or could not be opened.
    fn on_document_skipped(&self, name: &str, index: usize, total: usize, reason: &str) {
        let _ = (name, index, total, reason);
    }

    /// Called once after every candidate has been attempted.
    ///
    /// # Arguments
    /// * `total`: candidates found
    /// * `processed`: documents converted during this run
    /// * `skipped`: documents rejected or unopenable
    fn on_run_complete(&self, total: usize, processed: usize, skipped: usize) {
        let _ = (total, processed, skipped);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::PipelineConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
