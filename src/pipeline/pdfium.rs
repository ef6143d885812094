//! Production [`TextEngine`] backed by pdfium via `pdfium-render`.
//!
//! pdfium is a native library loaded at runtime. [`PdfiumEngine::bind`] looks
//! for it in this order, first match wins:
//!
//! 1. `PDFIUM_LIB_PATH`: a library file or a directory containing one
//! 2. the platform library name in the current directory
//! 3. the system library search path
//!
//! Bind once per run and reuse the engine for every document; binding is far
//! more expensive than opening a document.

use crate::error::{CorpusError, EngineError};
use crate::pipeline::extract::{PageSource, TextEngine};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable pointing at an existing pdfium library.
pub const PDFIUM_LIB_ENV: &str = "PDFIUM_LIB_PATH";

/// Text engine over a bound pdfium library.
pub struct PdfiumEngine {
    pdfium: Pdfium,
}

impl PdfiumEngine {
    /// Bind to a pdfium library using the search order in the module docs.
    pub fn bind() -> Result<Self, CorpusError> {
        let pdfium = load_pdfium().map_err(|e| CorpusError::PdfiumBindingFailed(e.to_string()))?;
        info!("pdfium bound");
        Ok(Self { pdfium })
    }

    /// Bind to the library at `path` (file or directory).
    pub fn bind_from_path(path: &Path) -> Result<Self, CorpusError> {
        let pdfium =
            bind_path(path).map_err(|e| CorpusError::PdfiumBindingFailed(e.to_string()))?;
        Ok(Self { pdfium })
    }
}

impl TextEngine for PdfiumEngine {
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn PageSource + 'a>, EngineError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| EngineError::new(format!("{e:?}")))?;
        Ok(Box::new(PdfiumDocument { document }))
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl PageSource for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_text(&self, index: usize) -> Result<String, EngineError> {
        let page = self
            .document
            .pages()
            .get(index as PdfPageIndex)
            .map_err(|e| EngineError::new(format!("{e:?}")))?;
        let text = page
            .text()
            .map_err(|e| EngineError::new(format!("{e:?}")))?;
        Ok(text.all())
    }
}

fn load_pdfium() -> Result<Pdfium, PdfiumError> {
    if let Some(value) = std::env::var_os(PDFIUM_LIB_ENV) {
        let path = PathBuf::from(value);
        debug!("Binding pdfium from {}={}", PDFIUM_LIB_ENV, path.display());
        return bind_path(&path);
    }

    match Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./")) {
        Ok(bindings) => Ok(Pdfium::new(bindings)),
        Err(local_err) => match Pdfium::bind_to_system_library() {
            Ok(bindings) => Ok(Pdfium::new(bindings)),
            Err(_) => Err(local_err),
        },
    }
}

fn bind_path(path: &Path) -> Result<Pdfium, PdfiumError> {
    let lib = if path.is_dir() {
        PathBuf::from(Pdfium::pdfium_platform_library_name_at_path(path))
    } else {
        path.to_path_buf()
    };
    Pdfium::bind_to_library(lib).map(Pdfium::new)
}
