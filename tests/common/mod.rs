//! Shared fixtures for integration tests.
//!
//! Fixture PDFs are fake: a `%PDF-1.4` line followed by page texts separated
//! by form feeds. [`ScriptedEngine`] understands that format, so tests run
//! without a pdfium library.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use writings_corpus::{EngineError, PageSource, PipelineConfig, TextEngine};

pub const HEADER: &str = "%PDF-1.4\n";

/// Page text that makes [`ScriptedEngine`] fail that page.
pub const FAIL_PAGE: &str = "!fail";

/// Body that makes [`ScriptedEngine`] refuse to open the document.
pub const CORRUPT: &str = "!corrupt";

/// Engine over fixture documents, counting every open call.
#[derive(Default)]
pub struct ScriptedEngine {
    opens: AtomicUsize,
}

impl ScriptedEngine {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

struct ScriptedDoc {
    pages: Vec<String>,
}

impl TextEngine for ScriptedEngine {
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn PageSource + 'a>, EngineError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let body = String::from_utf8_lossy(bytes);
        let body = body.strip_prefix(HEADER).unwrap_or(&*body);
        if body == CORRUPT {
            return Err(EngineError::new("trailer not found"));
        }
        Ok(Box::new(ScriptedDoc {
            pages: body.split('\x0c').map(str::to_string).collect(),
        }))
    }
}

impl PageSource for ScriptedDoc {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String, EngineError> {
        match self.pages[index].as_str() {
            FAIL_PAGE => Err(EngineError::new("text layer unreadable")),
            text => Ok(text.to_string()),
        }
    }
}

/// Write a fixture PDF with the given page texts.
pub fn write_pdf(dir: &Path, name: &str, pages: &[&str]) {
    std::fs::create_dir_all(dir).unwrap();
    let body = format!("{HEADER}{}", pages.join("\x0c"));
    std::fs::write(dir.join(name), body).unwrap();
}

/// Route library logs to the test output; `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Config rooted in a temp directory.
pub fn config(root: &Path) -> PipelineConfig {
    PipelineConfig::builder()
        .input_dir(root.join("full"))
        .text_dir(root.join("texts"))
        .corpus_path(root.join("texts.csv"))
        .versions_dir(root.join("versions"))
        .build()
        .unwrap()
}
