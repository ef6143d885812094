//! Integration tests for conversion and corpus assembly.
//!
//! Uses the scripted engine from `common`, so no pdfium library is needed.

mod common;

use common::{config, init_tracing, write_pdf, ScriptedEngine, CORRUPT, FAIL_PAGE};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use writings_corpus::{
    assemble_corpus, convert_directory, convert_pdf_directory, ConversionProgressCallback,
    CorpusError, DocumentOutcome, PipelineConfig, SkipReason,
};

// ── Conversion ───────────────────────────────────────────────────────────────

#[test]
fn mixed_directory_end_to_end() {
    init_tracing();
    let tmp = tempfile::tempdir().unwrap();
    let c = config(tmp.path());
    write_pdf(&c.input_dir, "a.pdf", &["Hello", "World"]);
    write_pdf(&c.input_dir, "b.pdf", &[FAIL_PAGE, "Only"]);
    std::fs::write(c.input_dir.join("c.txt"), "just notes").unwrap();

    let engine = ScriptedEngine::default();
    let summary = convert_directory(&c, &engine).unwrap();

    assert_eq!(summary.candidates, 3);
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failed_pages, 1);

    assert_eq!(
        std::fs::read_to_string(c.text_dir.join("a.pdf.txt")).unwrap(),
        "HelloWorld"
    );
    assert_eq!(
        std::fs::read_to_string(c.text_dir.join("b.pdf.txt")).unwrap(),
        "Only"
    );
    assert!(!c.text_dir.join("c.txt.txt").exists());

    let skipped = &summary.documents[2];
    assert!(matches!(
        skipped.outcome,
        DocumentOutcome::Skipped(SkipReason::NotAPdf { .. })
    ));

    let corpus = assemble_corpus(&c).unwrap();
    assert_eq!(corpus.rows, 2);
    assert_eq!(
        std::fs::read_to_string(&c.corpus_path).unwrap(),
        "text\nHelloWorld\nOnly\n"
    );
}

#[test]
fn rerun_does_no_extraction() {
    init_tracing();
    let tmp = tempfile::tempdir().unwrap();
    let c = config(tmp.path());
    write_pdf(&c.input_dir, "a.pdf", &["bir"]);
    write_pdf(&c.input_dir, "b.pdf", &["iki"]);

    let first = ScriptedEngine::default();
    convert_directory(&c, &first).unwrap();
    assert_eq!(first.opens(), 2);
    let before = std::fs::read(c.text_dir.join("a.pdf.txt")).unwrap();

    let second = ScriptedEngine::default();
    let summary = convert_directory(&c, &second).unwrap();
    assert_eq!(second.opens(), 0);
    assert_eq!(summary.processed, 0);
    assert_eq!(summary.already_processed, 2);
    assert_eq!(std::fs::read(c.text_dir.join("a.pdf.txt")).unwrap(), before);
}

#[test]
fn deleting_an_output_reconverts_only_that_document() {
    let tmp = tempfile::tempdir().unwrap();
    let c = config(tmp.path());
    write_pdf(&c.input_dir, "a.pdf", &["bir"]);
    write_pdf(&c.input_dir, "b.pdf", &["iki"]);
    convert_directory(&c, &ScriptedEngine::default()).unwrap();

    std::fs::remove_file(c.text_dir.join("b.pdf.txt")).unwrap();
    let engine = ScriptedEngine::default();
    let summary = convert_directory(&c, &engine).unwrap();
    assert_eq!(engine.opens(), 1);
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.already_processed, 1);
}

#[test]
fn all_empty_pages_give_empty_file() {
    let tmp = tempfile::tempdir().unwrap();
    let c = config(tmp.path());
    write_pdf(&c.input_dir, "blank.pdf", &["", ""]);

    let summary = convert_directory(&c, &ScriptedEngine::default()).unwrap();
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.empty_pages, 2);
    assert_eq!(std::fs::read(c.text_dir.join("blank.pdf.txt")).unwrap(), b"");
}

#[test]
fn unopenable_document_leaves_no_output_and_is_retried() {
    let tmp = tempfile::tempdir().unwrap();
    let c = config(tmp.path());
    write_pdf(&c.input_dir, "broken.pdf", &[CORRUPT]);

    let engine = ScriptedEngine::default();
    let summary = convert_directory(&c, &engine).unwrap();
    assert_eq!(summary.skipped, 1);
    assert!(!c.text_dir.join("broken.pdf.txt").exists());

    convert_directory(&c, &engine).unwrap();
    assert_eq!(engine.opens(), 2);
}

#[test]
fn write_failure_skips_only_that_document() {
    let tmp = tempfile::tempdir().unwrap();
    let c = config(tmp.path());
    // Valid input name, but the output name exceeds the file-name limit.
    let long = format!("{}.pdf", "a".repeat(250));
    write_pdf(&c.input_dir, &long, &["uzun"]);
    write_pdf(&c.input_dir, "z.pdf", &["son"]);

    for _ in 0..2 {
        let summary = convert_directory(&c, &ScriptedEngine::default()).unwrap();
        assert_eq!(summary.skipped, 1);
        assert!(matches!(
            summary.documents[0].outcome,
            DocumentOutcome::Skipped(SkipReason::WriteFailed { .. })
        ));
    }
    assert_eq!(
        std::fs::read_to_string(c.text_dir.join("z.pdf.txt")).unwrap(),
        "son"
    );

    let corpus = assemble_corpus(&c).unwrap();
    assert_eq!(corpus.rows, 1);
}

#[test]
fn missing_input_dir_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let c = config(tmp.path());
    let err = convert_directory(&c, &ScriptedEngine::default()).unwrap_err();
    assert!(matches!(err, CorpusError::InputDirMissing { .. }));
}

#[test]
fn empty_input_dir_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let c = config(tmp.path());
    std::fs::create_dir_all(&c.input_dir).unwrap();
    let err = convert_directory(&c, &ScriptedEngine::default()).unwrap_err();
    assert!(matches!(err, CorpusError::NoCandidates { .. }));
}

#[test]
fn async_wrapper_checks_input_dir_before_binding() {
    let tmp = tempfile::tempdir().unwrap();
    let c = config(tmp.path());
    let err = tokio_test::block_on(convert_pdf_directory(c)).unwrap_err();
    assert!(matches!(err, CorpusError::InputDirMissing { .. }));
}

// ── Progress events ──────────────────────────────────────────────────────────

#[derive(Default)]
struct Counting {
    started: AtomicUsize,
    converted: AtomicUsize,
    failed_pages: AtomicUsize,
    empty_pages: AtomicUsize,
    existing: AtomicUsize,
    skipped: AtomicUsize,
    completed: AtomicUsize,
}

impl ConversionProgressCallback for Counting {
    fn on_run_start(&self, _total: usize) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }
    fn on_document_converted(
        &self,
        _: &str,
        _: usize,
        _: usize,
        _: usize,
        failed_pages: usize,
        empty_pages: usize,
    ) {
        self.converted.fetch_add(1, Ordering::SeqCst);
        self.failed_pages.fetch_add(failed_pages, Ordering::SeqCst);
        self.empty_pages.fetch_add(empty_pages, Ordering::SeqCst);
    }
    fn on_document_existing(&self, _: &str, _: usize, _: usize) {
        self.existing.fetch_add(1, Ordering::SeqCst);
    }
    fn on_document_skipped(&self, _: &str, _: usize, _: usize, _: &str) {
        self.skipped.fetch_add(1, Ordering::SeqCst);
    }
    fn on_run_complete(&self, _: usize, _: usize, _: usize) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn progress_callback_sees_every_document() {
    let tmp = tempfile::tempdir().unwrap();
    let counter = Arc::new(Counting::default());
    let c = PipelineConfig::builder()
        .input_dir(tmp.path().join("full"))
        .text_dir(tmp.path().join("texts"))
        .progress_callback(counter.clone())
        .build()
        .unwrap();
    write_pdf(&c.input_dir, "a.pdf", &["x", FAIL_PAGE, ""]);
    write_pdf(&c.input_dir, "b.pdf", &["y"]);
    std::fs::write(c.input_dir.join("notes.md"), "# hi").unwrap();
    std::fs::create_dir_all(&c.text_dir).unwrap();
    std::fs::write(c.text_dir.join("b.pdf.txt"), "y").unwrap();

    convert_directory(&c, &ScriptedEngine::default()).unwrap();

    assert_eq!(counter.started.load(Ordering::SeqCst), 1);
    assert_eq!(counter.converted.load(Ordering::SeqCst), 1);
    assert_eq!(counter.failed_pages.load(Ordering::SeqCst), 1);
    assert_eq!(counter.empty_pages.load(Ordering::SeqCst), 1);
    assert_eq!(counter.existing.load(Ordering::SeqCst), 1);
    assert_eq!(counter.skipped.load(Ordering::SeqCst), 1);
    assert_eq!(counter.completed.load(Ordering::SeqCst), 1);
}

// ── Assembly ─────────────────────────────────────────────────────────────────

#[test]
fn corpus_rows_follow_file_name_order() {
    let tmp = tempfile::tempdir().unwrap();
    let c = config(tmp.path());
    std::fs::create_dir_all(&c.text_dir).unwrap();
    for (name, text) in [("c.pdf.txt", "üç"), ("a.pdf.txt", "bir"), ("b.pdf.txt", "iki")] {
        std::fs::write(c.text_dir.join(name), text).unwrap();
    }

    assemble_corpus(&c).unwrap();
    let mut rdr = csv::Reader::from_path(&c.corpus_path).unwrap();
    let texts: Vec<String> = rdr
        .records()
        .map(|r| r.unwrap()[0].to_string())
        .collect();
    assert_eq!(texts, ["bir", "iki", "üç"]);
}
