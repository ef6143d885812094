//! Corpus assembly: read every text file back and write one CSV.
//!
//! The row count always equals the number of files in the text directory. A
//! file that cannot be read or is not valid UTF-8 becomes an empty-string
//! row instead of being dropped, so row positions stay aligned with the file
//! listing. `.partial-*` files left by an interrupted write are not part of
//! the listing.

use crate::config::{CorpusLayout, PipelineConfig};
use crate::error::CorpusError;
use crate::output::CorpusSummary;
use crate::pipeline::{enumerate, write};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// One corpus row in the extended layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusRow {
    pub text: String,
    pub course: String,
    pub semester: String,
    pub author: String,
    pub title: String,
    pub metadata: String,
    pub url: String,
    pub file_id: String,
}

/// Optional per-document sidecar, `<metadata_dir>/<file_id>.json`.
///
/// Every field is optional; missing ones become empty cells.
#[derive(Debug, Default, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub metadata: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Read all text files in `config.text_dir` into rows, in file-name order.
pub fn load_rows(config: &PipelineConfig) -> Result<(Vec<CorpusRow>, usize), CorpusError> {
    let files: Vec<_> = if config.text_dir.is_dir() {
        enumerate::list_files(&config.text_dir)?
            .into_iter()
            .filter(|p| {
                let partial = write::is_partial(p);
                if partial {
                    warn!("Ignoring interrupted write {}", p.display());
                }
                !partial
            })
            .collect()
    } else {
        warn!("Text directory {} does not exist", config.text_dir.display());
        Vec::new()
    };

    let mut rows = Vec::with_capacity(files.len());
    let mut decode_failures = 0;

    for path in &files {
        let text = match read_text(path) {
            Some(t) => t,
            None => {
                decode_failures += 1;
                String::new()
            }
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_id = config.source_name_for(&file_name);

        let mut row = CorpusRow {
            text,
            file_id,
            ..Default::default()
        };
        if let Some(ref dir) = config.metadata_dir {
            let sidecar = dir.join(format!("{}.json", row.file_id));
            apply_metadata(&mut row, &sidecar);
        }
        rows.push(row);
    }

    Ok((rows, decode_failures))
}

/// Assemble the corpus CSV at `config.corpus_path`.
pub fn assemble_corpus(config: &PipelineConfig) -> Result<CorpusSummary, CorpusError> {
    info!("Assembling corpus from {}", config.text_dir.display());
    let (rows, decode_failures) = load_rows(config)?;

    let bytes = render_csv(&rows, config.layout).map_err(|detail| CorpusError::Csv {
        path: config.corpus_path.clone(),
        detail,
    })?;
    write::replace_file(&config.corpus_path, &bytes)?;

    info!(
        "Wrote {} rows to {} ({} decode failures)",
        rows.len(),
        config.corpus_path.display(),
        decode_failures
    );

    Ok(CorpusSummary {
        path: config.corpus_path.clone(),
        rows: rows.len(),
        decode_failures,
    })
}

/// Serialise rows as CSV with a header row.
///
/// The header is written explicitly so an empty corpus still has one.
pub fn render_csv(rows: &[CorpusRow], layout: CorpusLayout) -> Result<Vec<u8>, String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    match layout {
        CorpusLayout::Minimal => {
            wtr.write_record(["text"]).map_err(|e| e.to_string())?;
            for row in rows {
                wtr.write_record([row.text.as_str()])
                    .map_err(|e| e.to_string())?;
            }
        }
        CorpusLayout::Extended => {
            wtr.write_record(EXTENDED_COLUMNS)
                .map_err(|e| e.to_string())?;
            for row in rows {
                wtr.serialize(row).map_err(|e| e.to_string())?;
            }
        }
    }
    wtr.into_inner().map_err(|e| e.to_string())
}

/// Column order of [`CorpusLayout::Extended`].
pub const EXTENDED_COLUMNS: [&str; 8] = [
    "text", "course", "semester", "author", "title", "metadata", "url", "file_id",
];

fn read_text(path: &Path) -> Option<String> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return None;
        }
    };
    match String::from_utf8(bytes) {
        Ok(s) => Some(s),
        Err(e) => {
            warn!("Failed to decode {} as UTF-8: {}", path.display(), e);
            None
        }
    }
}

fn apply_metadata(row: &mut CorpusRow, sidecar: &Path) {
    if !sidecar.exists() {
        return;
    }
    let parsed = std::fs::read_to_string(sidecar)
        .map_err(|e| e.to_string())
        .and_then(|s| serde_json::from_str::<DocumentMetadata>(&s).map_err(|e| e.to_string()));
    match parsed {
        Ok(meta) => {
            debug!("Applying metadata from {}", sidecar.display());
            row.course = meta.course.unwrap_or_default();
            row.semester = meta.semester.unwrap_or_default();
            row.author = meta.author.unwrap_or_default();
            row.title = meta.title.unwrap_or_default();
            row.metadata = meta.metadata.unwrap_or_default();
            row.url = meta.url.unwrap_or_default();
        }
        Err(e) => warn!("Ignoring metadata {}: {}", sidecar.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(root: &Path) -> PipelineConfig {
        PipelineConfig::builder()
            .input_dir(root.join("full"))
            .text_dir(root.join("texts"))
            .corpus_path(root.join("texts.csv"))
            .build()
            .unwrap()
    }

    #[test]
    fn minimal_csv_has_header_even_when_empty() {
        let bytes = render_csv(&[], CorpusLayout::Minimal).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "text\n");
    }

    #[test]
    fn minimal_csv_quotes_multiline_text() {
        let rows = vec![CorpusRow {
            text: "satır 1\n\"alıntı\", satır 2".into(),
            ..Default::default()
        }];
        let csv = String::from_utf8(render_csv(&rows, CorpusLayout::Minimal).unwrap()).unwrap();
        assert_eq!(csv, "text\n\"satır 1\n\"\"alıntı\"\", satır 2\"\n");
    }

    #[test]
    fn extended_csv_columns() {
        let rows = vec![CorpusRow {
            text: "t".into(),
            file_id: "a.pdf".into(),
            ..Default::default()
        }];
        let csv = String::from_utf8(render_csv(&rows, CorpusLayout::Extended).unwrap()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("text,course,semester,author,title,metadata,url,file_id")
        );
        assert_eq!(lines.next(), Some("t,,,,,,,a.pdf"));
    }

    #[test]
    fn undecodable_file_becomes_empty_row() {
        let tmp = tempfile::tempdir().unwrap();
        let c = config(tmp.path());
        std::fs::create_dir_all(&c.text_dir).unwrap();
        std::fs::write(c.text_dir.join("a.pdf.txt"), "iyi").unwrap();
        std::fs::write(c.text_dir.join("b.pdf.txt"), [0xff, 0xfe, 0x00]).unwrap();

        let summary = assemble_corpus(&c).unwrap();
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.decode_failures, 1);

        let mut rdr = csv::Reader::from_path(&c.corpus_path).unwrap();
        let texts: Vec<String> = rdr
            .records()
            .map(|r| r.unwrap().get(0).unwrap().to_string())
            .collect();
        assert_eq!(texts, vec!["iyi".to_string(), String::new()]);
    }

    #[test]
    fn interrupted_write_is_not_a_row() {
        let tmp = tempfile::tempdir().unwrap();
        let c = config(tmp.path());
        std::fs::create_dir_all(&c.text_dir).unwrap();
        std::fs::write(c.text_dir.join("a.pdf.txt"), "HelloWorld").unwrap();
        std::fs::write(c.text_dir.join(".partial-XyZ123"), "Hel").unwrap();

        let summary = assemble_corpus(&c).unwrap();
        assert_eq!(summary.rows, 1);
        assert_eq!(
            std::fs::read_to_string(&c.corpus_path).unwrap(),
            "text\nHelloWorld\n"
        );
    }

    #[test]
    fn missing_text_dir_gives_empty_corpus() {
        let tmp = tempfile::tempdir().unwrap();
        let c = config(tmp.path());
        let summary = assemble_corpus(&c).unwrap();
        assert_eq!(summary.rows, 0);
        assert_eq!(std::fs::read_to_string(&c.corpus_path).unwrap(), "text\n");
    }

    #[test]
    fn sidecar_metadata_fills_extended_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let meta_dir = tmp.path().join("meta");
        let c = PipelineConfig::builder()
            .input_dir(tmp.path().join("full"))
            .text_dir(tmp.path().join("texts"))
            .corpus_path(tmp.path().join("texts.csv"))
            .layout(CorpusLayout::Extended)
            .metadata_dir(&meta_dir)
            .build()
            .unwrap();
        std::fs::create_dir_all(&c.text_dir).unwrap();
        std::fs::create_dir_all(&meta_dir).unwrap();
        std::fs::write(c.text_dir.join("a.pdf.txt"), "metin").unwrap();
        std::fs::write(
            meta_dir.join("a.pdf.json"),
            r#"{"course": "TURK 101", "semester": "2015 Fall"}"#,
        )
        .unwrap();

        let (rows, _) = load_rows(&c).unwrap();
        assert_eq!(rows[0].course, "TURK 101");
        assert_eq!(rows[0].semester, "2015 Fall");
        assert_eq!(rows[0].author, "");
        assert_eq!(rows[0].file_id, "a.pdf");
    }
}
