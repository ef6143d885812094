//! Numbered corpus snapshots.
//!
//! ```text
//! versions/
//!   v1/texts.csv
//!   v1/metadata.json   {"version": "v1", "date_created": "2025-05-20", ...}
//!   v2/...
//! ```
//!
//! A version is a copy of the corpus CSV plus a small metadata file. Versions
//! are never modified after creation except by explicitly re-creating the
//! same number.

use crate::config::PipelineConfig;
use crate::error::CorpusError;
use crate::pipeline::write;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

/// Name of the corpus copy inside a version directory.
pub const VERSION_CORPUS_FILE: &str = "texts.csv";
/// Name of the metadata file inside a version directory.
pub const VERSION_METADATA_FILE: &str = "metadata.json";

static RE_VERSION_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^v([1-9][0-9]*)$").unwrap());

/// A version number, displayed and parsed as `v<N>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionTag(pub u32);

impl VersionTag {
    pub fn number(self) -> u32 {
        self.0
    }

    pub fn next(self) -> VersionTag {
        VersionTag(self.0 + 1)
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl FromStr for VersionTag {
    type Err = CorpusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RE_VERSION_TAG
            .captures(s)
            .and_then(|caps| caps[1].parse().ok())
            .map(VersionTag)
            .ok_or_else(|| CorpusError::InvalidVersion(s.to_string()))
    }
}

/// Contents of `metadata.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionMetadata {
    pub version: String,
    pub date_created: String,
    /// `None` when the version has no readable metadata.
    pub num_entries: Option<usize>,
    #[serde(default)]
    pub description: Option<String>,
}

impl VersionMetadata {
    pub fn tag(&self) -> Result<VersionTag, CorpusError> {
        self.version.parse()
    }
}

/// Manages the `versions/` directory.
#[derive(Debug, Clone)]
pub struct VersionStore {
    root: PathBuf,
    dataset_name: String,
}

impl VersionStore {
    pub fn new(root: impl Into<PathBuf>, dataset_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            dataset_name: dataset_name.into(),
        }
    }

    /// Store at `config.versions_dir`, named after `config.dataset_name`.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(&config.versions_dir, &config.dataset_name)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dataset_name(&self) -> &str {
        &self.dataset_name
    }

    pub fn version_dir(&self, tag: VersionTag) -> PathBuf {
        self.root.join(tag.to_string())
    }

    pub fn corpus_path(&self, tag: VersionTag) -> PathBuf {
        self.version_dir(tag).join(VERSION_CORPUS_FILE)
    }

    /// Ensure the store exists and has a `v1`, seeded from `corpus`.
    ///
    /// Returns the latest version afterwards.
    pub fn initialize(&self, corpus: &Path) -> Result<Option<VersionMetadata>, CorpusError> {
        std::fs::create_dir_all(&self.root).map_err(|source| CorpusError::OutputWriteFailed {
            path: self.root.clone(),
            source,
        })?;

        let v1 = VersionTag(1);
        if !self.version_dir(v1).exists() {
            info!("Creating initial version (v1) from existing dataset");
            let description = format!("Initial version of {}", self.dataset_name);
            let meta = self.snapshot(v1, corpus, description)?;
            info!(
                "Version v1 created with {} entries",
                meta.num_entries.unwrap_or(0)
            );
        }

        self.latest()
    }

    /// Snapshot `corpus` as version `tag`.
    pub fn create_version(
        &self,
        tag: VersionTag,
        corpus: &Path,
    ) -> Result<VersionMetadata, CorpusError> {
        let description = format!("Version {} of {}", tag, self.dataset_name);
        let meta = self.snapshot(tag, corpus, description)?;
        info!(
            "Version {} created with {} entries",
            tag,
            meta.num_entries.unwrap_or(0)
        );
        Ok(meta)
    }

    fn snapshot(
        &self,
        tag: VersionTag,
        corpus: &Path,
        description: String,
    ) -> Result<VersionMetadata, CorpusError> {
        let dir = self.version_dir(tag);
        std::fs::create_dir_all(&dir).map_err(|source| CorpusError::OutputWriteFailed {
            path: dir.clone(),
            source,
        })?;

        let target = dir.join(VERSION_CORPUS_FILE);
        if corpus.exists() {
            std::fs::copy(corpus, &target).map_err(|source| CorpusError::OutputWriteFailed {
                path: target.clone(),
                source,
            })?;
        } else {
            warn!(
                "Corpus {} not found; version {} has no data",
                corpus.display(),
                tag
            );
        }

        let meta = VersionMetadata {
            version: tag.to_string(),
            date_created: chrono::Local::now().format("%Y-%m-%d").to_string(),
            num_entries: Some(count_entries(&target)),
            description: Some(description),
        };
        self.write_metadata(tag, &meta)?;
        Ok(meta)
    }

    fn write_metadata(&self, tag: VersionTag, meta: &VersionMetadata) -> Result<(), CorpusError> {
        let path = self.version_dir(tag).join(VERSION_METADATA_FILE);
        let json = serde_json::to_string_pretty(meta)
            .map_err(|e| CorpusError::Internal(format!("metadata serialisation: {e}")))?;
        write::replace_file(&path, json.as_bytes())
    }

    /// All versions present, in ascending numeric order.
    pub fn list(&self) -> Result<Vec<VersionTag>, CorpusError> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let unreadable = |source| CorpusError::DirectoryUnreadable {
            path: self.root.clone(),
            source,
        };

        let mut tags = Vec::new();
        for entry in std::fs::read_dir(&self.root).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(tag) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<VersionTag>().ok())
            {
                tags.push(tag);
            }
        }
        tags.sort();
        Ok(tags)
    }

    /// Metadata of the highest-numbered version, if any.
    pub fn latest(&self) -> Result<Option<VersionMetadata>, CorpusError> {
        match self.list()?.last() {
            Some(&tag) => self.metadata(tag).map(Some),
            None => Ok(None),
        }
    }

    /// Metadata of `tag`; a placeholder when `metadata.json` is absent.
    pub fn metadata(&self, tag: VersionTag) -> Result<VersionMetadata, CorpusError> {
        let path = self.version_dir(tag).join(VERSION_METADATA_FILE);
        if !path.exists() {
            return Ok(VersionMetadata {
                version: tag.to_string(),
                date_created: "unknown".to_string(),
                num_entries: None,
                description: None,
            });
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| CorpusError::Metadata {
            path: path.clone(),
            detail: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| CorpusError::Metadata {
            path,
            detail: e.to_string(),
        })
    }

    /// The number to use for the next version: one past the latest, or 1.
    pub fn next_tag(&self) -> Result<VersionTag, CorpusError> {
        Ok(self
            .list()?
            .last()
            .map(|t| t.next())
            .unwrap_or(VersionTag(1)))
    }
}

/// Number of records in a CSV file with a header row.
///
/// Returns 0 when the file is missing or cannot be parsed.
pub fn count_entries(csv_path: &Path) -> usize {
    if !csv_path.exists() {
        return 0;
    }
    let mut rdr = match csv::Reader::from_path(csv_path) {
        Ok(r) => r,
        Err(e) => {
            warn!("Cannot open {}: {}", csv_path.display(), e);
            return 0;
        }
    };
    let mut count = 0;
    for record in rdr.records() {
        if let Err(e) = record {
            warn!("Cannot parse {}: {}", csv_path.display(), e);
            return 0;
        }
        count += 1;
    }
    count
}
