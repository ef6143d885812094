//! Configuration types for the corpus pipeline and the dataset hub.
//!
//! Every stage takes its paths from a [`PipelineConfig`] passed in by the
//! caller; nothing is read from process-wide state. The hub publisher takes a
//! separate [`HubConfig`] because it is the only stage that needs credentials.
//!
//! Both are built through validating builders so callers set only what they
//! care about and rely on documented defaults for the rest.

use crate::error::CorpusError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Default directory the crawler downloads PDFs into.
pub const DEFAULT_INPUT_DIR: &str = "data/full";
/// Default directory holding one text file per converted document.
pub const DEFAULT_TEXT_DIR: &str = "data/texts";
/// Default corpus CSV path.
pub const DEFAULT_CORPUS_PATH: &str = "data/texts.csv";
/// Default root of the numbered version snapshots.
pub const DEFAULT_VERSIONS_DIR: &str = "versions";
/// Suffix appended to a source file name to form its text file name.
pub const DEFAULT_TEXT_SUFFIX: &str = ".txt";
/// Human-readable dataset name used in version descriptions and the card.
pub const DEFAULT_DATASET_NAME: &str = "Bilkent Turkish Writings Dataset";

/// Configuration for the conversion, assembly and versioning stages.
///
/// # Example
/// ```rust
/// use writings_corpus::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .input_dir("data/full")
///     .text_dir("data/texts")
///     .corpus_path("data/texts.csv")
///     .build()
///     .unwrap();
/// assert_eq!(config.text_suffix, ".txt");
/// ```
#[derive(Clone)]
pub struct PipelineConfig {
    /// Directory holding the source PDFs. Default: `data/full`.
    pub input_dir: PathBuf,

    /// Directory receiving one text file per document. Default: `data/texts`.
    ///
    /// The presence of a file here is the only completion marker a document
    /// has. Deleting a file forces that document to be converted again.
    pub text_dir: PathBuf,

    /// Where the assembled corpus CSV is written. Default: `data/texts.csv`.
    pub corpus_path: PathBuf,

    /// Appended to the source file name, so `a.pdf` becomes `a.pdf.txt`.
    pub text_suffix: String,

    /// Column set of the corpus CSV. Default: [`CorpusLayout::Minimal`].
    pub layout: CorpusLayout,

    /// Optional directory of `<file name>.json` sidecars with per-document
    /// metadata, used by [`CorpusLayout::Extended`].
    pub metadata_dir: Option<PathBuf>,

    /// Root of the version snapshots. Default: `versions`.
    pub versions_dir: PathBuf,

    /// Dataset name used in version descriptions and the dataset card.
    pub dataset_name: String,

    /// Receives per-document events during conversion.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            text_dir: PathBuf::from(DEFAULT_TEXT_DIR),
            corpus_path: PathBuf::from(DEFAULT_CORPUS_PATH),
            text_suffix: DEFAULT_TEXT_SUFFIX.to_string(),
            layout: CorpusLayout::default(),
            metadata_dir: None,
            versions_dir: PathBuf::from(DEFAULT_VERSIONS_DIR),
            dataset_name: DEFAULT_DATASET_NAME.to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("input_dir", &self.input_dir)
            .field("text_dir", &self.text_dir)
            .field("corpus_path", &self.corpus_path)
            .field("text_suffix", &self.text_suffix)
            .field("layout", &self.layout)
            .field("metadata_dir", &self.metadata_dir)
            .field("versions_dir", &self.versions_dir)
            .field("dataset_name", &self.dataset_name)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl PipelineConfig {
    /// Create a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }

    /// Text file path for a source document: `<text_dir>/<file name><suffix>`.
    ///
    /// Returns `None` for paths without a file name (e.g. `..`).
    pub fn text_path_for(&self, source: &Path) -> Option<PathBuf> {
        let name = source.file_name()?;
        let mut file_name = name.to_os_string();
        file_name.push(&self.text_suffix);
        Some(self.text_dir.join(file_name))
    }

    /// Recover the source file name from a text file name by stripping the suffix.
    pub fn source_name_for(&self, text_file_name: &str) -> String {
        text_file_name
            .strip_suffix(self.text_suffix.as_str())
            .unwrap_or(text_file_name)
            .to_string()
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    pub fn text_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.text_dir = dir.into();
        self
    }

    pub fn corpus_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.corpus_path = path.into();
        self
    }

    pub fn text_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.text_suffix = suffix.into();
        self
    }

    pub fn layout(mut self, layout: CorpusLayout) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn metadata_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.metadata_dir = Some(dir.into());
        self
    }

    pub fn versions_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.versions_dir = dir.into();
        self
    }

    pub fn dataset_name(mut self, name: impl Into<String>) -> Self {
        self.config.dataset_name = name.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PipelineConfig, CorpusError> {
        let c = &self.config;
        if c.text_suffix.is_empty() {
            return Err(CorpusError::InvalidConfig(
                "text suffix must not be empty".into(),
            ));
        }
        if c.text_suffix.contains(['/', '\\']) {
            return Err(CorpusError::InvalidConfig(format!(
                "text suffix must not contain path separators, got '{}'",
                c.text_suffix
            )));
        }
        // Text files in the input directory would be picked up as candidates
        // and rejected on every run.
        if c.input_dir == c.text_dir {
            return Err(CorpusError::InvalidConfig(format!(
                "input and text directories must differ, both are '{}'",
                c.input_dir.display()
            )));
        }
        Ok(self.config)
    }
}

/// Column set of the corpus CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CorpusLayout {
    /// A single `text` column. (default)
    #[default]
    Minimal,
    /// `text`, `course`, `semester`, `author`, `title`, `metadata`, `url`,
    /// `file_id`; unknown values are empty strings.
    Extended,
}

// ── Hub ──────────────────────────────────────────────────────────────────

/// Default dataset hub endpoint.
pub const DEFAULT_HUB_ENDPOINT: &str = "https://huggingface.co";
/// Default dataset repository.
pub const DEFAULT_REPO_ID: &str = "selimfirat/bilkent-turkish-writings-dataset";
/// Environment variable holding the hub access token.
pub const HUB_TOKEN_ENV: &str = "HF_TOKEN";

/// Configuration for publishing to the dataset hub.
#[derive(Clone)]
pub struct HubConfig {
    /// Base URL of the hub API. Default: `https://huggingface.co`.
    pub endpoint: String,

    /// Repository id, `namespace/name`.
    pub repo_id: String,

    /// Access token. Default: the `HF_TOKEN` environment variable.
    pub token: Option<String>,

    /// Per-request timeout in seconds. Default: 300.
    ///
    /// Commits carry the whole corpus inline, so this is far above a typical
    /// API timeout.
    pub timeout_secs: u64,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_HUB_ENDPOINT.to_string(),
            repo_id: DEFAULT_REPO_ID.to_string(),
            token: std::env::var(HUB_TOKEN_ENV).ok().filter(|t| !t.is_empty()),
            timeout_secs: 300,
        }
    }
}

impl fmt::Debug for HubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubConfig")
            .field("endpoint", &self.endpoint)
            .field("repo_id", &self.repo_id)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl HubConfig {
    pub fn builder() -> HubConfigBuilder {
        HubConfigBuilder {
            config: Self::default(),
        }
    }

    /// Split `repo_id` into `(namespace, name)`.
    pub fn repo_parts(&self) -> Option<(&str, &str)> {
        let (ns, name) = self.repo_id.split_once('/')?;
        if ns.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some((ns, name))
    }
}

/// Builder for [`HubConfig`].
#[derive(Debug)]
pub struct HubConfigBuilder {
    config: HubConfig,
}

impl HubConfigBuilder {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn repo_id(mut self, repo_id: impl Into<String>) -> Self {
        self.config.repo_id = repo_id.into();
        self
    }

    pub fn token(mut self, token: Option<String>) -> Self {
        self.config.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs.max(1);
        self
    }

    pub fn build(self) -> Result<HubConfig, CorpusError> {
        if self.config.repo_parts().is_none() {
            return Err(CorpusError::InvalidConfig(format!(
                "repository id must be 'namespace/name', got '{}'",
                self.config.repo_id
            )));
        }
        if !self.config.endpoint.starts_with("http://")
            && !self.config.endpoint.starts_with("https://")
        {
            return Err(CorpusError::InvalidConfig(format!(
                "hub endpoint must be an HTTP(S) URL, got '{}'",
                self.config.endpoint
            )));
        }
        Ok(self.config)
    }
}
