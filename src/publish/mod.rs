//! Publishing versions to the dataset hub.
//!
//! A version is uploaded either as the repository's **default**
//! configuration (`data/train.csv` plus the dataset card) or as a **named**
//! configuration (`<name>/train.csv`). Only the `text` column is published.
//!
//! Upload failures are reported as `false` and logged; they never abort the
//! caller. This holds for a missing token too, which is detected before any
//! network traffic.

pub mod card;
pub mod hub;

use crate::config::HubConfig;
use crate::error::CorpusError;
use crate::version::{VersionMetadata, VersionStore, VersionTag};
use card::CardContext;
use hub::{CommitFile, HubClient};
use std::fmt;
use tracing::{error, info, warn};

/// A version loaded for upload: its metadata and the `text` column.
#[derive(Debug, Clone)]
pub struct VersionDataset {
    pub tag: VersionTag,
    pub metadata: VersionMetadata,
    pub texts: Vec<String>,
}

impl VersionDataset {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Single-column CSV with a `text` header.
    pub fn to_csv(&self) -> Result<Vec<u8>, CorpusError> {
        let csv_err = |e: csv::Error| CorpusError::Csv {
            path: format!("{}/train.csv", self.tag).into(),
            detail: e.to_string(),
        };
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(["text"]).map_err(csv_err)?;
        for text in &self.texts {
            wtr.write_record([text.as_str()]).map_err(csv_err)?;
        }
        wtr.into_inner().map_err(|e| CorpusError::Csv {
            path: format!("{}/train.csv", self.tag).into(),
            detail: e.to_string(),
        })
    }
}

/// Load `v<N>/texts.csv`, keeping only the `text` column.
///
/// Missing cells become empty strings.
pub fn load_version_dataset(
    store: &VersionStore,
    tag: VersionTag,
) -> Result<VersionDataset, CorpusError> {
    let path = store.corpus_path(tag);
    if !path.exists() {
        return Err(CorpusError::CorpusMissing { path });
    }
    let csv_err = |e: csv::Error| CorpusError::Csv {
        path: path.clone(),
        detail: e.to_string(),
    };

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(&path)
        .map_err(csv_err)?;
    let column = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .position(|h| h == "text")
        .ok_or_else(|| CorpusError::MissingTextColumn { path: path.clone() })?;

    let mut texts = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(csv_err)?;
        texts.push(record.get(column).unwrap_or("").to_string());
    }
    info!("Loaded {} entries from {}", texts.len(), tag);

    let mut metadata = store.metadata(tag)?;
    if metadata.num_entries.is_none() {
        metadata.num_entries = Some(texts.len());
    }

    Ok(VersionDataset {
        tag,
        metadata,
        texts,
    })
}

/// Where in the repository a version is uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadTarget {
    /// `data/train.csv` and the dataset card.
    Default,
    /// `<name>/train.csv`.
    Config(String),
}

impl UploadTarget {
    /// Config named after the version tag, e.g. `v2`.
    pub fn for_version(tag: VersionTag) -> Self {
        UploadTarget::Config(tag.to_string())
    }

    pub fn data_path(&self) -> String {
        match self {
            UploadTarget::Default => "data/train.csv".to_string(),
            UploadTarget::Config(name) => format!("{name}/train.csv"),
        }
    }
}

impl fmt::Display for UploadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadTarget::Default => f.write_str("default"),
            UploadTarget::Config(name) => write!(f, "config '{name}'"),
        }
    }
}

/// Outcome of one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub version: VersionTag,
    pub target: UploadTarget,
    pub success: bool,
}

/// Outcomes of a publish run, in upload order.
#[derive(Debug, Clone, Default)]
pub struct PublishReport {
    pub uploads: Vec<UploadResult>,
}

impl PublishReport {
    pub fn all_succeeded(&self) -> bool {
        self.uploads.iter().all(|u| u.success)
    }

    pub fn failures(&self) -> usize {
        self.uploads.iter().filter(|u| !u.success).count()
    }
}

impl fmt::Display for PublishReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for u in &self.uploads {
            let label = match &u.target {
                UploadTarget::Default => format!("{} (default)", u.version),
                UploadTarget::Config(name) => format!("{} (config {name})", u.version),
            };
            writeln!(
                f,
                "{label}: {}",
                if u.success { "success" } else { "failed" }
            )?;
        }
        Ok(())
    }
}

/// Uploads versions from a [`VersionStore`] to one hub repository.
pub struct Publisher {
    client: HubClient,
    store: VersionStore,
}

impl Publisher {
    pub fn new(config: HubConfig, store: VersionStore) -> Result<Self, CorpusError> {
        Ok(Self {
            client: HubClient::new(config)?,
            store,
        })
    }

    pub fn client(&self) -> &HubClient {
        &self.client
    }

    /// Upload `tag` to `target`. Returns whether it succeeded.
    pub async fn upload(&self, tag: VersionTag, target: &UploadTarget) -> bool {
        info!("Uploading {} as {} to {}", tag, target, self.client.repo_id());
        match self.try_upload(tag, target).await {
            Ok(rows) => {
                info!(
                    "Uploaded {} as {} to {} ({} rows)",
                    tag,
                    target,
                    self.client.repo_id(),
                    rows
                );
                true
            }
            Err(e) => {
                error!("Error uploading {} as {}: {}", tag, target, e);
                false
            }
        }
    }

    async fn try_upload(
        &self,
        tag: VersionTag,
        target: &UploadTarget,
    ) -> Result<usize, CorpusError> {
        self.client.require_token()?;
        let dataset = load_version_dataset(&self.store, tag)?;

        let mut files = vec![CommitFile::new(target.data_path(), dataset.to_csv()?)];
        let summary = match target {
            UploadTarget::Default => {
                files.push(CommitFile::new("README.md", self.render_card(&dataset.metadata)?));
                format!("Upload {tag} as default configuration")
            }
            UploadTarget::Config(name) => format!("Upload {tag} as configuration {name}"),
        };

        self.client.commit(&files, &summary).await?;
        Ok(dataset.len())
    }

    fn render_card(&self, default: &VersionMetadata) -> Result<String, CorpusError> {
        let versions = self
            .store
            .list()?
            .into_iter()
            .map(|t| self.store.metadata(t))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(card::dataset_card(&CardContext {
            repo_id: self.client.repo_id(),
            dataset_name: self.store.dataset_name(),
            default_version: default,
            versions: &versions,
        }))
    }

    /// Upload `tag` as the default and as its own named configuration.
    pub async fn publish_version(&self, tag: VersionTag) -> PublishReport {
        let mut report = PublishReport::default();
        for target in [UploadTarget::Default, UploadTarget::for_version(tag)] {
            let success = self.upload(tag, &target).await;
            report.uploads.push(UploadResult {
                version: tag,
                target,
                success,
            });
        }
        report
    }

    /// Publish the whole store: latest as default, every version as a named
    /// configuration.
    ///
    /// With `fresh`, the repository is deleted first (a failed delete is
    /// ignored). The repository is then created if absent.
    pub async fn publish_all(&self, fresh: bool) -> Result<PublishReport, CorpusError> {
        let versions = self.store.list()?;
        let Some(&latest) = versions.last() else {
            warn!("No versions under {}", self.store.root().display());
            return Ok(PublishReport::default());
        };

        if self.client.require_token().is_err() {
            error!("{}", CorpusError::TokenMissing);
            return Ok(PublishReport::default());
        }

        if fresh {
            match self.client.delete_repo().await {
                Ok(()) => info!("Deleted existing repository"),
                Err(e) => warn!("Repository delete skipped: {}", e),
            }
        }
        if let Err(e) = self.client.create_repo(true).await {
            warn!("Repository creation: {}", e);
        }

        let mut report = PublishReport::default();
        let success = self.upload(latest, &UploadTarget::Default).await;
        report.uploads.push(UploadResult {
            version: latest,
            target: UploadTarget::Default,
            success,
        });
        for tag in versions {
            let target = UploadTarget::for_version(tag);
            let success = self.upload(tag, &target).await;
            report.uploads.push(UploadResult {
                version: tag,
                target,
                success,
            });
        }

        if report.all_succeeded() {
            info!("All uploads completed: {}", self.client.dataset_url());
        } else {
            warn!("{} upload(s) failed", report.failures());
        }
        Ok(report)
    }
}
