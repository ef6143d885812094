//! Release a new dataset version end to end.
//!
//! ```text
//! initialize store (ensure v1)
//!   → pick version number (explicit, or latest + 1)
//!   → [convert PDFs → assemble corpus]      --convert
//!   → snapshot corpus as v<N>, load it back
//!   → [upload as default + config v<N>]     --push
//! ```

use crate::config::{HubConfig, PipelineConfig};
use crate::convert::convert_pdf_directory;
use crate::corpus::assemble_corpus;
use crate::error::CorpusError;
use crate::output::{ConversionSummary, CorpusSummary};
use crate::publish::{load_version_dataset, PublishReport, Publisher};
use crate::version::{VersionMetadata, VersionStore, VersionTag};
use tracing::{info, warn};

/// What an update run should do beyond creating the version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Explicit version number. Default: one past the latest.
    pub version: Option<u32>,
    /// Upload the new version to the hub.
    pub push: bool,
    /// Run conversion and assembly before snapshotting.
    pub convert: bool,
}

/// Result of [`update_dataset`].
#[derive(Debug, Clone)]
pub struct UpdateReport {
    /// Latest version before this run (after initialization).
    pub previous: Option<VersionMetadata>,
    pub created: VersionMetadata,
    /// Rows loaded back from the new version.
    pub entries: usize,
    pub conversion: Option<ConversionSummary>,
    pub corpus: Option<CorpusSummary>,
    pub publish: Option<PublishReport>,
}

/// Run an update. Conversion and loading errors abort; upload failures are
/// only reported.
pub async fn update_dataset(
    config: &PipelineConfig,
    hub: &HubConfig,
    options: &UpdateOptions,
) -> Result<UpdateReport, CorpusError> {
    let store = VersionStore::from_config(config);

    let previous = store.initialize(&config.corpus_path)?;
    match previous {
        Some(ref meta) => info!("Current version: {}", meta.version),
        None => info!("No versions yet"),
    }

    let tag = match options.version {
        Some(0) => return Err(CorpusError::InvalidVersion("v0".to_string())),
        Some(n) => VersionTag(n),
        None => match previous {
            Some(ref meta) => meta.tag()?.next(),
            None => VersionTag(1),
        },
    };
    info!("Preparing to create version {}", tag);

    let (conversion, corpus) = if options.convert {
        let summary = convert_pdf_directory(config.clone()).await?;
        let corpus = assemble_corpus(config)?;
        (Some(summary), Some(corpus))
    } else {
        (None, None)
    };

    let created = store.create_version(tag, &config.corpus_path)?;
    let dataset = load_version_dataset(&store, tag)?;
    info!("Created version {} ({} entries)", tag, dataset.len());

    let publish = if options.push {
        let publisher = Publisher::new(hub.clone(), store.clone())?;
        let report = publisher.publish_version(tag).await;
        if !report.all_succeeded() {
            warn!("Failed to push {} to the hub. Check that HF_TOKEN is set.", tag);
        }
        Some(report)
    } else {
        None
    };

    info!("Dataset update to {} completed", tag);
    Ok(UpdateReport {
        previous,
        created,
        entries: dataset.len(),
        conversion,
        corpus,
        publish,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn setup(root: &Path, rows: &[&str]) -> PipelineConfig {
        let config = PipelineConfig::builder()
            .input_dir(root.join("full"))
            .text_dir(root.join("texts"))
            .corpus_path(root.join("texts.csv"))
            .versions_dir(root.join("versions"))
            .dataset_name("Test Writings")
            .build()
            .unwrap();
        let mut body = String::from("text\n");
        for r in rows {
            body.push_str(r);
            body.push('\n');
        }
        std::fs::write(&config.corpus_path, body).unwrap();
        config
    }

    fn offline_hub() -> HubConfig {
        HubConfig::builder()
            .endpoint("http://127.0.0.1:9")
            .repo_id("someone/writings")
            .token(None)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn first_update_seeds_v1_and_creates_v2() {
        let tmp = tempfile::tempdir().unwrap();
        let config = setup(tmp.path(), &["a", "b"]);

        let report = update_dataset(&config, &offline_hub(), &UpdateOptions::default())
            .await
            .unwrap();

        assert_eq!(report.previous.unwrap().version, "v1");
        assert_eq!(report.created.version, "v2");
        assert_eq!(report.entries, 2);
        assert!(report.publish.is_none());
        assert!(config.versions_dir.join("v1/texts.csv").exists());
        assert!(config.versions_dir.join("v2/metadata.json").exists());
    }

    #[tokio::test]
    async fn explicit_version_is_used() {
        let tmp = tempfile::tempdir().unwrap();
        let config = setup(tmp.path(), &["a"]);
        let options = UpdateOptions {
            version: Some(5),
            ..Default::default()
        };
        let report = update_dataset(&config, &offline_hub(), &options)
            .await
            .unwrap();
        assert_eq!(report.created.version, "v5");

        let next = update_dataset(&config, &offline_hub(), &UpdateOptions::default())
            .await
            .unwrap();
        assert_eq!(next.created.version, "v6");
    }

    #[tokio::test]
    async fn push_without_token_is_reported_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let config = setup(tmp.path(), &["a"]);
        let options = UpdateOptions {
            push: true,
            ..Default::default()
        };
        let report = update_dataset(&config, &offline_hub(), &options)
            .await
            .unwrap();
        let publish = report.publish.unwrap();
        assert_eq!(publish.uploads.len(), 2);
        assert!(!publish.all_succeeded());
    }

    #[tokio::test]
    async fn failed_conversion_aborts_before_versioning() {
        let tmp = tempfile::tempdir().unwrap();
        let config = setup(tmp.path(), &["a"]);
        let options = UpdateOptions {
            convert: true,
            ..Default::default()
        };
        let err = update_dataset(&config, &offline_hub(), &options)
            .await
            .unwrap_err();
        assert!(matches!(err, CorpusError::InputDirMissing { .. }));
        assert!(!config.versions_dir.join("v2").exists());
    }

    #[tokio::test]
    async fn version_zero_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let config = setup(tmp.path(), &["a"]);
        let options = UpdateOptions {
            version: Some(0),
            ..Default::default()
        };
        let err = update_dataset(&config, &offline_hub(), &options)
            .await
            .unwrap_err();
        assert!(matches!(err, CorpusError::InvalidVersion(_)));
    }
}
