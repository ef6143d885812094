//! Minimal dataset-hub HTTP client.
//!
//! Only the three calls publishing needs:
//!
//! | Call          | Request                                              |
//! |---------------|------------------------------------------------------|
//! | create repo   | `POST   {endpoint}/api/repos/create`                 |
//! | delete repo   | `DELETE {endpoint}/api/repos/delete`                 |
//! | commit files  | `POST   {endpoint}/api/datasets/{repo}/commit/main`  |
//!
//! A commit is NDJSON: one header line with the commit summary followed by
//! one line per file, content base64-encoded inline.

use crate::config::HubConfig;
use crate::error::CorpusError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

/// One file in a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitFile {
    /// Path inside the repository, e.g. `data/train.csv`.
    pub path: String,
    pub content: Vec<u8>,
}

impl CommitFile {
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Client for one dataset repository.
pub struct HubClient {
    http: reqwest::Client,
    config: HubConfig,
}

impl HubClient {
    pub fn new(config: HubConfig) -> Result<Self, CorpusError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CorpusError::HubRequest {
                url: config.endpoint.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    pub fn repo_id(&self) -> &str {
        &self.config.repo_id
    }

    /// The access token, or [`CorpusError::TokenMissing`].
    pub fn require_token(&self) -> Result<&str, CorpusError> {
        self.config.token.as_deref().ok_or(CorpusError::TokenMissing)
    }

    /// Public URL of the dataset page.
    pub fn dataset_url(&self) -> String {
        format!("{}/datasets/{}", self.config.endpoint, self.config.repo_id)
    }

    /// Create the dataset repository. With `exist_ok`, a 409 is success.
    pub async fn create_repo(&self, exist_ok: bool) -> Result<(), CorpusError> {
        let url = format!("{}/api/repos/create", self.config.endpoint);
        let response = self
            .http
            .post(&url)
            .bearer_auth(self.require_token()?)
            .json(&self.repo_body()?)
            .send()
            .await
            .map_err(|e| request_error(&url, e))?;

        let status = response.status();
        if exist_ok && status == reqwest::StatusCode::CONFLICT {
            debug!("Repository {} already exists", self.config.repo_id);
            return Ok(());
        }
        check_status(&url, response).await?;
        info!("Created repository {}", self.config.repo_id);
        Ok(())
    }

    /// Delete the dataset repository.
    pub async fn delete_repo(&self) -> Result<(), CorpusError> {
        let url = format!("{}/api/repos/delete", self.config.endpoint);
        let response = self
            .http
            .delete(&url)
            .bearer_auth(self.require_token()?)
            .json(&self.repo_body()?)
            .send()
            .await
            .map_err(|e| request_error(&url, e))?;
        check_status(&url, response).await?;
        info!("Deleted repository {}", self.config.repo_id);
        Ok(())
    }

    /// Add or replace `files` in one commit on `main`.
    pub async fn commit(&self, files: &[CommitFile], summary: &str) -> Result<(), CorpusError> {
        let token = self.require_token()?;
        let url = format!(
            "{}/api/datasets/{}/commit/main",
            self.config.endpoint, self.config.repo_id
        );
        let body = build_commit_payload(files, summary)?;
        debug!(
            "Committing {} file(s), {} bytes of payload, to {}",
            files.len(),
            body.len(),
            self.config.repo_id
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .await
            .map_err(|e| request_error(&url, e))?;
        check_status(&url, response).await
    }

    fn repo_body(&self) -> Result<serde_json::Value, CorpusError> {
        let (namespace, name) = self.config.repo_parts().ok_or_else(|| {
            CorpusError::InvalidConfig(format!(
                "repository id must be 'namespace/name', got '{}'",
                self.config.repo_id
            ))
        })?;
        Ok(json!({
            "type": "dataset",
            "name": name,
            "organization": namespace,
        }))
    }
}

/// Serialise a commit as NDJSON.
pub fn build_commit_payload(files: &[CommitFile], summary: &str) -> Result<String, CorpusError> {
    let mut lines = Vec::with_capacity(files.len() + 1);
    lines.push(json!({
        "key": "header",
        "value": { "summary": summary, "description": "" },
    }));
    for file in files {
        lines.push(json!({
            "key": "file",
            "value": {
                "content": STANDARD.encode(&file.content),
                "path": file.path,
                "encoding": "base64",
            },
        }));
    }

    let mut out = String::new();
    for line in lines {
        let encoded = serde_json::to_string(&line)
            .map_err(|e| CorpusError::Internal(format!("commit serialisation: {e}")))?;
        out.push_str(&encoded);
        out.push('\n');
    }
    Ok(out)
}

fn request_error(url: &str, e: reqwest::Error) -> CorpusError {
    let reason = if e.is_timeout() {
        format!("timed out: {e}")
    } else {
        e.to_string()
    };
    CorpusError::HubRequest {
        url: url.to_string(),
        reason,
    }
}

async fn check_status(url: &str, response: reqwest::Response) -> Result<(), CorpusError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(CorpusError::HubStatus {
        url: url.to_string(),
        status: status.as_u16(),
        body,
    })
}
