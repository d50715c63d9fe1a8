//! Package registry client.
//!
//! One call: the registry's package index, trimmed to the newest version of
//! each package. The response maps package names to a `versions` array
//! ordered most-recent-first; only the first entry is read.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{url} returned status {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Latest known published version of one package.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageRecord {
    pub name: String,
    /// `None` when the registry lists the package without any version.
    pub latest_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PackageInfo {
    #[serde(default)]
    versions: Vec<VersionEntry>,
}

#[derive(Debug, Deserialize)]
struct VersionEntry {
    version: String,
}

pub struct RegistryClient {
    client: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("tagdrift")
                .build()
                .expect("failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetches the registry's package index, one record per package.
    pub async fn latest_versions(&self) -> Result<BTreeMap<String, PackageRecord>, RegistryError> {
        let url = format!("{}/packages", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("num_versions", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::Status { url, status, body });
        }

        let index: BTreeMap<String, PackageInfo> = response.json().await?;
        debug!("registry reported {} packages", index.len());

        let records = index
            .into_iter()
            .map(|(name, info)| {
                let latest_version = info.versions.into_iter().next().map(|entry| entry.version);
                (
                    name.clone(),
                    PackageRecord {
                        name,
                        latest_version,
                    },
                )
            })
            .collect();
        Ok(records)
    }
}
