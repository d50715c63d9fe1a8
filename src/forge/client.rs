//! Paginated forge API client.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Settings;
use crate::forge::error::ForgeError;
use crate::forge::types::{Repository, Tag};

/// Upper bound on org-repos pages requested in one listing. An upstream
/// that keeps returning non-empty pages past this point aborts the fetch
/// instead of looping forever.
pub const MAX_PAGES: u32 = 1000;

/// Anything that can produce the full repository listing of an organization.
#[async_trait]
pub trait RepoSource: Send + Sync {
    async fn list_repos(&self, organization: &str) -> Result<Vec<Repository>, ForgeError>;
}

pub struct ForgeClient {
    client: reqwest::Client,
    base_url: String,
    api_version: String,
    max_pages: u32,
}

impl ForgeClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("tagdrift")
                .danger_accept_invalid_certs(!settings.verify_ssl)
                .build()
                .expect("failed to build HTTP client"),
            base_url: settings.forge_url.trim_end_matches('/').to_string(),
            api_version: settings.api_version.clone(),
            max_pages: MAX_PAGES,
        }
    }

    /// Overrides the pagination bound.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ForgeError> {
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ForgeError::Status {
                url: url.to_string(),
                status,
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// Name of the most recent tag of one repository, if it has any.
    async fn latest_tag(&self, tags_url: &str) -> Result<Option<String>, ForgeError> {
        let tags: Vec<Tag> = self.get_json(tags_url, &[("response", "json")]).await?;
        Ok(tags.into_iter().next().map(|tag| tag.name))
    }
}

#[async_trait]
impl RepoSource for ForgeClient {
    /// Walks the organization's repository listing one page at a time,
    /// enriching every entry that exposes a tags endpoint with its most
    /// recent tag. Pagination ends at the first empty page.
    async fn list_repos(&self, organization: &str) -> Result<Vec<Repository>, ForgeError> {
        let url = format!(
            "{}/api/{}/orgs/{}/repos",
            self.base_url, self.api_version, organization
        );

        let mut repositories = Vec::new();
        for page in 1..=self.max_pages {
            debug!("fetching {} repos page {}", organization, page);
            let page_param = page.to_string();
            // a null body counts as an empty page, like an empty array
            let batch: Vec<Repository> = self
                .get_json::<Option<Vec<Repository>>>(
                    &url,
                    &[("page", page_param.as_str()), ("response", "json")],
                )
                .await?
                .unwrap_or_default();

            if batch.is_empty() {
                debug!(
                    "{}: {} repositories over {} pages",
                    organization,
                    repositories.len(),
                    page
                );
                return Ok(repositories);
            }

            for mut repository in batch {
                if let Some(tags_url) = repository.tags_url.clone() {
                    repository.latest_tag = self.latest_tag(&tags_url).await?;
                }
                repositories.push(repository);
            }
        }

        Err(ForgeError::PageLimit(self.max_pages))
    }
}
