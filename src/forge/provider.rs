//! Cache-backed repository provider and multi-organization aggregation.

use std::collections::BTreeMap;

use tracing::debug;

use crate::forge::cache::Cache;
use crate::forge::client::RepoSource;
use crate::forge::error::ForgeError;
use crate::forge::types::Repository;

pub struct RepoProvider<S> {
    cache: Cache,
    source: S,
    host: String,
}

impl<S: RepoSource> RepoProvider<S> {
    pub fn new(cache: Cache, source: S, host: impl Into<String>) -> Self {
        Self {
            cache,
            source,
            host: host.into(),
        }
    }

    /// Repository listing for one organization, served from cache while the
    /// entry is within the TTL and refetched in full otherwise.
    pub async fn repositories(&self, organization: &str) -> Result<Vec<Repository>, ForgeError> {
        if let Some(entry) = self.cache.load(&self.host, organization) {
            if self.cache.is_fresh(&entry) {
                return Ok(entry.repositories);
            }
            debug!("{} cache expired, refreshing", organization);
        }

        let repositories = self.source.list_repos(organization).await?;
        self.cache.save(&self.host, organization, &repositories)?;
        Ok(repositories)
    }

    /// Merges the listings of several organizations into one mapping keyed
    /// by repository name.
    ///
    /// Organizations are processed in the order given and an existing name
    /// is overwritten, so the last organization wins a collision. Callers
    /// that want the first-listed organization to take precedence pass the
    /// list reversed.
    pub async fn aggregate(
        &self,
        organizations: &[String],
    ) -> Result<BTreeMap<String, Repository>, ForgeError> {
        let mut merged = BTreeMap::new();
        for organization in organizations {
            for repository in self.repositories(organization).await? {
                merged.insert(repository.name.clone(), repository);
            }
        }
        Ok(merged)
    }
}
