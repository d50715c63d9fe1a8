//! Joins the repository mapping with the package-version mapping.
//!
//! The two policies answer different questions: [`MergePolicy::Union`] lists
//! what exists in source control regardless of publication status, while
//! [`MergePolicy::VersionDriven`] lists what is published and surfaces
//! source-control gaps on every row.

use std::collections::BTreeMap;

use crate::forge::types::Repository;
use crate::registry::PackageRecord;

/// Which side of the join drives the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// One row per repository, whether or not it was ever published.
    Union,
    /// One row per published package, with missing repositories and missing
    /// tags called out as [`FieldValue::Missing`].
    VersionDriven,
}

/// Why a field has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingReason {
    /// No repository (or no usable source URL) matches the package name.
    RepositoryNotFound,
    /// The repository exists but carries no release tag.
    NoTags,
}

/// A report field that is either a value or a reason for its absence.
///
/// Renderers decide what absence looks like; the data model never carries
/// display strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Present(String),
    Missing(MissingReason),
}

impl FieldValue {
    fn from_option(value: Option<String>, reason: MissingReason) -> Self {
        match value {
            Some(value) => FieldValue::Present(value),
            None => FieldValue::Missing(reason),
        }
    }

    pub fn as_present(&self) -> Option<&str> {
        match self {
            FieldValue::Present(value) => Some(value),
            FieldValue::Missing(_) => None,
        }
    }
}

/// One output row of the reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    pub name: String,
    pub latest_package_version: Option<String>,
    pub source_url: FieldValue,
    pub latest_repo_tag: FieldValue,
}

/// Joins the two mappings by package name under the given policy.
///
/// Both inputs are ordered maps, so the output order is deterministic and
/// repeated calls over unchanged inputs yield identical rows.
pub fn reconcile(
    repositories: &BTreeMap<String, Repository>,
    packages: &BTreeMap<String, PackageRecord>,
    policy: MergePolicy,
) -> Vec<MergedRecord> {
    match policy {
        MergePolicy::Union => union_rows(repositories, packages),
        MergePolicy::VersionDriven => version_driven_rows(repositories, packages),
    }
}

fn union_rows(
    repositories: &BTreeMap<String, Repository>,
    packages: &BTreeMap<String, PackageRecord>,
) -> Vec<MergedRecord> {
    repositories
        .values()
        .map(|repository| MergedRecord {
            name: repository.name.clone(),
            latest_package_version: packages
                .get(&repository.name)
                .and_then(|record| record.latest_version.clone()),
            source_url: FieldValue::from_option(
                repository.ssh_url.clone(),
                MissingReason::RepositoryNotFound,
            ),
            latest_repo_tag: FieldValue::from_option(
                repository.latest_tag.clone(),
                MissingReason::NoTags,
            ),
        })
        .collect()
}

fn version_driven_rows(
    repositories: &BTreeMap<String, Repository>,
    packages: &BTreeMap<String, PackageRecord>,
) -> Vec<MergedRecord> {
    packages
        .values()
        .map(|record| {
            let repository = repositories.get(&record.name);
            MergedRecord {
                name: record.name.clone(),
                latest_package_version: record.latest_version.clone(),
                source_url: FieldValue::from_option(
                    repository.and_then(|r| r.ssh_url.clone()),
                    MissingReason::RepositoryNotFound,
                ),
                latest_repo_tag: FieldValue::from_option(
                    repository.and_then(|r| r.latest_tag.clone()),
                    MissingReason::NoTags,
                ),
            }
        })
        .collect()
}
