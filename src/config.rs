use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Default lifetime of a per-organization cache file (15 minutes).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 900;

/// Default forge API version segment.
pub const DEFAULT_API_VERSION: &str = "v3";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no forge URL configured")]
    MissingForgeUrl,

    #[error("no registry URL configured")]
    MissingRegistryUrl,

    #[error("invalid forge URL {0:?}: {1}")]
    InvalidForgeUrl(String, url::ParseError),
}

/// Resolved configuration, built once at startup and passed by reference.
///
/// No component reads the environment or any global state; everything a
/// component needs arrives through this value.
#[derive(Debug, Clone)]
pub struct Settings {
    pub forge_url: String,
    pub registry_url: String,
    pub api_version: String,
    pub verify_ssl: bool,
    /// Organizations in the order they should be aggregated.
    pub organizations: Vec<String>,
    pub cache_ttl: Duration,
    pub cache_dir: PathBuf,
    host: String,
}

impl Settings {
    pub fn new(
        forge_url: impl Into<String>,
        registry_url: impl Into<String>,
        api_version: impl Into<String>,
        verify_ssl: bool,
        organizations: Vec<String>,
        cache_ttl: Duration,
        cache_dir: PathBuf,
    ) -> Result<Self, ConfigError> {
        let forge_url = forge_url.into();
        let registry_url = registry_url.into();

        if forge_url.trim().is_empty() {
            return Err(ConfigError::MissingForgeUrl);
        }
        if registry_url.trim().is_empty() {
            return Err(ConfigError::MissingRegistryUrl);
        }

        let host = host_of(&forge_url)?;

        Ok(Self {
            forge_url,
            registry_url,
            api_version: api_version.into(),
            verify_ssl,
            organizations,
            cache_ttl,
            cache_dir,
            host,
        })
    }

    /// Lower-cased host name of the forge, used as the cache key prefix.
    pub fn host(&self) -> &str {
        &self.host
    }
}

fn host_of(raw: &str) -> Result<String, ConfigError> {
    let parsed =
        url::Url::parse(raw).map_err(|err| ConfigError::InvalidForgeUrl(raw.to_string(), err))?;
    match parsed.host_str() {
        Some(host) => Ok(host.to_ascii_lowercase()),
        None => Err(ConfigError::InvalidForgeUrl(
            raw.to_string(),
            url::ParseError::EmptyHost,
        )),
    }
}

/// Returns the cache directory for tagdrift.
/// Uses $XDG_CACHE_HOME/tagdrift if XDG_CACHE_HOME is set,
/// otherwise falls back to ~/.cache/tagdrift,
/// or ./tagdrift if neither is available.
pub fn default_cache_dir() -> PathBuf {
    cache_dir_with_env(std::env::var("XDG_CACHE_HOME").ok(), dirs::home_dir())
}

fn cache_dir_with_env(xdg_cache_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let cache_dir = xdg_cache_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".cache")))
        .unwrap_or_else(|| PathBuf::from("."));

    cache_dir.join("tagdrift")
}
