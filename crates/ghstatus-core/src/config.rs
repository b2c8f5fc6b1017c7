use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::filter::Filters;

/// Environment variables checked for a token, first hit wins
pub const TOKEN_ENV_VARS: [&str; 2] = ["GH_TOKEN", "GITHUB_TOKEN"];

/// Main configuration structure
///
/// This gets loaded from the config file, then env vars and CLI args are
/// layered on top by the caller.
/// Priority: CLI > Env > File > Defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub status: StatusConfig,
}

impl Config {
    /// Load config from the default location, or defaults if there is none
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Self::from_toml_str(&contents)
        } else {
            // No config file? Use defaults
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(contents: &str) -> crate::Result<Self> {
        toml::from_str(contents)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Get the config file path
    /// Uses XDG on Linux, Application Support on macOS, AppData on Windows
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("ghstatus");

        Ok(config_dir.join("config.toml"))
    }

    /// Token from the environment if set, else whatever the file had
    pub fn resolve_token(&self) -> Option<String> {
        self.resolve_token_with(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::resolve_token`] with the env lookup passed in
    pub fn resolve_token_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        TOKEN_ENV_VARS
            .iter()
            .filter_map(|key| lookup(key))
            .chain(self.github.token.clone())
            .map(|token| token.trim().to_string())
            .find(|token| !token.is_empty())
    }

    /// Filters from the `[status]` section
    pub fn filters(&self) -> Filters {
        let mut filters = Filters::new();
        if let Some(org) = &self.status.org {
            filters = filters.org(org.as_str());
        }
        for repo in &self.status.exclude {
            filters = filters.exclude(repo);
        }
        filters
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// GitHub personal access token
    /// Needs the `notifications` and `repo` scopes
    pub token: Option<String>,

    /// REST API URL (for GitHub Enterprise)
    #[serde(default = "default_github_url")]
    pub api_url: String,

    /// GraphQL endpoint, derived from `api_url` when unset
    #[serde(default)]
    pub graphql_url: Option<String>,
}

fn default_github_url() -> String {
    "https://api.github.com".to_string()
}

impl GitHubConfig {
    /// GraphQL endpoint to use
    ///
    /// github.com serves GraphQL at `<api>/graphql`; Enterprise serves REST
    /// under `/api/v3` and GraphQL under `/api/graphql`.
    pub fn graphql_endpoint(&self) -> String {
        if let Some(url) = &self.graphql_url {
            return url.trim_end_matches('/').to_string();
        }

        let api = self.api_url.trim_end_matches('/');
        match api.strip_suffix("/api/v3") {
            Some(host) => format!("{}/api/graphql", host),
            None => format!("{}/graphql", api),
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: default_github_url(),
            graphql_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// How long a cached response stays fresh
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,

    /// Database file, defaults to the platform cache dir
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl() -> u64 {
    60 // status goes stale fast
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    pub fn db_path(&self) -> crate::Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }

        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find cache directory".into()))?;

        Ok(cache_dir.join("ghstatus").join("responses.db"))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl_seconds: default_cache_ttl(),
            path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    /// Only report on this org unless --org says otherwise
    #[serde(default)]
    pub org: Option<String>,

    /// owner/repo entries to always leave out
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Comment fetches in flight while confirming mentions
    #[serde(default = "default_mention_workers")]
    pub mention_workers: usize,
}

fn default_mention_workers() -> usize {
    crate::mentions::DEFAULT_MENTION_WORKERS
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            org: None,
            exclude: Vec::new(),
            mention_workers: default_mention_workers(),
        }
    }
}
