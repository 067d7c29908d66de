//! Runtime settings: TOML file plus environment overrides

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default settings file, looked up in the working directory.
pub const CONFIG_FILE: &str = "depflow.toml";

/// Environment variable naming an alternative settings file.
pub const CONFIG_ENV: &str = "DEPFLOW_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub github: GitHubSettings,
    pub analysis: AnalysisLimits,
    pub cache: CacheSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubSettings {
    pub api_base: String,
    pub raw_base: String,
    pub token: Option<String>,
    pub user_agent: String,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            raw_base: "https://raw.githubusercontent.com".to_string(),
            token: None,
            user_agent: format!("depflow/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Bounds that keep one computation's cost proportional to a fixed budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisLimits {
    /// Files whose content is fetched and scanned.
    pub max_analyzed_files: usize,
    /// Concurrent content fetches per group.
    pub fetch_batch_size: usize,
    /// Node cap of the import-mode graph.
    pub max_graph_nodes: usize,
    /// Node cap of the structure-mode graph.
    pub max_structure_nodes: usize,
    /// Below this many directory nodes, loose files are surfaced too.
    pub min_structure_dirs: usize,
    pub loose_file_max_depth: usize,
    pub default_branch: String,
}

impl Default for AnalysisLimits {
    fn default() -> Self {
        Self {
            max_analyzed_files: 120,
            fetch_batch_size: 10,
            max_graph_nodes: 150,
            max_structure_nodes: 60,
            min_structure_dirs: 8,
            loose_file_max_depth: 2,
            default_branch: "main".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 3600,
        }
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7890,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from `path`, or from the default file if it exists, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(CONFIG_FILE);
                if !default.exists() {
                    tracing::debug!("No {} found, using defaults", CONFIG_FILE);
                    return Ok(Settings::default());
                }
                default
            }
        };
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("Loaded settings from {}", path.display());
        Self::from_toml(&text, &path)
    }

    /// Apply overrides from an environment lookup such as `std::env::var`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("GITHUB_TOKEN").filter(|t| !t.trim().is_empty()) {
            self.github.token = Some(token);
        }
        if let Some(host) = lookup("DEPFLOW_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("DEPFLOW_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::Invalid {
                key: "DEPFLOW_PORT",
                reason: format!("not a port number: {port}"),
            })?;
        }
        if let Some(ttl) = lookup("DEPFLOW_CACHE_TTL_SECS") {
            self.cache.ttl_secs = ttl.parse().map_err(|_| ConfigError::Invalid {
                key: "DEPFLOW_CACHE_TTL_SECS",
                reason: format!("not a number of seconds: {ttl}"),
            })?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = &self.analysis;
        let checks: [(&'static str, usize); 4] = [
            ("analysis.max_analyzed_files", limits.max_analyzed_files),
            ("analysis.fetch_batch_size", limits.fetch_batch_size),
            ("analysis.max_graph_nodes", limits.max_graph_nodes),
            ("analysis.max_structure_nodes", limits.max_structure_nodes),
        ];
        for (key, value) in checks {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    key,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }
        if limits.default_branch.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "analysis.default_branch",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
