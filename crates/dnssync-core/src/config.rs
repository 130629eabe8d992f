//! Configuration types for the DNS sync engine
//!
//! A [`SyncConfig`] is built once at startup and handed to
//! [`SyncEngine::new`](crate::SyncEngine::new). Nothing below the binary
//! reads the process environment.

use serde::{Deserialize, Serialize};

/// Main sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Where record files live and which files count as records
    #[serde(default)]
    pub records: RecordsConfig,

    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// Change source configuration
    #[serde(default)]
    pub source: ChangeSourceConfig,

    /// Log intended writes instead of sending them
    #[serde(default)]
    pub dry_run: bool,
}

impl SyncConfig {
    /// Create a configuration with default records and source settings
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            records: RecordsConfig::default(),
            provider,
            source: ChangeSourceConfig::default(),
            dry_run: false,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.records.validate()?;
        self.provider.validate()?;
        self.source.validate()?;

        Ok(())
    }
}

/// Records directory and file filter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsConfig {
    /// Directory holding record files, relative to the repository root
    #[serde(default = "default_records_dir")]
    pub dir: String,

    /// Accepted file suffixes (case-sensitive)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl RecordsConfig {
    /// Create a records configuration for `dir` with the default extensions
    pub fn new(dir: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extensions: default_extensions(),
        }
    }

    /// Validate the records configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.prefix() == "/" {
            return Err(crate::Error::config("Records directory cannot be empty"));
        }
        if self.extensions.is_empty() {
            return Err(crate::Error::config(
                "At least one record file extension is required",
            ));
        }
        if self.extensions.iter().any(|ext| ext.is_empty()) {
            return Err(crate::Error::config("Record file extensions cannot be empty"));
        }
        Ok(())
    }

    /// Path prefix a record file must start with: `"<dir>/"`
    pub fn prefix(&self) -> String {
        format!("{}/", self.dir.trim_end_matches('/'))
    }

    /// Whether `path` names a record file under the records directory
    pub fn accepts(&self, path: &str) -> bool {
        path.starts_with(&self.prefix()) && self.extensions.iter().any(|ext| path.ends_with(ext))
    }
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self::new(default_records_dir())
    }
}

/// DNS provider configuration
///
/// The Debug implementation does NOT expose the API token.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Cloudflare provider
    Cloudflare {
        /// Cloudflare API token
        api_token: String,
        /// Zone ID holding the managed records
        zone_id: String,
        /// API base URL override
        #[serde(default)]
        base_url: Option<String>,
    },
}

impl ProviderConfig {
    /// Create a Cloudflare provider configuration against the public API
    pub fn cloudflare(api_token: impl Into<String>, zone_id: impl Into<String>) -> Self {
        ProviderConfig::Cloudflare {
            api_token: api_token.into(),
            zone_id: zone_id.into(),
            base_url: None,
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Cloudflare {
                api_token,
                zone_id,
                base_url,
            } => {
                if api_token.is_empty() {
                    return Err(crate::Error::config("Cloudflare API token cannot be empty"));
                }
                if zone_id.is_empty() {
                    return Err(crate::Error::config("Cloudflare zone ID cannot be empty"));
                }
                if let Some(url) = base_url
                    && !url.starts_with("https://")
                    && !url.starts_with("http://")
                {
                    return Err(crate::Error::config(format!(
                        "Cloudflare API base URL must use HTTP or HTTPS scheme. Got: {}",
                        url
                    )));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Cloudflare { .. } => "cloudflare",
        }
    }
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Cloudflare {
                zone_id, base_url, ..
            } => f
                .debug_struct("Cloudflare")
                .field("api_token", &"<REDACTED>")
                .field("zone_id", zone_id)
                .field("base_url", base_url)
                .finish(),
        }
    }
}

/// Version-control change source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeSourceConfig {
    /// Local git repository
    Git {
        /// Repository working tree
        #[serde(default = "default_repo_path")]
        repo_path: String,
        /// Baseline revision (the "previous" side of the diff)
        #[serde(default = "default_base_rev")]
        base_rev: String,
        /// Current revision
        #[serde(default = "default_head_rev")]
        head_rev: String,
    },
}

impl ChangeSourceConfig {
    /// Validate the change source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ChangeSourceConfig::Git {
                repo_path,
                base_rev,
                head_rev,
            } => {
                if repo_path.is_empty() {
                    return Err(crate::Error::config("Git repository path cannot be empty"));
                }
                if base_rev.is_empty() || head_rev.is_empty() {
                    return Err(crate::Error::config("Git revisions cannot be empty"));
                }
                Ok(())
            }
        }
    }
}

impl Default for ChangeSourceConfig {
    fn default() -> Self {
        ChangeSourceConfig::Git {
            repo_path: default_repo_path(),
            base_rev: default_base_rev(),
            head_rev: default_head_rev(),
        }
    }
}

fn default_records_dir() -> String {
    "records".to_string()
}

fn default_extensions() -> Vec<String> {
    vec![".yaml".to_string(), ".yml".to_string()]
}

fn default_repo_path() -> String {
    ".".to_string()
}

fn default_base_rev() -> String {
    "HEAD~1".to_string()
}

fn default_head_rev() -> String {
    "HEAD".to_string()
}
