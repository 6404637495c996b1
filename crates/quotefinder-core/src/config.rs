use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::error::{QuoteFinderError, Result};

/// Default number of matches emitted per conversational turn.
pub const DEFAULT_PAGE_SIZE: usize = 1;

/// Top-level configuration for the Find My Quote skill.
///
/// Loaded from `~/.quotefinder/config.toml` by default. Every section falls
/// back to its defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteFinderConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub paging: PagingConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl QuoteFinderConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: QuoteFinderConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or is invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject values the skill cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.lookup.base_url()?;
        if self.lookup.timeout_secs == 0 {
            return Err(QuoteFinderError::Config(
                "lookup.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.paging.page_size == 0 {
            return Err(QuoteFinderError::Config(
                "paging.page_size must be at least 1".to_string(),
            ));
        }
        if self.session.timeout_minutes == 0 {
            return Err(QuoteFinderError::Config(
                "session.timeout_minutes must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Quote lookup service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Service prefix; the escaped phrase is appended as the last path segment.
    pub base_url: String,
    /// Connect, read, and write timeout for a single lookup.
    pub timeout_secs: u64,
    /// `User-Agent` header sent with each lookup.
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: "http://api.quodb.com/search/".to_string(),
            timeout_secs: 4,
            user_agent: format!("quotefinder/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl LookupConfig {
    /// Parse `base_url`, requiring an http or https scheme.
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            QuoteFinderError::Config(format!("invalid lookup.base_url {:?}: {}", self.base_url, e))
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(QuoteFinderError::Config(format!(
                "lookup.base_url must use http or https, got {}",
                other
            ))),
        }
    }
}

/// Pagination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    /// Matches emitted per turn. Must be at least 1.
    pub page_size: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Conversation session settings for local hosts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Idle time after which a session and its cursor are discarded.
    pub timeout_minutes: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_minutes: 30,
        }
    }
}
