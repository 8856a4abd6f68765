use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::catalog::{CandidateEntry, Catalog};
use crate::constants::{BASE_URL_ENV, DEFAULT_CONTROL_NAME};
use crate::error::{Result, WeekPickerError};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    /// Week list in chronological order; empty means the built-in list
    #[serde(default)]
    pub weeks: Vec<CandidateEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Directory URL the week identifiers are resolved against
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_control_name")]
    pub control_name: String,
    /// Per-probe timeout; unset means the transport default
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_control_name() -> String {
    DEFAULT_CONTROL_NAME.to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            control_name: default_control_name(),
            timeout_seconds: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| WeekPickerError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.site.control_name.trim().is_empty() {
            return Err(WeekPickerError::Config(
                "site.control_name must not be empty".to_string(),
            ));
        }
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Let `WEEK_PICKER_BASE_URL` take precedence over the file, and a
    /// command-line `flag` over both
    pub fn apply_env_overrides(&mut self, flag: Option<String>) {
        self.apply_base_url_overrides(std::env::var(BASE_URL_ENV).ok(), flag);
    }

    /// Base URL precedence: file, then environment, then command line.
    /// Blank values are ignored at every level.
    pub fn apply_base_url_overrides(&mut self, env_value: Option<String>, flag: Option<String>) {
        for url in [env_value, flag].into_iter().flatten() {
            if !url.trim().is_empty() {
                self.site.base_url = Some(url);
            }
        }
    }

    pub fn catalog(&self) -> Catalog {
        let catalog = if self.weeks.is_empty() {
            Catalog::builtin()
        } else {
            Catalog::new(self.weeks.clone())
        };
        for duplicate in catalog.duplicate_identifiers() {
            warn!(identifier = %duplicate, "Duplicate week identifier in catalog");
        }
        catalog
    }
}
