// Handles configuration loading, saving, and defaults.
use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::ApiContext;

pub const BASE_URL_ENV: &str = "TENANTIMPORT_BASE_URL";
pub const TOKEN_ENV: &str = "TENANTIMPORT_TOKEN";

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub admin_id: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            tenant_id: String::new(),
            admin_id: String::new(),
            token: None,
            // Match the serde default
            timeout_secs: 30,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
}

impl Config {
    /// `<config dir>/tenantimport/config.toml` for the current platform.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "tenantimport")
            .ok_or_else(|| anyhow!("Could not determine the configuration directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load the configuration from `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }

    /// Load from `path` (or the default location) and apply environment overrides.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };
        let mut config = Self::load(&path)?;
        config.apply_env_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.is_empty()) {
            self.api.base_url = url;
        }
        if let Some(token) = lookup(TOKEN_ENV).filter(|v| !v.is_empty()) {
            self.api.token = Some(token);
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create '{}'", parent.display()))?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(path, toml_str)
            .with_context(|| format!("Failed to write config file '{}'", path.display()))?;
        Ok(())
    }

    /// Load `path`, apply `edit` to the API section, and write it back.
    pub fn update_api(path: &Path, edit: impl FnOnce(&mut ApiConfig)) -> Result<Self> {
        let mut config = Self::load(path)?;
        edit(&mut config.api);
        config.save(path)?;
        Ok(config)
    }

    pub fn api_context(&self) -> ApiContext {
        ApiContext {
            base_url: self.api.base_url.clone(),
            tenant_id: self.api.tenant_id.clone(),
            admin_id: self.api.admin_id.clone(),
            token: self.api.token.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}
