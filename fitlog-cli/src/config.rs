use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Base URL of the activity API, e.g. "http://localhost:8080"
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
        }
    }
}

impl CliConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("fitlog")
            .join("config.toml"))
    }

    /// Load config from disk. Returns default config if the file doesn't
    /// exist; the `FITLOG_API_URL` environment variable overrides the file.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config at {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("Failed to parse config at {}", path.display()))?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var("FITLOG_API_URL") {
            config.api_url = url;
        }

        Ok(config)
    }

    /// Save config to disk, creating parent directories as needed.
    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(&path, raw)?;
        Ok(())
    }
}
