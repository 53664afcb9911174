use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Settings read from `~/.leadline/rc`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    pub session_path: PathBuf,
}

impl Config {
    /// Get the leadline directory (`~/.leadline`)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .context("Failed to determine home directory")?;
        Ok(home.join(".leadline"))
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("rc"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a file; a missing file yields defaults
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let base_dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        if !config_path.exists() {
            return Ok(Self::defaults(&base_dir));
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
        Ok(Self::parse(&content, &base_dir))
    }

    fn defaults(base_dir: &Path) -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_path: base_dir.join("session.json"),
        }
    }

    /// Parse `key=value` lines; unknown keys and `#` comments are ignored
    pub fn parse(content: &str, base_dir: &Path) -> Self {
        let mut config = Self::defaults(base_dir);

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                log::warn!("ignoring malformed config line: {}", line);
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "api.base_url" => {
                    config.api_base_url = value.trim_end_matches('/').to_string();
                }
                "session.location" => {
                    let path = PathBuf::from(value);
                    // Relative paths resolve against the config file directory
                    config.session_path = if path.is_relative() {
                        base_dir.join(path)
                    } else {
                        path
                    };
                }
                other => log::debug!("ignoring unknown config key: {}", other),
            }
        }

        config
    }

    /// Endpoint for a lead's status update
    pub fn status_update_url(&self, lead_id: &str) -> String {
        format!("{}/leads/{}/status", self.api_base_url, lead_id)
    }
}
