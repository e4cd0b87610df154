use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Shell command that answers a question. The question arrives as `$1`.
    /// Without one, a submitted question is printed to stdout and soru exits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyze_command: Option<String>,

    /// Seconds to wait for the analyze command
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Desktop notification when an analysis finishes
    #[serde(default)]
    pub notifications: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            analyze_command: None,
            timeout_secs: default_timeout_secs(),
            notifications: false,
        }
    }
}

impl AppConfig {
    /// Directory holding config.toml, theme.conf and the log file
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("soru");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir)
    }

    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match Self::parse(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
            // Keep the user's broken file around rather than overwriting it
            return Ok(AppConfig::default());
        }

        let config = AppConfig::default();
        let _ = config.save();
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        let mut clean_config = self.clone();
        if clean_config.analyze_command.as_ref().map(|c| c.trim().is_empty()).unwrap_or(false) {
            clean_config.analyze_command = None;
        }

        let content = toml::to_string_pretty(&clean_config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}
