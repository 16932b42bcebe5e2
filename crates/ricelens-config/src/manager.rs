//! Settings file loading

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::types::Settings;

/// Settings file format, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    /// Detect the format of `path`
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("json") => Ok(ConfigFormat::Json),
            Some("toml") => Ok(ConfigFormat::Toml),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "YAML",
            ConfigFormat::Json => "JSON",
            ConfigFormat::Toml => "TOML",
        }
    }
}

/// Settings loader
pub struct ConfigManager;

impl ConfigManager {
    /// Load and validate settings from a file
    pub async fn load_from_file(path: impl AsRef<Path>) -> ConfigResult<Settings> {
        let resolved = Self::expand_home(path.as_ref())?;
        let format = ConfigFormat::from_path(&resolved)?;
        debug!(
            "Loading {} settings from {}",
            format.name(),
            resolved.display()
        );

        let content = tokio::fs::read_to_string(&resolved)
            .await
            .map_err(|source| ConfigError::Io {
                path: resolved.clone(),
                source,
            })?;

        let settings = Self::parse_str(&content, format)?;
        info!("Loaded settings from {}", resolved.display());
        Ok(settings)
    }

    /// Parse and validate settings text
    pub fn parse_str(content: &str, format: ConfigFormat) -> ConfigResult<Settings> {
        // An empty document is valid and means "everything default".
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }

        let settings: Settings = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| ConfigError::parse(format.name(), e))?,
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::parse(format.name(), e))?,
            ConfigFormat::Toml => {
                toml::from_str(content).map_err(|e| ConfigError::parse(format.name(), e))?
            }
        };

        Self::validate(&settings)?;
        Ok(settings)
    }

    /// Validate settings
    pub fn validate(settings: &Settings) -> ConfigResult<()> {
        for remote in &settings.remotes {
            let domain = remote.domain.trim();
            if domain.is_empty() {
                return Err(ConfigError::validation(format!(
                    "Remote of type '{}' has an empty domain",
                    remote.kind.label()
                )));
            }
            if domain.contains("://") || domain.contains('/') {
                return Err(ConfigError::validation(format!(
                    "Remote domain '{}' must be a bare host name such as 'git.example.com'",
                    remote.domain
                )));
            }
        }
        Ok(())
    }

    /// Expand a leading `~` to the home directory
    pub fn expand_home(path: &Path) -> ConfigResult<PathBuf> {
        let path_str = path
            .to_str()
            .ok_or_else(|| ConfigError::PathResolution("Invalid path encoding".to_string()))?;

        if path_str == "~" || path_str.starts_with("~/") {
            let home_dir = dirs::home_dir().ok_or_else(|| {
                ConfigError::PathResolution("Could not determine home directory".to_string())
            })?;
            if path_str == "~" {
                return Ok(home_dir);
            }
            return Ok(home_dir.join(&path_str[2..]));
        }

        Ok(path.to_path_buf())
    }
}
