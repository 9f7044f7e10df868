// TOML config adapter - Configuration file loading

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::model::*;

/// Config file name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "mediaconv.toml";

/// Whole configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub tools: ToolsSection,
    pub image: ImageSection,
    pub video: VideoSection,
    pub logging: LoggingSection,
}

/// `[tools]`: external binary locations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsSection {
    pub ffmpeg: Option<PathBuf>,
    pub ffprobe: Option<PathBuf>,
    /// Directory searched for both binaries before `PATH`
    pub dir: Option<PathBuf>,
}

/// `[image]`: image batch defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageSection {
    pub format: Option<ImageFormat>,
    pub quality: Option<u8>,
    pub keep_aspect: Option<bool>,
    pub output_dir: Option<PathBuf>,
    pub on_conflict: Option<ConflictChoice>,
}

/// `[video]`: video batch defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoSection {
    pub format: Option<VideoFormat>,
    pub crf: Option<u8>,
    pub keep_aspect: Option<bool>,
    pub output_dir: Option<PathBuf>,
    pub on_conflict: Option<ConflictChoice>,
}

/// `[logging]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub json: Option<bool>,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse configuration text
    pub fn parse(content: &str) -> Result<AppConfig, DomainError> {
        toml::from_str(content)
            .map_err(|e| DomainError::BadArgs(format!("Failed to parse TOML config: {}", e)))
    }

    /// Load one configuration file
    pub fn load(path: &Path) -> Result<AppConfig, DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::parse(&content)
            .map_err(|e| DomainError::BadArgs(format!("{}: {}", path.display(), e)))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load the explicit file if given (it must exist), else the first
    /// existing default location, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<(AppConfig, Option<PathBuf>), DomainError> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        for candidate in Self::search_paths() {
            if candidate.is_file() {
                return Ok((Self::load(&candidate)?, Some(candidate)));
            }
            debug!("No config at {}", candidate.display());
        }

        Ok((AppConfig::default(), None))
    }

    /// Default locations, most specific first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = Self::user_config_dir() {
            paths.push(dir.join("mediaconv").join("config.toml"));
        }
        paths
    }

    fn user_config_dir() -> Option<PathBuf> {
        if cfg!(windows) {
            return std::env::var_os("APPDATA").map(PathBuf::from);
        }
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
    }
}
