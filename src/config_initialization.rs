//! Configuration initialization and hierarchy management
//!
//! Precedence: CLI flags > environment (through clap `env`) > config file >
//! built-in defaults.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::adapters::toml_config::{AppConfig, TomlConfigAdapter};
use crate::adapters::ToolLocator;
use crate::cli::args::{ImageArgs, OutputArgs, VideoArgs};
use crate::cli::Cli;
use crate::domain::model::*;
use crate::utils::logging::{LogLevel, LoggingConfig};

/// Resolved locations of the external tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl Default for ToolPaths {
    /// Bare program names, resolved by the OS at spawn time
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        }
    }
}

/// Everything settled before a command runs
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub config_file: Option<PathBuf>,
    pub file: AppConfig,
    pub logging: LoggingConfig,
}

impl RuntimeConfig {
    /// Locate `ffmpeg`/`ffprobe`. Only the video pipeline needs them.
    pub fn tool_paths(&self, cli: &Cli) -> ToolPaths {
        let tools_dir = cli.tools_dir.clone().or_else(|| self.file.tools.dir.clone());
        let locator = ToolLocator::new(tools_dir);
        let ffmpeg_override = cli.ffmpeg.clone().or_else(|| self.file.tools.ffmpeg.clone());
        let ffprobe_override = cli.ffprobe.clone().or_else(|| self.file.tools.ffprobe.clone());

        ToolPaths {
            ffmpeg: locator.locate("ffmpeg", ffmpeg_override.as_deref()),
            ffprobe: locator.locate("ffprobe", ffprobe_override.as_deref()),
        }
    }
}

/// Load the config file and settle logging
pub fn initialize_configuration_hierarchy(cli: &Cli) -> Result<RuntimeConfig> {
    let (file, config_file) = TomlConfigAdapter::discover(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let logging = resolve_logging(cli, &file)?;

    Ok(RuntimeConfig {
        config_file,
        file,
        logging,
    })
}

/// Logging level and format from CLI/env, then file, then defaults
pub fn resolve_logging(cli: &Cli, file: &AppConfig) -> Result<LoggingConfig> {
    let level = match cli.log_level.as_deref().or(file.logging.level.as_deref()) {
        Some(level) => LogLevel::parse(level).context("Invalid log level")?,
        None => LogLevel::default(),
    };
    Ok(LoggingConfig {
        level,
        json: cli.log_json || file.logging.json.unwrap_or(false),
    })
}

fn resolve_resize(args: &OutputArgs, file_keep_aspect: Option<bool>) -> ResizeSpec {
    let keep_aspect = args
        .keep_aspect_flag()
        .or(file_keep_aspect)
        .unwrap_or(true);
    ResizeSpec::new(args.width, args.height, keep_aspect)
}

/// Image batch settings from CLI, then `[image]`, then defaults
pub fn resolve_image_settings(args: &ImageArgs, file: &AppConfig) -> ImageBatchSettings {
    let defaults = ImageBatchSettings::default();
    let section = &file.image;
    ImageBatchSettings {
        format: args.format.or(section.format).unwrap_or(defaults.format),
        output_dir: args
            .output
            .output_dir
            .clone()
            .or_else(|| section.output_dir.clone()),
        resize: resolve_resize(&args.output, section.keep_aspect),
        quality: args.quality.or(section.quality).unwrap_or(defaults.quality),
        conflict: args
            .output
            .on_conflict
            .or(section.on_conflict)
            .unwrap_or(defaults.conflict),
    }
}

/// Video batch settings from CLI, then `[video]`, then defaults
pub fn resolve_video_settings(args: &VideoArgs, file: &AppConfig) -> VideoBatchSettings {
    let defaults = VideoBatchSettings::default();
    let section = &file.video;
    VideoBatchSettings {
        format: args.format.or(section.format).unwrap_or(defaults.format),
        output_dir: args
            .output
            .output_dir
            .clone()
            .or_else(|| section.output_dir.clone()),
        resize: resolve_resize(&args.output, section.keep_aspect),
        crf: args.crf.or(section.crf).unwrap_or(defaults.crf),
        conflict: args
            .output
            .on_conflict
            .or(section.on_conflict)
            .unwrap_or(defaults.conflict),
    }
}
