//! Command implementations

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::app::{AppContainer, DefaultAppContainer};
use crate::cli::args::{ImageArgs, ListArgs, VideoArgs};
use crate::cli::progress::SpinnerObserver;
use crate::cli::prompt::TerminalPrompt;
use crate::cli::{Cli, Commands, EXIT_PARTIAL_FAILURE, EXIT_SUCCESS};
use crate::config_initialization::{
    resolve_image_settings, resolve_video_settings, RuntimeConfig, ToolPaths,
};
use crate::domain::model::{BatchResult, MediaKind, SourceCollection};
use crate::utils::format_optional_size;
use crate::utils::path::expand_sources;

/// Run the parsed command, returning the process exit status
pub async fn run(cli: &Cli, config: &RuntimeConfig) -> Result<u8> {
    match &cli.command {
        Commands::Image(args) => image(cli, config, args).await,
        Commands::Video(args) => video(cli, config, args).await,
        Commands::List(args) => list(cli, args),
    }
}

fn build_container(cli: &Cli, config: &RuntimeConfig, needs_tools: bool) -> DefaultAppContainer {
    let tools = if needs_tools {
        config.tool_paths(cli)
    } else {
        ToolPaths::default()
    };
    DefaultAppContainer::new(
        &tools,
        Arc::new(TerminalPrompt::new()),
        Arc::new(SpinnerObserver::new(!cli.json)),
    )
}

fn collect(kind: MediaKind, paths: &[std::path::PathBuf], recursive: bool) -> SourceCollection {
    let mut collection = SourceCollection::new(kind);
    let added = collection.extend(expand_sources(paths, kind, recursive));
    info!("Collected {} {:?} file(s)", added, kind);
    collection
}

/// Execute the image command
async fn image(cli: &Cli, config: &RuntimeConfig, args: &ImageArgs) -> Result<u8> {
    let settings = resolve_image_settings(args, &config.file);
    let mut collection = collect(MediaKind::Image, &args.sources.paths, args.sources.recursive);

    let container = build_container(cli, config, false);
    let result = container
        .image_batch()
        .execute(&mut collection, &settings)
        .await
        .context("Image batch aborted")?;

    report(cli, &result, "image")
}

/// Execute the video command
async fn video(cli: &Cli, config: &RuntimeConfig, args: &VideoArgs) -> Result<u8> {
    let settings = resolve_video_settings(args, &config.file);
    let mut collection = collect(MediaKind::Video, &args.sources.paths, args.sources.recursive);

    let container = build_container(cli, config, true);
    let result = container
        .video_batch()
        .execute(&mut collection, &settings)
        .await
        .context("Video batch aborted")?;

    report(cli, &result, "video")
}

/// Execute the list command
fn list(cli: &Cli, args: &ListArgs) -> Result<u8> {
    let collection = collect(args.kind, &args.sources.paths, args.sources.recursive);
    let mut stdout = io::stdout().lock();

    if cli.json {
        let json = serde_json::to_string_pretty(collection.files())
            .context("Failed to serialize file list to JSON")?;
        writeln!(stdout, "{}", json)?;
        return Ok(EXIT_SUCCESS);
    }

    for file in collection.files() {
        let dimensions = match (args.kind, file.dimensions) {
            (MediaKind::Image, Some(d)) => format!("  {}", d),
            (MediaKind::Image, None) => "  ?".to_string(),
            (MediaKind::Video, _) => String::new(),
        };
        writeln!(
            stdout,
            "{}  {}{}",
            file.file_name(),
            format_optional_size(file.size_bytes),
            dimensions
        )?;
    }
    writeln!(stdout, "{} file(s)", collection.len())?;
    Ok(EXIT_SUCCESS)
}

/// Print the batch summary and pick the exit status
fn report(cli: &Cli, result: &BatchResult, noun: &str) -> Result<u8> {
    let mut stdout = io::stdout().lock();

    if cli.json {
        let json = serde_json::to_string_pretty(result)
            .context("Failed to serialize batch result to JSON")?;
        writeln!(stdout, "{}", json)?;
    } else {
        write!(stdout, "{}", render_summary(result, noun))?;
    }

    Ok(if result.is_complete_success() {
        EXIT_SUCCESS
    } else {
        EXIT_PARTIAL_FAILURE
    })
}

/// Human-readable batch summary
pub fn render_summary(result: &BatchResult, noun: &str) -> String {
    let mut text = format!(
        "Converted {} of {} {}(s) in {:.1}s\n",
        result.succeeded, result.attempted, noun, result.elapsed_secs
    );
    if !result.failures.is_empty() {
        text.push_str("Failed:\n");
        for failure in &result.failures {
            text.push_str(&format!("  {}: {}\n", failure.file_name, failure.message));
        }
    }
    text
}
