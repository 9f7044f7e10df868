//! Video engine and video batch tests against scripted ports

use std::collections::VecDeque;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use mediaconv_cli::app::VideoBatchInteractor;
use mediaconv_cli::domain::errors::DomainError;
use mediaconv_cli::domain::model::*;
use mediaconv_cli::engine::VideoConverter;
use mediaconv_cli::ports::*;

// Test utilities

/// Transcoder double: pops scripted outcomes, succeeds once the script runs out
struct ScriptedExecutor {
    available: bool,
    outcomes: Mutex<VecDeque<ExecutionOutcome>>,
    calls: Mutex<Vec<Vec<String>>>,
    checks: AtomicUsize,
}

impl ScriptedExecutor {
    fn new(outcomes: Vec<ExecutionOutcome>) -> Arc<Self> {
        Arc::new(Self {
            available: true,
            outcomes: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
            checks: AtomicUsize::new(0),
        })
    }

    fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            available: false,
            outcomes: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            checks: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExecutePort for ScriptedExecutor {
    async fn check_available(&self) -> Result<String, DomainError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        if self.available {
            Ok("ffmpeg version test".to_string())
        } else {
            Err(DomainError::ToolUnavailable("ffmpeg not found".to_string()))
        }
    }

    async fn run(&self, args: &[OsString]) -> Result<ExecutionOutcome, DomainError> {
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        let output = PathBuf::from(args.last().cloned().unwrap_or_default());
        self.calls.lock().unwrap().push(args);

        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(ExecutionOutcome::success);
        if outcome.is_success() {
            fs::write(&output, b"transcoded").unwrap();
        } else {
            // A failed run may leave a partial file behind
            fs::write(&output, b"partial").unwrap();
        }
        Ok(outcome)
    }
}

/// Probe double answering a fixed result for every file
struct FixedProbe(Result<bool, DomainError>);

#[async_trait]
impl ProbePort for FixedProbe {
    async fn has_audio_stream(&self, _file_path: &Path) -> Result<bool, DomainError> {
        self.0.clone()
    }
}

struct FixedPrompt(CollisionPolicy);

#[async_trait]
impl ConflictPromptPort for FixedPrompt {
    async fn choose_policy(&self, _conflicts: &[PathBuf]) -> Result<CollisionPolicy, DomainError> {
        Ok(self.0)
    }
}

fn failure(stderr: &str) -> ExecutionOutcome {
    ExecutionOutcome::failure(Some(1), stderr)
}

fn request(source: &Path, format: VideoFormat) -> VideoRequest {
    VideoBatchSettings {
        format,
        ..VideoBatchSettings::default()
    }
    .request_for(source, CollisionPolicy::KeepBoth)
}

fn source_in(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, b"source").unwrap();
    path
}

fn has_pair(args: &[String], flag: &str, value: &str) -> bool {
    args.windows(2).any(|w| w[0] == flag && w[1] == value)
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn batch(
    executor: Arc<ScriptedExecutor>,
    has_audio: bool,
    policy: CollisionPolicy,
) -> VideoBatchInteractor {
    VideoBatchInteractor::new(
        executor,
        Arc::new(FixedProbe(Ok(has_audio))),
        Arc::new(FixedPrompt(policy)),
        Arc::new(NoopObserver),
    )
}

// Video converter tests

#[tokio::test]
async fn test_no_audio_stream_means_no_audio_flags() {
    let dir = TempDir::new().unwrap();
    let source = source_in(&dir, "clip.mov");
    let executor = ScriptedExecutor::new(vec![]);
    let converter = VideoConverter::new(executor.clone(), Arc::new(FixedProbe(Ok(false))));

    let output = converter.convert(&request(&source, VideoFormat::Mp4)).await.unwrap();

    assert_eq!(output, dir.path().join("clip.mp4"));
    assert_eq!(fs::read(&output).unwrap(), b"transcoded");
    let calls = executor.calls();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].iter().any(|a| a == "-c:a"));
    assert!(has_pair(&calls[0], "-c:v", "libx264"));
    assert!(has_pair(&calls[0], "-movflags", "+faststart"));
}

#[tokio::test]
async fn test_audio_copy_success_runs_once() {
    let dir = TempDir::new().unwrap();
    let source = source_in(&dir, "talk.mkv");
    let executor = ScriptedExecutor::new(vec![]);
    let converter = VideoConverter::new(executor.clone(), Arc::new(FixedProbe(Ok(true))));

    converter.convert(&request(&source, VideoFormat::Webm)).await.unwrap();

    let calls = executor.calls();
    assert_eq!(calls.len(), 1);
    assert!(has_pair(&calls[0], "-c:a", "copy"));
    assert!(has_pair(&calls[0], "-c:v", "libvpx-vp9"));
}

#[tokio::test]
async fn test_audio_copy_failure_retries_once_with_aac() {
    let dir = TempDir::new().unwrap();
    let source = source_in(&dir, "concert.avi");
    let executor = ScriptedExecutor::new(vec![failure("Could not write header")]);
    let converter = VideoConverter::new(executor.clone(), Arc::new(FixedProbe(Ok(true))));

    let output = converter.convert(&request(&source, VideoFormat::Mp4)).await.unwrap();

    let calls = executor.calls();
    assert_eq!(calls.len(), 2);
    assert!(has_pair(&calls[0], "-c:a", "copy"));
    assert!(has_pair(&calls[1], "-c:a", "aac"));
    assert!(has_pair(&calls[1], "-b:a", "192k"));
    assert_eq!(fs::read(&output).unwrap(), b"transcoded");
}

#[tokio::test]
async fn test_both_attempts_failing_is_transcode_error_without_leftovers() {
    let dir = TempDir::new().unwrap();
    let source = source_in(&dir, "broken.mov");
    let executor =
        ScriptedExecutor::new(vec![failure("copy failed"), failure("Invalid data found")]);
    let converter = VideoConverter::new(executor.clone(), Arc::new(FixedProbe(Ok(true))));

    let err = converter
        .convert(&request(&source, VideoFormat::Mp4))
        .await
        .unwrap_err();

    match err {
        DomainError::Transcode(message) => assert!(message.contains("Invalid data found")),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(executor.calls().len(), 2);
    assert_eq!(dir_entries(dir.path()), vec!["broken.mov".to_string()]);
}

#[tokio::test]
async fn test_probe_failure_degrades_to_no_audio() {
    let dir = TempDir::new().unwrap();
    let source = source_in(&dir, "odd.ts");
    let executor = ScriptedExecutor::new(vec![]);
    let probe = FixedProbe(Err(DomainError::Decode("ffprobe failed".to_string())));
    let converter = VideoConverter::new(executor.clone(), Arc::new(probe));

    converter.convert(&request(&source, VideoFormat::Mkv)).await.unwrap();

    let calls = executor.calls();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].iter().any(|a| a == "-c:a"));
}

#[tokio::test]
async fn test_raw_hevc_and_scale_filter() {
    let dir = TempDir::new().unwrap();
    let source = source_in(&dir, "camera.hevc");
    let executor = ScriptedExecutor::new(vec![]);
    let converter = VideoConverter::new(executor.clone(), Arc::new(FixedProbe(Ok(false))));

    let mut req = request(&source, VideoFormat::Mov);
    req.resize = ResizeSpec::new(None, Some(720), true);
    req.crf = 28;
    converter.convert(&req).await.unwrap();

    let args = &executor.calls()[0];
    assert!(has_pair(args, "-f", "hevc"));
    assert!(has_pair(args, "-fflags", "+genpts"));
    assert!(has_pair(args, "-vf", "scale=-2:720"));
    assert!(has_pair(args, "-crf", "28"));
    assert!(has_pair(args, "-pix_fmt", "yuv420p"));
}

// Video batch tests

#[tokio::test]
async fn test_unavailable_transcoder_fails_fast() {
    let dir = TempDir::new().unwrap();
    let executor = ScriptedExecutor::unavailable();
    let mut collection = SourceCollection::new(MediaKind::Video);
    collection.add(source_in(&dir, "a.mp4"));
    collection.add(source_in(&dir, "b.mp4"));

    let err = batch(executor.clone(), false, CollisionPolicy::KeepBoth)
        .execute(&mut collection, &VideoBatchSettings::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::ToolUnavailable(_)));
    assert!(err.is_batch_level());
    assert!(executor.calls().is_empty());
    assert_eq!(collection.len(), 2);
}

#[tokio::test]
async fn test_invalid_settings_rejected_before_tool_check() {
    let dir = TempDir::new().unwrap();
    let executor = ScriptedExecutor::new(vec![]);
    let mut collection = SourceCollection::new(MediaKind::Video);
    collection.add(source_in(&dir, "a.mp4"));

    let settings = VideoBatchSettings {
        crf: 60,
        ..VideoBatchSettings::default()
    };
    let err = batch(executor.clone(), false, CollisionPolicy::KeepBoth)
        .execute(&mut collection, &settings)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::BadArgs(_)));
    assert_eq!(executor.checks.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_video_batch() {
    let executor = ScriptedExecutor::new(vec![]);
    let mut collection = SourceCollection::new(MediaKind::Video);
    let err = batch(executor, false, CollisionPolicy::KeepBoth)
        .execute(&mut collection, &VideoBatchSettings::default())
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::EmptyBatch);
}

#[tokio::test]
async fn test_batch_continues_after_failed_file() {
    let dir = TempDir::new().unwrap();
    let executor = ScriptedExecutor::new(vec![
        ExecutionOutcome::success(),
        failure("first try"),
        failure("second try"),
        ExecutionOutcome::success(),
    ]);
    let mut collection = SourceCollection::new(MediaKind::Video);
    for name in ["one.mov", "two.mov", "three.mov"] {
        collection.add(source_in(&dir, name));
    }

    let result = batch(executor.clone(), true, CollisionPolicy::KeepBoth)
        .execute(&mut collection, &VideoBatchSettings::default())
        .await
        .unwrap();

    assert_eq!(result.attempted, 3);
    assert_eq!(result.succeeded, 2);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].file_name, "two.mov");
    assert_eq!(executor.calls().len(), 4);
    assert!(collection.is_empty());
    assert!(dir.path().join("one.mp4").exists());
    assert!(!dir.path().join("two.mp4").exists());
    assert!(dir.path().join("three.mp4").exists());
}

#[tokio::test]
async fn test_keep_both_renames_existing_video_output() {
    let dir = TempDir::new().unwrap();
    let executor = ScriptedExecutor::new(vec![]);
    let mut collection = SourceCollection::new(MediaKind::Video);
    collection.add(source_in(&dir, "clip.mov"));
    fs::write(dir.path().join("clip.mp4"), b"existing").unwrap();

    let result = batch(executor, false, CollisionPolicy::KeepBoth)
        .execute(&mut collection, &VideoBatchSettings::default())
        .await
        .unwrap();

    assert_eq!(result.outputs, vec![dir.path().join("clip (1).mp4")]);
    assert_eq!(fs::read(dir.path().join("clip.mp4")).unwrap(), b"existing");
}

#[tokio::test]
async fn test_overwrite_replaces_existing_video_output() {
    let dir = TempDir::new().unwrap();
    let out_dir = dir.path().join("converted");
    let executor = ScriptedExecutor::new(vec![]);
    let mut collection = SourceCollection::new(MediaKind::Video);
    collection.add(source_in(&dir, "clip.mov"));

    let settings = VideoBatchSettings {
        output_dir: Some(out_dir.clone()),
        conflict: ConflictChoice::Prompt,
        ..VideoBatchSettings::default()
    };
    fs::create_dir(&out_dir).unwrap();
    fs::write(out_dir.join("clip.mp4"), b"existing").unwrap();

    let result = batch(executor, false, CollisionPolicy::Overwrite)
        .execute(&mut collection, &settings)
        .await
        .unwrap();

    assert_eq!(result.outputs, vec![out_dir.join("clip.mp4")]);
    assert_eq!(fs::read(out_dir.join("clip.mp4")).unwrap(), b"transcoded");
    assert_eq!(dir_entries(&out_dir), vec!["clip.mp4".to_string()]);
}
