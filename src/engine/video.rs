//! Video conversion engine
//!
//! Builds transcoder command lines and drives the copy-then-re-encode audio
//! fallback for one file at a time.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::{is_raw_hevc, ResizeSpec, VideoFormat, VideoRequest};
use crate::domain::rules::{
    AudioMode, AudioPlanner, ScaleFilter, FALLBACK_AUDIO_BITRATE, FALLBACK_AUDIO_CODEC,
};
use crate::output::{apply_policy, resolve, OutputWriter};
use crate::ports::{ExecutePort, ProbePort};

/// Argument list for a single transcoder invocation
#[derive(Debug, Clone)]
pub struct TranscodeCommand {
    input: PathBuf,
    output: PathBuf,
    format: VideoFormat,
    crf: u8,
    scale: Option<String>,
    audio: AudioMode,
}

impl TranscodeCommand {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, format: VideoFormat) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            format,
            crf: crate::domain::model::DEFAULT_CRF,
            scale: None,
            audio: AudioMode::Omit,
        }
    }

    /// Set constant rate factor
    pub fn with_crf(mut self, crf: u8) -> Self {
        self.crf = crf;
        self
    }

    /// Set the scale filter from a resize request
    pub fn with_resize(mut self, resize: &ResizeSpec) -> Self {
        self.scale = ScaleFilter::build(resize);
        self
    }

    /// Set audio handling
    pub fn with_audio(mut self, audio: AudioMode) -> Self {
        self.audio = audio;
        self
    }

    /// Render the argument list (program name excluded)
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-y", "-hide_banner", "-loglevel", "error"]
            .iter()
            .map(OsString::from)
            .collect();

        if is_raw_hevc(&self.input) {
            args.extend(["-f", "hevc", "-fflags", "+genpts"].iter().map(OsString::from));
        }
        args.push("-i".into());
        args.push(self.input.as_os_str().to_os_string());

        if let Some(filter) = &self.scale {
            args.push("-vf".into());
            args.push(filter.into());
        }

        let codec = self.format.video_codec();
        args.push("-c:v".into());
        args.push(codec.encoder_name().into());
        args.push("-crf".into());
        args.push(self.crf.to_string().into());
        args.push("-pix_fmt".into());
        args.push("yuv420p".into());

        if self.format.wants_faststart() {
            args.push("-movflags".into());
            args.push("+faststart".into());
        }

        match self.audio {
            AudioMode::Omit => {}
            AudioMode::Copy => {
                args.push("-c:a".into());
                args.push("copy".into());
            }
            AudioMode::Reencode => {
                args.push("-c:a".into());
                args.push(FALLBACK_AUDIO_CODEC.into());
                args.push("-b:a".into());
                args.push(FALLBACK_AUDIO_BITRATE.into());
            }
        }

        args.push(self.output.as_os_str().to_os_string());
        args
    }
}

/// Per-file video converter
pub struct VideoConverter {
    execute: Arc<dyn ExecutePort>,
    probe: Arc<dyn ProbePort>,
}

impl VideoConverter {
    pub fn new(execute: Arc<dyn ExecutePort>, probe: Arc<dyn ProbePort>) -> Self {
        Self { execute, probe }
    }

    /// Fail fast when the transcoder cannot be launched
    pub async fn check_available(&self) -> Result<String, DomainError> {
        self.execute.check_available().await
    }

    /// Convert one video, returning the written output path
    pub async fn convert(&self, request: &VideoRequest) -> Result<PathBuf, DomainError> {
        let has_audio = self.has_audio(&request.source).await;

        let candidate = resolve(
            &request.source,
            request.format.extension(),
            request.output_dir.as_deref(),
        );
        let destination = apply_policy(candidate, request.policy);
        let staged = OutputWriter::stage(&destination)?;

        let mut last_stderr = String::new();
        for &audio in AudioPlanner::attempts(has_audio) {
            let command = TranscodeCommand::new(&request.source, staged.path(), request.format)
                .with_crf(request.crf)
                .with_resize(&request.resize)
                .with_audio(audio);

            let args = command.to_args();
            debug!("ffmpeg {}", render_args(&args));

            let outcome = self.execute.run(&args).await?;
            if outcome.is_success() {
                let output = staged.commit(request.policy)?;
                info!("Converted {} -> {}", request.source.display(), output.display());
                return Ok(output);
            }

            if audio == AudioMode::Copy {
                warn!(
                    "Audio stream copy failed for {}, retrying with {}",
                    request.source.display(),
                    FALLBACK_AUDIO_CODEC
                );
            }
            last_stderr = summarize_stderr(&outcome.stderr, outcome.exit_code);
        }

        Err(DomainError::Transcode(format!(
            "{}: {}",
            request.source.display(),
            last_stderr
        )))
    }

    /// Probe failures count as "no audio"
    async fn has_audio(&self, source: &Path) -> bool {
        match self.probe.has_audio_stream(source).await {
            Ok(has_audio) => {
                debug!("Audio stream in {}: {}", source.display(), has_audio);
                has_audio
            }
            Err(e) => {
                debug!("Audio probe failed for {}: {}", source.display(), e);
                false
            }
        }
    }
}

fn summarize_stderr(stderr: &str, exit_code: Option<i32>) -> String {
    let last_line = stderr.lines().rev().find(|line| !line.trim().is_empty());
    match (last_line, exit_code) {
        (Some(line), _) => line.trim().to_string(),
        (None, Some(code)) => format!("ffmpeg exited with status {}", code),
        (None, None) => "ffmpeg was terminated by a signal".to_string(),
    }
}

fn render_args(args: &[OsString]) -> String {
    args.iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(command: &TranscodeCommand) -> Vec<String> {
        command
            .to_args()
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn window(args: &[String], needle: &[&str]) -> bool {
        args.windows(needle.len())
            .any(|w| w.iter().zip(needle).all(|(a, b)| a == b))
    }

    #[test]
    fn test_mp4_command_line() {
        let command = TranscodeCommand::new("in.mov", "out.mp4", VideoFormat::Mp4).with_crf(20);
        let args = args_of(&command);

        assert_eq!(&args[..4], &["-y", "-hide_banner", "-loglevel", "error"]);
        assert!(window(&args, &["-i", "in.mov"]));
        assert!(window(&args, &["-c:v", "libx264", "-crf", "20", "-pix_fmt", "yuv420p"]));
        assert!(window(&args, &["-movflags", "+faststart"]));
        assert!(!args.iter().any(|a| a == "-c:a"));
        assert!(!args.iter().any(|a| a == "-vf"));
        assert_eq!(args.last().map(String::as_str), Some("out.mp4"));
    }

    #[test]
    fn test_webm_uses_vp9_without_faststart() {
        let args = args_of(&TranscodeCommand::new("in.mp4", "out.webm", VideoFormat::Webm));
        assert!(window(&args, &["-c:v", "libvpx-vp9"]));
        assert!(!args.iter().any(|a| a == "-movflags"));
    }

    #[test]
    fn test_raw_hevc_input_hints_precede_input() {
        let args = args_of(&TranscodeCommand::new("clip.H265", "out.mkv", VideoFormat::Mkv));
        assert!(window(&args, &["-f", "hevc", "-fflags", "+genpts", "-i", "clip.H265"]));
    }

    #[test]
    fn test_scale_filter_and_audio_modes() {
        let resize = ResizeSpec::new(Some(1280), None, true);
        let copy = TranscodeCommand::new("a.mp4", "b.mkv", VideoFormat::Mkv)
            .with_resize(&resize)
            .with_audio(AudioMode::Copy);
        let args = args_of(&copy);
        assert!(window(&args, &["-vf", "scale=1280:-2"]));
        assert!(window(&args, &["-c:a", "copy"]));

        let reencode = copy.with_audio(AudioMode::Reencode);
        assert!(window(&args_of(&reencode), &["-c:a", "aac", "-b:a", "192k"]));
    }

    #[test]
    fn test_summarize_stderr() {
        assert_eq!(summarize_stderr("a\nlast error\n\n", Some(1)), "last error");
        assert_eq!(summarize_stderr("", Some(3)), "ffmpeg exited with status 3");
        assert_eq!(summarize_stderr("", None), "ffmpeg was terminated by a signal");
    }
}
