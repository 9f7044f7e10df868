// Domain rules - Business logic and policies

use crate::domain::model::*;


/// Business rules for image resize geometry
pub struct ResizePlanner;

impl ResizePlanner {
    /// Compute target dimensions for an image of `source` size.
    ///
    /// Returns `None` when no dimension was requested. With `keep_aspect` and
    /// a single dimension, the other is scaled proportionally and rounded
    /// down (never below 1 px). Any dimension still missing falls back to the
    /// native one.
    pub fn target_dimensions(source: Dimensions, spec: &ResizeSpec) -> Option<Dimensions> {
        if !spec.is_requested() {
            return None;
        }

        let (mut width, mut height) = (spec.width, spec.height);
        if spec.keep_aspect {
            match (width, height) {
                (Some(w), None) => height = Some(Self::scale_side(source.height, w, source.width)),
                (None, Some(h)) => width = Some(Self::scale_side(source.width, h, source.height)),
                _ => {}
            }
        }

        Some(Dimensions::new(
            width.unwrap_or(source.width),
            height.unwrap_or(source.height),
        ))
    }

    /// `side * numerator / denominator`, floored
    fn scale_side(side: u32, numerator: u32, denominator: u32) -> u32 {
        if denominator == 0 {
            return side.max(1);
        }
        let scaled = u64::from(side) * u64::from(numerator) / u64::from(denominator);
        scaled.clamp(1, u64::from(u32::MAX)) as u32
    }
}

/// Business rules for the transcoder scale filter
pub struct ScaleFilter;

impl ScaleFilter {
    /// Build the `-vf` scale expression, if any.
    ///
    /// `-2` asks the transcoder for the aspect-preserving side rounded to an
    /// even value. With both sides and `keep_aspect`, width wins.
    pub fn build(spec: &ResizeSpec) -> Option<String> {
        match (spec.width, spec.height, spec.keep_aspect) {
            (Some(w), Some(h), false) => Some(format!("scale={}:{}", w, h)),
            (Some(w), _, true) => Some(format!("scale={}:-2", w)),
            (None, Some(h), true) => Some(format!("scale=-2:{}", h)),
            (Some(w), None, false) => Some(format!("scale={}:ih", w)),
            (None, Some(h), false) => Some(format!("scale=iw:{}", h)),
            (None, None, _) => None,
        }
    }
}

/// Audio handling for one transcoder invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioMode {
    /// No audio stream: emit no audio flags
    Omit,
    /// Stream-copy the audio track
    Copy,
    /// Re-encode the audio track with the fallback codec
    Reencode,
}

/// Fallback audio codec
pub const FALLBACK_AUDIO_CODEC: &str = "aac";
/// Fallback audio bitrate
pub const FALLBACK_AUDIO_BITRATE: &str = "192k";

/// Business rules for audio attempts
pub struct AudioPlanner;

impl AudioPlanner {
    /// Ordered invocations to try for a source: copy then re-encode when an
    /// audio stream exists, a single audio-less run otherwise.
    pub fn attempts(has_audio: bool) -> &'static [AudioMode] {
        if has_audio {
            &[AudioMode::Copy, AudioMode::Reencode]
        } else {
            &[AudioMode::Omit]
        }
    }
}
