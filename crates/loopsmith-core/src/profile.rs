//! Transcode profiles and clip planning.
//!
//! A [`TranscodeProfile`] is a named encoding recipe: target geometry, x264
//! quality settings, fade and trim behavior, and the suffix used to derive
//! output names. Two built-in profiles exist, the background loop and the
//! thumbnail. Turning a profile plus an optional probed duration into the
//! exact seek/trim/fade numbers is pure arithmetic ([`TranscodeProfile::plan`]),
//! so all timing behavior is unit-testable without touching ffmpeg.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A constant encoding recipe for one family of derived clips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscodeProfile {
    /// Short human-readable name, used in run headers and warnings.
    pub name: String,
    /// Suffix inserted before the `.mp4` extension of the derived file.
    pub suffix: String,
    /// Target frame width in pixels.
    pub width: u32,
    /// Target frame height in pixels.
    pub height: u32,
    /// x264 constant rate factor. Higher means smaller files and lower quality.
    pub crf: u32,
    /// x264 speed preset (e.g. "fast").
    pub preset: String,
    /// Output frame rate.
    pub fps: u32,
    /// Target video bitrate in ffmpeg notation (e.g. "800k").
    pub bitrate: String,
    /// Length of the fade-in and fade-out, in seconds.
    pub fade_secs: f64,
    /// Maximum length of the derived clip, in seconds.
    pub max_secs: f64,
    /// Fraction of the probed source duration to skip before the clip starts.
    /// Zero disables seeking entirely.
    pub start_offset_ratio: f64,
    /// The start offset only applies when the probed duration is strictly
    /// greater than this many seconds.
    pub start_offset_min_secs: f64,
    /// When true, a failed duration probe fails the whole item. When false,
    /// the plan falls back to a zero offset and the profile maximum length.
    pub require_duration: bool,
}

impl TranscodeProfile {
    /// The loop-optimized background profile: 480p, trimmed to 30 seconds,
    /// with a 1 second fade at each end so the loop point is invisible.
    pub fn background_loop() -> Self {
        Self {
            name: "background loop".to_string(),
            suffix: "_optimized".to_string(),
            width: 854,
            height: 480,
            crf: 28,
            preset: "fast".to_string(),
            fps: 24,
            bitrate: "800k".to_string(),
            fade_secs: 1.0,
            max_secs: 30.0,
            start_offset_ratio: 0.0,
            start_offset_min_secs: 0.0,
            require_duration: true,
        }
    }

    /// The thumbnail profile: 360p, 10 seconds, starting 15% into the source
    /// (when the source is long enough) to skip past title cards and black
    /// lead-ins.
    pub fn thumbnail() -> Self {
        Self {
            name: "thumbnail".to_string(),
            suffix: "_thumb".to_string(),
            width: 640,
            height: 360,
            crf: 28,
            preset: "fast".to_string(),
            fps: 24,
            bitrate: "800k".to_string(),
            fade_secs: 0.5,
            max_secs: 10.0,
            start_offset_ratio: 0.15,
            start_offset_min_secs: 8.0,
            require_duration: false,
        }
    }

    /// Derived file name for a source file name: the profile suffix goes
    /// before the `.mp4` extension, or is appended (with `.mp4`) when the
    /// source name has some other shape.
    pub fn derived_file_name(&self, source: &str) -> String {
        match source.strip_suffix(".mp4") {
            Some(stem) => format!("{stem}{}.mp4", self.suffix),
            None => format!("{source}{}.mp4", self.suffix),
        }
    }

    /// Compute the seek/trim/fade numbers for one source.
    ///
    /// With a known duration the clip is trimmed to `min(duration, max_secs)`
    /// and, past the offset threshold, seeked `start_offset_ratio` of the way
    /// in. With no duration the plan is conservative: start at zero and
    /// request the profile maximum.
    pub fn plan(&self, source_duration: Option<Duration>) -> ClipPlan {
        let probed = source_duration.map(|d| d.as_secs_f64());
        let start_secs = match probed {
            Some(d) if self.start_offset_ratio > 0.0 && d > self.start_offset_min_secs => {
                self.start_offset_ratio * d
            }
            _ => 0.0,
        };
        let duration_secs = match probed {
            Some(d) => d.min(self.max_secs),
            None => self.max_secs,
        }
        .max(0.0);
        ClipPlan {
            start_secs,
            duration_secs,
            fade_secs: self.fade_secs,
        }
    }
}

/// The trim and fade timings for one ffmpeg invocation, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlan {
    /// Seek offset into the source.
    pub start_secs: f64,
    /// Requested output length. Never negative.
    pub duration_secs: f64,
    /// Fade-in and fade-out length.
    pub fade_secs: f64,
}

impl ClipPlan {
    /// Where the fade-out begins on the output timeline.
    pub fn fade_out_start_secs(&self) -> f64 {
        self.duration_secs - self.fade_secs
    }
}
