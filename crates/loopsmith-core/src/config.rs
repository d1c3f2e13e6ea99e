//! Application configuration.
//!
//! Configuration is plain JSON deserialized into [`Config`]. Every section
//! and field has a default, so an empty `{}` file (or no file at all) yields
//! a fully working setup pointed at `public/videos`. [`Config::validate`]
//! returns human-readable warnings rather than failing hard; the CLI prints
//! them and carries on.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::profile::TranscodeProfile;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source inventory: where the videos live and which ones to process.
    pub videos: VideosConfig,
    /// External tool locations and execution limits.
    pub tools: ToolsConfig,
    /// Encoding profiles for the derived variants.
    pub profiles: ProfilesConfig,
    /// Hero background placement.
    pub hero: HeroConfig,
}

/// Where the source videos live and which files each batch run covers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideosConfig {
    /// Directory holding the source files. Relative paths resolve against
    /// the current working directory.
    pub dir: PathBuf,
    /// File names (not paths) of the sources to process, in run order.
    pub sources: Vec<String>,
}

impl Default for VideosConfig {
    fn default() -> Self {
        Self {
            dir: default_videos_dir(),
            sources: default_sources(),
        }
    }
}

fn default_videos_dir() -> PathBuf {
    PathBuf::from("public/videos")
}

fn default_sources() -> Vec<String> {
    [
        "choregraphie_neorealite.mp4",
        "CiteMemoire_MTL.mp4",
        "CosmopolitanOfLasVegas_Opulence.mp4",
        "CosmopolitanOfLasVegas_Opulence_MakingOf.mp4",
        "Experiences_VR&Dome.mp4",
        "RedpathWaterfrontFestival_Toronto.mp4",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Locations and limits for the external tools the pipeline shells out to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Explicit path to ffmpeg. When unset (or the path does not exist) the
    /// binary is looked up on `PATH`.
    pub ffmpeg_path: Option<PathBuf>,
    /// Explicit path to ffprobe, same resolution rules as `ffmpeg_path`.
    pub ffprobe_path: Option<PathBuf>,
    /// Wall-clock budget for a single tool invocation, in seconds. An
    /// invocation that exceeds it is killed and reported as that item's
    /// failure.
    pub timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            ffprobe_path: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    300
}

impl ToolsConfig {
    /// The per-invocation timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// The two encoding profiles used by batch runs.
///
/// Overriding a profile in JSON replaces it wholesale; a partial profile
/// object fails to parse rather than silently mixing defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilesConfig {
    /// Profile for `loops` runs.
    #[serde(rename = "loop", default = "TranscodeProfile::background_loop")]
    pub background_loop: TranscodeProfile,
    /// Profile for `thumbs` runs.
    #[serde(default = "TranscodeProfile::thumbnail")]
    pub thumbnail: TranscodeProfile,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            background_loop: TranscodeProfile::background_loop(),
            thumbnail: TranscodeProfile::thumbnail(),
        }
    }
}

/// File names involved in hero background placement, all relative to the
/// videos directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    /// The file the landing page expects.
    pub file: String,
    /// Preferred copy source: the loop-optimized hero variant.
    pub optimized: String,
    /// Copy source of last resort when no optimized variant exists.
    pub fallback: String,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            file: "hero.mp4".to_string(),
            optimized: "hero_optimized.mp4".to_string(),
            fallback: "Choregraphie_Neorealite.mp4".to_string(),
        }
    }
}

impl Config {
    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load from an optional path, falling back to defaults.
    ///
    /// A missing file is normal (logged at info); an unreadable or malformed
    /// file is logged as a warning. Neither aborts the program.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(config) => {
                    tracing::info!("loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("{e}; falling back to defaults");
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!(
                    "could not read config at {}: {e}; falling back to defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Check the configuration for suspicious values.
    ///
    /// Returns a list of warnings. None of them is fatal on its own; the
    /// batch runner surfaces real problems (missing directory, missing
    /// tools) with concrete errors at run time.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.videos.sources.is_empty() {
            warnings.push(
                "videos.sources is empty; batch runs will have nothing to do".to_string(),
            );
        }
        for (i, source) in self.videos.sources.iter().enumerate() {
            if !source.ends_with(".mp4") {
                warnings.push(format!(
                    "videos.sources[{i}] \"{source}\" does not end in .mp4; \
                     the derived name will have .mp4 appended"
                ));
            }
        }

        if self.tools.timeout_secs == 0 {
            warnings.push(
                "tools.timeout_secs is 0; every tool invocation will time out immediately"
                    .to_string(),
            );
        }

        for profile in [&self.profiles.background_loop, &self.profiles.thumbnail] {
            profile_warnings(profile, &mut warnings);
        }

        warnings
    }
}

fn profile_warnings(profile: &TranscodeProfile, warnings: &mut Vec<String>) {
    let name = &profile.name;
    if profile.width == 0 || profile.height == 0 {
        warnings.push(format!("profile \"{name}\": zero width or height"));
    }
    if profile.max_secs <= 0.0 {
        warnings.push(format!("profile \"{name}\": max_secs must be positive"));
    }
    if profile.fade_secs < 0.0 {
        warnings.push(format!("profile \"{name}\": negative fade_secs"));
    } else if profile.fade_secs * 2.0 > profile.max_secs {
        warnings.push(format!(
            "profile \"{name}\": fades overlap (fade_secs {} vs max_secs {})",
            profile.fade_secs, profile.max_secs
        ));
    }
    if !(0.0..1.0).contains(&profile.start_offset_ratio) {
        warnings.push(format!(
            "profile \"{name}\": start_offset_ratio {} outside [0, 1)",
            profile.start_offset_ratio
        ));
    }
}
