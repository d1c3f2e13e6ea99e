//! Hero background placement.
//!
//! The landing section expects a `hero.mp4` next to the other videos. This
//! recreates it when absent: preferably from the loop-optimized hero
//! variant, otherwise from a configured fallback source. Pure file
//! plumbing; no transcoding happens here.

use std::fs;
use std::path::{Path, PathBuf};

use loopsmith_core::config::HeroConfig;
use loopsmith_core::Result;

/// What [`ensure_hero`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeroOutcome {
    /// The hero file was already in place; nothing was copied.
    AlreadyPresent,
    /// Copied from the optimized variant at the given path.
    CopiedOptimized(PathBuf),
    /// No optimized variant; copied from the fallback source at the given path.
    CopiedFallback(PathBuf),
    /// Neither candidate exists; nothing could be done.
    Missing,
}

/// Make sure the hero video exists, copying a candidate into place if needed.
///
/// # Errors
/// Returns [`loopsmith_core::Error::Io`] when a copy fails; a missing
/// candidate is not an error here and is reported as [`HeroOutcome::Missing`].
pub fn ensure_hero(videos_dir: &Path, config: &HeroConfig) -> Result<HeroOutcome> {
    let hero = videos_dir.join(&config.file);
    if hero.is_file() {
        return Ok(HeroOutcome::AlreadyPresent);
    }

    let optimized = videos_dir.join(&config.optimized);
    if optimized.is_file() {
        fs::copy(&optimized, &hero)?;
        tracing::debug!("copied {} -> {}", optimized.display(), hero.display());
        return Ok(HeroOutcome::CopiedOptimized(optimized));
    }

    let fallback = videos_dir.join(&config.fallback);
    if fallback.is_file() {
        fs::copy(&fallback, &hero)?;
        tracing::debug!("copied {} -> {}", fallback.display(), hero.display());
        return Ok(HeroOutcome::CopiedFallback(fallback));
    }

    Ok(HeroOutcome::Missing)
}
