//! External tool detection.
//!
//! The [`ToolRegistry`] discovers and caches the locations of the two CLI
//! tools the pipeline shells out to (ffmpeg, ffprobe) and runs the version
//! probe every batch run performs before touching any file.

use std::collections::HashMap;
use std::path::PathBuf;

use loopsmith_core::config::ToolsConfig;
use loopsmith_core::{Error, Result};

/// Tool names the registry manages.
const KNOWN_TOOLS: &[&str] = &["ffmpeg", "ffprobe"];

/// Resolved location of a single external tool.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Tool name (e.g. "ffmpeg").
    pub name: String,
    /// Resolved path to the executable.
    pub path: PathBuf,
}

/// Availability information for a tool, returned by [`ToolRegistry::check_all`].
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// Version string (first line of `-version` output), if it could be read.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

/// Registry holding discovered tool locations.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolConfig>,
}

impl ToolRegistry {
    /// Discover tools by searching `PATH`, honoring overrides from config.
    ///
    /// For each known tool, if [`ToolsConfig`] supplies a custom path **and**
    /// that path exists, it is used directly. Otherwise [`which::which`]
    /// looks the tool up on `PATH`. Tools that are not found are omitted
    /// from the registry; [`ToolRegistry::require`] reports them later.
    pub fn discover(tools_config: &ToolsConfig) -> Self {
        let mut tools = HashMap::new();

        for &name in KNOWN_TOOLS {
            let custom_path = match name {
                "ffmpeg" => tools_config.ffmpeg_path.as_deref(),
                "ffprobe" => tools_config.ffprobe_path.as_deref(),
                _ => None,
            };

            let resolved = match custom_path {
                Some(p) if p.exists() => Some(p.to_path_buf()),
                // Custom path missing or unset; fall back to PATH.
                _ => which::which(name).ok(),
            };

            if let Some(path) = resolved {
                tools.insert(
                    name.to_string(),
                    ToolConfig {
                        name: name.to_string(),
                        path,
                    },
                );
            }
        }

        Self { tools }
    }

    /// Look up a tool, or fail with the message shown when a run aborts
    /// because the tool is missing.
    pub fn require(&self, name: &str) -> Result<&ToolConfig> {
        self.tools.get(name).ok_or_else(|| {
            Error::tool(name, format!("{name} not found; is it installed and in PATH?"))
        })
    }

    /// Run `<tool> -version` and return the first line of its output.
    ///
    /// This is the precondition probe: a missing tool, a failing probe, or
    /// empty output all surface as [`Error::Tool`] so the caller can abort
    /// before any per-file work starts.
    pub fn verify(&self, name: &str) -> Result<String> {
        let cfg = self.require(name)?;
        let output = std::process::Command::new(&cfg.path)
            .arg("-version")
            .output()
            .map_err(|e| Error::tool(name, format!("version probe failed to run: {e}")))?;

        if !output.status.success() {
            return Err(Error::tool(
                name,
                format!("version probe exited with {}", output.status),
            ));
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .map(str::to_string)
            .filter(|line| !line.is_empty())
            .ok_or_else(|| Error::tool(name, "version probe produced no output"))
    }

    /// Check all known tools and return availability information.
    pub fn check_all(&self) -> Vec<ToolInfo> {
        KNOWN_TOOLS
            .iter()
            .map(|&name| {
                if let Some(cfg) = self.tools.get(name) {
                    ToolInfo {
                        name: name.to_string(),
                        available: true,
                        version: self.verify(name).ok(),
                        path: Some(cfg.path.clone()),
                    }
                } else {
                    ToolInfo {
                        name: name.to_string(),
                        available: false,
                        version: None,
                        path: None,
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_with_default_config() {
        let cfg = ToolsConfig::default();
        let registry = ToolRegistry::discover(&cfg);
        // We cannot guarantee ffmpeg is installed in CI,
        // but discovery itself must not panic.
        let _ = registry.check_all();
    }

    #[test]
    fn require_missing_tool_returns_error() {
        let registry = ToolRegistry::discover(&ToolsConfig::default());
        let err = registry.require("nonexistent_tool_xyz").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn verify_missing_tool_returns_error() {
        let registry = ToolRegistry::discover(&ToolsConfig::default());
        assert!(registry.verify("nonexistent_tool_xyz").is_err());
    }

    #[test]
    fn check_all_returns_both_known_tools() {
        let registry = ToolRegistry::discover(&ToolsConfig::default());
        let names: Vec<String> = registry.check_all().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["ffmpeg", "ffprobe"]);
    }

    #[test]
    fn discover_prefers_existing_custom_path() {
        let fake = tempfile::NamedTempFile::new().unwrap();
        let cfg = ToolsConfig {
            ffmpeg_path: Some(fake.path().to_path_buf()),
            ..Default::default()
        };
        let registry = ToolRegistry::discover(&cfg);
        let ffmpeg = registry.require("ffmpeg").unwrap();
        assert_eq!(ffmpeg.path, fake.path());
    }

    #[test]
    fn discover_falls_back_when_custom_path_missing() {
        let cfg = ToolsConfig {
            ffprobe_path: Some(PathBuf::from("/nonexistent/ffprobe")),
            ..Default::default()
        };
        let registry = ToolRegistry::discover(&cfg);
        // Either ffprobe was found on PATH or it is absent entirely; the
        // bogus override must never survive as the resolved path.
        if let Ok(cfg) = registry.require("ffprobe") {
            assert_ne!(cfg.path, PathBuf::from("/nonexistent/ffprobe"));
        }
    }
}
