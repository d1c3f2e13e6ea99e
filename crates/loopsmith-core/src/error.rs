//! Unified error type for the loopsmith crates.
//!
//! Everything that can fail funnels into [`Error`]. The batch runner decides
//! which variants abort a run outright and which are recorded as per-item
//! failures; the variants themselves carry no policy.

use std::fmt;

/// Unified error type covering all failure modes in loopsmith.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required entity (source file, videos directory) could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Type of entity (e.g. "source video", "videos directory").
        entity: String,
        /// Identifier or path of the entity.
        id: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// An external tool failed to spawn, exited non-zero, or timed out.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool (e.g. "ffmpeg", "ffprobe").
        tool: String,
        /// Description of the failure.
        message: String,
    },

    /// Media probing produced output we could not use.
    #[error("Probe error: {0}")]
    Probe(String),

    /// Configuration data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Create a not-found error.
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create a tool error.
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Convenience result type used throughout the loopsmith crates.
pub type Result<T> = std::result::Result<T, Error>;
