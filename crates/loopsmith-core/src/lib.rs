//! # loopsmith-core
//!
//! Shared foundation for the loopsmith crates:
//!
//! - **Errors** ([`Error`], [`Result`]) -- the unified error type everything
//!   funnels into.
//! - **Configuration** ([`config`]) -- JSON configuration with full defaults
//!   and non-fatal validation.
//! - **Profiles** ([`profile`]) -- the encoding recipes and the pure clip
//!   planning arithmetic behind every ffmpeg invocation.
//!
//! This crate has no async code and never touches external tools; it exists
//! so the orchestration and tool layers agree on types.

pub mod config;
pub mod error;
pub mod profile;

pub use error::{Error, Result};
pub use profile::{ClipPlan, TranscodeProfile};
