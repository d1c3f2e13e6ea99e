//! # loopsmith-av
//!
//! External-tool plumbing for the loopsmith pipeline:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- locate and version-probe
//!   ffmpeg and ffprobe.
//! - **Command execution** ([`ToolCommand`]) -- async invocation with
//!   captured output and a wall-clock timeout.
//! - **Probing** ([`probe_duration`]) -- read a source's duration from
//!   ffprobe's JSON output.
//! - **Encoding** ([`encode_clip`]) -- the trim/scale/pad/fade ffmpeg
//!   invocation that produces a derived clip.
//!
//! Nothing in this crate decides *which* files to process or how failures
//! aggregate; that policy lives with the callers.

pub mod command;
pub mod encode;
pub mod probe;
pub mod tools;

pub use command::{ToolCommand, ToolOutput};
pub use encode::encode_clip;
pub use probe::probe_duration;
pub use tools::{ToolConfig, ToolInfo, ToolRegistry};
