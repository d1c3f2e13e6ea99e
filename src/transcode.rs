//! The capability seam between orchestration and the external tools.
//!
//! [`Transcoder`] is the narrow interface the batch runner depends on: probe
//! a duration, produce a clip. Keeping it this small lets the orchestration
//! logic run against an in-memory fake in tests, with no ffmpeg on the host.
//! [`FfmpegTranscoder`] is the production implementation on top of
//! `loopsmith-av`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use loopsmith_av::ToolRegistry;
use loopsmith_core::config::ToolsConfig;
use loopsmith_core::profile::{ClipPlan, TranscodeProfile};
use loopsmith_core::Result;

/// One planned encode: where to read, where to write, and how.
#[derive(Debug, Clone)]
pub struct TranscodeJob {
    /// Source file.
    pub input: PathBuf,
    /// Derived file to produce.
    pub output: PathBuf,
    /// Encoding recipe.
    pub profile: TranscodeProfile,
    /// Seek/trim/fade numbers for this source.
    pub plan: ClipPlan,
}

/// What the batch runner needs from the outside world.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Read-only duration query for a source file.
    async fn probe_duration(&self, source: &Path) -> Result<Duration>;

    /// Produce the derived clip described by `job`.
    ///
    /// On success the output file exists at `job.output`; the runner
    /// double-checks that rather than trusting the return value alone.
    async fn transcode(&self, job: &TranscodeJob) -> Result<()>;
}

/// Production [`Transcoder`] backed by the real ffmpeg and ffprobe binaries.
pub struct FfmpegTranscoder {
    tools: ToolRegistry,
    timeout: Duration,
}

impl FfmpegTranscoder {
    /// Discover and version-probe ffmpeg and ffprobe.
    ///
    /// # Errors
    /// Returns [`loopsmith_core::Error::Tool`] when either tool is missing
    /// or its version probe fails. Callers treat that as fatal, before any
    /// per-file work starts.
    pub fn new(config: &ToolsConfig) -> Result<Self> {
        let tools = ToolRegistry::discover(config);
        for name in ["ffmpeg", "ffprobe"] {
            let version = tools.verify(name)?;
            tracing::debug!("{name}: {version}");
        }
        Ok(Self {
            tools,
            timeout: config.timeout(),
        })
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn probe_duration(&self, source: &Path) -> Result<Duration> {
        loopsmith_av::probe_duration(&self.tools, source, self.timeout).await
    }

    async fn transcode(&self, job: &TranscodeJob) -> Result<()> {
        loopsmith_av::encode_clip(
            &self.tools,
            &job.input,
            &job.output,
            &job.profile,
            &job.plan,
            self.timeout,
        )
        .await
    }
}
