//! Sequential batch orchestration.
//!
//! [`BatchRunner`] drives one [`TranscodeProfile`] across the configured
//! source list: preconditions first (they abort the run), then one file at a
//! time with per-item fault isolation, then a summary. A failed item never
//! stops the batch; a batch where *nothing* succeeded is reported so the
//! caller can exit non-zero.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use loopsmith_core::config::VideosConfig;
use loopsmith_core::profile::TranscodeProfile;
use loopsmith_core::{Error, Result};

use crate::transcode::{TranscodeJob, Transcoder};

/// A successfully produced derived clip.
#[derive(Debug, Clone)]
pub struct DerivedVideo {
    /// Where the clip was written.
    pub path: PathBuf,
    /// Size on disk. Zero in dry runs, where nothing is written.
    pub size_bytes: u64,
    /// Planned clip length.
    pub duration: Duration,
}

/// Outcome of one source file's processing.
#[derive(Debug)]
pub struct FileOutcome {
    /// Source file name as configured.
    pub source: String,
    /// The derived clip, or why this item failed.
    pub result: Result<DerivedVideo>,
}

/// Aggregate result of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Items that produced (or, in a dry run, planned) a derived clip.
    pub succeeded: usize,
    /// Items that failed and were skipped.
    pub failed: usize,
    /// Per-item outcomes, in run order.
    pub outcomes: Vec<FileOutcome>,
}

impl BatchSummary {
    /// True when not a single item made it through.
    pub fn all_failed(&self) -> bool {
        self.succeeded == 0
    }
}

/// Runs one profile across the configured sources, one file at a time.
pub struct BatchRunner {
    transcoder: Box<dyn Transcoder>,
    videos_dir: PathBuf,
    sources: Vec<String>,
    profile: TranscodeProfile,
    dry_run: bool,
    notes: Vec<String>,
}

impl BatchRunner {
    /// Create a runner for the given inventory and profile.
    pub fn new(
        transcoder: Box<dyn Transcoder>,
        videos: &VideosConfig,
        profile: TranscodeProfile,
    ) -> Self {
        Self {
            transcoder,
            videos_dir: videos.dir.clone(),
            sources: videos.sources.clone(),
            profile,
            dry_run: false,
            notes: Vec::new(),
        }
    }

    /// Plan and report without deleting or writing anything.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Follow-up notes printed after a run with at least one success.
    pub fn with_notes(mut self, notes: Vec<String>) -> Self {
        self.notes = notes;
        self
    }

    /// Run the batch.
    ///
    /// # Errors
    /// Returns an error only for precondition failures (missing videos
    /// directory); per-item failures are recorded in the summary instead.
    pub async fn run(&self) -> Result<BatchSummary> {
        if !self.videos_dir.is_dir() {
            return Err(Error::not_found("videos directory", self.videos_dir.display()));
        }

        self.print_header();
        let mut summary = BatchSummary::default();

        for source in &self.sources {
            let result = self.process_one(source).await;
            match &result {
                Ok(derived) => {
                    summary.succeeded += 1;
                    if self.dry_run {
                        println!(
                            "✓ {source} -> {} (would encode {:.1}s)",
                            display_name(&derived.path),
                            derived.duration.as_secs_f64(),
                        );
                    } else {
                        println!(
                            "✓ {source} -> {} ({:.2} MB, {:.1}s)",
                            display_name(&derived.path),
                            mb(derived.size_bytes),
                            derived.duration.as_secs_f64(),
                        );
                    }
                }
                Err(e) => {
                    summary.failed += 1;
                    println!("✗ {source}: {e}");
                    tracing::debug!("item failed: {source}: {e}");
                }
            }
            summary.outcomes.push(FileOutcome {
                source: source.clone(),
                result,
            });
        }

        self.print_summary(&summary);
        Ok(summary)
    }

    /// Process a single source from existence check to verified output.
    async fn process_one(&self, source: &str) -> Result<DerivedVideo> {
        let input = self.videos_dir.join(source);
        if !input.is_file() {
            return Err(Error::not_found("source video", source));
        }

        let output = self.videos_dir.join(self.profile.derived_file_name(source));

        // An existing derivative is stale, not reusable: it may carry older
        // profile parameters. It goes away before anything else happens.
        if !self.dry_run && output.exists() {
            tracing::debug!("removing stale {}", output.display());
            fs::remove_file(&output)?;
        }

        let probed = match self.transcoder.probe_duration(&input).await {
            Ok(d) => Some(d),
            Err(e) if !self.profile.require_duration => {
                tracing::debug!("duration probe failed for {source}, planning without it: {e}");
                None
            }
            Err(e) => return Err(e),
        };
        let plan = self.profile.plan(probed);

        if self.dry_run {
            return Ok(DerivedVideo {
                path: output,
                size_bytes: 0,
                duration: Duration::from_secs_f64(plan.duration_secs),
            });
        }

        let job = TranscodeJob {
            input,
            output: output.clone(),
            profile: self.profile.clone(),
            plan,
        };
        self.transcoder.transcode(&job).await?;

        // ffmpeg can exit zero without writing anything useful; the file on
        // disk is the ground truth.
        let metadata = fs::metadata(&output).map_err(|_| {
            Error::tool("ffmpeg", format!("no output file produced at {}", output.display()))
        })?;

        Ok(DerivedVideo {
            path: output,
            size_bytes: metadata.len(),
            duration: Duration::from_secs_f64(plan.duration_secs),
        })
    }

    fn print_header(&self) {
        let n = self.sources.len();
        println!(
            "{} pass over {} ({n} file{})",
            self.profile.name,
            self.videos_dir.display(),
            if n == 1 { "" } else { "s" },
        );
        println!(
            "  target: {}x{} @ {} fps, crf {}, preset {}, {}",
            self.profile.width,
            self.profile.height,
            self.profile.fps,
            self.profile.crf,
            self.profile.preset,
            self.profile.bitrate,
        );
        println!(
            "  clip: max {}s, fade {}s",
            self.profile.max_secs, self.profile.fade_secs,
        );
        if self.dry_run {
            println!("  dry run: nothing will be deleted or written");
        }
        println!("---");
    }

    fn print_summary(&self, summary: &BatchSummary) {
        println!("---");
        println!("Summary: {} succeeded, {} failed", summary.succeeded, summary.failed);
        if summary.succeeded > 0 && !self.notes.is_empty() {
            println!();
            println!("Next steps:");
            for (i, note) in self.notes.iter().enumerate() {
                println!("  {}. {note}", i + 1);
            }
        }
    }
}

fn display_name(path: &Path) -> Cow<'_, str> {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy())
}

fn mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}
