mod cli;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use serde::Serialize;

use loopsmith::batch::BatchRunner;
use loopsmith::hero::{self, HeroOutcome};
use loopsmith::transcode::FfmpegTranscoder;
use loopsmith_av::ToolRegistry;
use loopsmith_core::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "loopsmith=trace,loopsmith_av=trace,loopsmith_core=trace".to_string()
        } else {
            "loopsmith=info,loopsmith_av=info,loopsmith_core=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Loops { dry_run } => run_batch(cli.config.as_deref(), Variant::Loops, dry_run),
        Commands::Thumbs { dry_run } => run_batch(cli.config.as_deref(), Variant::Thumbs, dry_run),
        Commands::Hero => place_hero(cli.config.as_deref()),
        Commands::Probe { file, json } => probe_file(cli.config.as_deref(), &file, json),
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
    }
}

/// Which family of derived variants a batch run produces.
enum Variant {
    Loops,
    Thumbs,
}

fn run_batch(config_path: Option<&Path>, variant: Variant, dry_run: bool) -> Result<()> {
    let config = Config::load_or_default(config_path);
    for warning in config.validate() {
        tracing::warn!("config: {warning}");
    }

    let (profile, notes) = match variant {
        Variant::Loops => (config.profiles.background_loop.clone(), loop_notes()),
        Variant::Thumbs => (config.profiles.thumbnail.clone(), thumb_notes()),
    };

    // Tool discovery and version probing happen before any file is touched;
    // a failure here aborts the whole run.
    let transcoder = FfmpegTranscoder::new(&config.tools)?;
    let runner = BatchRunner::new(Box::new(transcoder), &config.videos, profile)
        .with_dry_run(dry_run)
        .with_notes(notes);

    let rt = tokio::runtime::Runtime::new()?;
    let summary = rt.block_on(runner.run())?;

    if summary.all_failed() {
        anyhow::bail!("no files were successfully processed");
    }
    Ok(())
}

fn loop_notes() -> Vec<String> {
    [
        "point autoplaying backgrounds at the *_optimized.mp4 variants",
        "keep the originals for full-quality modal playback",
        "the clips fade in and out so they loop seamlessly",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn thumb_notes() -> Vec<String> {
    [
        "point preview tiles at the *_thumb.mp4 variants",
        "keep the originals for modal playback",
        "re-run after adding new source videos",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn place_hero(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load_or_default(config_path);
    let dir = &config.videos.dir;
    println!("Checking hero video in {}", dir.display());

    match hero::ensure_hero(dir, &config.hero)? {
        HeroOutcome::AlreadyPresent => println!("✓ {} already in place", config.hero.file),
        HeroOutcome::CopiedOptimized(src) => {
            println!("✓ copied {} -> {}", src.display(), config.hero.file)
        }
        HeroOutcome::CopiedFallback(src) => {
            println!("✓ copied fallback {} -> {}", src.display(), config.hero.file)
        }
        HeroOutcome::Missing => {
            println!("✗ no candidate found for {}", config.hero.file);
            anyhow::bail!(
                "neither {} nor {} exists in {}",
                config.hero.optimized,
                config.hero.fallback,
                dir.display()
            );
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct ProbeReport {
    file: String,
    size_bytes: u64,
    duration_secs: f64,
}

fn probe_file(config_path: Option<&Path>, file: &Path, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let config = Config::load_or_default(config_path);
    let tools = ToolRegistry::discover(&config.tools);

    let rt = tokio::runtime::Runtime::new()?;
    let duration = rt.block_on(loopsmith_av::probe_duration(
        &tools,
        file,
        config.tools.timeout(),
    ))?;
    let size = std::fs::metadata(file)?.len();

    if json {
        let report = ProbeReport {
            file: file.display().to_string(),
            size_bytes: size,
            duration_secs: duration.as_secs_f64(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let secs = duration.as_secs();
        let mins = secs / 60;
        let hours = mins / 60;
        println!("File: {}", file.display());
        println!("Size: {} bytes", size);
        println!(
            "Duration: {:02}:{:02}:{:02} ({:.1}s)",
            hours,
            mins % 60,
            secs % 60,
            duration.as_secs_f64()
        );
    }

    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load_or_default(config_path);
    let registry = ToolRegistry::discover(&config.tools);

    println!("Checking external tools...\n");

    let mut all_ok = true;
    for tool in registry.check_all() {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({version})");
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install ffmpeg to enable batch runs.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = Config::load(p)?;
            println!("✓ Configuration is valid");
            print_config_summary(&config);
            let warnings = config.validate();
            if !warnings.is_empty() {
                println!();
                for warning in &warnings {
                    println!("  Warning: {warning}");
                }
            }
        }
        None => {
            println!("No config file specified, using defaults");
            let config = Config::default();
            println!("Default config:");
            print_config_summary(&config);
        }
    }

    Ok(())
}

fn print_config_summary(config: &Config) {
    println!("  Videos dir: {}", config.videos.dir.display());
    println!("  Sources: {}", config.videos.sources.len());
    println!("  Tool timeout: {}s", config.tools.timeout_secs);
    println!(
        "  Loop profile: {}x{}, max {}s",
        config.profiles.background_loop.width,
        config.profiles.background_loop.height,
        config.profiles.background_loop.max_secs
    );
    println!(
        "  Thumbnail profile: {}x{}, max {}s",
        config.profiles.thumbnail.width,
        config.profiles.thumbnail.height,
        config.profiles.thumbnail.max_secs
    );
    println!("  Hero file: {}", config.hero.file);
}
