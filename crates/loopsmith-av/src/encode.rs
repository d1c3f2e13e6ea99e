//! Clip encoding via ffmpeg.
//!
//! Builds and runs the single ffmpeg invocation that turns a source video
//! into its derived variant: seek, trim, scale-and-pad to the profile
//! geometry, fade both ends, strip audio, and write a faststart mp4.

use std::path::Path;
use std::time::Duration;

use loopsmith_core::profile::{ClipPlan, TranscodeProfile};
use loopsmith_core::Result;

use crate::command::ToolCommand;
use crate::tools::ToolRegistry;

/// Encode one derived clip.
///
/// # Errors
/// Returns [`loopsmith_core::Error::Tool`] when ffmpeg is missing, exits
/// non-zero, or exceeds `timeout`.
pub async fn encode_clip(
    tools: &ToolRegistry,
    input: &Path,
    output: &Path,
    profile: &TranscodeProfile,
    plan: &ClipPlan,
    timeout: Duration,
) -> Result<()> {
    let ffmpeg = tools.require("ffmpeg")?;
    tracing::debug!(
        "encoding {} -> {} ({}: {}x{}, crf {}, preset {}, {} fps, {})",
        input.display(),
        output.display(),
        profile.name,
        profile.width,
        profile.height,
        profile.crf,
        profile.preset,
        profile.fps,
        profile.bitrate,
    );

    let mut cmd = ToolCommand::new(ffmpeg.path.clone());
    cmd.timeout(timeout);
    cmd.args(encode_args(input, output, profile, plan));
    cmd.execute().await?;
    Ok(())
}

/// The full ffmpeg argument list for one clip.
fn encode_args(
    input: &Path,
    output: &Path,
    profile: &TranscodeProfile,
    plan: &ClipPlan,
) -> Vec<String> {
    let mut args: Vec<String> = vec!["-y".to_string()];

    // Seeking before -i keeps the fade timestamps relative to the trimmed
    // output rather than the original timeline.
    if plan.start_secs > 0.0 {
        args.push("-ss".to_string());
        args.push(format!("{:.2}", plan.start_secs));
    }

    args.extend([
        "-i".to_string(),
        input.to_string_lossy().into_owned(),
        "-t".to_string(),
        format!("{:.2}", plan.duration_secs),
        "-vf".to_string(),
        filter_chain(profile, plan),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-crf".to_string(),
        profile.crf.to_string(),
        "-preset".to_string(),
        profile.preset.clone(),
        "-r".to_string(),
        profile.fps.to_string(),
        "-b:v".to_string(),
        profile.bitrate.clone(),
        // Derived clips are silent autoplay assets.
        "-an".to_string(),
        "-movflags".to_string(),
        "+faststart".to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        output.to_string_lossy().into_owned(),
    ]);

    args
}

/// Scale to fit, pad to exact geometry, fade both ends.
fn filter_chain(profile: &TranscodeProfile, plan: &ClipPlan) -> String {
    format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,\
         pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,\
         fade=t=in:st=0:d={fade},\
         fade=t=out:st={out_start:.2}:d={fade}",
        w = profile.width,
        h = profile.height,
        fade = plan.fade_secs,
        out_start = plan.fade_out_start_secs(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn loop_plan(duration_secs: f64) -> ClipPlan {
        TranscodeProfile::background_loop().plan(Some(Duration::from_secs_f64(duration_secs)))
    }

    #[test]
    fn loop_args_trim_without_seeking() {
        let profile = TranscodeProfile::background_loop();
        let args = encode_args(
            &PathBuf::from("public/videos/reef.mp4"),
            &PathBuf::from("public/videos/reef_optimized.mp4"),
            &profile,
            &loop_plan(45.0),
        );
        assert!(!args.contains(&"-ss".to_string()));
        let t_pos = args.iter().position(|a| a == "-t").unwrap();
        assert_eq!(args[t_pos + 1], "30.00");
    }

    #[test]
    fn thumbnail_args_seek_before_input() {
        let profile = TranscodeProfile::thumbnail();
        let plan = profile.plan(Some(Duration::from_secs(20)));
        let args = encode_args(
            &PathBuf::from("a.mp4"),
            &PathBuf::from("a_thumb.mp4"),
            &profile,
            &plan,
        );
        let ss_pos = args.iter().position(|a| a == "-ss").unwrap();
        let i_pos = args.iter().position(|a| a == "-i").unwrap();
        assert!(ss_pos < i_pos);
        assert_eq!(args[ss_pos + 1], "3.00");
    }

    #[test]
    fn args_carry_the_web_delivery_flags() {
        let profile = TranscodeProfile::background_loop();
        let args = encode_args(
            &PathBuf::from("a.mp4"),
            &PathBuf::from("b.mp4"),
            &profile,
            &loop_plan(10.0),
        );
        for flag in ["-y", "-an", "+faststart", "yuv420p", "libx264"] {
            assert!(args.contains(&flag.to_string()), "missing {flag}");
        }
        assert_eq!(args.last().unwrap(), "b.mp4");
    }

    #[test]
    fn thumbnail_filter_chain_without_probe() {
        let profile = TranscodeProfile::thumbnail();
        let chain = filter_chain(&profile, &profile.plan(None));
        assert_eq!(
            chain,
            "scale=640:360:force_original_aspect_ratio=decrease,\
             pad=640:360:(ow-iw)/2:(oh-ih)/2,\
             fade=t=in:st=0:d=0.5,\
             fade=t=out:st=9.50:d=0.5"
        );
    }

    #[test]
    fn loop_filter_chain_fades_the_last_second() {
        let profile = TranscodeProfile::background_loop();
        let chain = filter_chain(&profile, &loop_plan(45.0));
        assert!(chain.contains("scale=854:480"));
        assert!(chain.contains("fade=t=in:st=0:d=1"));
        assert!(chain.contains("fade=t=out:st=29.00:d=1"));
    }
}
