use super::{truncate, CollaboratorError, Transition, VideoAssembler, VideoSpec};
use crate::models::VideoConfig;
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Slideshow assembly through a local `ffmpeg` binary
#[derive(Debug, Clone)]
pub struct FfmpegAssembler {
    config: VideoConfig,
    show_progress: bool,
}

impl FfmpegAssembler {
    pub fn new(config: VideoConfig) -> Self {
        Self {
            config,
            show_progress: false,
        }
    }

    /// Show a spinner while ffmpeg runs
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn spinner(&self, message: String) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

/// Start time of each transition, in clip order.
///
/// Join `k` starts where the accumulated timeline ends minus its overlap, so
/// with uniform clips `offset_k = k·d − k·t`.
pub fn transition_offsets(spec: &VideoSpec) -> Vec<f64> {
    let mut offsets = Vec::with_capacity(spec.clips.len().saturating_sub(1));
    let Some(first) = spec.clips.first() else {
        return offsets;
    };

    let mut timeline = first.duration;
    for pair in spec.clips.windows(2) {
        let overlap = pair[0].transition.overlap();
        offsets.push(timeline - overlap);
        timeline += pair[1].duration - overlap;
    }
    offsets
}

fn seconds(value: f64) -> String {
    let s = format!("{:.3}", value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Full ffmpeg argument list for a slideshow
pub fn build_ffmpeg_args(spec: &VideoSpec, config: &VideoConfig) -> Vec<String> {
    let mut args: Vec<String> = vec!["-hide_banner".into(), "-loglevel".into(), "error".into()];

    for clip in &spec.clips {
        args.extend([
            "-loop".to_string(),
            "1".to_string(),
            "-t".to_string(),
            seconds(clip.duration),
            "-i".to_string(),
            clip.image_path.display().to_string(),
        ]);
    }
    if let Some(audio) = &spec.audio {
        args.extend(["-i".to_string(), audio.display().to_string()]);
    }

    let (w, h) = (config.width, config.height);
    let mut filters: Vec<String> = spec
        .clips
        .iter()
        .enumerate()
        .map(|(i, _)| {
            format!(
                "[{i}:v]scale={w}:{h}:force_original_aspect_ratio=decrease,\
                 pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,setsar=1,fps={fps},format=yuv420p[v{i}]",
                i = i,
                w = w,
                h = h,
                fps = config.fps
            )
        })
        .collect();

    let offsets = transition_offsets(spec);
    let mut current = "v0".to_string();
    for (k, offset) in offsets.iter().enumerate() {
        let next = k + 1;
        let label = format!("x{}", next);
        let filter = match spec.clips[k].transition {
            Transition::Crossfade(duration) if duration > 0.0 => format!(
                "[{}][v{}]xfade=transition=fade:duration={}:offset={}[{}]",
                current,
                next,
                seconds(duration),
                seconds(*offset),
                label
            ),
            _ => format!("[{}][v{}]concat=n=2:v=1:a=0[{}]", current, next, label),
        };
        filters.push(filter);
        current = label;
    }
    filters.push(format!("[{}]null[vout]", current));

    let audio_input = spec.clips.len();
    if spec.audio.is_some() {
        filters.push(format!("[{}:a]apad[aout]", audio_input));
    }

    args.push("-filter_complex".into());
    args.push(filters.join(";"));
    args.extend(["-map".into(), "[vout]".into()]);
    if spec.audio.is_some() {
        args.extend([
            "-map".into(),
            "[aout]".into(),
            "-c:a".into(),
            "aac".into(),
            "-shortest".into(),
        ]);
    }

    args.extend([
        "-t".into(),
        seconds(spec.total_duration()),
        "-c:v".into(),
        "libx264".into(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        "-r".into(),
        config.fps.to_string(),
        "-y".into(),
        spec.output.display().to_string(),
    ]);
    args
}

#[async_trait]
impl VideoAssembler for FfmpegAssembler {
    #[instrument(skip(self, spec), fields(clips = spec.clips.len(), output = %spec.output.display()))]
    async fn assemble(&self, spec: &VideoSpec) -> Result<PathBuf, CollaboratorError> {
        if spec.clips.is_empty() {
            return Err(CollaboratorError::InvalidRequest(
                "no clips to assemble".to_string(),
            ));
        }

        let args = build_ffmpeg_args(spec, &self.config);
        debug!(?args, "running ffmpeg");

        let mut cmd = Command::new(&self.config.ffmpeg_path);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let progress = self.spinner(format!("Rendering {}...", spec.output.display()));

        let child = cmd.spawn().map_err(|e| {
            CollaboratorError::Unavailable(format!(
                "failed to run '{}': {}. Please ensure ffmpeg is installed and in your PATH.",
                self.config.ffmpeg_path.display(),
                e
            ))
        });
        let child = match child {
            Ok(child) => child,
            Err(e) => {
                if let Some(pb) = progress {
                    pb.finish_and_clear();
                }
                return Err(e);
            }
        };

        let output = child.wait_with_output().await;
        if let Some(pb) = progress {
            pb.finish_and_clear();
        }
        let output = output.map_err(|e| CollaboratorError::Unavailable(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CollaboratorError::InvalidRequest(format!(
                "ffmpeg exited with code {:?}: {}",
                output.status.code(),
                truncate(stderr.trim(), 1000)
            )));
        }

        if !spec.output.exists() {
            return Err(CollaboratorError::InvalidResponse(format!(
                "ffmpeg reported success but {} was not written",
                spec.output.display()
            )));
        }

        info!(seconds = spec.total_duration(), "video assembled");
        Ok(spec.output.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::ClipSpec;

    fn spec(count: usize, transition: Transition, audio: bool) -> VideoSpec {
        VideoSpec {
            clips: (1..=count)
                .map(|i| ClipSpec {
                    image_path: PathBuf::from(format!("panels/panel_{}.png", i)),
                    duration: 6.0,
                    transition,
                })
                .collect(),
            audio: audio.then(|| PathBuf::from("exports/narration.mp3")),
            output: PathBuf::from("exports/storyboard.mp4"),
        }
    }

    #[test]
    fn test_offsets_for_six_crossfaded_panels() {
        let offsets = transition_offsets(&spec(6, Transition::Crossfade(1.0), false));
        assert_eq!(offsets, vec![5.0, 10.0, 15.0, 20.0, 25.0]);
    }

    #[test]
    fn test_offsets_for_hard_cuts() {
        let offsets = transition_offsets(&spec(3, Transition::None, false));
        assert_eq!(offsets, vec![6.0, 12.0]);
    }

    #[test]
    fn test_single_clip_has_no_offsets() {
        assert!(transition_offsets(&spec(1, Transition::Crossfade(1.0), false)).is_empty());
    }

    #[test]
    fn test_args_inputs_in_clip_order() {
        let args = build_ffmpeg_args(&spec(6, Transition::Crossfade(1.0), false), &VideoConfig::default());
        let inputs: Vec<&String> = args
            .iter()
            .zip(args.iter().skip(1))
            .filter(|(flag, _)| flag.as_str() == "-i")
            .map(|(_, value)| value)
            .collect();
        assert_eq!(inputs.len(), 6);
        assert!(inputs[0].ends_with("panel_1.png"));
        assert!(inputs[5].ends_with("panel_6.png"));
        assert_eq!(args.last().unwrap(), "exports/storyboard.mp4");
    }

    #[test]
    fn test_filter_graph_chains_crossfades() {
        let args = build_ffmpeg_args(&spec(6, Transition::Crossfade(1.0), false), &VideoConfig::default());
        let graph = &args[args.iter().position(|a| a == "-filter_complex").unwrap() + 1];

        assert!(graph.contains("[0:v]scale=1920:1080:force_original_aspect_ratio=decrease"));
        assert!(graph.contains("[v0][v1]xfade=transition=fade:duration=1:offset=5[x1]"));
        assert!(graph.contains("[x4][v5]xfade=transition=fade:duration=1:offset=25[x5]"));
        assert!(graph.ends_with("[x5]null[vout]"));
        assert!(!args.contains(&"-shortest".to_string()));
        let t = args.iter().position(|a| a == "-c:v").unwrap() - 1;
        assert_eq!(args[t], "31");
    }

    #[test]
    fn test_audio_is_padded_and_cut_to_video() {
        let args = build_ffmpeg_args(&spec(2, Transition::Crossfade(1.0), true), &VideoConfig::default());
        let graph = &args[args.iter().position(|a| a == "-filter_complex").unwrap() + 1];

        assert!(args.contains(&"exports/narration.mp3".to_string()));
        assert!(graph.contains("[2:a]apad[aout]"));
        assert!(args.contains(&"[aout]".to_string()));
        assert!(args.contains(&"-shortest".to_string()));
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let config = VideoConfig {
            ffmpeg_path: PathBuf::from("/nonexistent/ffmpeg-binary"),
            ..VideoConfig::default()
        };
        let err = FfmpegAssembler::new(config)
            .assemble(&spec(2, Transition::Crossfade(1.0), false))
            .await
            .unwrap_err();
        assert!(matches!(err, CollaboratorError::Unavailable(_)));
    }
}
