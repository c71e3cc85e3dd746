//! Export service - shot list, narration and video from a finished storyboard

use crate::error::{SpotforgeError, SpotforgeResult};
use crate::models::{ProjectRecord, VideoConfig};
use crate::orchestrator::{
    ClipSpec, Collaborator, Narrator, Transition, VideoAssembler, VideoSpec,
};
use crate::planner::{narration_script, shot_list};
use crate::state::{ProjectLayout, ProjectStore};
use std::path::PathBuf;
use tracing::{info, instrument};

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub narration: bool,
    /// ElevenLabs voice, `default` for the configured one
    pub voice_id: String,
}

/// Artifacts written by an export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub video: PathBuf,
    pub shot_list: PathBuf,
    pub narration: Option<PathBuf>,
    pub duration_secs: f64,
}

/// Slideshow of all six panel images in id order
pub fn build_video_spec(
    record: &ProjectRecord,
    layout: &ProjectLayout,
    video: &VideoConfig,
    audio: Option<PathBuf>,
) -> VideoSpec {
    let transition = if video.transition_seconds > 0.0 {
        Transition::Crossfade(video.transition_seconds)
    } else {
        Transition::None
    };

    let paths = record.asset_paths();
    let last = paths.len().saturating_sub(1);
    let clips = paths
        .into_iter()
        .enumerate()
        .map(|(index, image_path)| ClipSpec {
            image_path,
            duration: video.panel_seconds,
            transition: if index < last { transition } else { Transition::None },
        })
        .collect();

    VideoSpec {
        clips,
        audio,
        output: layout.video_path(),
    }
}

/// Every panel must be generated and its image still on disk
fn ensure_assets_present(record: &ProjectRecord) -> SpotforgeResult<()> {
    record.ensure_exportable()?;
    for panel in &record.panels {
        match &panel.asset_path {
            Some(path) if path.is_file() => {}
            Some(path) => {
                return Err(SpotforgeError::invalid_input(
                    format!("panel {}", panel.id),
                    format!(
                        "image {} is missing. Run 'spotforge edit {} <instruction>' to regenerate it.",
                        path.display(),
                        panel.id
                    ),
                ));
            }
            None => return Err(SpotforgeError::ExportBlocked { panels: vec![panel.id] }),
        }
    }
    Ok(())
}

/// Write the shot list, optional narration and the video
#[instrument(skip_all, fields(narration = options.narration))]
pub async fn export_storyboard(
    store: &ProjectStore,
    narrator: Option<&dyn Narrator>,
    assembler: &dyn VideoAssembler,
    video: &VideoConfig,
    options: &ExportOptions,
) -> SpotforgeResult<ExportSummary> {
    let record = store.load()?;
    ensure_assets_present(&record)?;

    let layout = store.layout();
    let shot_list_path = layout.shot_list_path();
    layout.write_export(&shot_list_path, shot_list(&record).as_bytes())?;
    info!(path = %shot_list_path.display(), "shot list written");

    let narration = if options.narration {
        let narrator = narrator.ok_or_else(|| {
            SpotforgeError::Configuration(
                "narration requested but no narration service is configured".to_string(),
            )
        })?;
        let audio = narrator
            .synthesize(&narration_script(&record), &options.voice_id)
            .await
            .map_err(|e| SpotforgeError::collaborator(Collaborator::Narration, None, e))?;

        let path = layout.narration_path();
        layout.write_export(&path, &audio)?;
        info!(path = %path.display(), bytes = audio.len(), "narration written");
        Some(path)
    } else {
        None
    };

    let spec = build_video_spec(&record, layout, video, narration.clone());
    let duration_secs = spec.total_duration();
    let video_path = assembler
        .assemble(&spec)
        .await
        .map_err(|e| SpotforgeError::collaborator(Collaborator::VideoAssembly, None, e))?;

    Ok(ExportSummary {
        video: video_path,
        shot_list: shot_list_path,
        narration,
        duration_secs,
    })
}
